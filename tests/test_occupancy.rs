use volunteer_shift::domain::registry::repository_trait::{RegistrationRepository, ScheduleRepository};
use volunteer_shift::domain::schedule::slot_availability::{OccupancySummary, compute_occupancy};
use volunteer_shift::domain::utils::id::{ScheduleId, UserId};
use volunteer_shift::load_registry;

fn fixture(name: &str) -> String {
    format!("{}/tests/data/{}", env!("CARGO_MANIFEST_DIR"), name)
}

#[test]
fn test_full_shift_from_stored_registrations() {
    let registry = load_registry(fixture("registry.json")).unwrap();
    let schedule_id = ScheduleId::new("s-exhibit-0508");

    let schedule = registry.schedule(&schedule_id).unwrap();
    let registrations = registry.registrations_for_schedules(&[schedule_id]).unwrap();
    let occupancy = compute_occupancy(&schedule, &registrations).unwrap();

    assert_eq!(occupancy.len(), 3);
    assert_eq!(occupancy[0].available_slots, 0);
    assert!(occupancy[0].is_full());
    assert!(occupancy[0].is_registered(&UserId::new("u-kim")));
    assert!(occupancy[0].is_registered(&UserId::new("u-lee")));
    assert_eq!(occupancy[1].available_slots, 2);
    assert_eq!(occupancy[2].available_slots, 2);

    let names: Vec<&str> = occupancy[0].registrations.iter().filter_map(|registration| registration.user_name.as_deref()).collect();
    assert_eq!(names, vec!["Kim", "Lee"]);
}

#[test]
fn test_available_slots_sum_matches_total() {
    let registry = load_registry(fixture("registry.json")).unwrap();

    for schedule_id in ["s-exhibit-0508", "s-exhibit-0515", "s-park-0511", "s-bus-0601"] {
        let schedule_id = ScheduleId::new(schedule_id);
        let schedule = registry.schedule(&schedule_id).unwrap();
        let registrations = registry.registrations_for_schedules(&[schedule_id]).unwrap();

        let occupancy = compute_occupancy(&schedule, &registrations).unwrap();
        let summary = OccupancySummary::new(&schedule, &occupancy);
        let available: i64 = occupancy.iter().map(|shift| shift.available_slots).sum();

        assert_eq!(available + registrations.len() as i64, summary.total_slots as i64);
        assert_eq!(summary.filled_slots, registrations.len() as u64);
    }
}

#[test]
fn test_overbooked_snapshot_reports_negative_slots() {
    let registry = load_registry(fixture("overbooked.json")).unwrap();
    let schedule_id = ScheduleId::new("s-1");

    let schedule = registry.schedule(&schedule_id).unwrap();
    let registrations = registry.registrations_for_schedules(&[schedule_id]).unwrap();
    let occupancy = compute_occupancy(&schedule, &registrations).unwrap();

    assert_eq!(occupancy[1].available_slots, -1);
    assert!(occupancy[1].is_overbooked());
    assert_eq!(OccupancySummary::new(&schedule, &occupancy).percentage(), 67);
}
