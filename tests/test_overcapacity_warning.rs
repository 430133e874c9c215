use log::Level;
use logtest::Logger;

use volunteer_shift::domain::registry::repository_trait::{RegistrationRepository, ScheduleRepository};
use volunteer_shift::domain::schedule::slot_availability::compute_occupancy;
use volunteer_shift::domain::utils::id::ScheduleId;
use volunteer_shift::load_registry;

#[test]
fn test_overcapacity_is_logged_as_warning() {
    let mut logger = Logger::start();
    let path = format!("{}/tests/data/overbooked.json", env!("CARGO_MANIFEST_DIR"));

    let registry = load_registry(path).unwrap();
    let schedule_id = ScheduleId::new("s-1");
    let schedule = registry.schedule(&schedule_id).unwrap();
    let registrations = registry.registrations_for_schedules(&[schedule_id]).unwrap();
    compute_occupancy(&schedule, &registrations).unwrap();

    let mut warnings = Vec::new();
    while let Some(record) = logger.pop() {
        if record.level() == Level::Warn {
            warnings.push(record.args().to_string());
        }
    }

    assert_eq!(warnings.len(), 1, "Expected one warning, got {:?}", warnings);
    assert!(warnings[0].contains("over capacity"), "Unexpected warning: {}", warnings[0]);
}
