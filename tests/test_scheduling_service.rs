use chrono::NaiveDate;

use volunteer_shift::domain::config::ServiceConfig;
use volunteer_shift::domain::registry::registry_store::Registry;
use volunteer_shift::domain::registry::repository_trait::{RegistrationRepository, UserRepository};
use volunteer_shift::domain::schedule::monthly_quota::QuotaStatus;
use volunteer_shift::domain::schedule::schedule_window::ScheduleDraft;
use volunteer_shift::domain::schedule::service_type::ServiceType;
use volunteer_shift::domain::service::roster::roster_entries;
use volunteer_shift::domain::service::scheduling_service::SchedulingService;
use volunteer_shift::domain::session::persistence::MemoryPersistence;
use volunteer_shift::domain::session::session_manager::SessionManager;
use volunteer_shift::domain::session::{Principal, Session};
use volunteer_shift::domain::utils::id::{RegistrationId, ScheduleId, UserId};
use volunteer_shift::error::Error;
use volunteer_shift::load_registry;

fn service_on(today: fn() -> NaiveDate) -> SchedulingService<Registry> {
    let registry = load_registry(format!("{}/tests/data/registry.json", env!("CARGO_MANIFEST_DIR"))).unwrap();
    SchedulingService::new(registry, ServiceConfig::default()).with_clock(today)
}

/// The fixture month seen from its first day, so every schedule is upcoming.
fn service() -> SchedulingService<Registry> {
    service_on(|| NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
}

fn volunteer(service: &SchedulingService<Registry>, name: &str) -> Session {
    let mut sessions = SessionManager::new(MemoryPersistence::new());
    service.login_volunteer(&mut sessions, name).unwrap().clone()
}

fn admin(service: &SchedulingService<Registry>) -> Session {
    let mut sessions = SessionManager::new(MemoryPersistence::new());
    service.login_admin(&mut sessions, "admin@example.org").unwrap().clone()
}

fn may() -> (NaiveDate, NaiveDate) {
    (NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(), NaiveDate::from_ymd_opt(2024, 5, 31).unwrap())
}

#[test]
fn test_overview_for_month() {
    let service = service();
    let (from, to) = may();

    let overviews = service.overview(Some(ServiceType::Exhibit), from, to).unwrap();

    assert_eq!(overviews.len(), 4);
    assert_eq!(overviews[0].summary.filled_slots, 2);
    assert_eq!(overviews[0].summary.total_slots, 6);
    assert_eq!(overviews[0].summary.percentage(), 33);
    assert!(overviews[0].shifts[0].is_full());
    assert_eq!(overviews[3].summary.filled_slots, 0);
    assert!(overviews[1].registration_of(&UserId::new("u-kim")).is_some());
    assert!(overviews[1].registration_of(&UserId::new("u-lee")).is_none());
}

#[test]
fn test_register_within_quota() {
    let service = service();
    let lee = volunteer(&service, "Lee");

    let registration = service.register(&lee, &ScheduleId::new("s-exhibit-0515"), 2).unwrap();

    assert_eq!(registration.user_name.as_deref(), Some("Lee"));
    assert_eq!(service.monthly_count(&UserId::new("u-lee"), ServiceType::Exhibit, 2024, 5).unwrap(), 2);
}

#[test]
fn test_register_rejects_exhausted_quota() {
    let service = service();
    let kim = volunteer(&service, "Kim");

    assert_eq!(
        service.quota_status(&UserId::new("u-kim"), ServiceType::Exhibit, 2024, 5).unwrap(),
        QuotaStatus::Exhausted { used: 3, limit: 3 }
    );

    let err = service.register(&kim, &ScheduleId::new("s-exhibit-0529"), 1).unwrap_err();
    assert!(matches!(err, Error::QuotaExceeded { service_type: ServiceType::Exhibit, limit: 3 }), "Expected QuotaExceeded, got {:?}", err);

    // Park has no limit.
    assert!(service.register(&kim, &ScheduleId::new("s-park-0511"), 1).is_ok());
}

#[test]
fn test_duplicate_is_reported_before_exhausted_quota() {
    let service = service();
    let kim = volunteer(&service, "Kim");

    let err = service.register(&kim, &ScheduleId::new("s-exhibit-0522"), 1).unwrap_err();

    assert!(matches!(err, Error::DuplicateRegistration { .. }), "Expected DuplicateRegistration, got {:?}", err);
}

#[test]
fn test_past_schedules_are_closed_to_volunteers() {
    let service = service_on(|| NaiveDate::from_ymd_opt(2024, 5, 16).unwrap());
    let lee = volunteer(&service, "Lee");
    let kim = volunteer(&service, "Kim");

    let err = service.register(&lee, &ScheduleId::new("s-exhibit-0515"), 1).unwrap_err();
    assert!(matches!(err, Error::PastSchedule { .. }), "Expected PastSchedule, got {:?}", err);

    let err = service.cancel(&kim, &RegistrationId::new("r-3")).unwrap_err();
    assert!(matches!(err, Error::PastSchedule { .. }), "Expected PastSchedule, got {:?}", err);
    assert!(service.repository().registration(&RegistrationId::new("r-3")).is_ok());

    let admin = admin(&service);
    assert!(service.cancel(&admin, &RegistrationId::new("r-3")).is_ok());
}

#[test]
fn test_schedule_on_today_is_still_open() {
    let service = service_on(|| NaiveDate::from_ymd_opt(2024, 5, 22).unwrap());
    let lee = volunteer(&service, "Lee");
    let kim = volunteer(&service, "Kim");

    assert!(service.register(&lee, &ScheduleId::new("s-exhibit-0522"), 1).is_ok());
    assert!(service.cancel(&kim, &RegistrationId::new("r-4")).is_ok());
}

#[test]
fn test_cancel_frees_quota_for_next_registration() {
    let service = service();
    let kim = volunteer(&service, "Kim");

    service.cancel(&kim, &RegistrationId::new("r-4")).unwrap();

    assert!(service.register(&kim, &ScheduleId::new("s-exhibit-0529"), 1).is_ok());
    assert_eq!(service.monthly_count(&UserId::new("u-kim"), ServiceType::Exhibit, 2024, 5).unwrap(), 3);
}

#[test]
fn test_register_rejects_full_shift_and_duplicates() {
    let service = service();
    let admin = admin(&service);
    let min = volunteer(&service, "Park Min");
    let min_id = min.require_volunteer().unwrap().id.clone();
    service.approve_user(&admin, &min_id, true).unwrap();

    let err = service.register(&min, &ScheduleId::new("s-exhibit-0508"), 1).unwrap_err();
    assert!(matches!(err, Error::ShiftFull { shift_number: 1, .. }), "Expected ShiftFull, got {:?}", err);

    service.register(&min, &ScheduleId::new("s-exhibit-0508"), 2).unwrap();
    let err = service.register(&min, &ScheduleId::new("s-exhibit-0508"), 3).unwrap_err();
    assert!(matches!(err, Error::DuplicateRegistration { .. }), "Expected DuplicateRegistration, got {:?}", err);

    let err = service.register(&min, &ScheduleId::new("s-exhibit-0515"), 9).unwrap_err();
    assert!(matches!(err, Error::InvalidShiftNumber { shift_number: 9, shift_count: 3 }), "Expected InvalidShiftNumber, got {:?}", err);
}

#[test]
fn test_unapproved_volunteer_cannot_register() {
    let service = service();
    let newcomer = volunteer(&service, "Choi");

    let err = service.register(&newcomer, &ScheduleId::new("s-exhibit-0515"), 1).unwrap_err();

    assert!(matches!(err, Error::NotApproved(_)), "Expected NotApproved, got {:?}", err);
    assert!(matches!(newcomer.principal, Principal::Volunteer(ref user) if !user.is_approved));
}

#[test]
fn test_volunteer_cannot_cancel_foreign_registration() {
    let service = service();
    let lee = volunteer(&service, "Lee");

    let err = service.cancel(&lee, &RegistrationId::new("r-1")).unwrap_err();
    assert!(matches!(err, Error::Unauthorized(_)), "Expected Unauthorized, got {:?}", err);

    let admin = admin(&service);
    assert!(service.cancel(&admin, &RegistrationId::new("r-1")).is_ok());
}

#[test]
fn test_admin_schedule_lifecycle() {
    let service = service();
    let admin = admin(&service);
    let wednesday = NaiveDate::from_ymd_opt(2024, 5, 8).unwrap();

    let draft = ScheduleDraft {
        service_type: ServiceType::BusStop,
        date: wednesday,
        location: "Central station".to_string(),
        start_time: None,
        end_time: None,
        shift_count: 4,
        participants_per_shift: 3,
    };
    let created = service.create_schedule(&admin, draft.clone()).unwrap();
    assert_eq!(created.start_time.to_string(), "10:00");
    assert_eq!(created.end_time.to_string(), "12:00");

    let mut edited = draft;
    edited.start_time = Some("13:00".parse().unwrap());
    edited.end_time = Some("14:00".parse().unwrap());
    let updated = service.update_schedule(&admin, &created.id, edited).unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.shifts().unwrap()[1].start_time.to_string(), "13:15");

    let removed = service.delete_schedule(&admin, &ScheduleId::new("s-exhibit-0508")).unwrap();
    assert_eq!(removed, 2);
    assert!(service.repository().registration(&RegistrationId::new("r-1")).is_err());
}

#[test]
fn test_deleting_user_cascades() {
    let service = service();
    let admin = admin(&service);

    assert_eq!(service.delete_user(&admin, &UserId::new("u-kim")).unwrap(), 3);
    assert!(service.repository().registrations_for_user(&UserId::new("u-kim")).unwrap().is_empty());
    assert!(service.repository().user(&UserId::new("u-kim")).is_err());
}

#[test]
fn test_roster_lists_every_registration() {
    let service = service();
    let (from, to) = may();

    let entries = roster_entries(&service.overview(None, from, to).unwrap());

    assert_eq!(entries.len(), 5);
    assert_eq!(entries[0].volunteer, "Kim");
    assert_eq!(entries[0].shift_start, "10:00");
    assert_eq!(entries[0].shift_end, "10:40");
    assert_eq!(entries[2].service_type, ServiceType::Park);
    assert_eq!(entries[2].shift_number, 4);
}
