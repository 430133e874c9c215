use std::path::Path;

use volunteer_shift::domain::registry::repository_trait::RegistrationRepository;
use volunteer_shift::domain::schedule::monthly_quota::{MonthlyQuotaEvaluator, QuotaStatus, count_for_month, is_within_quota};
use volunteer_shift::domain::schedule::service_type::ServiceType;
use volunteer_shift::domain::utils::id::{RegistrationId, UserId};
use volunteer_shift::{load_config, load_registry};

fn fixture(name: &str) -> String {
    format!("{}/tests/data/{}", env!("CARGO_MANIFEST_DIR"), name)
}

#[test]
fn test_cancelling_frees_quota() {
    let registry = load_registry(fixture("registry.json")).unwrap();
    let kim = UserId::new("u-kim");

    let rows = registry.registrations_for_user(&kim).unwrap();
    let count = count_for_month(&kim, ServiceType::Exhibit, 2024, 5, &rows).unwrap();
    assert_eq!(count, 3);
    assert!(!is_within_quota(count, 3));

    registry.delete_registration(&RegistrationId::new("r-4")).unwrap();

    let rows = registry.registrations_for_user(&kim).unwrap();
    let count = count_for_month(&kim, ServiceType::Exhibit, 2024, 5, &rows).unwrap();
    assert_eq!(count, 2);
    assert!(is_within_quota(count, 3));
}

#[test]
fn test_count_is_scoped_to_month_and_service() {
    let registry = load_registry(fixture("registry.json")).unwrap();
    let lee = UserId::new("u-lee");
    let rows = registry.registrations_for_user(&lee).unwrap();

    assert_eq!(count_for_month(&lee, ServiceType::Exhibit, 2024, 5, &rows).unwrap(), 1);
    assert_eq!(count_for_month(&lee, ServiceType::Park, 2024, 5, &rows).unwrap(), 1);
    assert_eq!(count_for_month(&lee, ServiceType::Exhibit, 2024, 6, &rows).unwrap(), 0);
    assert_eq!(count_for_month(&lee, ServiceType::Exhibit, 2024, 4, &rows).unwrap(), 0);
}

#[test]
fn test_invalid_month_is_rejected() {
    let rows = Vec::new();

    assert!(count_for_month(&UserId::new("u-kim"), ServiceType::Exhibit, 2024, 13, &rows).is_err());
    assert!(count_for_month(&UserId::new("u-kim"), ServiceType::Exhibit, 2024, 0, &rows).is_err());
}

#[test]
fn test_quota_is_monotone_in_count() {
    for limit in 1..=5u32 {
        let mut seen_exhausted = false;
        for count in 0..=8usize {
            let within = is_within_quota(count, limit);
            assert!(!(seen_exhausted && within), "Quota became available again at count {} for limit {}", count, limit);
            seen_exhausted |= !within;
        }
    }
}

#[test]
fn test_limits_come_from_configuration_file() {
    let path = fixture("service_config.json");
    let config = load_config(Some(Path::new(&path))).unwrap();
    let evaluator = MonthlyQuotaEvaluator::from_config(&config);

    assert_eq!(evaluator.limit_for(ServiceType::Exhibit), Some(3));
    assert_eq!(evaluator.limit_for(ServiceType::Park), Some(2));
    assert_eq!(evaluator.limit_for(ServiceType::BusStop), None);

    let registry = load_registry(fixture("registry.json")).unwrap();
    let lee = UserId::new("u-lee");
    let rows = registry.registrations_for_user(&lee).unwrap();

    let status = evaluator.status(&lee, ServiceType::Park, 2024, 5, &rows).unwrap();
    assert_eq!(status, QuotaStatus::Within { used: 1, limit: 2 });
    assert_eq!(status.remaining(), Some(1));
}
