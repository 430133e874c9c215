use serde::Serialize;
use std::collections::HashMap;

use crate::domain::config::ServiceConfig;
use crate::domain::registration::RegistrationWithSchedule;
use crate::domain::schedule::service_type::ServiceType;
use crate::domain::utils::dates::month_bounds;
use crate::domain::utils::id::UserId;
use crate::error::Result;

/// Counts the rows belonging to `user_id` whose schedule has `service_type`
/// and a date inside the given calendar month (1-based `month`, first and
/// last day inclusive).
///
/// The count is always recomputed from the rows, so cancelling a
/// registration frees quota for its month without any bookkeeping.
pub fn count_for_month(user_id: &UserId, service_type: ServiceType, year: i32, month: u32, rows: &[RegistrationWithSchedule]) -> Result<usize> {
    let (first_day, last_day) = month_bounds(year, month)?;

    let count = rows
        .iter()
        .filter(|row| row.registration.user_id == *user_id)
        .filter(|row| row.service_type == service_type)
        .filter(|row| (first_day..=last_day).contains(&row.schedule_date))
        .count();

    Ok(count)
}

pub fn is_within_quota(count: usize, limit: u32) -> bool {
    count < limit as usize
}

/// Where a user stands against the monthly limit of one service type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum QuotaStatus {
    Unlimited { used: usize },
    Within { used: usize, limit: u32 },
    Exhausted { used: usize, limit: u32 },
}

impl QuotaStatus {
    pub fn evaluate(used: usize, limit: Option<u32>) -> Self {
        match limit {
            None => QuotaStatus::Unlimited { used },
            Some(limit) if is_within_quota(used, limit) => QuotaStatus::Within { used, limit },
            Some(limit) => QuotaStatus::Exhausted { used, limit },
        }
    }

    pub fn allows_registration(&self) -> bool {
        !matches!(self, QuotaStatus::Exhausted { .. })
    }

    pub fn used(&self) -> usize {
        match self {
            QuotaStatus::Unlimited { used } | QuotaStatus::Within { used, .. } | QuotaStatus::Exhausted { used, .. } => *used,
        }
    }

    /// Registrations still allowed this month, `None` when unlimited.
    pub fn remaining(&self) -> Option<usize> {
        match self {
            QuotaStatus::Unlimited { .. } => None,
            QuotaStatus::Within { used, limit } | QuotaStatus::Exhausted { used, limit } => Some((*limit as usize).saturating_sub(*used)),
        }
    }
}

/// Applies the configured per-service monthly limits.
#[derive(Debug, Clone, Default)]
pub struct MonthlyQuotaEvaluator {
    limits: HashMap<ServiceType, u32>,
}

impl MonthlyQuotaEvaluator {
    pub fn from_config(config: &ServiceConfig) -> Self {
        let limits = config.services.iter().filter_map(|info| info.monthly_limit.map(|limit| (info.service_type, limit))).collect();
        MonthlyQuotaEvaluator { limits }
    }

    pub fn limit_for(&self, service_type: ServiceType) -> Option<u32> {
        self.limits.get(&service_type).copied()
    }

    pub fn status(&self, user_id: &UserId, service_type: ServiceType, year: i32, month: u32, rows: &[RegistrationWithSchedule]) -> Result<QuotaStatus> {
        let used = count_for_month(user_id, service_type, year, month, rows)?;
        Ok(QuotaStatus::evaluate(used, self.limit_for(service_type)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::registration::Registration;
    use crate::domain::utils::id::{RegistrationId, ScheduleId};
    use chrono::{NaiveDate, Utc};

    fn row(user: &str, service_type: ServiceType, date: (i32, u32, u32)) -> RegistrationWithSchedule {
        RegistrationWithSchedule {
            registration: Registration {
                id: RegistrationId::generate(),
                schedule_id: ScheduleId::generate(),
                user_id: UserId::new(user),
                user_name: None,
                shift_number: 1,
                created_at: Utc::now(),
            },
            schedule_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            service_type,
        }
    }

    #[test]
    fn counts_only_matching_user_service_and_month() {
        let user = UserId::new("u-1");
        let rows = vec![
            row("u-1", ServiceType::Exhibit, (2024, 5, 1)),
            row("u-1", ServiceType::Exhibit, (2024, 5, 31)),
            row("u-1", ServiceType::Exhibit, (2024, 6, 1)),
            row("u-1", ServiceType::Exhibit, (2024, 4, 30)),
            row("u-1", ServiceType::Park, (2024, 5, 10)),
            row("u-2", ServiceType::Exhibit, (2024, 5, 10)),
        ];

        assert_eq!(count_for_month(&user, ServiceType::Exhibit, 2024, 5, &rows).unwrap(), 2);
        assert_eq!(count_for_month(&user, ServiceType::Park, 2024, 5, &rows).unwrap(), 1);
    }

    #[test]
    fn quota_boundary_is_exclusive() {
        assert!(is_within_quota(2, 3));
        assert!(!is_within_quota(3, 3));
        assert!(!is_within_quota(4, 3));
    }

    #[test]
    fn status_uses_configured_limits() {
        let evaluator = MonthlyQuotaEvaluator::from_config(&ServiceConfig::default());
        let user = UserId::new("u-1");
        let rows: Vec<_> = (1..=3).map(|day| row("u-1", ServiceType::Exhibit, (2024, 5, day))).collect();

        let exhibit = evaluator.status(&user, ServiceType::Exhibit, 2024, 5, &rows).unwrap();
        assert_eq!(exhibit, QuotaStatus::Exhausted { used: 3, limit: 3 });
        assert!(!exhibit.allows_registration());
        assert_eq!(exhibit.remaining(), Some(0));

        let park = evaluator.status(&user, ServiceType::Park, 2024, 5, &rows).unwrap();
        assert_eq!(park, QuotaStatus::Unlimited { used: 0 });
        assert!(park.allows_registration());
    }
}
