use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::api::registration_dto::RegistrationDto;
use crate::domain::schedule::service_type::ServiceType;
use crate::domain::utils::dates::parse_timestamp;
use crate::domain::utils::id::{RegistrationId, ScheduleId, UserId};
use crate::error::{Error, Result};

/// A user's claim on one shift of one schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: RegistrationId,
    pub schedule_id: ScheduleId,
    pub user_id: UserId,

    /// Filled in when the registration is read joined with its user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,

    pub shift_number: u32,
    pub created_at: DateTime<Utc>,
}

impl Registration {
    /// A fresh registration with a generated id, stamped now.
    pub fn new(schedule_id: ScheduleId, user_id: UserId, shift_number: u32) -> Self {
        Registration { id: RegistrationId::generate(), schedule_id, user_id, user_name: None, shift_number, created_at: Utc::now() }
    }
}

/// A registration joined with the parent schedule fields the monthly quota
/// needs.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationWithSchedule {
    pub registration: Registration,
    pub schedule_date: NaiveDate,
    pub service_type: ServiceType,
}

impl TryFrom<RegistrationDto> for Registration {
    type Error = Error;

    fn try_from(dto: RegistrationDto) -> Result<Self> {
        let shift_number = u32::try_from(dto.shift_number)
            .ok()
            .filter(|number| *number >= 1)
            .ok_or_else(|| Error::Validation(format!("shift number must be at least 1, got {}", dto.shift_number)))?;

        Ok(Registration {
            id: RegistrationId::new(dto.id),
            schedule_id: ScheduleId::new(dto.schedule_id),
            user_id: UserId::new(dto.user_id),
            user_name: None,
            shift_number,
            created_at: parse_timestamp(dto.created_at.as_deref())?,
        })
    }
}

impl From<&Registration> for RegistrationDto {
    fn from(registration: &Registration) -> Self {
        RegistrationDto {
            id: registration.id.to_string(),
            schedule_id: registration.schedule_id.to_string(),
            user_id: registration.user_id.to_string(),
            shift_number: registration.shift_number as i64,
            created_at: Some(registration.created_at.to_rfc3339()),
        }
    }
}
