use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::api::schedule_dto::ScheduleDto;
use crate::domain::schedule::service_type::ServiceType;
use crate::domain::schedule::shift_partitioner::{MAX_SHIFT_COUNT, ShiftWindow, partition};
use crate::domain::utils::dates::{parse_date, parse_timestamp};
use crate::domain::utils::id::{AdminId, ScheduleId};
use crate::domain::utils::time_of_day::TimeOfDay;
use crate::error::{Error, Result};

/// One dated, timed volunteer occurrence at a location, split into shifts.
///
/// Treated as immutable: an edit replaces the whole record, and deleting it
/// deletes every registration that points at it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleWindow {
    pub id: ScheduleId,
    pub service_type: ServiceType,
    pub date: NaiveDate,
    pub location: String,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub shift_count: u32,
    pub participants_per_shift: u32,
    pub created_by: Option<AdminId>,
    pub created_at: DateTime<Utc>,
}

impl ScheduleWindow {
    /// Recomputes the shift windows of this schedule.
    pub fn shifts(&self) -> Result<Vec<ShiftWindow>> {
        partition(self.start_time, self.end_time, self.shift_count)
    }

    pub fn total_slots(&self) -> u64 {
        self.shift_count as u64 * self.participants_per_shift as u64
    }

    pub fn has_shift(&self, shift_number: u32) -> bool {
        (1..=self.shift_count).contains(&shift_number)
    }

    pub fn check_shift(&self, shift_number: u32) -> Result<()> {
        if self.has_shift(shift_number) {
            Ok(())
        } else {
            Err(Error::InvalidShiftNumber { shift_number, shift_count: self.shift_count })
        }
    }

    /// Structural checks every stored schedule has to pass.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_SHIFT_COUNT).contains(&self.shift_count) {
            return Err(Error::InvalidShiftCount(self.shift_count as i64));
        }
        if self.start_time.minutes_until(self.end_time).is_none() {
            return Err(Error::InvalidWindow { start: self.start_time.to_string(), end: self.end_time.to_string() });
        }
        if self.participants_per_shift < 1 {
            return Err(Error::Validation("participants per shift must be at least 1".to_string()));
        }
        if self.location.trim().is_empty() {
            return Err(Error::Validation("location must not be empty".to_string()));
        }
        Ok(())
    }
}

impl TryFrom<ScheduleDto> for ScheduleWindow {
    type Error = Error;

    fn try_from(dto: ScheduleDto) -> Result<Self> {
        let shift_count = u32::try_from(dto.shift_count).map_err(|_| Error::InvalidShiftCount(dto.shift_count))?;
        let participants_per_shift = u32::try_from(dto.participants_per_shift)
            .map_err(|_| Error::Validation(format!("participants per shift must be positive, got {}", dto.participants_per_shift)))?;

        let schedule = ScheduleWindow {
            id: ScheduleId::new(dto.id),
            service_type: dto.service_type.parse()?,
            date: parse_date(&dto.date)?,
            location: dto.location,
            start_time: dto.start_time.parse()?,
            end_time: dto.end_time.parse()?,
            shift_count,
            participants_per_shift,
            created_by: dto.created_by.map(AdminId::new),
            created_at: parse_timestamp(dto.created_at.as_deref())?,
        };
        schedule.validate()?;

        Ok(schedule)
    }
}

impl From<&ScheduleWindow> for ScheduleDto {
    fn from(schedule: &ScheduleWindow) -> Self {
        ScheduleDto {
            id: schedule.id.to_string(),
            service_type: schedule.service_type.to_string(),
            date: schedule.date.format("%Y-%m-%d").to_string(),
            location: schedule.location.clone(),
            start_time: schedule.start_time.to_string(),
            end_time: schedule.end_time.to_string(),
            shift_count: schedule.shift_count as i64,
            participants_per_shift: schedule.participants_per_shift as i64,
            created_by: schedule.created_by.as_ref().map(|id| id.to_string()),
            created_at: Some(schedule.created_at.to_rfc3339()),
        }
    }
}

/// Administrator input for a new or edited schedule. Missing times are
/// filled from the weekday/weekend defaults of the service configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleDraft {
    pub service_type: ServiceType,
    pub date: NaiveDate,
    pub location: String,
    pub start_time: Option<TimeOfDay>,
    pub end_time: Option<TimeOfDay>,
    pub shift_count: u32,
    pub participants_per_shift: u32,
}
