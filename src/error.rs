use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::schedule::service_type::ServiceType;
use crate::domain::schedule::shift_partitioner::MAX_SHIFT_COUNT;
use crate::domain::utils::id::{RegistrationId, ScheduleId, UserId};

#[derive(Debug, Error)]
pub enum Error {
    #[error("File not found or could not be read: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("Failed to write CSV: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Time '{0}' is not a valid HH:MM time of day")]
    InvalidTimeFormat(String),

    #[error("End time {end} does not strictly follow start time {start}")]
    InvalidWindow { start: String, end: String },

    #[error("Shift count must be between 1 and {max}, got {0}", max = MAX_SHIFT_COUNT)]
    InvalidShiftCount(i64),

    #[error("Shift {shift_number} does not exist in a schedule with {shift_count} shifts")]
    InvalidShiftNumber { shift_number: u32, shift_count: u32 },

    #[error("Date '{0}' is not a valid calendar date")]
    InvalidDate(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Schedule (id: {0}) does not exist")]
    ScheduleNotFound(ScheduleId),

    #[error("Registration (id: {0}) does not exist")]
    RegistrationNotFound(RegistrationId),

    #[error("User (id: {0}) does not exist")]
    UserNotFound(UserId),

    #[error("User (id: {user_id}) is already registered for schedule (id: {schedule_id})")]
    DuplicateRegistration { user_id: UserId, schedule_id: ScheduleId },

    #[error("Shift {shift_number} of schedule (id: {schedule_id}) has no free slot left")]
    ShiftFull { schedule_id: ScheduleId, shift_number: u32 },

    #[error("Schedule (id: {schedule_id}) on {date} lies in the past")]
    PastSchedule { schedule_id: ScheduleId, date: NaiveDate },

    #[error("Monthly limit of {limit} registrations for '{service_type}' reached")]
    QuotaExceeded { service_type: ServiceType, limit: u32 },

    #[error("User (id: {0}) has not been approved by an administrator")]
    NotApproved(UserId),

    #[error("Operation not permitted: {0}")]
    Unauthorized(String),
}

pub type Result<T> = std::result::Result<T, Error>;
