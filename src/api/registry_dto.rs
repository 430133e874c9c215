use serde::{Deserialize, Serialize};

use crate::api::registration_dto::RegistrationDto;
use crate::api::schedule_dto::ScheduleDto;
use crate::api::user_dto::{AdminDto, UserDto};

/// Snapshot of every record the registry holds, as stored on disk.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RegistryDto {
    #[serde(default)]
    pub admins: Vec<AdminDto>,
    #[serde(default)]
    pub users: Vec<UserDto>,
    #[serde(default)]
    pub schedules: Vec<ScheduleDto>,
    #[serde(default)]
    pub registrations: Vec<RegistrationDto>,
}
