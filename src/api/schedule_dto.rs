use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDto {
    pub id: String,
    pub service_type: String,
    pub date: String,
    pub location: String,
    pub start_time: String,
    pub end_time: String,
    pub shift_count: i64,
    pub participants_per_shift: i64,
    pub created_by: Option<String>,
    pub created_at: Option<String>,
}
