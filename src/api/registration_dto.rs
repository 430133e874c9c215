use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationDto {
    pub id: String,
    pub schedule_id: String,
    pub user_id: String,
    pub shift_number: i64,
    pub created_at: Option<String>,
}
