use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ServiceConfigDto {
    pub services: Vec<ServiceTypeInfoDto>,
    pub default_times: DefaultTimesDto,
    pub shift_count: CountRangeDto,
    pub participants_per_shift: CountRangeDto,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ServiceTypeInfoDto {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub monthly_limit: Option<u32>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DefaultTimesDto {
    pub weekday: TimeRangeDto,
    pub weekend: TimeRangeDto,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TimeRangeDto {
    pub start_time: String,
    pub end_time: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct CountRangeDto {
    pub min: u32,
    pub max: u32,
}
