use chrono::NaiveDate;
use std::ops::RangeInclusive;
use std::path::Path;

use crate::api::config_dto::{CountRangeDto, ServiceConfigDto, TimeRangeDto};
use crate::domain::schedule::service_type::ServiceType;
use crate::domain::utils::dates::is_weekend;
use crate::domain::utils::time_of_day::TimeOfDay;
use crate::error::{Error, Result};
use crate::loader::parser::parse_json_file;

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceTypeInfo {
    pub service_type: ServiceType,
    pub name: String,
    pub description: String,
    /// `None` means the service type has no monthly limit.
    pub monthly_limit: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
}

/// Service catalogue and form defaults shared by every call site.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub services: Vec<ServiceTypeInfo>,
    pub weekday_times: TimeRange,
    pub weekend_times: TimeRange,
    pub shift_count_range: RangeInclusive<u32>,
    pub participants_range: RangeInclusive<u32>,
}

impl ServiceConfig {
    pub fn load(file_path: impl AsRef<Path>) -> Result<Self> {
        let dto: ServiceConfigDto = parse_json_file(file_path)?;
        ServiceConfig::try_from(dto)
    }

    pub fn service(&self, service_type: ServiceType) -> Option<&ServiceTypeInfo> {
        self.services.iter().find(|info| info.service_type == service_type)
    }

    pub fn monthly_limit(&self, service_type: ServiceType) -> Option<u32> {
        self.service(service_type).and_then(|info| info.monthly_limit)
    }

    /// Default start and end time for a schedule on `date`.
    pub fn default_times_for(&self, date: NaiveDate) -> TimeRange {
        if is_weekend(date) { self.weekend_times } else { self.weekday_times }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        let time = |hour: u32| TimeOfDay::within_day(hour * 60);

        ServiceConfig {
            services: vec![
                ServiceTypeInfo {
                    service_type: ServiceType::Exhibit,
                    name: "Exhibit stand".to_string(),
                    description: "Literature stand at one of the fixed exhibit locations.".to_string(),
                    monthly_limit: Some(3),
                },
                ServiceTypeInfo {
                    service_type: ServiceType::Park,
                    name: "Park".to_string(),
                    description: "Service held in a park.".to_string(),
                    monthly_limit: None,
                },
                ServiceTypeInfo {
                    service_type: ServiceType::BusStop,
                    name: "Bus stop".to_string(),
                    description: "Service held at a bus stop.".to_string(),
                    monthly_limit: None,
                },
            ],
            weekday_times: TimeRange { start_time: time(10), end_time: time(12) },
            weekend_times: TimeRange { start_time: time(15), end_time: time(17) },
            shift_count_range: 3..=4,
            participants_range: 1..=10,
        }
    }
}

fn time_range_from_dto(dto: TimeRangeDto) -> Result<TimeRange> {
    let range = TimeRange { start_time: dto.start_time.parse()?, end_time: dto.end_time.parse()? };
    if range.start_time.minutes_until(range.end_time).is_none() {
        return Err(Error::InvalidWindow { start: dto.start_time, end: dto.end_time });
    }
    Ok(range)
}

fn count_range_from_dto(dto: CountRangeDto, what: &str) -> Result<RangeInclusive<u32>> {
    if dto.min < 1 || dto.min > dto.max {
        return Err(Error::Validation(format!("{} range {}..={} is empty or starts below 1", what, dto.min, dto.max)));
    }
    Ok(dto.min..=dto.max)
}

impl TryFrom<ServiceConfigDto> for ServiceConfig {
    type Error = Error;

    fn try_from(dto: ServiceConfigDto) -> Result<Self> {
        let services = dto
            .services
            .into_iter()
            .map(|service| -> Result<ServiceTypeInfo> {
                Ok(ServiceTypeInfo {
                    service_type: service.id.parse()?,
                    name: service.name,
                    description: service.description,
                    monthly_limit: service.monthly_limit,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ServiceConfig {
            services,
            weekday_times: time_range_from_dto(dto.default_times.weekday)?,
            weekend_times: time_range_from_dto(dto.default_times.weekend)?,
            shift_count_range: count_range_from_dto(dto.shift_count, "shift count")?,
            participants_range: count_range_from_dto(dto.participants_per_shift, "participants per shift")?,
        })
    }
}
