use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Category of volunteer activity. Each category may carry its own monthly quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    /// Literature stand at a fixed location.
    Exhibit,
    Park,
    BusStop,
}

impl ServiceType {
    pub const ALL: [ServiceType; 3] = [ServiceType::Exhibit, ServiceType::Park, ServiceType::BusStop];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Exhibit => "exhibit",
            ServiceType::Park => "park",
            ServiceType::BusStop => "bus_stop",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ServiceType::ALL
            .into_iter()
            .find(|service_type| service_type.as_str() == s)
            .ok_or_else(|| Error::Validation(format!("unknown service type '{}'", s)))
    }
}
