use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

pub const MINUTES_PER_HOUR: u16 = 60;
pub const MINUTES_PER_DAY: u16 = 24 * MINUTES_PER_HOUR;

/// A wall-clock time with minute precision, stored as minutes since midnight.
///
/// Parses from `HH:MM` (24-hour, zero padded). The `HH:MM:SS` form that a
/// relational `time` column renders is accepted as well; the seconds are
/// dropped. Always displays as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    minutes: u16,
}

impl TimeOfDay {
    pub fn from_hm(hour: u16, minute: u16) -> Option<Self> {
        if hour >= 24 || minute >= MINUTES_PER_HOUR {
            return None;
        }
        Some(TimeOfDay { minutes: hour * MINUTES_PER_HOUR + minute })
    }

    pub fn from_minutes(minutes: u16) -> Option<Self> {
        (minutes < MINUTES_PER_DAY).then_some(TimeOfDay { minutes })
    }

    /// Builds a time from a minute offset already known to lie between two
    /// valid times of the same day.
    pub(crate) fn within_day(minutes: u32) -> Self {
        debug_assert!(minutes < MINUTES_PER_DAY as u32);
        TimeOfDay { minutes: minutes as u16 }
    }

    pub fn minutes(&self) -> u16 {
        self.minutes
    }

    pub fn hour(&self) -> u16 {
        self.minutes / MINUTES_PER_HOUR
    }

    pub fn minute(&self) -> u16 {
        self.minutes % MINUTES_PER_HOUR
    }

    /// Minutes from `self` until `later`, `None` if `later` is not after `self`.
    pub fn minutes_until(&self, later: TimeOfDay) -> Option<u16> {
        later.minutes.checked_sub(self.minutes).filter(|diff| *diff > 0)
    }
}

fn parse_two_digits(part: &str) -> Option<u16> {
    if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

impl FromStr for TimeOfDay {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidTimeFormat(s.to_string());

        let mut parts = s.trim().split(':');
        let hour = parts.next().and_then(parse_two_digits).ok_or_else(invalid)?;
        let minute = parts.next().and_then(parse_two_digits).ok_or_else(invalid)?;

        if let Some(second) = parts.next() {
            parse_two_digits(second).filter(|sec| *sec < 60).ok_or_else(invalid)?;
        }
        if parts.next().is_some() {
            return Err(invalid());
        }

        TimeOfDay::from_hm(hour, minute).ok_or_else(invalid)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
