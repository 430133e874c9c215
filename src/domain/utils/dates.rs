use chrono::{DateTime, Datelike, Months, NaiveDate, Utc, Weekday};

use crate::error::{Error, Result};

/// Parses a strict `YYYY-MM-DD` calendar date.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let invalid = || Error::InvalidDate(raw.to_string());
    let bytes = raw.as_bytes();

    // chrono accepts unpadded fields, the stored format does not.
    let well_formed = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes.iter().enumerate().all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !well_formed {
        return Err(invalid());
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| invalid())
}

/// Parses a `YYYY-MM` month into `(year, month)` with a 1-based month.
pub fn parse_month(raw: &str) -> Result<(i32, u32)> {
    let first = parse_date(&format!("{}-01", raw)).map_err(|_| Error::InvalidDate(raw.to_string()))?;
    Ok((first.year(), first.month()))
}

/// Parses an RFC 3339 timestamp; a missing value means "now".
pub fn parse_timestamp(raw: Option<&str>) -> Result<DateTime<Utc>> {
    match raw {
        Some(raw) => DateTime::parse_from_rfc3339(raw).map(|ts| ts.with_timezone(&Utc)).map_err(|_| Error::InvalidDate(raw.to_string())),
        None => Ok(Utc::now()),
    }
}

/// First and last day of a calendar month (1-based `month`), both inclusive.
pub fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate)> {
    let invalid = || Error::InvalidDate(format!("{:04}-{:02}", year, month));

    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let last = first.checked_add_months(Months::new(1)).and_then(|next| next.pred_opt()).ok_or_else(invalid)?;

    Ok((first, last))
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}
