use serde::Serialize;

use crate::domain::utils::time_of_day::TimeOfDay;
use crate::error::{Error, Result};

/// Largest shift count a stored schedule or the CLI accepts: one shift per
/// minute of a day.
pub const MAX_SHIFT_COUNT: u32 = 1440;

/// One equal-width subdivision of a schedule's time window. Never persisted,
/// always recomputed from the parent schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftWindow {
    /// 1-based position within the schedule.
    pub shift_number: u32,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
}

impl ShiftWindow {
    pub fn duration_minutes(&self) -> u16 {
        self.end_time.minutes() - self.start_time.minutes()
    }
}

/// Divides `[start_time, end_time)` into `shift_count` contiguous shifts.
///
/// Every shift lasts `floor(total / shift_count)` minutes except the last,
/// which ends exactly at `end_time` and so absorbs the remainder of the
/// integer division. A `shift_count` larger than the window's minute count is
/// not rejected: it yields zero-width shifts followed by one final shift
/// covering the whole window.
///
/// # Errors
/// - `Error::InvalidShiftCount` if `shift_count` is zero.
/// - `Error::InvalidWindow` if `end_time` does not strictly follow `start_time`.
pub fn partition(start_time: TimeOfDay, end_time: TimeOfDay, shift_count: u32) -> Result<Vec<ShiftWindow>> {
    if shift_count < 1 {
        return Err(Error::InvalidShiftCount(shift_count as i64));
    }

    let total_minutes = start_time
        .minutes_until(end_time)
        .ok_or_else(|| Error::InvalidWindow { start: start_time.to_string(), end: end_time.to_string() })? as u32;

    let start_minutes = start_time.minutes() as u32;
    let end_minutes = end_time.minutes() as u32;
    let shift_duration = total_minutes / shift_count;

    if shift_duration == 0 {
        log::warn!(
            "Window {}-{} ({} min) is shorter than its {} shifts. All but the last shift are empty.",
            start_time,
            end_time,
            total_minutes,
            shift_count
        );
    }

    let shifts = (0..shift_count)
        .map(|index| {
            let shift_start = start_minutes + index * shift_duration;
            let shift_end = if index == shift_count - 1 { end_minutes } else { shift_start + shift_duration };

            ShiftWindow {
                shift_number: index + 1,
                start_time: TimeOfDay::within_day(shift_start),
                end_time: TimeOfDay::within_day(shift_end),
            }
        })
        .collect();

    Ok(shifts)
}

/// Same as [`partition`], but takes the raw `HH:MM` strings and a signed shift
/// count as they arrive from forms and stored rows.
pub fn partition_hhmm(start_time: &str, end_time: &str, shift_count: i64) -> Result<Vec<ShiftWindow>> {
    let start: TimeOfDay = start_time.parse()?;
    let end: TimeOfDay = end_time.parse()?;
    let shift_count = u32::try_from(shift_count).map_err(|_| Error::InvalidShiftCount(shift_count))?;

    partition(start, end, shift_count)
}
