//! Input checks shared by the login and schedule forms.

use crate::domain::config::ServiceConfig;
use crate::domain::utils::dates::parse_date;
use crate::domain::utils::time_of_day::TimeOfDay;

const NAME_MIN_CHARS: usize = 2;
const NAME_MAX_CHARS: usize = 20;

fn is_hangul_syllable(c: char) -> bool {
    ('\u{AC00}'..='\u{D7A3}').contains(&c)
}

/// 2 to 20 characters after trimming; only Hangul syllables, Latin letters
/// and whitespace.
pub fn is_valid_name(name: &str) -> bool {
    let name = name.trim();
    let length = name.chars().count();

    (NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&length) && name.chars().all(|c| is_hangul_syllable(c) || c.is_ascii_alphabetic() || c.is_whitespace())
}

/// Strict `HH:MM`, 24-hour.
pub fn is_valid_time_string(time: &str) -> bool {
    time.len() == 5 && time.parse::<TimeOfDay>().is_ok()
}

pub fn is_valid_time_range(start_time: &str, end_time: &str) -> bool {
    if !is_valid_time_string(start_time) || !is_valid_time_string(end_time) {
        return false;
    }

    match (start_time.parse::<TimeOfDay>(), end_time.parse::<TimeOfDay>()) {
        (Ok(start), Ok(end)) => start < end,
        _ => false,
    }
}

pub fn is_valid_date_string(date: &str) -> bool {
    parse_date(date).is_ok()
}

pub fn is_valid_shift_count(count: u32, config: &ServiceConfig) -> bool {
    config.shift_count_range.contains(&count)
}

pub fn is_valid_participant_count(count: u32, config: &ServiceConfig) -> bool {
    config.participants_range.contains(&count)
}
