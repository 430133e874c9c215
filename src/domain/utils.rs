pub mod dates;
pub mod id;
pub mod time_of_day;
