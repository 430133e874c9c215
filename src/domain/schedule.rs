pub mod monthly_quota;
pub mod schedule_window;
pub mod service_type;
pub mod shift_partitioner;
pub mod slot_availability;
