pub mod config_dto;
pub mod registration_dto;
pub mod registry_dto;
pub mod schedule_dto;
pub mod user_dto;
