pub mod roster;
pub mod scheduling_service;
