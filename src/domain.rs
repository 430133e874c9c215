pub mod config;
pub mod registration;
pub mod registry;
pub mod schedule;
pub mod service;
pub mod session;
pub mod user;
pub mod utils;
pub mod validation;
