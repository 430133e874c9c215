use std::path::Path;

use crate::api::registry_dto::RegistryDto;
use crate::domain::config::ServiceConfig;
use crate::domain::registry::registry_store::Registry;
use crate::error::Result;
use crate::loader::parser::{parse_json_file, write_json_file};

pub mod api;
pub mod domain;
pub mod error;
pub mod loader;
pub mod logger;

/// Loads a registry snapshot from a JSON file.
pub fn load_registry(file_path: impl AsRef<Path>) -> Result<Registry> {
    let file_path = file_path.as_ref();
    log::info!("Loading registry from '{}'...", file_path.display());

    let root_dto: RegistryDto = parse_json_file(file_path)?;
    log::info!("JSON file parsed successfully.");

    Registry::from_dto(root_dto)
}

/// Writes the current registry state to a JSON file.
pub fn save_registry(registry: &Registry, file_path: impl AsRef<Path>) -> Result<()> {
    let file_path = file_path.as_ref();
    write_json_file(file_path, &registry.to_dto())?;
    log::info!("Registry saved to '{}'.", file_path.display());
    Ok(())
}

/// The service configuration at `file_path`, or the built-in defaults.
pub fn load_config(file_path: Option<&Path>) -> Result<ServiceConfig> {
    match file_path {
        Some(path) => {
            log::info!("Loading service configuration from '{}'.", path.display());
            ServiceConfig::load(path)
        }
        None => Ok(ServiceConfig::default()),
    }
}
