pub mod registry_store;
pub mod repository_trait;
