pub mod json_registry_store;
pub mod memory_registry_store;
