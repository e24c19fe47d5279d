//! # PersonaBar Storage
//!
//! File storage behind the [`StorageProvider`] trait, layered configuration
//! (application and feature scopes) and the [`DefaultStorageManager`]
//! kernel component that lays out the storage root.
pub mod config;
pub mod error;
pub mod local;
pub mod manager;
pub mod provider;

pub use config::{ConfigData, ConfigFormat, ConfigManager, ConfigScope, FeatureConfigScope, PersonaBarSettings};
pub use local::LocalStorageProvider;
pub use manager::{DefaultStorageManager, StorageManager};
pub use provider::StorageProvider;

#[cfg(test)]
mod tests;
