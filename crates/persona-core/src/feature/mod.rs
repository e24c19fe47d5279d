//! # PersonaBar Feature System
//!
//! A [`Feature`] bundles the menu records it installs (its
//! [`FeatureManifest`]), the menu controllers it provides and the panel
//! bundles the host shell loads. Activation checks API compatibility and
//! registers controllers and bundles; installation writes the manifest
//! records through the data service and is idempotent.
pub mod error;
pub mod manager;
pub mod manifest;
pub mod registry;
pub mod traits;
pub mod version;

pub use manager::{DefaultFeatureManager, FeatureInfo, FeatureManager, InstallReport};
pub use manifest::{FeatureManifest, ManifestExtension, ManifestMenuItem, ManifestPermission};
pub use registry::FeatureRegistry;
pub use traits::Feature;
pub use version::{ApiVersion, VersionRange};

#[cfg(test)]
mod tests;
