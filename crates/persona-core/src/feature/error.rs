//! # PersonaBar Feature System Errors
//!
//! [`FeatureSystemError`] covers feature registration (duplicate names,
//! API version compatibility), manifest parsing and validation, and the
//! install, init and shutdown steps.
use std::path::PathBuf;

use crate::feature::version::VersionError;

#[derive(Debug, thiserror::Error)]
pub enum FeatureSystemError {
    #[error("Feature '{0}' is already registered")]
    DuplicateFeature(String),

    #[error("Feature '{feature}' supports API versions [{supported}] but the kernel provides {api_version}")]
    IncompatibleApiVersion {
        feature: String,
        api_version: String,
        supported: String,
    },

    #[error("Feature '{0}' is not registered")]
    FeatureNotFound(String),

    #[error("Feature manifest error{}: {message}", path.as_ref().map(|p| format!(" in '{}'", p.display())).unwrap_or_default())]
    ManifestError { path: Option<PathBuf>, message: String },

    #[error("Menu item '{identifier}' names parent '{parent}' which is not registered")]
    MissingParent { identifier: String, parent: String },

    #[error("'{record}' refers to menu item '{menu}' which is not registered")]
    MissingMenu { record: String, menu: String },

    #[error("Version parsing error: {0}")]
    VersionParsing(#[from] VersionError),

    #[error("Feature initialization error for '{feature}': {message}")]
    InitializationError { feature: String, message: String },

    #[error("Feature shutdown error for '{feature}': {message}")]
    ShutdownError { feature: String, message: String },
}
