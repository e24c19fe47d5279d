//! # PersonaBar Kernel Errors
//!
//! Defines the crate-wide [`Error`] type.
//!
//! Every subsystem owns a typed error enum (storage, events, data access,
//! menu registry, features, panels, service calls, skin lifecycle, UI bridge);
//! [`Error`] wraps each of them so that callers crossing subsystem boundaries
//! can propagate with `?`. Kernel lifecycle failures carry the phase in which
//! they happened.
use std::path::PathBuf;
use std::result::Result as StdResult;

use thiserror::Error as ThisError;

use crate::data::error::DataError;
use crate::event::error::EventSystemError;
use crate::feature::error::FeatureSystemError;
use crate::menu::error::MenuError;
use crate::service::error::ServiceError;
use crate::shell::error::PanelError;
use crate::skin::error::SkinError;
use crate::storage::error::StorageSystemError;
use crate::ui_bridge::error::UiBridgeError;

/// Custom error type for the PersonaBar kernel
#[derive(Debug, ThisError)]
pub enum Error {
    #[error("Storage system error: {0}")]
    StorageSystem(#[from] StorageSystemError),

    #[error("Event system error: {0}")]
    EventSystem(#[from] EventSystemError),

    #[error("Data access error: {0}")]
    Data(#[from] DataError),

    #[error("Menu registry error: {0}")]
    Menu(#[from] MenuError),

    #[error("Feature system error: {0}")]
    FeatureSystem(#[from] FeatureSystemError),

    #[error("Panel error: {0}")]
    Panel(#[from] PanelError),

    #[error("Service call error: {0}")]
    Service(#[from] ServiceError),

    #[error("Skin lifecycle error: {0}")]
    Skin(#[from] SkinError),

    #[error("UI Bridge system error: {0}")]
    UiBridge(#[from] UiBridgeError),

    /// Error occurring during a specific kernel lifecycle phase.
    #[error("Kernel lifecycle error during {phase:?}: {message}")]
    KernelLifecycleError {
        phase: KernelLifecyclePhase,
        component_name: Option<String>,
        type_id_str: Option<String>,
        message: String,
        #[source]
        source: Option<Box<Error>>,
    },

    /// Error related to the DependencyRegistry operations or component lookup failures.
    #[error("Component registry error during operation '{operation}': {message}")]
    ComponentRegistryError {
        operation: String,
        component_name: Option<String>,
        message: String,
    },

    /// Generic error with message
    #[error("Error: {0}")]
    Other(String),
}

/// Represents a specific phase in the kernel's lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum KernelLifecyclePhase {
    #[error("Bootstrap")]
    Bootstrap,
    #[error("Initialize")]
    Initialize,
    #[error("Start")]
    Start,
    #[error("RunPreCheck")]
    RunPreCheck,
    #[error("Shutdown")]
    Shutdown,
}

/// Shorthand for Result with our Error type
pub type Result<T> = StdResult<T, Error>;

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}

impl Error {
    /// Wraps an I/O failure with the operation and path that produced it.
    pub fn io(source: std::io::Error, operation: impl Into<String>, path: PathBuf) -> Self {
        Error::StorageSystem(StorageSystemError::io(source, operation, path))
    }
}
