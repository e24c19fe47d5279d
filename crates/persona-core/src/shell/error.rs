use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PanelError {
    #[error("No bundle registered at '{0}'")]
    BundleNotFound(String),

    #[error("Bundle '{0}' is already registered")]
    DuplicateBundle(String),

    #[error("Failed to fetch bundle '{path}': {message}")]
    FetchFailed { path: String, message: String },

    #[error("Bundle for '{module_name}' did not produce a panel: {message}")]
    FactoryFailed { module_name: String, message: String },

    #[error("Panel '{identifier}' failed to initialize: {message}")]
    InitFailed { identifier: String, message: String },

    #[error("Panel '{identifier}' failed to load: {message}")]
    LoadFailed { identifier: String, message: String },

    #[error("Panel '{identifier}' panicked: {message}")]
    Panicked { identifier: String, message: String },

    /// Unknown, hidden or not permitted for the current user
    #[error("Panel '{identifier}' is not available: {reason}")]
    Unavailable { identifier: String, reason: String },
}
