use thiserror::Error;

#[derive(Debug, Error)]
pub enum UiBridgeError {
    #[error("UI interface '{interface_name}' failed to handle a {message_type} message: {message}")]
    InterfaceHandlingFailed {
        interface_name: String,
        message_type: String,
        message: String,
    },

    #[error("Failed to register UI interface: {0}")]
    RegistrationFailed(String),

    #[error("UI interface '{0}' not found")]
    InterfaceNotFound(String),

    #[error("UI interface '{interface_name}' failed during '{method}': {message}")]
    LifecycleMethodFailed {
        interface_name: String,
        method: String,
        message: String,
    },

    #[error("Failed to acquire lock for '{entity}' during '{operation}'")]
    LockError { entity: String, operation: String },

    #[error("Multiple UI interfaces failed during operation")]
    MultipleInterfaceFailures(Vec<UiBridgeError>),
}
