use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkinError {
    #[error("Page {page_id}: phase '{got}' arrived out of order (expected {expected})")]
    OutOfOrder { page_id: i32, expected: String, got: String },

    #[error("Page {page_id}: lifecycle already completed, got '{got}'")]
    AlreadyCompleted { page_id: i32, got: String },

    #[error("Listener '{listener}' failed during '{phase}': {message}")]
    ListenerFailed { listener: String, phase: String, message: String },
}
