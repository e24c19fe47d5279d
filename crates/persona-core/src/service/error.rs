use std::fmt;

use thiserror::Error;

/// A field that failed client-side validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors.iter().map(|e| e.message.as_str()).collect::<Vec<_>>().join("; ")
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServiceError {
    /// The request never produced an HTTP response
    #[error("Network failure calling {route}: {message}")]
    Network { route: String, message: String },

    #[error("{route} returned HTTP {status}: {message}")]
    Http { route: String, status: u16, message: String },

    #[error("Malformed response from {route}: {message}")]
    Decode { route: String, message: String },

    /// The envelope carried `Success: false`
    #[error("{route} reported failure: {message}")]
    Rejected { route: String, message: String },

    #[error("Invalid service call: {0}")]
    InvalidRequest(String),

    #[error("Validation failed: {}", join_field_errors(.0))]
    Validation(Vec<FieldError>),
}

impl ServiceError {
    pub fn route(&self) -> Option<&str> {
        match self {
            ServiceError::Network { route, .. }
            | ServiceError::Http { route, .. }
            | ServiceError::Decode { route, .. }
            | ServiceError::Rejected { route, .. } => Some(route),
            ServiceError::InvalidRequest(_) | ServiceError::Validation(_) => None,
        }
    }

    /// Whether the error was raised locally without contacting the server
    pub fn is_local(&self) -> bool {
        matches!(self, ServiceError::InvalidRequest(_) | ServiceError::Validation(_))
    }
}
