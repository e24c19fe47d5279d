//! # PersonaBar Menu Registry Errors
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MenuError {
    #[error("Menu item '{0}' is not registered")]
    ItemNotFound(String),

    #[error("Menu item '{0}' is not visible to the current user")]
    NotVisible(String),

    #[error("Controller '{0}' is already registered")]
    DuplicateController(String),

    #[error("Controller name must not be empty")]
    EmptyControllerName,
}
