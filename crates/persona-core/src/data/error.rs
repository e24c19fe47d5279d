//! # PersonaBar Data Access Errors
//!
//! [`DataError`] is returned by the registry persistence procedures when a
//! record is malformed or references a row that does not exist.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("Invalid {entity} record: {reason}")]
    InvalidRecord { entity: &'static str, reason: String },

    #[error("Menu item with id {menu_id} does not exist")]
    MenuItemNotFound { menu_id: i32 },

    #[error("Menu item '{identifier}' references missing parent id {parent_id}")]
    ParentNotFound { identifier: String, parent_id: i32 },

    #[error("Menu item '{identifier}' cannot move under its own descendant {parent_id}")]
    ParentCycle { identifier: String, parent_id: i32 },

    #[error("{entity} identifier '{identifier}' is already used by another record")]
    DuplicateIdentifier { entity: &'static str, identifier: String },

    #[error("Registry snapshot at '{path}' could not be read: {reason}")]
    SnapshotCorrupt { path: PathBuf, reason: String },
}
