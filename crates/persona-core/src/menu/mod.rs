//! # PersonaBar Menu Registry
//!
//! Menu items read from the data service are arranged in a [`MenuTree`],
//! filtered per user by the [`permission`] rules and by each item's
//! [`MenuItemController`], and rendered into [`MenuEntry`] values for the
//! bar. Unknown controllers and malformed items hide the affected entry;
//! nothing here fails the whole menu.
pub mod controller;
pub mod error;
pub mod manager;
pub mod model;
pub mod permission;
pub mod tree;

pub use controller::{ControllerRegistry, DefaultController, MenuItemController, MenuSettings, NullController};
pub use manager::{MenuEntry, MenuManager, PanelDescriptor};
pub use model::{ALL_USERS_ROLE_ID, Extension, MenuItem, MenuPermission, RoleInfo, UserInfo, VIEW_PERMISSION_ID};
pub use tree::MenuTree;

#[cfg(test)]
mod tests;
