//! # PersonaBar Data Access
//!
//! The registry persistence surface. [`DataService`] exposes the named
//! procedures used by feature installation and the menu manager: idempotent
//! saves keyed by identifier (or by surrogate id when updating a known row),
//! lookups and deletes. Deleting a menu item cascades to its default roles,
//! permission entries and extensions.
//!
//! Two implementations share [`RegistryStore`]: [`InMemoryDataService`] and
//! [`FileDataService`], which writes a JSON snapshot through a
//! [`StorageProvider`](crate::storage::StorageProvider) after every mutation.
pub mod error;
pub mod file;
pub mod memory;
pub mod store;

use async_trait::async_trait;

use crate::kernel::error::Result;
use crate::menu::model::{Extension, MenuItem, MenuPermission};

pub use file::FileDataService;
pub use memory::InMemoryDataService;
pub use store::RegistryStore;

#[async_trait]
pub trait DataService: Send + Sync + std::fmt::Debug {
    /// Upsert a menu item by identifier, returning its menu id
    async fn save_menu_item(&self, item: &MenuItem, current_user_id: i32) -> Result<i32>;

    async fn delete_menu_item_by_identifier(&self, identifier: &str) -> Result<()>;

    async fn get_menu_items(&self) -> Result<Vec<MenuItem>>;

    /// Upsert an extension, returning its extension id
    async fn save_extension(&self, extension: &Extension, current_user_id: i32) -> Result<i32>;

    async fn delete_extension(&self, identifier: &str) -> Result<()>;

    async fn get_extensions(&self) -> Result<Vec<Extension>>;

    /// Replace the default role names of a menu item
    async fn save_menu_default_roles(&self, menu_id: i32, role_names: &[String]) -> Result<i32>;

    async fn get_menu_default_roles(&self, menu_id: i32) -> Result<Vec<String>>;

    /// Insert a permission entry, or update it when `menu_permission_id`
    /// names an existing entry
    async fn save_permission(&self, permission: &MenuPermission, current_user_id: i32) -> Result<i32>;

    /// Entries for `portal_id` together with portal-less entries
    async fn get_permissions_by_portal(&self, portal_id: i32) -> Result<Vec<MenuPermission>>;

    async fn delete_permissions_by_menu_id(&self, portal_id: i32, menu_id: i32) -> Result<()>;

    async fn delete_permission_by_id(&self, menu_permission_id: i32) -> Result<()>;
}
