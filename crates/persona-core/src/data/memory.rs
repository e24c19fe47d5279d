use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::data::DataService;
use crate::data::store::RegistryStore;
use crate::kernel::error::Result;
use crate::menu::model::{Extension, MenuItem, MenuPermission};

/// Registry held in process memory only
#[derive(Debug, Default)]
pub struct InMemoryDataService {
    store: RwLock<RegistryStore>,
}

impl InMemoryDataService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_store(store: RegistryStore) -> Self {
        Self {
            store: RwLock::new(store),
        }
    }

    pub async fn snapshot(&self) -> RegistryStore {
        self.store.read().await.clone()
    }
}

#[async_trait]
impl DataService for InMemoryDataService {
    async fn save_menu_item(&self, item: &MenuItem, current_user_id: i32) -> Result<i32> {
        Ok(self.store.write().await.save_menu_item(item, current_user_id)?)
    }

    async fn delete_menu_item_by_identifier(&self, identifier: &str) -> Result<()> {
        self.store.write().await.delete_menu_item_by_identifier(identifier);
        Ok(())
    }

    async fn get_menu_items(&self) -> Result<Vec<MenuItem>> {
        Ok(self.store.read().await.menu_items())
    }

    async fn save_extension(&self, extension: &Extension, current_user_id: i32) -> Result<i32> {
        Ok(self.store.write().await.save_extension(extension, current_user_id)?)
    }

    async fn delete_extension(&self, identifier: &str) -> Result<()> {
        self.store.write().await.delete_extension(identifier);
        Ok(())
    }

    async fn get_extensions(&self) -> Result<Vec<Extension>> {
        Ok(self.store.read().await.extensions())
    }

    async fn save_menu_default_roles(&self, menu_id: i32, role_names: &[String]) -> Result<i32> {
        Ok(self.store.write().await.save_menu_default_roles(menu_id, role_names)?)
    }

    async fn get_menu_default_roles(&self, menu_id: i32) -> Result<Vec<String>> {
        Ok(self.store.read().await.menu_default_roles(menu_id))
    }

    async fn save_permission(&self, permission: &MenuPermission, current_user_id: i32) -> Result<i32> {
        Ok(self.store.write().await.save_permission(permission, current_user_id)?)
    }

    async fn get_permissions_by_portal(&self, portal_id: i32) -> Result<Vec<MenuPermission>> {
        Ok(self.store.read().await.permissions_by_portal(portal_id))
    }

    async fn delete_permissions_by_menu_id(&self, portal_id: i32, menu_id: i32) -> Result<()> {
        self.store.write().await.delete_permissions_by_menu_id(portal_id, menu_id);
        Ok(())
    }

    async fn delete_permission_by_id(&self, menu_permission_id: i32) -> Result<()> {
        self.store.write().await.delete_permission_by_id(menu_permission_id);
        Ok(())
    }
}
