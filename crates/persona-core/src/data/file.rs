use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::data::DataService;
use crate::data::error::DataError;
use crate::data::store::RegistryStore;
use crate::kernel::error::Result;
use crate::menu::model::{Extension, MenuItem, MenuPermission};
use crate::storage::StorageProvider;
use crate::storage::error::StorageSystemError;

/// Registry persisted as a JSON snapshot.
///
/// Mutations run against a copy of the store; the copy replaces the live
/// store only after the snapshot was written, so a failed write leaves both
/// the file and memory unchanged.
pub struct FileDataService {
    provider: Arc<dyn StorageProvider>,
    path: PathBuf,
    store: RwLock<RegistryStore>,
}

impl FileDataService {
    /// Open the snapshot at `path`, starting empty when it does not exist.
    pub fn open(provider: Arc<dyn StorageProvider>, path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let store = if provider.exists(&path) {
            let content = provider.read_to_string(&path)?;
            if content.trim().is_empty() {
                RegistryStore::new()
            } else {
                serde_json::from_str(&content).map_err(|e| DataError::SnapshotCorrupt {
                    path: path.clone(),
                    reason: e.to_string(),
                })?
            }
        } else {
            RegistryStore::new()
        };
        log::debug!("Opened registry snapshot {}", path.display());
        Ok(Self {
            provider,
            path,
            store: RwLock::new(store),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, store: &RegistryStore) -> Result<()> {
        let content = serde_json::to_string_pretty(store)
            .map_err(|e| StorageSystemError::serialization("json", e))?;
        self.provider.write_string(&self.path, &content)
    }

    async fn mutate<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut RegistryStore) -> std::result::Result<T, DataError> + Send,
    {
        let mut store = self.store.write().await;
        let mut draft = store.clone();
        let output = f(&mut draft)?;
        if draft != *store {
            self.persist(&draft)?;
            *store = draft;
        }
        Ok(output)
    }
}

impl fmt::Debug for FileDataService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileDataService")
            .field("provider", &self.provider.name())
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl DataService for FileDataService {
    async fn save_menu_item(&self, item: &MenuItem, current_user_id: i32) -> Result<i32> {
        self.mutate(|store| store.save_menu_item(item, current_user_id)).await
    }

    async fn delete_menu_item_by_identifier(&self, identifier: &str) -> Result<()> {
        self.mutate(|store| {
            store.delete_menu_item_by_identifier(identifier);
            Ok(())
        })
        .await
    }

    async fn get_menu_items(&self) -> Result<Vec<MenuItem>> {
        Ok(self.store.read().await.menu_items())
    }

    async fn save_extension(&self, extension: &Extension, current_user_id: i32) -> Result<i32> {
        self.mutate(|store| store.save_extension(extension, current_user_id)).await
    }

    async fn delete_extension(&self, identifier: &str) -> Result<()> {
        self.mutate(|store| {
            store.delete_extension(identifier);
            Ok(())
        })
        .await
    }

    async fn get_extensions(&self) -> Result<Vec<Extension>> {
        Ok(self.store.read().await.extensions())
    }

    async fn save_menu_default_roles(&self, menu_id: i32, role_names: &[String]) -> Result<i32> {
        self.mutate(|store| store.save_menu_default_roles(menu_id, role_names)).await
    }

    async fn get_menu_default_roles(&self, menu_id: i32) -> Result<Vec<String>> {
        Ok(self.store.read().await.menu_default_roles(menu_id))
    }

    async fn save_permission(&self, permission: &MenuPermission, current_user_id: i32) -> Result<i32> {
        self.mutate(|store| store.save_permission(permission, current_user_id)).await
    }

    async fn get_permissions_by_portal(&self, portal_id: i32) -> Result<Vec<MenuPermission>> {
        Ok(self.store.read().await.permissions_by_portal(portal_id))
    }

    async fn delete_permissions_by_menu_id(&self, portal_id: i32, menu_id: i32) -> Result<()> {
        self.mutate(|store| {
            store.delete_permissions_by_menu_id(portal_id, menu_id);
            Ok(())
        })
        .await
    }

    async fn delete_permission_by_id(&self, menu_permission_id: i32) -> Result<()> {
        self.mutate(|store| {
            store.delete_permission_by_id(menu_permission_id);
            Ok(())
        })
        .await
    }
}
