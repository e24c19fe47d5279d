use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::data::error::DataError;
use crate::menu::model::{Extension, MenuItem, MenuPermission};

/// Registry tables and id sequences.
///
/// Every mutation is an upsert or delete against these tables; the file
/// backed service serializes the whole value as its snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryStore {
    #[serde(default)]
    next_menu_id: i32,
    #[serde(default)]
    next_extension_id: i32,
    #[serde(default)]
    next_permission_id: i32,
    #[serde(default)]
    menu_items: Vec<MenuItem>,
    #[serde(default)]
    extensions: Vec<Extension>,
    #[serde(default)]
    default_roles: BTreeMap<i32, Vec<String>>,
    #[serde(default)]
    permissions: Vec<MenuPermission>,
}

fn next_id(counter: &mut i32) -> i32 {
    *counter = (*counter).max(0) + 1;
    *counter
}

impl RegistryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn has_menu(&self, menu_id: i32) -> bool {
        self.menu_items.iter().any(|item| item.menu_id == menu_id)
    }

    /// Whether `menu_id` is `start` or one of its ancestors
    fn is_ancestor_or_self(&self, menu_id: i32, start: i32) -> bool {
        let mut current = Some(start);
        let mut steps = 0;
        while let Some(id) = current {
            if id == menu_id {
                return true;
            }
            steps += 1;
            if steps > self.menu_items.len() {
                break;
            }
            current = self
                .menu_items
                .iter()
                .find(|item| item.menu_id == id)
                .and_then(|item| item.parent_id);
        }
        false
    }

    /// `menu_id` followed by every descendant
    fn subtree(&self, menu_id: i32) -> Vec<i32> {
        let mut ids = vec![menu_id];
        let mut next = 0;
        while next < ids.len() {
            let parent = ids[next];
            for item in &self.menu_items {
                if item.parent_id == Some(parent) && !ids.contains(&item.menu_id) {
                    ids.push(item.menu_id);
                }
            }
            next += 1;
        }
        ids
    }

    /// Insert or update keyed by identifier; returns the menu id.
    pub fn save_menu_item(&mut self, item: &MenuItem, current_user_id: i32) -> Result<i32, DataError> {
        if item.identifier.trim().is_empty() {
            return Err(DataError::InvalidRecord {
                entity: "menu item",
                reason: "identifier must not be empty".to_string(),
            });
        }

        let existing_id = self
            .menu_items
            .iter()
            .find(|existing| existing.identifier == item.identifier)
            .map(|existing| existing.menu_id);

        if let Some(parent_id) = item.parent() {
            if !self.has_menu(parent_id) {
                return Err(DataError::ParentNotFound {
                    identifier: item.identifier.clone(),
                    parent_id,
                });
            }
            if let Some(menu_id) = existing_id {
                if self.is_ancestor_or_self(menu_id, parent_id) {
                    return Err(DataError::ParentCycle {
                        identifier: item.identifier.clone(),
                        parent_id,
                    });
                }
            }
        }

        let mut record = item.clone();
        record.last_modified_by = current_user_id;
        record.parent_id = item.parent();

        match existing_id {
            Some(menu_id) => {
                record.menu_id = menu_id;
                if let Some(slot) = self.menu_items.iter_mut().find(|m| m.menu_id == menu_id) {
                    *slot = record;
                }
                Ok(menu_id)
            }
            None => {
                let menu_id = next_id(&mut self.next_menu_id);
                record.menu_id = menu_id;
                self.menu_items.push(record);
                Ok(menu_id)
            }
        }
    }

    /// Remove a menu item and its descendants, with their default roles,
    /// permissions and extensions. Unknown identifiers are ignored.
    pub fn delete_menu_item_by_identifier(&mut self, identifier: &str) {
        let Some(menu_id) = self
            .menu_items
            .iter()
            .find(|item| item.identifier == identifier)
            .map(|item| item.menu_id)
        else {
            return;
        };
        let removed = self.subtree(menu_id);
        if removed.len() > 1 {
            log::debug!("Deleting '{}' removes {} descendant item(s)", identifier, removed.len() - 1);
        }
        self.menu_items.retain(|item| !removed.contains(&item.menu_id));
        self.default_roles.retain(|id, _| !removed.contains(id));
        self.permissions.retain(|permission| !removed.contains(&permission.menu_id));
        self.extensions.retain(|extension| !removed.contains(&extension.menu_id));
    }

    pub fn menu_items(&self) -> Vec<MenuItem> {
        self.menu_items.clone()
    }

    /// Update by `extension_id` when it names an existing row, otherwise
    /// upsert by identifier.
    pub fn save_extension(&mut self, extension: &Extension, current_user_id: i32) -> Result<i32, DataError> {
        if extension.identifier.trim().is_empty() {
            return Err(DataError::InvalidRecord {
                entity: "extension",
                reason: "identifier must not be empty".to_string(),
            });
        }
        if !self.has_menu(extension.menu_id) {
            return Err(DataError::MenuItemNotFound {
                menu_id: extension.menu_id,
            });
        }

        let by_id = (extension.extension_id > 0)
            .then(|| {
                self.extensions
                    .iter()
                    .position(|e| e.extension_id == extension.extension_id)
            })
            .flatten();
        let by_identifier = self
            .extensions
            .iter()
            .position(|e| e.identifier == extension.identifier);

        let slot = match (by_id, by_identifier) {
            (Some(id_pos), Some(ident_pos)) if id_pos != ident_pos => {
                return Err(DataError::DuplicateIdentifier {
                    entity: "extension",
                    identifier: extension.identifier.clone(),
                });
            }
            (Some(pos), _) | (None, Some(pos)) => Some(pos),
            (None, None) => None,
        };

        let mut record = extension.clone();
        record.last_modified_by = current_user_id;
        match slot {
            Some(pos) => {
                record.extension_id = self.extensions[pos].extension_id;
                let extension_id = record.extension_id;
                self.extensions[pos] = record;
                Ok(extension_id)
            }
            None => {
                let extension_id = next_id(&mut self.next_extension_id);
                record.extension_id = extension_id;
                self.extensions.push(record);
                Ok(extension_id)
            }
        }
    }

    pub fn delete_extension(&mut self, identifier: &str) {
        self.extensions.retain(|extension| extension.identifier != identifier);
    }

    pub fn extensions(&self) -> Vec<Extension> {
        self.extensions.clone()
    }

    /// Replace the default role names of a menu item. Names are trimmed,
    /// blanks dropped and duplicates (case-insensitive) removed.
    pub fn save_menu_default_roles(&mut self, menu_id: i32, role_names: &[String]) -> Result<i32, DataError> {
        if !self.has_menu(menu_id) {
            return Err(DataError::MenuItemNotFound { menu_id });
        }
        let mut roles: Vec<String> = Vec::new();
        for name in role_names.iter().map(|name| name.trim()).filter(|name| !name.is_empty()) {
            if !roles.iter().any(|existing| existing.eq_ignore_ascii_case(name)) {
                roles.push(name.to_string());
            }
        }
        if roles.is_empty() {
            self.default_roles.remove(&menu_id);
        } else {
            self.default_roles.insert(menu_id, roles);
        }
        Ok(menu_id)
    }

    pub fn menu_default_roles(&self, menu_id: i32) -> Vec<String> {
        self.default_roles.get(&menu_id).cloned().unwrap_or_default()
    }

    pub fn save_permission(&mut self, permission: &MenuPermission, current_user_id: i32) -> Result<i32, DataError> {
        if !self.has_menu(permission.menu_id) {
            return Err(DataError::MenuItemNotFound {
                menu_id: permission.menu_id,
            });
        }
        if permission.role_id.is_none() && permission.user_id.is_none() {
            return Err(DataError::InvalidRecord {
                entity: "permission",
                reason: "either a role id or a user id is required".to_string(),
            });
        }

        let mut record = permission.clone();
        record.last_modified_by = current_user_id;

        let existing = (permission.menu_permission_id > 0)
            .then(|| {
                self.permissions
                    .iter()
                    .position(|p| p.menu_permission_id == permission.menu_permission_id)
            })
            .flatten();
        match existing {
            Some(pos) => {
                self.permissions[pos] = record;
                Ok(permission.menu_permission_id)
            }
            None => {
                let id = next_id(&mut self.next_permission_id);
                record.menu_permission_id = id;
                self.permissions.push(record);
                Ok(id)
            }
        }
    }

    /// Entries scoped to `portal_id` plus the portal-less ones
    pub fn permissions_by_portal(&self, portal_id: i32) -> Vec<MenuPermission> {
        self.permissions
            .iter()
            .filter(|p| p.portal_id.is_none() || p.portal_id == Some(portal_id))
            .cloned()
            .collect()
    }

    pub fn delete_permissions_by_menu_id(&mut self, portal_id: i32, menu_id: i32) {
        self.permissions
            .retain(|p| !(p.menu_id == menu_id && p.portal_id == Some(portal_id)));
    }

    pub fn delete_permission_by_id(&mut self, menu_permission_id: i32) {
        self.permissions
            .retain(|p| p.menu_permission_id != menu_permission_id);
    }
}
