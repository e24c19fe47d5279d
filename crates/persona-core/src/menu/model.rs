//! Registry records: menu items, extensions, permission entries and the
//! user snapshot the visibility rules are evaluated against.
use serde::{Deserialize, Serialize};

/// Pseudo role id matching every user
pub const ALL_USERS_ROLE_ID: i32 = -1;

/// Permission id of the VIEW permission; the only one that affects visibility
pub const VIEW_PERMISSION_ID: i32 = 1;

/// Permission id of the EDIT permission
pub const EDIT_PERMISSION_ID: i32 = 2;

/// A registered admin bar entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Surrogate id assigned by the data service
    #[serde(default)]
    pub menu_id: i32,
    pub identifier: String,
    pub module_name: String,
    #[serde(default)]
    pub controller: String,
    #[serde(default)]
    pub resource_key: String,
    #[serde(default)]
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css_class: Option<String>,
    #[serde(default)]
    pub mobile_support: bool,
    /// `None` or `Some(0)` is a tree root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i32>,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub allow_host: bool,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub last_modified_by: i32,
}

fn default_true() -> bool {
    true
}

impl MenuItem {
    pub fn new(identifier: impl Into<String>, module_name: impl Into<String>) -> Self {
        Self {
            menu_id: 0,
            identifier: identifier.into(),
            module_name: module_name.into(),
            controller: String::new(),
            resource_key: String::new(),
            path: String::new(),
            link: None,
            css_class: None,
            mobile_support: false,
            parent_id: None,
            order: 0,
            allow_host: false,
            enabled: true,
            last_modified_by: 0,
        }
    }

    pub fn with_controller(mut self, controller: impl Into<String>) -> Self {
        self.controller = controller.into();
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_resource_key(mut self, resource_key: impl Into<String>) -> Self {
        self.resource_key = resource_key.into();
        self
    }

    pub fn with_parent(mut self, parent_id: i32) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    pub fn host_only(mut self) -> Self {
        self.allow_host = true;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Parent menu id, with `0` normalized to `None`
    pub fn parent(&self) -> Option<i32> {
        self.parent_id.filter(|id| *id != 0)
    }

    pub fn is_root(&self) -> bool {
        self.parent().is_none()
    }
}

/// A child registration under a menu item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extension {
    #[serde(default)]
    pub extension_id: i32,
    pub identifier: String,
    /// Owning menu item
    pub menu_id: i32,
    #[serde(default)]
    pub controller: String,
    #[serde(default)]
    pub container: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub order: i32,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub last_modified_by: i32,
}

impl Extension {
    pub fn new(identifier: impl Into<String>, menu_id: i32) -> Self {
        Self {
            extension_id: 0,
            identifier: identifier.into(),
            menu_id,
            controller: String::new(),
            container: String::new(),
            path: String::new(),
            order: 0,
            enabled: true,
            last_modified_by: 0,
        }
    }
}

/// One allow/deny entry for a menu item, scoped to a role or a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuPermission {
    #[serde(default)]
    pub menu_permission_id: i32,
    /// `None` applies to every portal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portal_id: Option<i32>,
    pub menu_id: i32,
    #[serde(default = "default_view_permission")]
    pub permission_id: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i32>,
    pub allow_access: bool,
    #[serde(default)]
    pub last_modified_by: i32,
}

fn default_view_permission() -> i32 {
    VIEW_PERMISSION_ID
}

impl MenuPermission {
    pub fn for_role(menu_id: i32, role_id: i32, allow_access: bool) -> Self {
        Self {
            menu_permission_id: 0,
            portal_id: None,
            menu_id,
            permission_id: VIEW_PERMISSION_ID,
            role_id: Some(role_id),
            user_id: None,
            allow_access,
            last_modified_by: 0,
        }
    }

    pub fn for_user(menu_id: i32, user_id: i32, allow_access: bool) -> Self {
        Self {
            menu_permission_id: 0,
            portal_id: None,
            menu_id,
            permission_id: VIEW_PERMISSION_ID,
            role_id: None,
            user_id: Some(user_id),
            allow_access,
            last_modified_by: 0,
        }
    }

    pub fn in_portal(mut self, portal_id: i32) -> Self {
        self.portal_id = Some(portal_id);
        self
    }

    pub fn is_view(&self) -> bool {
        self.permission_id == VIEW_PERMISSION_ID
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleInfo {
    pub role_id: i32,
    pub role_name: String,
}

impl RoleInfo {
    pub fn new(role_id: i32, role_name: impl Into<String>) -> Self {
        Self {
            role_id,
            role_name: role_name.into(),
        }
    }
}

/// Snapshot of the current user used for one visibility evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub user_id: i32,
    pub username: String,
    #[serde(default)]
    pub portal_id: i32,
    #[serde(default)]
    pub is_super_user: bool,
    #[serde(default)]
    pub roles: Vec<RoleInfo>,
}

impl UserInfo {
    pub fn new(user_id: i32, username: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
            portal_id: 0,
            is_super_user: false,
            roles: Vec::new(),
        }
    }

    pub fn host(user_id: i32, username: impl Into<String>) -> Self {
        Self {
            is_super_user: true,
            ..Self::new(user_id, username)
        }
    }

    pub fn with_role(mut self, role_id: i32, role_name: impl Into<String>) -> Self {
        self.roles.push(RoleInfo::new(role_id, role_name));
        self
    }

    pub fn in_portal(mut self, portal_id: i32) -> Self {
        self.portal_id = portal_id;
        self
    }

    pub fn has_role_id(&self, role_id: i32) -> bool {
        role_id == ALL_USERS_ROLE_ID || self.roles.iter().any(|role| role.role_id == role_id)
    }

    /// Case-insensitive role-name membership
    pub fn has_role_name(&self, role_name: &str) -> bool {
        self.roles
            .iter()
            .any(|role| role.role_name.eq_ignore_ascii_case(role_name))
    }
}
