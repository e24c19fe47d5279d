use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::feature::error::FeatureSystemError;
use crate::feature::version::VersionRange;
use crate::kernel::error::Result;
use crate::menu::model::{Extension, MenuItem, MenuPermission, VIEW_PERMISSION_ID};
use crate::storage::StorageProvider;
use crate::storage::config::ConfigFormat;

/// Records a feature contributes to the menu registry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureManifest {
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub description: String,
    /// Supported kernel API versions as semver requirements
    #[serde(default)]
    pub api_versions: Vec<String>,
    #[serde(default)]
    pub menu_items: Vec<ManifestMenuItem>,
    #[serde(default)]
    pub extensions: Vec<ManifestExtension>,
    #[serde(default)]
    pub permissions: Vec<ManifestPermission>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestMenuItem {
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
    /// Identifier of the parent item
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub allow_host: bool,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub default_roles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestExtension {
    pub identifier: String,
    /// Identifier of the owning menu item
    pub menu: String,
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
}

/// Seed permission entry; exactly one of `role_id`/`user_id` is expected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestPermission {
    /// Identifier of the menu item
    pub menu: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portal_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i32>,
    #[serde(default = "default_true")]
    pub allow_access: bool,
}

fn default_true() -> bool {
    true
}

impl ManifestMenuItem {
    pub fn new(identifier: impl Into<String>, module_name: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            module_name: module_name.into(),
            controller: String::new(),
            resource_key: String::new(),
            path: String::new(),
            link: None,
            css_class: None,
            mobile_support: false,
            parent: None,
            order: 0,
            allow_host: false,
            enabled: true,
            default_roles: Vec::new(),
        }
    }

    pub fn to_menu_item(&self, parent_id: Option<i32>) -> MenuItem {
        MenuItem {
            menu_id: 0,
            identifier: self.identifier.clone(),
            module_name: self.module_name.clone(),
            controller: self.controller.clone(),
            resource_key: self.resource_key.clone(),
            path: self.path.clone(),
            link: self.link.clone(),
            css_class: self.css_class.clone(),
            mobile_support: self.mobile_support,
            parent_id,
            order: self.order,
            allow_host: self.allow_host,
            enabled: self.enabled,
            last_modified_by: 0,
        }
    }
}

impl ManifestExtension {
    pub fn to_extension(&self, menu_id: i32) -> Extension {
        Extension {
            extension_id: 0,
            identifier: self.identifier.clone(),
            menu_id,
            controller: self.controller.clone(),
            container: self.container.clone(),
            path: self.path.clone(),
            order: self.order,
            enabled: self.enabled,
            last_modified_by: 0,
        }
    }
}

impl ManifestPermission {
    pub fn to_permission(&self, menu_id: i32) -> MenuPermission {
        MenuPermission {
            menu_permission_id: 0,
            portal_id: self.portal_id,
            menu_id,
            permission_id: VIEW_PERMISSION_ID,
            role_id: self.role_id,
            user_id: self.user_id,
            allow_access: self.allow_access,
            last_modified_by: 0,
        }
    }
}

fn manifest_error(path: Option<&Path>, message: impl Into<String>) -> FeatureSystemError {
    FeatureSystemError::ManifestError {
        path: path.map(Path::to_path_buf),
        message: message.into(),
    }
}

impl FeatureManifest {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            ..Self::default()
        }
    }

    pub fn with_menu_item(mut self, item: ManifestMenuItem) -> Self {
        self.menu_items.push(item);
        self
    }

    pub fn with_extension(mut self, extension: ManifestExtension) -> Self {
        self.extensions.push(extension);
        self
    }

    pub fn with_permission(mut self, permission: ManifestPermission) -> Self {
        self.permissions.push(permission);
        self
    }

    pub fn api_version_ranges(&self) -> std::result::Result<Vec<VersionRange>, FeatureSystemError> {
        self.api_versions
            .iter()
            .map(|constraint| VersionRange::from_constraint(constraint).map_err(FeatureSystemError::from))
            .collect()
    }

    /// Identifiers of every menu item and extension this manifest owns
    pub fn identifiers(&self) -> Vec<String> {
        self.menu_items
            .iter()
            .map(|item| item.identifier.clone())
            .chain(self.extensions.iter().map(|ext| ext.identifier.clone()))
            .collect()
    }

    /// Structural checks that need no registry access
    pub fn validate(&self) -> std::result::Result<(), FeatureSystemError> {
        self.validate_at(None)
    }

    fn validate_at(&self, path: Option<&Path>) -> std::result::Result<(), FeatureSystemError> {
        if self.name.trim().is_empty() {
            return Err(manifest_error(path, "feature name must not be empty"));
        }
        self.api_version_ranges()?;

        let mut seen = HashSet::new();
        for item in &self.menu_items {
            if item.identifier.trim().is_empty() {
                return Err(manifest_error(path, "menu item identifier must not be empty"));
            }
            if !seen.insert(item.identifier.as_str()) {
                return Err(manifest_error(
                    path,
                    format!("menu item '{}' is declared twice", item.identifier),
                ));
            }
            if item.parent.as_deref() == Some(item.identifier.as_str()) {
                return Err(manifest_error(
                    path,
                    format!("menu item '{}' is its own parent", item.identifier),
                ));
            }
        }

        let mut seen_extensions = HashSet::new();
        for extension in &self.extensions {
            if extension.identifier.trim().is_empty() {
                return Err(manifest_error(path, "extension identifier must not be empty"));
            }
            if !seen_extensions.insert(extension.identifier.as_str()) {
                return Err(manifest_error(
                    path,
                    format!("extension '{}' is declared twice", extension.identifier),
                ));
            }
        }

        for permission in &self.permissions {
            if permission.role_id.is_none() == permission.user_id.is_none() {
                return Err(manifest_error(
                    path,
                    format!("permission for '{}' needs exactly one of role_id or user_id", permission.menu),
                ));
            }
        }
        Ok(())
    }

    pub fn parse(content: &str, format: ConfigFormat) -> std::result::Result<Self, FeatureSystemError> {
        let manifest: FeatureManifest = match format {
            ConfigFormat::Json => serde_json::from_str(content).map_err(|e| manifest_error(None, e.to_string()))?,
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::from_str(content).map_err(|e| manifest_error(None, e.to_string()))?,
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::from_str(content).map_err(|e| manifest_error(None, e.to_string()))?,
        };
        manifest.validate()?;
        Ok(manifest)
    }

    /// Load a manifest; the format follows the file extension.
    pub fn load(provider: &dyn StorageProvider, path: &Path) -> Result<Self> {
        let format = ConfigFormat::from_path(path)
            .ok_or_else(|| manifest_error(Some(path), "unsupported manifest file extension"))?;
        let content = provider.read_to_string(path)?;
        let manifest = Self::parse(&content, format).map_err(|e| match e {
            FeatureSystemError::ManifestError { message, .. } => manifest_error(Some(path), message),
            other => other,
        })?;
        Ok(manifest)
    }

    /// Load every manifest file in `dir`, sorted by path. Files with an
    /// unsupported extension are skipped; a malformed manifest is an error.
    pub fn load_dir(provider: &dyn StorageProvider, dir: &Path) -> Result<Vec<(PathBuf, FeatureManifest)>> {
        if !provider.is_dir(dir) {
            return Ok(Vec::new());
        }
        let mut manifests = Vec::new();
        for path in provider.read_dir(dir)? {
            if !provider.is_file(&path) || ConfigFormat::from_path(&path).is_none() {
                continue;
            }
            let manifest = Self::load(provider, &path)?;
            manifests.push((path, manifest));
        }
        Ok(manifests)
    }
}
