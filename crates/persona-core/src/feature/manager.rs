use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::data::DataService;
use crate::event::{SharedEventDispatcher, SystemEvent};
use crate::feature::error::FeatureSystemError;
use crate::feature::manifest::FeatureManifest;
use crate::feature::registry::FeatureRegistry;
use crate::feature::traits::Feature;
use crate::feature::version::ApiVersion;
use crate::kernel::component::KernelComponent;
use crate::kernel::constants;
use crate::kernel::error::{Error, Result};
use crate::menu::manager::MenuManager;
use crate::shell::bundle::BundleCatalog;

/// Summary of an activated feature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureInfo {
    pub name: String,
    pub version: String,
    pub is_core: bool,
    pub identifiers: Vec<String>,
}

/// Ids written by one install
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    pub feature: String,
    pub menu_items: Vec<(String, i32)>,
    pub extensions: Vec<(String, i32)>,
    pub permissions: usize,
}

#[async_trait]
pub trait FeatureManager: KernelComponent {
    /// Register a feature with its controllers and bundles
    async fn activate(&self, feature: Arc<dyn Feature>) -> Result<()>;

    async fn deactivate(&self, name: &str) -> Result<()>;

    /// Write an activated feature's manifest records
    async fn install(&self, name: &str) -> Result<InstallReport>;

    async fn install_manifest(&self, manifest: &FeatureManifest) -> Result<InstallReport>;

    /// Remove an activated feature's records
    async fn uninstall(&self, name: &str) -> Result<()>;

    /// Remove menu items and extensions by identifier
    async fn uninstall_identifiers(&self, identifiers: &[String]) -> Result<()>;

    async fn features(&self) -> Vec<FeatureInfo>;

    async fn is_active(&self, name: &str) -> bool;
}

#[derive(Default)]
struct Contributions {
    controllers: Vec<String>,
    bundles: Vec<String>,
}

pub struct DefaultFeatureManager {
    name: &'static str,
    registry: Mutex<FeatureRegistry>,
    contributions: Mutex<HashMap<String, Contributions>>,
    menu: Arc<MenuManager>,
    bundles: Arc<BundleCatalog>,
    events: Option<SharedEventDispatcher>,
    acting_user_id: i32,
}

impl fmt::Debug for DefaultFeatureManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultFeatureManager")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl DefaultFeatureManager {
    pub fn new(menu: Arc<MenuManager>, bundles: Arc<BundleCatalog>) -> Result<Self> {
        let api_version = ApiVersion::from_str(constants::API_VERSION)
            .map_err(|e| Error::Other(format!("Failed to parse API_VERSION constant: {}", e)))?;
        Ok(Self::with_api_version(menu, bundles, api_version))
    }

    pub fn with_api_version(menu: Arc<MenuManager>, bundles: Arc<BundleCatalog>, api_version: ApiVersion) -> Self {
        Self {
            name: "DefaultFeatureManager",
            registry: Mutex::new(FeatureRegistry::new(api_version)),
            contributions: Mutex::new(HashMap::new()),
            menu,
            bundles,
            events: None,
            acting_user_id: constants::SYSTEM_USER_ID,
        }
    }

    pub fn with_events(mut self, events: SharedEventDispatcher) -> Self {
        self.events = Some(events);
        self
    }

    /// User id recorded as `last_modified_by` on installed records
    pub fn with_acting_user(mut self, user_id: i32) -> Self {
        self.acting_user_id = user_id;
        self
    }

    fn data(&self) -> &Arc<dyn DataService> {
        self.menu.data_service()
    }

    async fn publish(&self, event: SystemEvent) {
        if let Some(events) = &self.events {
            events.dispatch(&event).await;
        }
    }

    fn rollback(&self, contributions: &Contributions) {
        if let Err(e) = self.menu.with_controllers(|registry| {
            for name in &contributions.controllers {
                registry.unregister(name);
            }
        }) {
            log::error!(
                "Error rolling back controllers {:?}: {}",
                contributions.controllers,
                e
            );
        }
        for path in &contributions.bundles {
            self.bundles.unregister(path);
        }
    }

    fn register_contributions(&self, feature: &dyn Feature) -> Result<Contributions> {
        let mut contributions = Contributions::default();

        let outcome = self.menu.with_controllers(|registry| {
            let before: HashSet<String> = registry.names().into_iter().collect();
            let result = feature.register_controllers(registry);
            contributions.controllers = registry
                .names()
                .into_iter()
                .filter(|name| !before.contains(name))
                .collect();
            result
        });
        if let Err(e) = outcome.and_then(|result| result) {
            self.rollback(&contributions);
            return Err(e);
        }

        let before: HashSet<String> = self.bundles.paths().into_iter().collect();
        let result = feature.register_bundles(&self.bundles);
        contributions.bundles = self
            .bundles
            .paths()
            .into_iter()
            .filter(|path| !before.contains(path))
            .collect();
        if let Err(e) = result {
            self.rollback(&contributions);
            return Err(e);
        }
        Ok(contributions)
    }

    async fn check_manifest_api(&self, manifest: &FeatureManifest) -> Result<()> {
        let ranges = manifest.api_version_ranges()?;
        if ranges.is_empty() {
            return Ok(());
        }
        let registry = self.registry.lock().await;
        let api_version = registry.api_version();
        if ranges.iter().any(|range| range.includes_api(api_version)) {
            return Ok(());
        }
        Err(FeatureSystemError::IncompatibleApiVersion {
            feature: manifest.name.clone(),
            api_version: api_version.to_string(),
            supported: manifest.api_versions.join(", "),
        }
        .into())
    }

    async fn write_menu_items(
        &self,
        manifest: &FeatureManifest,
        known: &mut HashMap<String, i32>,
        report: &mut InstallReport,
    ) -> Result<()> {
        // Parents first: save whatever has a resolvable parent until done
        let mut pending: Vec<_> = manifest.menu_items.iter().collect();
        while !pending.is_empty() {
            let mut deferred = Vec::new();
            let mut progressed = false;
            for item in pending {
                let parent_id = match &item.parent {
                    None => None,
                    Some(parent) => match known.get(parent) {
                        Some(id) => Some(*id),
                        None => {
                            deferred.push(item);
                            continue;
                        }
                    },
                };
                let menu_id = self
                    .data()
                    .save_menu_item(&item.to_menu_item(parent_id), self.acting_user_id)
                    .await?;
                self.data()
                    .save_menu_default_roles(menu_id, &item.default_roles)
                    .await?;
                known.insert(item.identifier.clone(), menu_id);
                report.menu_items.push((item.identifier.clone(), menu_id));
                progressed = true;
            }
            if !progressed {
                let item = deferred[0];
                return Err(FeatureSystemError::MissingParent {
                    identifier: item.identifier.clone(),
                    parent: item.parent.clone().unwrap_or_default(),
                }
                .into());
            }
            pending = deferred;
        }
        Ok(())
    }

    async fn write_permissions(
        &self,
        manifest: &FeatureManifest,
        known: &HashMap<String, i32>,
        report: &mut InstallReport,
    ) -> Result<()> {
        for seed in &manifest.permissions {
            let menu_id = *known.get(&seed.menu).ok_or_else(|| FeatureSystemError::MissingMenu {
                record: format!("permission on {}", seed.menu),
                menu: seed.menu.clone(),
            })?;
            let mut permission = seed.to_permission(menu_id);
            let portal = seed.portal_id.unwrap_or(self.menu.portal_id());
            let existing = self
                .data()
                .get_permissions_by_portal(portal)
                .await?
                .into_iter()
                .find(|p| {
                    p.menu_id == menu_id
                        && p.portal_id == permission.portal_id
                        && p.role_id == permission.role_id
                        && p.user_id == permission.user_id
                        && p.permission_id == permission.permission_id
                });
            if let Some(existing) = existing {
                permission.menu_permission_id = existing.menu_permission_id;
            }
            self.data().save_permission(&permission, self.acting_user_id).await?;
            report.permissions += 1;
        }
        Ok(())
    }

    async fn uninstall_manifest(&self, manifest: &FeatureManifest) -> Result<()> {
        for extension in &manifest.extensions {
            self.data().delete_extension(&extension.identifier).await?;
        }
        for item in manifest.menu_items.iter().rev() {
            self.data().delete_menu_item_by_identifier(&item.identifier).await?;
        }
        self.menu.reload().await?;
        Ok(())
    }
}

#[async_trait]
impl KernelComponent for DefaultFeatureManager {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn initialize(&self) -> Result<()> {
        Ok(())
    }

    async fn start(&self) -> Result<()> {
        Ok(())
    }

    /// Shut features down in reverse activation order
    async fn stop(&self) -> Result<()> {
        let features = self.registry.lock().await.features();
        let mut failures = Vec::new();
        for feature in features.iter().rev() {
            if let Err(e) = feature.shutdown() {
                log::error!("Error shutting down feature {}: {}", feature.name(), e);
                failures.push(format!("{}: {}", feature.name(), e));
            }
        }
        if failures.is_empty() {
            Ok(())
        } else {
            Err(FeatureSystemError::ShutdownError {
                feature: "<multiple>".to_string(),
                message: failures.join("; "),
            }
            .into())
        }
    }
}

#[async_trait]
impl FeatureManager for DefaultFeatureManager {
    async fn activate(&self, feature: Arc<dyn Feature>) -> Result<()> {
        let mut registry = self.registry.lock().await;
        let name = feature.name().to_string();
        if registry.contains(&name) {
            return Err(FeatureSystemError::DuplicateFeature(name).into());
        }
        registry.check_compatibility(feature.as_ref())?;

        let contributions = self.register_contributions(feature.as_ref())?;
        if let Err(e) = registry.register(feature.clone()) {
            self.rollback(&contributions);
            return Err(e.into());
        }
        log::info!(
            "Activated feature {} v{} ({} controller(s), {} bundle(s))",
            name,
            feature.version(),
            contributions.controllers.len(),
            contributions.bundles.len()
        );
        self.contributions.lock().await.insert(name, contributions);
        Ok(())
    }

    async fn deactivate(&self, name: &str) -> Result<()> {
        let feature = self.registry.lock().await.unregister(name)?;
        if let Some(contributions) = self.contributions.lock().await.remove(name) {
            self.rollback(&contributions);
        }
        feature.shutdown().map_err(|e| FeatureSystemError::ShutdownError {
            feature: name.to_string(),
            message: e.to_string(),
        })?;
        log::info!("Deactivated feature {}", name);
        Ok(())
    }

    async fn install(&self, name: &str) -> Result<InstallReport> {
        let feature = self
            .registry
            .lock()
            .await
            .get(name)
            .ok_or_else(|| FeatureSystemError::FeatureNotFound(name.to_string()))?;
        self.install_manifest(&feature.manifest()).await
    }

    async fn install_manifest(&self, manifest: &FeatureManifest) -> Result<InstallReport> {
        manifest.validate()?;
        self.check_manifest_api(manifest).await?;

        let mut report = InstallReport {
            feature: manifest.name.clone(),
            ..InstallReport::default()
        };
        let mut known: HashMap<String, i32> = self
            .data()
            .get_menu_items()
            .await?
            .into_iter()
            .map(|item| (item.identifier, item.menu_id))
            .collect();

        self.write_menu_items(manifest, &mut known, &mut report).await?;

        for extension in &manifest.extensions {
            let menu_id = *known.get(&extension.menu).ok_or_else(|| FeatureSystemError::MissingMenu {
                record: extension.identifier.clone(),
                menu: extension.menu.clone(),
            })?;
            let extension_id = self
                .data()
                .save_extension(&extension.to_extension(menu_id), self.acting_user_id)
                .await?;
            report.extensions.push((extension.identifier.clone(), extension_id));
        }

        self.write_permissions(manifest, &known, &mut report).await?;

        self.menu.reload().await?;
        log::info!(
            "Installed feature {}: {} menu item(s), {} extension(s), {} permission(s)",
            manifest.name,
            report.menu_items.len(),
            report.extensions.len(),
            report.permissions
        );
        self.publish(SystemEvent::FeatureInstalled {
            feature: manifest.name.clone(),
        })
        .await;
        Ok(report)
    }

    async fn uninstall(&self, name: &str) -> Result<()> {
        let feature = self
            .registry
            .lock()
            .await
            .get(name)
            .ok_or_else(|| FeatureSystemError::FeatureNotFound(name.to_string()))?;
        self.uninstall_manifest(&feature.manifest()).await?;
        log::info!("Uninstalled feature {}", name);
        self.publish(SystemEvent::FeatureUninstalled {
            feature: name.to_string(),
        })
        .await;
        Ok(())
    }

    async fn uninstall_identifiers(&self, identifiers: &[String]) -> Result<()> {
        for identifier in identifiers {
            self.data().delete_extension(identifier).await?;
            self.data().delete_menu_item_by_identifier(identifier).await?;
        }
        self.menu.reload().await?;
        Ok(())
    }

    async fn features(&self) -> Vec<FeatureInfo> {
        self.registry
            .lock()
            .await
            .features()
            .into_iter()
            .map(|feature| FeatureInfo {
                name: feature.name().to_string(),
                version: feature.version().to_string(),
                is_core: feature.is_core(),
                identifiers: feature.manifest().identifiers(),
            })
            .collect()
    }

    async fn is_active(&self, name: &str) -> bool {
        self.registry.lock().await.contains(name)
    }
}
