use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use crate::kernel::component::KernelComponent;
use crate::kernel::constants;
use crate::kernel::error::Result;
use crate::storage::config::{ConfigData, ConfigFormat, ConfigManager, FeatureConfigScope, PersonaBarSettings};
use crate::storage::local::LocalStorageProvider;
use crate::storage::provider::StorageProvider;

/// Storage manager component interface
#[async_trait]
pub trait StorageManager: KernelComponent + StorageProvider {}

/// Storage rooted at a base directory:
///
/// ```text
/// <base>/config/              application configuration
/// <base>/features/config/     feature configuration (default/, user/)
/// <base>/data/                registry snapshots
/// ```
#[derive(Clone)]
pub struct DefaultStorageManager {
    name: &'static str,
    provider: Arc<dyn StorageProvider>,
    config_manager: Arc<ConfigManager>,
    base_path: PathBuf,
    app_config_path: PathBuf,
    feature_config_path: PathBuf,
    data_path: PathBuf,
}

impl DefaultStorageManager {
    pub fn new(base_path: PathBuf) -> Self {
        let provider: Arc<dyn StorageProvider> = Arc::new(LocalStorageProvider::new(base_path.clone()));
        Self::with_provider(provider, base_path)
    }

    /// Create a storage manager over a custom provider; standard paths are
    /// laid out under `base_path`.
    pub fn with_provider(provider: Arc<dyn StorageProvider>, base_path: PathBuf) -> Self {
        let app_config_path = base_path.join("config");
        let feature_config_path = base_path.join("features").join("config");
        let data_path = base_path.join("data");

        let config_manager = ConfigManager::new(
            provider.clone(),
            app_config_path.clone(),
            feature_config_path.clone(),
            ConfigFormat::Json,
        );

        Self {
            name: "DefaultStorageManager",
            provider,
            config_manager: Arc::new(config_manager),
            base_path,
            app_config_path,
            feature_config_path,
            data_path,
        }
    }

    /// Resolve the storage root: `$PERSONABAR_HOME`, else `./.personabar`.
    pub fn default_base_path() -> PathBuf {
        match std::env::var_os(constants::HOME_ENV_VAR) {
            Some(home) if !home.is_empty() => PathBuf::from(home),
            _ => std::env::current_dir()
                .unwrap_or_else(|_| PathBuf::from("."))
                .join(constants::CONFIG_DIR_NAME),
        }
    }

    pub fn provider(&self) -> &Arc<dyn StorageProvider> {
        &self.provider
    }

    pub fn config_manager(&self) -> &Arc<ConfigManager> {
        &self.config_manager
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn app_config_path(&self) -> &Path {
        &self.app_config_path
    }

    pub fn feature_config_path(&self) -> &Path {
        &self.feature_config_path
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    /// Directory scanned for feature manifests
    pub fn feature_manifest_path(&self) -> PathBuf {
        self.base_path.join("features")
    }

    pub fn ensure_directories(&self) -> Result<()> {
        self.create_dir_all(&self.app_config_path)?;
        self.create_dir_all(&self.feature_config_path.join("default"))?;
        self.create_dir_all(&self.feature_config_path.join("user"))?;
        self.create_dir_all(&self.data_path)?;
        Ok(())
    }

    pub fn get_app_config(&self, name: &str) -> Result<ConfigData> {
        self.config_manager.get_app_config(name)
    }

    pub fn save_app_config(&self, name: &str, config: &ConfigData) -> Result<()> {
        self.config_manager.save_app_config(name, config)
    }

    pub fn get_feature_config(&self, feature_name: &str) -> Result<ConfigData> {
        self.config_manager.get_feature_config(feature_name)
    }

    pub fn save_feature_config(
        &self,
        feature_name: &str,
        config: &ConfigData,
        scope: FeatureConfigScope,
    ) -> Result<()> {
        self.config_manager.save_feature_config(feature_name, config, scope)
    }

    /// Settings from the `personabar` application config.
    pub fn settings(&self) -> Result<PersonaBarSettings> {
        let config = self.get_app_config(constants::APP_CONFIG_NAME)?;
        Ok(PersonaBarSettings::from_config(&config))
    }

    /// Path of the registry snapshot named in settings
    pub fn registry_file_path(&self, settings: &PersonaBarSettings) -> PathBuf {
        self.data_path.join(&settings.registry_file)
    }
}

impl Debug for DefaultStorageManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultStorageManager")
            .field("name", &self.name)
            .field("provider", &self.provider.name())
            .field("base_path", &self.base_path)
            .finish()
    }
}

#[async_trait]
impl KernelComponent for DefaultStorageManager {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn initialize(&self) -> Result<()> {
        self.ensure_directories()?;
        log::debug!("Storage initialized at {}", self.base_path.display());
        Ok(())
    }

    async fn start(&self) -> Result<()> {
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        self.config_manager.clear_cache();
        Ok(())
    }
}

impl StorageProvider for DefaultStorageManager {
    fn name(&self) -> &str {
        self.provider.name()
    }

    fn exists(&self, path: &Path) -> bool {
        self.provider.exists(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.provider.is_file(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.provider.is_dir(path)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.provider.create_dir_all(path)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.provider.read_to_string(path)
    }

    fn write_string(&self, path: &Path, contents: &str) -> Result<()> {
        self.provider.write_string(path, contents)
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        self.provider.remove_file(path)
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        self.provider.read_dir(path)
    }
}

impl StorageManager for DefaultStorageManager {}

impl Default for DefaultStorageManager {
    fn default() -> Self {
        Self::new(Self::default_base_path())
    }
}
