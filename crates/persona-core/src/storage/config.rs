use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::kernel::constants;
use crate::kernel::error::Result;
use crate::storage::StorageProvider;
use crate::storage::error::StorageSystemError;

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigFormat {
    /// JSON format (.json)
    Json,
    /// YAML format (.yaml, .yml) - requires "yaml-config" feature
    #[cfg(feature = "yaml-config")]
    Yaml,
    /// TOML format (.toml) - requires "toml-config" feature
    #[cfg(feature = "toml-config")]
    Toml,
}

impl ConfigFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "json",
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => "yaml",
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => "toml",
        }
    }

    /// Determine format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                #[cfg(feature = "yaml-config")]
                "yaml" | "yml" => Some(ConfigFormat::Yaml),
                #[cfg(feature = "toml-config")]
                "toml" => Some(ConfigFormat::Toml),
                _ => None,
            })
    }
}

/// In-memory representation of configuration data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigData {
    #[serde(flatten)]
    values: HashMap<String, serde_json::Value>,
}

impl ConfigData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_hashmap(values: HashMap<String, serde_json::Value>) -> Self {
        Self { values }
    }

    /// Get a value, `None` when missing or of the wrong shape
    pub fn get<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        self.values
            .get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    pub fn get_or<T: for<'de> Deserialize<'de>>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    pub fn set<T: Serialize>(&mut self, key: &str, value: T) -> Result<()> {
        let json_value = serde_json::to_value(value)
            .map_err(|e| StorageSystemError::serialization("json", e))?;
        self.values.insert(key.to_string(), json_value);
        Ok(())
    }

    pub fn remove(&mut self, key: &str) -> Option<serde_json::Value> {
        self.values.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.values.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Merge with another config, `other` wins on conflicts
    pub fn merge(&mut self, other: &ConfigData) {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), value.clone());
        }
    }

    pub fn serialize(&self, format: ConfigFormat) -> Result<String> {
        let content = match format {
            ConfigFormat::Json => serde_json::to_string_pretty(&self)
                .map_err(|e| StorageSystemError::serialization("json", e))?,
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::to_string(&self)
                .map_err(|e| StorageSystemError::serialization("yaml", e))?,
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::to_string_pretty(&self)
                .map_err(|e| StorageSystemError::serialization("toml", e))?,
        };
        Ok(content)
    }

    pub fn deserialize(data: &str, format: ConfigFormat) -> Result<Self> {
        let config = match format {
            ConfigFormat::Json => serde_json::from_str(data)
                .map_err(|e| StorageSystemError::deserialization("json", e))?,
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::from_str(data)
                .map_err(|e| StorageSystemError::deserialization("yaml", e))?,
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::from_str(data)
                .map_err(|e| StorageSystemError::deserialization("toml", e))?,
        };
        Ok(config)
    }
}

/// Where a configuration file lives
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigScope {
    /// Global application configuration
    Application,
    /// Feature-specific configuration
    Feature(FeatureConfigScope),
}

/// Feature configuration layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureConfigScope {
    /// Defaults shipped with the feature
    Default,
    /// Site overrides (win over defaults)
    User,
}

impl ConfigScope {
    fn cache_key(&self, name: &str) -> String {
        match self {
            ConfigScope::Application => format!("app:{}", name),
            ConfigScope::Feature(FeatureConfigScope::Default) => format!("feature:default:{}", name),
            ConfigScope::Feature(FeatureConfigScope::User) => format!("feature:user:{}", name),
        }
    }
}

/// Loads, saves and caches configuration files
#[derive(Debug)]
pub struct ConfigManager {
    provider: Arc<dyn StorageProvider>,
    app_config_path: PathBuf,
    feature_config_path: PathBuf,
    default_format: ConfigFormat,
    cache: Mutex<HashMap<String, ConfigData>>,
}

impl ConfigManager {
    pub fn new(
        provider: Arc<dyn StorageProvider>,
        app_config_path: PathBuf,
        feature_config_path: PathBuf,
        default_format: ConfigFormat,
    ) -> Self {
        Self {
            provider,
            app_config_path,
            feature_config_path,
            default_format,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn app_config_path(&self) -> &Path {
        &self.app_config_path
    }

    pub fn feature_config_path(&self) -> &Path {
        &self.feature_config_path
    }

    pub fn default_format(&self) -> ConfigFormat {
        self.default_format
    }

    fn scope_dir(&self, scope: ConfigScope) -> PathBuf {
        match scope {
            ConfigScope::Application => self.app_config_path.clone(),
            ConfigScope::Feature(FeatureConfigScope::Default) => self.feature_config_path.join("default"),
            ConfigScope::Feature(FeatureConfigScope::User) => self.feature_config_path.join("user"),
        }
    }

    /// Resolve the file for `name`. An extension-less name first looks for an
    /// existing file in any supported format, then falls back to the default.
    pub fn resolve_config_path(&self, name: &str, scope: ConfigScope) -> PathBuf {
        let dir = self.scope_dir(scope);
        if Path::new(name).extension().is_some() {
            return dir.join(name);
        }
        let candidates = [
            ConfigFormat::Json,
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml,
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml,
        ];
        for format in candidates {
            let candidate = dir.join(format!("{}.{}", name, format.extension()));
            if self.provider.exists(&candidate) {
                return candidate;
            }
        }
        dir.join(format!("{}.{}", name, self.default_format.extension()))
    }

    /// Load a configuration; a missing file yields an empty config.
    pub fn load_config(&self, name: &str, scope: ConfigScope) -> Result<ConfigData> {
        let cache_key = scope.cache_key(name);
        if let Some(config) = self.cached(&cache_key) {
            return Ok(config);
        }

        let path = self.resolve_config_path(name, scope);
        let config = if self.provider.exists(&path) {
            let format = ConfigFormat::from_path(&path).ok_or_else(|| {
                StorageSystemError::UnsupportedConfigFormat(path.display().to_string())
            })?;
            let content = self.provider.read_to_string(&path)?;
            ConfigData::deserialize(&content, format)?
        } else {
            log::debug!("Config '{}' not found at {}, using empty config", name, path.display());
            ConfigData::new()
        };

        self.store_cached(cache_key, config.clone());
        Ok(config)
    }

    pub fn save_config(&self, name: &str, config: &ConfigData, scope: ConfigScope) -> Result<()> {
        let path = self.resolve_config_path(name, scope);
        if let Some(parent) = path.parent() {
            self.provider.create_dir_all(parent)?;
        }
        let format = ConfigFormat::from_path(&path).unwrap_or(self.default_format);
        let content = config.serialize(format)?;
        self.provider.write_string(&path, &content)?;
        self.store_cached(scope.cache_key(name), config.clone());
        Ok(())
    }

    /// Feature configuration: defaults overlaid with user overrides.
    pub fn get_feature_config(&self, feature_name: &str) -> Result<ConfigData> {
        let user_config = self.load_config(feature_name, ConfigScope::Feature(FeatureConfigScope::User))?;
        let mut merged = self.load_config(feature_name, ConfigScope::Feature(FeatureConfigScope::Default))?;
        merged.merge(&user_config);
        Ok(merged)
    }

    pub fn save_feature_config(
        &self,
        feature_name: &str,
        config: &ConfigData,
        scope: FeatureConfigScope,
    ) -> Result<()> {
        self.save_config(feature_name, config, ConfigScope::Feature(scope))
    }

    pub fn get_app_config(&self, name: &str) -> Result<ConfigData> {
        self.load_config(name, ConfigScope::Application)
    }

    pub fn save_app_config(&self, name: &str, config: &ConfigData) -> Result<()> {
        self.save_config(name, config, ConfigScope::Application)
    }

    pub fn invalidate_cache(&self, name: &str, scope: ConfigScope) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.remove(&scope.cache_key(name));
        }
    }

    pub fn clear_cache(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.clear();
        }
    }

    /// Names (without extension) of configuration files in a scope
    pub fn list_configs(&self, scope: ConfigScope) -> Result<Vec<String>> {
        let dir_path = self.scope_dir(scope);
        if !self.provider.exists(&dir_path) {
            return Ok(vec![]);
        }
        let names = self
            .provider
            .read_dir(&dir_path)?
            .into_iter()
            .filter(|path| self.provider.is_file(path) && ConfigFormat::from_path(path).is_some())
            .filter_map(|path| path.file_stem().and_then(|stem| stem.to_str().map(String::from)))
            .collect();
        Ok(names)
    }

    fn cached(&self, key: &str) -> Option<ConfigData> {
        self.cache.lock().ok().and_then(|cache| cache.get(key).cloned())
    }

    fn store_cached(&self, key: String, config: ConfigData) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(key, config);
        }
    }
}

/// Typed view over the `personabar` application config.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonaBarSettings {
    pub service_base_url: String,
    pub service_module_root: String,
    pub service_timeout_secs: u64,
    pub mobile: bool,
    pub sku: String,
    pub portal_id: i32,
    pub registry_file: String,
    pub log_level: String,
    pub log_json: bool,
}

impl Default for PersonaBarSettings {
    fn default() -> Self {
        Self {
            service_base_url: constants::DEFAULT_SERVICE_BASE_URL.to_string(),
            service_module_root: constants::DEFAULT_MODULE_ROOT.to_string(),
            service_timeout_secs: constants::DEFAULT_SERVICE_TIMEOUT_SECS,
            mobile: false,
            sku: constants::DEFAULT_SKU.to_string(),
            portal_id: 0,
            registry_file: constants::DEFAULT_REGISTRY_FILE.to_string(),
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl PersonaBarSettings {
    /// Read settings from config data, falling back to defaults key by key.
    pub fn from_config(config: &ConfigData) -> Self {
        let defaults = Self::default();
        Self {
            service_base_url: config.get_or("service.base_url", defaults.service_base_url),
            service_module_root: config.get_or("service.module_root", defaults.service_module_root),
            service_timeout_secs: config.get_or("service.timeout_secs", defaults.service_timeout_secs),
            mobile: config.get_or("shell.mobile", defaults.mobile),
            sku: config.get_or("host.sku", defaults.sku),
            portal_id: config.get_or("portal.id", defaults.portal_id),
            registry_file: config.get_or("data.registry_file", defaults.registry_file),
            log_level: config.get_or("logging.level", defaults.log_level),
            log_json: config.get_or("logging.json", defaults.log_json),
        }
    }

    pub fn to_config(&self) -> Result<ConfigData> {
        let mut config = ConfigData::new();
        config.set("service.base_url", &self.service_base_url)?;
        config.set("service.module_root", &self.service_module_root)?;
        config.set("service.timeout_secs", self.service_timeout_secs)?;
        config.set("shell.mobile", self.mobile)?;
        config.set("host.sku", &self.sku)?;
        config.set("portal.id", self.portal_id)?;
        config.set("data.registry_file", &self.registry_file)?;
        config.set("logging.level", &self.log_level)?;
        config.set("logging.json", self.log_json)?;
        Ok(config)
    }
}
