use tempfile::tempdir;

use crate::kernel::component::KernelComponent;
use crate::kernel::error::Result;
use crate::storage::config::{ConfigData, FeatureConfigScope};
use crate::storage::manager::DefaultStorageManager;
use crate::storage::provider::StorageProvider;

#[tokio::test]
async fn test_initialize_creates_layout() -> Result<()> {
    let dir = tempdir().expect("Failed to create temp directory");
    let manager = DefaultStorageManager::new(dir.path().to_path_buf());

    manager.initialize().await?;

    assert!(dir.path().join("config").is_dir());
    assert!(dir.path().join("features/config/default").is_dir());
    assert!(dir.path().join("features/config/user").is_dir());
    assert!(dir.path().join("data").is_dir());
    assert_eq!(KernelComponent::name(&manager), "DefaultStorageManager");
    Ok(())
}

#[tokio::test]
async fn test_settings_read_from_app_config() -> Result<()> {
    let dir = tempdir().expect("Failed to create temp directory");
    let manager = DefaultStorageManager::new(dir.path().to_path_buf());
    manager.initialize().await?;

    let mut config = ConfigData::new();
    config.set("data.registry_file", "site.json")?;
    config.set("host.sku", "Evoq")?;
    manager.save_app_config("personabar", &config)?;

    let settings = manager.settings()?;
    assert_eq!(settings.sku, "Evoq");
    assert_eq!(manager.registry_file_path(&settings), dir.path().join("data").join("site.json"));
    Ok(())
}

#[tokio::test]
async fn test_feature_config_through_manager() -> Result<()> {
    let dir = tempdir().expect("Failed to create temp directory");
    let manager = DefaultStorageManager::new(dir.path().to_path_buf());
    manager.initialize().await?;

    let mut config = ConfigData::new();
    config.set("retention_days", 7)?;
    manager.save_feature_config("admin-logs", &config, FeatureConfigScope::Default)?;

    let loaded = manager.get_feature_config("admin-logs")?;
    assert_eq!(loaded.get::<i32>("retention_days"), Some(7));
    assert!(manager.exists(&dir.path().join("features/config/default/admin-logs.json")));
    Ok(())
}

#[test]
fn test_paths_layout() {
    let dir = tempdir().expect("Failed to create temp directory");
    let manager = DefaultStorageManager::new(dir.path().to_path_buf());
    assert_eq!(manager.app_config_path(), dir.path().join("config"));
    assert_eq!(manager.feature_config_path(), dir.path().join("features").join("config"));
    assert_eq!(manager.data_path(), dir.path().join("data"));
    assert_eq!(manager.feature_manifest_path(), dir.path().join("features"));
}
