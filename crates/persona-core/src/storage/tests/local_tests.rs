use std::fs;
use std::path::PathBuf;

use tempfile::tempdir;

use crate::kernel::error::{Error, Result};
use crate::storage::error::StorageSystemError;
use crate::storage::local::LocalStorageProvider;
use crate::storage::provider::StorageProvider;

fn p(s: &str) -> PathBuf {
    PathBuf::from(s)
}

#[test]
fn test_write_and_read_string() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let provider = LocalStorageProvider::new(temp_dir.path().to_path_buf());

    provider.write_string(&p("registry.json"), "{\"menu_items\":[]}")?;

    assert_eq!(provider.read_to_string(&p("registry.json"))?, "{\"menu_items\":[]}");
    assert!(provider.is_file(&p("registry.json")));
    Ok(())
}

#[test]
fn test_write_creates_parent_directories() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let provider = LocalStorageProvider::new(temp_dir.path().to_path_buf());

    provider.write_string(&p("data/nested/registry.json"), "{}")?;

    assert!(temp_dir.path().join("data/nested/registry.json").is_file());
    assert!(provider.is_dir(&p("data/nested")));
    Ok(())
}

#[test]
fn test_write_replaces_existing_content() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let provider = LocalStorageProvider::new(temp_dir.path().to_path_buf());

    provider.write_string(&p("file.txt"), "first version with more text")?;
    provider.write_string(&p("file.txt"), "second")?;

    assert_eq!(provider.read_to_string(&p("file.txt"))?, "second");
    // No temporary files left beside the target
    assert_eq!(provider.read_dir(&p(""))?, vec![p("file.txt")]);
    Ok(())
}

#[test]
fn test_read_missing_file_is_not_found() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let provider = LocalStorageProvider::new(temp_dir.path().to_path_buf());

    let result = provider.read_to_string(&p("missing.json"));
    assert!(matches!(
        result,
        Err(Error::StorageSystem(StorageSystemError::FileNotFound(_)))
    ));
}

#[test]
fn test_remove_file() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let provider = LocalStorageProvider::new(temp_dir.path().to_path_buf());

    provider.write_string(&p("test.key"), "data")?;
    assert!(provider.exists(&p("test.key")));

    provider.remove_file(&p("test.key"))?;
    assert!(!provider.exists(&p("test.key")));

    let result = provider.remove_file(&p("test.key"));
    assert!(matches!(result, Err(Error::StorageSystem(StorageSystemError::Io { .. }))));
    Ok(())
}

#[test]
fn test_read_dir_sorted_relative() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let provider = LocalStorageProvider::new(temp_dir.path().to_path_buf());

    fs::create_dir_all(temp_dir.path().join("features")).expect("mkdir");
    provider.write_string(&p("features/b.json"), "{}")?;
    provider.write_string(&p("features/a.toml"), "")?;

    let entries = provider.read_dir(&p("features"))?;
    assert_eq!(entries, vec![p("features/a.toml"), p("features/b.json")]);
    Ok(())
}

#[test]
fn test_absolute_paths_bypass_base() -> Result<()> {
    let base = tempdir().expect("Failed to create temp directory");
    let other = tempdir().expect("Failed to create temp directory");
    let provider = LocalStorageProvider::new(base.path().to_path_buf());

    let absolute = other.path().join("outside.txt");
    provider.write_string(&absolute, "outside")?;

    assert_eq!(fs::read_to_string(&absolute).expect("read"), "outside");
    assert!(!base.path().join("outside.txt").exists());
    Ok(())
}
