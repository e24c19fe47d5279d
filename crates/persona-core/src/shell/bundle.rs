use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::shell::error::PanelError;
use crate::shell::panel::PanelFactory;

/// Where panel bundles come from
#[async_trait]
pub trait BundleSource: Send + Sync + fmt::Debug {
    async fn fetch(&self, path: &str) -> Result<Arc<dyn PanelFactory>, PanelError>;
}

/// Bundles compiled into the process, keyed by bundle path.
/// Features register theirs during activation.
#[derive(Default)]
pub struct BundleCatalog {
    bundles: RwLock<HashMap<String, Arc<dyn PanelFactory>>>,
}

impl fmt::Debug for BundleCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BundleCatalog").field("paths", &self.paths()).finish()
    }
}

impl BundleCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, path: &str, factory: Arc<dyn PanelFactory>) -> Result<(), PanelError> {
        let mut bundles = self.bundles.write().unwrap_or_else(|e| e.into_inner());
        if bundles.contains_key(path) {
            return Err(PanelError::DuplicateBundle(path.to_string()));
        }
        bundles.insert(path.to_string(), factory);
        log::debug!("Registered panel bundle {}", path);
        Ok(())
    }

    pub fn unregister(&self, path: &str) -> bool {
        self.bundles
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(path)
            .is_some()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.bundles.read().unwrap_or_else(|e| e.into_inner()).contains_key(path)
    }

    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self
            .bundles
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .cloned()
            .collect();
        paths.sort();
        paths
    }

    pub fn len(&self) -> usize {
        self.bundles.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl BundleSource for BundleCatalog {
    async fn fetch(&self, path: &str) -> Result<Arc<dyn PanelFactory>, PanelError> {
        self.bundles
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(path)
            .cloned()
            .ok_or_else(|| PanelError::BundleNotFound(path.to_string()))
    }
}
