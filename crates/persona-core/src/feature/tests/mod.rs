mod manager_tests;
mod version_tests;

use std::sync::{Arc, Mutex};

use crate::feature::manifest::FeatureManifest;
use crate::feature::traits::Feature;
use crate::feature::version::VersionRange;
use crate::kernel::error::{Error, Result};
use crate::menu::controller::{ControllerRegistry, DefaultController};
use crate::shell::bundle::BundleCatalog;
use crate::shell::error::PanelError;
use crate::shell::panel::{Panel, PanelContext, PanelFactory};

/// Configurable feature used across the feature system tests
pub(super) struct TestFeature {
    pub name: &'static str,
    pub core: bool,
    pub api: &'static str,
    pub controllers: Vec<&'static str>,
    pub bundles: Vec<&'static str>,
    pub fail_bundles: bool,
    pub fail_shutdown: bool,
    pub manifest: FeatureManifest,
    pub shutdowns: Arc<Mutex<Vec<String>>>,
}

impl TestFeature {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            core: false,
            api: "^0.1",
            controllers: Vec::new(),
            bundles: Vec::new(),
            fail_bundles: false,
            fail_shutdown: false,
            manifest: FeatureManifest::new(name, "1.0.0"),
            shutdowns: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

fn unloadable_factory() -> Arc<dyn PanelFactory> {
    Arc::new(|context: PanelContext| -> std::result::Result<Arc<dyn Panel>, PanelError> {
        Err(PanelError::FactoryFailed {
            module_name: context.module_name,
            message: "test bundle".to_string(),
        })
    })
}

impl Feature for TestFeature {
    fn name(&self) -> &'static str {
        self.name
    }

    fn version(&self) -> &str {
        "1.0.0"
    }

    fn is_core(&self) -> bool {
        self.core
    }

    fn compatible_api_versions(&self) -> Vec<VersionRange> {
        vec![VersionRange::from_constraint(self.api).unwrap()]
    }

    fn manifest(&self) -> FeatureManifest {
        self.manifest.clone()
    }

    fn register_controllers(&self, registry: &mut ControllerRegistry) -> Result<()> {
        for name in &self.controllers {
            registry.register(*name, Arc::new(DefaultController))?;
        }
        Ok(())
    }

    fn register_bundles(&self, catalog: &BundleCatalog) -> Result<()> {
        for path in &self.bundles {
            catalog.register(*path, unloadable_factory())?;
        }
        if self.fail_bundles {
            return Err(Error::from("bundle registration failed"));
        }
        Ok(())
    }

    fn shutdown(&self) -> Result<()> {
        self.shutdowns.lock().unwrap().push(self.name.to_string());
        if self.fail_shutdown {
            return Err(Error::from("still busy"));
        }
        Ok(())
    }
}
