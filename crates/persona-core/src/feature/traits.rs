use crate::feature::manifest::FeatureManifest;
use crate::feature::version::VersionRange;
use crate::kernel::bootstrap::Application;
use crate::kernel::error::Result;
use crate::menu::controller::ControllerRegistry;
use crate::shell::bundle::BundleCatalog;

/// A unit that contributes menu items, controllers and panel bundles.
pub trait Feature: Send + Sync {
    fn name(&self) -> &'static str;

    fn version(&self) -> &str;

    /// Core features are activated before any other feature
    fn is_core(&self) -> bool {
        false
    }

    fn compatible_api_versions(&self) -> Vec<VersionRange>;

    /// Registry records written on install
    fn manifest(&self) -> FeatureManifest;

    fn register_controllers(&self, _registry: &mut ControllerRegistry) -> Result<()> {
        Ok(())
    }

    fn register_bundles(&self, _catalog: &BundleCatalog) -> Result<()> {
        Ok(())
    }

    /// Called once after activation with access to the application
    fn init(&self, _app: &mut Application) -> Result<()> {
        Ok(())
    }

    fn shutdown(&self) -> Result<()> {
        Ok(())
    }
}
