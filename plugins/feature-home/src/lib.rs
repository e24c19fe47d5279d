//! The "Home" menu item. Its controller only shows the item when the host
//! runs the `DNN` product SKU.
use std::sync::Arc;

use persona_core::feature::{Feature, FeatureManifest, ManifestMenuItem, VersionRange};
use persona_core::kernel::error::Result as KernelResult;
use persona_core::menu::{ControllerRegistry, MenuItem, MenuItemController};

pub const HOME_IDENTIFIER: &str = "Dnn.Home";
pub const HOME_CONTROLLER: &str = "Dnn.PersonaBar.UI.MenuControllers.HomeController";
const VISIBLE_SKU: &str = "DNN";

/// Visible only for the `DNN` SKU
#[derive(Debug, Clone)]
pub struct HomeController {
    sku: String,
}

impl HomeController {
    pub fn new(sku: impl Into<String>) -> Self {
        Self { sku: sku.into() }
    }
}

impl MenuItemController for HomeController {
    fn visible(&self, _item: &MenuItem) -> bool {
        self.sku == VISIBLE_SKU
    }
}

#[derive(Debug, Clone)]
pub struct HomeFeature {
    sku: String,
}

impl HomeFeature {
    pub fn new(sku: impl Into<String>) -> Self {
        Self { sku: sku.into() }
    }
}

impl Feature for HomeFeature {
    fn name(&self) -> &'static str {
        "feature-home"
    }

    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    fn compatible_api_versions(&self) -> Vec<VersionRange> {
        VersionRange::from_constraint("^0.1").map(|range| vec![range]).unwrap_or_default()
    }

    fn manifest(&self) -> FeatureManifest {
        let mut home = ManifestMenuItem::new(HOME_IDENTIFIER, "Home");
        home.controller = HOME_CONTROLLER.to_string();
        home.resource_key = "nav_Home".to_string();
        home.css_class = Some("home".to_string());
        home.order = 0;
        FeatureManifest::new(self.name(), self.version()).with_menu_item(home)
    }

    fn register_controllers(&self, registry: &mut ControllerRegistry) -> KernelResult<()> {
        log::debug!("Registering home controller for SKU {}", self.sku);
        registry.register(HOME_CONTROLLER, Arc::new(HomeController::new(self.sku.clone())))?;
        Ok(())
    }
}
