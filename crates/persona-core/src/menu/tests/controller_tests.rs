use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::json;

use crate::menu::controller::{ControllerRegistry, MenuItemController, MenuSettings};
use crate::menu::error::MenuError;
use crate::menu::model::MenuItem;

struct SkuController {
    sku: String,
    updates: Arc<AtomicUsize>,
}

impl MenuItemController for SkuController {
    fn update_parameters(&self, item: &mut MenuItem) {
        self.updates.fetch_add(1, Ordering::SeqCst);
        item.path = format!("{}/scripts", item.module_name);
    }

    fn visible(&self, _item: &MenuItem) -> bool {
        self.sku == "DNN"
    }

    fn settings(&self, _item: &MenuItem) -> Option<MenuSettings> {
        let mut settings = MenuSettings::new();
        settings.insert("sku".to_string(), json!(self.sku));
        Some(settings)
    }
}

fn sku_controller(sku: &str) -> Arc<SkuController> {
    Arc::new(SkuController {
        sku: sku.to_string(),
        updates: Arc::new(AtomicUsize::new(0)),
    })
}

#[test]
fn test_resolve_registered_controller() {
    let mut registry = ControllerRegistry::new();
    registry.register("HomeController", sku_controller("DNN")).unwrap();

    let item = MenuItem::new("Dnn.Home", "Home").with_controller("HomeController");
    let controller = registry.resolve(&item.controller);
    assert!(controller.visible(&item));
    assert_eq!(controller.settings(&item).unwrap()["sku"], json!("DNN"));
}

#[test]
fn test_unknown_controller_resolves_to_hidden() {
    let registry = ControllerRegistry::new();
    let item = MenuItem::new("Dnn.Ghost", "Ghost").with_controller("Missing.Controller");
    let controller = registry.resolve(&item.controller);
    assert!(!controller.visible(&item));
    assert!(controller.settings(&item).is_none());
}

#[test]
fn test_empty_controller_is_pass_through() {
    let registry = ControllerRegistry::new();
    let mut item = MenuItem::new("Dnn.Plain", "Plain");
    let before = item.clone();
    let controller = registry.resolve("");
    controller.update_parameters(&mut item);
    assert_eq!(item, before);
    assert!(controller.visible(&item));
}

#[test]
fn test_update_parameters_idempotent() {
    let controller = sku_controller("DNN");
    let mut item = MenuItem::new("Dnn.Home", "Home");
    controller.update_parameters(&mut item);
    let once = item.clone();
    controller.update_parameters(&mut item);
    assert_eq!(item, once);
    assert_eq!(controller.updates.load(Ordering::SeqCst), 2);
}

#[test]
fn test_duplicate_and_empty_registration_rejected() {
    let mut registry = ControllerRegistry::new();
    registry.register("HomeController", sku_controller("DNN")).unwrap();
    assert!(matches!(
        registry.register("HomeController", sku_controller("Evoq")),
        Err(MenuError::DuplicateController(name)) if name == "HomeController"
    ));
    assert!(matches!(
        registry.register(" ", sku_controller("DNN")),
        Err(MenuError::EmptyControllerName)
    ));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_unregister() {
    let mut registry = ControllerRegistry::new();
    registry.register("B", sku_controller("DNN")).unwrap();
    registry.register("A", sku_controller("DNN")).unwrap();
    assert_eq!(registry.names(), vec!["A", "B"]);
    assert!(registry.unregister("A"));
    assert!(!registry.unregister("A"));
    assert!(!registry.contains("A"));
    assert!(registry.contains("B"));
}
