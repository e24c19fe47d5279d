use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::menu::error::MenuError;
use crate::menu::model::MenuItem;

/// Extra key/value settings handed to a panel at init time
pub type MenuSettings = HashMap<String, Value>;

/// Per-feature customization of a menu entry at render time.
///
/// `update_parameters` may run several times per request and must be
/// idempotent. `visible` is combined with the permission rules; both must
/// allow the item.
pub trait MenuItemController: Send + Sync {
    fn update_parameters(&self, _item: &mut MenuItem) {}

    fn visible(&self, item: &MenuItem) -> bool;

    fn settings(&self, _item: &MenuItem) -> Option<MenuSettings> {
        None
    }
}

/// Used for items without a controller; leaves visibility to the permission
/// rules.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultController;

impl MenuItemController for DefaultController {
    fn visible(&self, _item: &MenuItem) -> bool {
        true
    }
}

/// Stand-in for controller names nothing registered; always hidden.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullController;

impl MenuItemController for NullController {
    fn visible(&self, _item: &MenuItem) -> bool {
        false
    }
}

/// Controller table keyed by the name stored in `MenuItem::controller`
#[derive(Default)]
pub struct ControllerRegistry {
    controllers: HashMap<String, Arc<dyn MenuItemController>>,
}

impl fmt::Debug for ControllerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerRegistry")
            .field("controllers", &self.names())
            .finish()
    }
}

impl ControllerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        controller: Arc<dyn MenuItemController>,
    ) -> Result<(), MenuError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(MenuError::EmptyControllerName);
        }
        if self.controllers.contains_key(&name) {
            return Err(MenuError::DuplicateController(name));
        }
        log::debug!("Registered menu controller '{}'", name);
        self.controllers.insert(name, controller);
        Ok(())
    }

    pub fn unregister(&mut self, name: &str) -> bool {
        self.controllers.remove(name).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.controllers.contains_key(name)
    }

    /// Resolve a controller name. Empty names get [`DefaultController`],
    /// unknown names [`NullController`].
    pub fn resolve(&self, name: &str) -> Arc<dyn MenuItemController> {
        if name.trim().is_empty() {
            return Arc::new(DefaultController);
        }
        match self.controllers.get(name) {
            Some(controller) => controller.clone(),
            None => {
                log::warn!("Menu controller '{}' is not registered, hiding its items", name);
                Arc::new(NullController)
            }
        }
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.controllers.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }
}
