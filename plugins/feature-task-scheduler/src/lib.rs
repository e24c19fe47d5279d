//! The "Task Scheduler" panel: scheduler status, schedule items, their
//! history and the scheduler settings, all read and written through the
//! `TaskScheduler` service controller.
use std::sync::Arc;

use serde_json::json;

use persona_core::feature::{Feature, FeatureManifest, ManifestMenuItem, VersionRange};
use persona_core::kernel::error::Result as KernelResult;
use persona_core::menu::{ControllerRegistry, MenuItem, MenuItemController, MenuSettings};
use persona_core::shell::{BundleCatalog, Panel, PanelContext, PanelError};

pub mod actions;
pub mod forms;
pub mod panel;
pub mod state;

pub use actions::{TaskScheduler, TaskStore};
pub use panel::TaskSchedulerPanel;
pub use state::{ScheduleItem, SchedulerSettings, TaskAction, TaskState};

pub const IDENTIFIER: &str = "Dnn.TaskScheduler";
pub const MODULE_NAME: &str = "TaskScheduler";
pub const BUNDLE_PATH: &str = "TaskScheduler/scripts/TaskScheduler";
pub const CONTROLLER: &str = "Dnn.PersonaBar.TaskScheduler.MenuControllers.TaskSchedulerMenuController";

#[derive(Debug, Default)]
pub struct TaskSchedulerController;

impl MenuItemController for TaskSchedulerController {
    fn visible(&self, _item: &MenuItem) -> bool {
        true
    }

    fn settings(&self, _item: &MenuItem) -> Option<MenuSettings> {
        let mut settings = MenuSettings::new();
        settings.insert("pageSize".to_string(), json!(panel::DEFAULT_PAGE_SIZE));
        Some(settings)
    }
}

/// Host-only item under "Settings"
#[derive(Debug, Default)]
pub struct TaskSchedulerFeature;

impl Feature for TaskSchedulerFeature {
    fn name(&self) -> &'static str {
        "feature-task-scheduler"
    }

    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    fn compatible_api_versions(&self) -> Vec<VersionRange> {
        VersionRange::from_constraint("^0.1").map(|range| vec![range]).unwrap_or_default()
    }

    fn manifest(&self) -> FeatureManifest {
        let mut settings = ManifestMenuItem::new("Dnn.Settings", "Settings");
        settings.resource_key = "nav_Settings".to_string();
        settings.order = 30;

        let mut scheduler = ManifestMenuItem::new(IDENTIFIER, MODULE_NAME);
        scheduler.controller = CONTROLLER.to_string();
        scheduler.resource_key = "nav_TaskScheduler".to_string();
        scheduler.path = BUNDLE_PATH.to_string();
        scheduler.parent = Some("Dnn.Settings".to_string());
        scheduler.order = 40;
        scheduler.allow_host = true;

        FeatureManifest::new(self.name(), self.version())
            .with_menu_item(settings)
            .with_menu_item(scheduler)
    }

    fn register_controllers(&self, registry: &mut ControllerRegistry) -> KernelResult<()> {
        registry.register(CONTROLLER, Arc::new(TaskSchedulerController))?;
        Ok(())
    }

    fn register_bundles(&self, catalog: &BundleCatalog) -> KernelResult<()> {
        catalog.register(
            BUNDLE_PATH,
            Arc::new(|context: PanelContext| -> Result<Arc<dyn Panel>, PanelError> {
                Ok(Arc::new(TaskSchedulerPanel::new(context)))
            }),
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests;
