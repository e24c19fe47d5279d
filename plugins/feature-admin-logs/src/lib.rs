//! The "Admin Logs" panel.
//!
//! The bundle registers a panel factory under [`BUNDLE_PATH`]. On init the
//! panel reads the available log types through the service facade; every
//! later activation re-reads the first page of log items.
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use persona_core::feature::{Feature, FeatureManifest, ManifestMenuItem, VersionRange};
use persona_core::kernel::error::Result as KernelResult;
use persona_core::menu::{ControllerRegistry, MenuItem, MenuItemController, MenuSettings};
use persona_core::service::ServiceClient;
use persona_core::shell::{BundleCatalog, Panel, PanelContext, PanelError, PanelWrapper, Utility};

pub const IDENTIFIER: &str = "Dnn.AdminLogs";
pub const MODULE_NAME: &str = "AdminLogs";
pub const BUNDLE_PATH: &str = "AdminLogs/scripts/AdminLogs";
pub const CONTROLLER: &str = "Dnn.PersonaBar.AdminLogs.MenuControllers.AdminLogsMenuController";
const SERVICE_CONTROLLER: &str = "AdminLogs";
const DEFAULT_PAGE_SIZE: u64 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LogType {
    pub log_type_key: String,
    pub log_type_friendly_name: String,
}

/// What the panel currently shows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminLogsState {
    pub identifier: String,
    pub mobile: bool,
    pub log_types: Vec<LogType>,
    pub log_items: Vec<Value>,
    pub total_results: u64,
    pub page_size: u64,
}

/// Surfaces the page size to the panel at init
#[derive(Debug, Default)]
pub struct AdminLogsController;

impl MenuItemController for AdminLogsController {
    fn visible(&self, _item: &MenuItem) -> bool {
        true
    }

    fn settings(&self, _item: &MenuItem) -> Option<MenuSettings> {
        let mut settings = MenuSettings::new();
        settings.insert("moduleName".to_string(), json!(MODULE_NAME));
        settings.insert("pageSize".to_string(), json!(DEFAULT_PAGE_SIZE));
        Some(settings)
    }
}

pub struct AdminLogsPanel {
    sf: ServiceClient,
    state: Mutex<AdminLogsState>,
}

impl AdminLogsPanel {
    pub fn new(context: PanelContext) -> Self {
        log::debug!("Creating {} panel", context.module_name);
        Self {
            sf: context.utility.sf().clone(),
            state: Mutex::new(AdminLogsState::default()),
        }
    }

    pub fn state(&self) -> AdminLogsState {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn failed(&self, message: impl ToString) -> PanelError {
        PanelError::LoadFailed {
            identifier: IDENTIFIER.to_string(),
            message: message.to_string(),
        }
    }

    async fn fetch_log_items(&self, params: &Value) -> Result<(), PanelError> {
        let page_size = self.state().page_size;
        let call = self
            .sf
            .get(SERVICE_CONTROLLER, "GetLogItems")
            .param("logType", params.get("logType").cloned().unwrap_or_else(|| json!("*")))
            .param("pageSize", page_size)
            .param("pageIndex", params.get("pageIndex").cloned().unwrap_or_else(|| json!(0)));
        let response = self.sf.call(call).await.map_err(|e| self.failed(e))?;
        let items = match response.results {
            Value::Array(items) => items,
            Value::Null => Vec::new(),
            other => vec![other],
        };
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.total_results = response.total_results.unwrap_or(items.len() as u64);
        state.log_items = items;
        Ok(())
    }
}

#[async_trait]
impl Panel for AdminLogsPanel {
    async fn init(&self, wrapper: &PanelWrapper, _utility: &Utility, _params: &Value) -> Result<(), PanelError> {
        let response = self
            .sf
            .call(self.sf.get(SERVICE_CONTROLLER, "GetLogTypes"))
            .await
            .map_err(|e| PanelError::InitFailed {
                identifier: wrapper.identifier.clone(),
                message: e.to_string(),
            })?;
        let log_types: Vec<LogType> = response.results_as().map_err(|e| PanelError::InitFailed {
            identifier: wrapper.identifier.clone(),
            message: e.to_string(),
        })?;

        let page_size = wrapper
            .settings
            .as_ref()
            .and_then(|settings| settings.get("pageSize"))
            .and_then(Value::as_u64)
            .unwrap_or(DEFAULT_PAGE_SIZE);
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.identifier = wrapper.identifier.clone();
        state.mobile = wrapper.mobile;
        state.page_size = page_size;
        state.log_types = log_types;
        log::info!("{} ready with {} log type(s)", wrapper.identifier, state.log_types.len());
        Ok(())
    }

    async fn load(&self, params: &Value) -> Result<(), PanelError> {
        self.fetch_log_items(params).await
    }
}

#[derive(Debug, Default)]
pub struct AdminLogsFeature;

impl Feature for AdminLogsFeature {
    fn name(&self) -> &'static str {
        "feature-admin-logs"
    }

    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    fn compatible_api_versions(&self) -> Vec<VersionRange> {
        VersionRange::from_constraint("^0.1").map(|range| vec![range]).unwrap_or_default()
    }

    fn manifest(&self) -> FeatureManifest {
        let mut manage = ManifestMenuItem::new("Dnn.Manage", "Manage");
        manage.resource_key = "nav_Manage".to_string();
        manage.order = 20;

        let mut logs = ManifestMenuItem::new(IDENTIFIER, MODULE_NAME);
        logs.controller = CONTROLLER.to_string();
        logs.resource_key = "nav_AdminLogs".to_string();
        logs.path = BUNDLE_PATH.to_string();
        logs.mobile_support = true;
        logs.parent = Some("Dnn.Manage".to_string());
        logs.order = 10;
        logs.default_roles = vec!["Administrators".to_string()];

        FeatureManifest::new(self.name(), self.version())
            .with_menu_item(manage)
            .with_menu_item(logs)
    }

    fn register_controllers(&self, registry: &mut ControllerRegistry) -> KernelResult<()> {
        registry.register(CONTROLLER, Arc::new(AdminLogsController))?;
        Ok(())
    }

    fn register_bundles(&self, catalog: &BundleCatalog) -> KernelResult<()> {
        catalog.register(
            BUNDLE_PATH,
            Arc::new(|context: PanelContext| -> Result<Arc<dyn Panel>, PanelError> {
                Ok(Arc::new(AdminLogsPanel::new(context)))
            }),
        )?;
        Ok(())
    }
}
