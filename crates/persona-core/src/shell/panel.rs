use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::menu::controller::MenuSettings;
use crate::menu::manager::PanelDescriptor;
use crate::shell::error::PanelError;
use crate::shell::utility::Utility;

/// The host-provided slot a panel renders into
#[derive(Debug, Clone, PartialEq)]
pub struct PanelWrapper {
    pub identifier: String,
    pub module_name: String,
    pub path: String,
    pub mobile: bool,
    /// Controller settings surfaced at init time
    pub settings: Option<MenuSettings>,
}

impl PanelWrapper {
    pub fn from_descriptor(descriptor: &PanelDescriptor, mobile: bool) -> Self {
        Self {
            identifier: descriptor.identifier.clone(),
            module_name: descriptor.module_name.clone(),
            path: descriptor.path.clone(),
            mobile,
            settings: descriptor.settings.clone(),
        }
    }
}

/// A loaded feature panel.
///
/// The shell calls `init` once per panel, then `load` on every later
/// activation. The mobile variants default to the desktop ones.
#[async_trait]
pub trait Panel: Send + Sync {
    async fn init(&self, wrapper: &PanelWrapper, utility: &Utility, params: &Value) -> Result<(), PanelError>;

    async fn load(&self, params: &Value) -> Result<(), PanelError>;

    async fn init_mobile(&self, wrapper: &PanelWrapper, utility: &Utility, params: &Value) -> Result<(), PanelError> {
        self.init(wrapper, utility, params).await
    }

    async fn load_mobile(&self, params: &Value) -> Result<(), PanelError> {
        self.load(params).await
    }
}

/// What a bundle's factory receives
#[derive(Debug, Clone)]
pub struct PanelContext {
    pub utility: Utility,
    pub module_name: String,
}

/// Entry point a bundle registers for its module
pub trait PanelFactory: Send + Sync {
    fn create(&self, context: PanelContext) -> Result<Arc<dyn Panel>, PanelError>;
}

impl<F> PanelFactory for F
where
    F: Fn(PanelContext) -> Result<Arc<dyn Panel>, PanelError> + Send + Sync,
{
    fn create(&self, context: PanelContext) -> Result<Arc<dyn Panel>, PanelError> {
        self(context)
    }
}
