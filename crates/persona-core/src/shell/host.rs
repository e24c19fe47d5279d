use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use futures::FutureExt;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::event::{PanelStateKind, SharedEventDispatcher, SystemEvent};
use crate::kernel::component::KernelComponent;
use crate::kernel::error::Result as KernelResult;
use crate::menu::manager::{MenuManager, PanelDescriptor};
use crate::menu::model::UserInfo;
use crate::shell::bundle::BundleSource;
use crate::shell::error::PanelError;
use crate::shell::module_registry::ModuleRegistry;
use crate::shell::panel::{PanelContext, PanelWrapper};
use crate::shell::state::{PanelAction, PanelMode, PanelSlot, PanelStatus, SelectOutcome};
use crate::shell::utility::Utility;
use crate::ui_bridge::messages;

/// Invoked once per selection with its outcome
pub type ReadyCallback = Box<dyn FnOnce(&SelectOutcome) + Send>;

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Run a panel entry point, turning a panic into [`PanelError::Panicked`]
async fn guarded<F>(identifier: &str, call: F) -> Result<(), PanelError>
where
    F: Future<Output = Result<(), PanelError>>,
{
    match AssertUnwindSafe(call).catch_unwind().await {
        Ok(result) => result,
        Err(payload) => Err(PanelError::Panicked {
            identifier: identifier.to_string(),
            message: panic_message(payload.as_ref()),
        }),
    }
}

fn init_error(identifier: &str, error: PanelError) -> PanelError {
    match error {
        PanelError::InitFailed { .. } | PanelError::Panicked { .. } => error,
        other => PanelError::InitFailed {
            identifier: identifier.to_string(),
            message: other.to_string(),
        },
    }
}

fn load_error(identifier: &str, error: PanelError) -> PanelError {
    match error {
        PanelError::LoadFailed { .. } | PanelError::Panicked { .. } => error,
        other => PanelError::LoadFailed {
            identifier: identifier.to_string(),
            message: other.to_string(),
        },
    }
}

/// Loads feature panels on selection and switches between them.
///
/// Each panel has its own gate so calls into one panel never overlap, while
/// different panels proceed independently. A selection that finishes after
/// the user moved on leaves its panel `Hidden` without touching the active
/// panel. Failures stay with the failing panel: it ends `Failed`, a
/// notification is raised and the next selection retries.
pub struct HostShell {
    name: &'static str,
    menu: Arc<MenuManager>,
    modules: ModuleRegistry,
    utility: Utility,
    events: Option<SharedEventDispatcher>,
    mobile: AtomicBool,
    panels: StdMutex<HashMap<String, Arc<Mutex<PanelSlot>>>>,
    active: StdMutex<Option<String>>,
}

impl fmt::Debug for HostShell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostShell")
            .field("modules", &self.modules)
            .field("active", &self.active_panel())
            .finish()
    }
}

impl HostShell {
    pub fn new(menu: Arc<MenuManager>, source: Arc<dyn BundleSource>, utility: Utility) -> Self {
        let mobile = utility.is_mobile();
        Self {
            name: "HostShell",
            menu,
            modules: ModuleRegistry::new(source),
            utility,
            events: None,
            mobile: AtomicBool::new(mobile),
            panels: StdMutex::new(HashMap::new()),
            active: StdMutex::new(None),
        }
    }

    pub fn with_events(mut self, events: SharedEventDispatcher) -> Self {
        self.events = Some(events);
        self
    }

    pub fn utility(&self) -> &Utility {
        &self.utility
    }

    /// Rendering mode for panels initialized from now on
    pub fn set_mobile(&self, mobile: bool) {
        self.mobile.store(mobile, Ordering::SeqCst);
    }

    pub fn is_mobile(&self) -> bool {
        self.mobile.load(Ordering::SeqCst)
    }

    pub fn active_panel(&self) -> Option<String> {
        self.active.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.modules.fetch_count()
    }

    /// Current state of a panel; waits for an in-flight call to finish
    pub async fn status(&self, identifier: &str) -> Option<PanelStatus> {
        let gate = self.existing_gate(identifier)?;
        let mut slot = gate.lock().await;
        self.settle_visibility(&mut slot).await;
        Some(slot.status())
    }

    pub async fn select(&self, identifier: &str, user: &UserInfo, params: Value) -> Result<SelectOutcome, PanelError> {
        self.select_with(identifier, user, params, None).await
    }

    /// Select a panel and invoke `ready` once the selection settled,
    /// whether it succeeded or not.
    pub async fn select_with(
        &self,
        identifier: &str,
        user: &UserInfo,
        params: Value,
        ready: Option<ReadyCallback>,
    ) -> Result<SelectOutcome, PanelError> {
        let outcome = self.run_selection(identifier, user, &params).await;
        if let Some(ready) = ready {
            ready(&outcome);
        }
        match &outcome.error {
            Some(error) => Err(error.clone()),
            None => Ok(outcome),
        }
    }

    /// Hide the active panel, leaving no panel selected
    pub async fn deselect(&self) {
        let previous = self.active.lock().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(previous) = previous {
            self.hide(&previous).await;
        }
    }

    async fn run_selection(&self, identifier: &str, user: &UserInfo, params: &Value) -> SelectOutcome {
        let descriptor = match self.menu.descriptor_for(identifier, user).await {
            Ok(descriptor) => descriptor,
            Err(e) => {
                let error = PanelError::Unavailable {
                    identifier: identifier.to_string(),
                    reason: e.to_string(),
                };
                self.report_failure(identifier, &error).await;
                return SelectOutcome {
                    identifier: identifier.to_string(),
                    state: PanelStateKind::Unloaded,
                    action: PanelAction::None,
                    active: false,
                    error: Some(error),
                };
            }
        };

        let previous = self
            .active
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .replace(identifier.to_string())
            .filter(|previous| previous != identifier);
        if let Some(previous) = &previous {
            self.hide(previous).await;
        }

        let gate = self.gate(identifier);
        let mut slot = gate.lock().await;
        let result = self.drive(&mut slot, &descriptor, params).await;
        let active = self.is_active(identifier);

        let (action, error) = match result {
            Ok(action) => {
                slot.last_error = None;
                let state = if active {
                    PanelStateKind::Active
                } else {
                    PanelStateKind::Hidden
                };
                self.set_state(&mut slot, state).await;
                (action, None)
            }
            Err(error) => {
                slot.last_error = Some(error.clone());
                self.set_state(&mut slot, PanelStateKind::Failed).await;
                self.report_failure(identifier, &error).await;
                (PanelAction::None, Some(error))
            }
        };

        let outcome = SelectOutcome {
            identifier: identifier.to_string(),
            state: slot.state,
            action,
            active,
            error,
        };
        drop(slot);

        // The first hide may have found the previous gate busy
        if let Some(previous) = &previous {
            self.hide(previous).await;
        }
        outcome
    }

    async fn drive(
        &self,
        slot: &mut PanelSlot,
        descriptor: &PanelDescriptor,
        params: &Value,
    ) -> Result<PanelAction, PanelError> {
        let identifier = descriptor.identifier.as_str();

        if slot.handle.is_none() {
            self.set_state(slot, PanelStateKind::Loading).await;
            let factory = self.modules.load(&descriptor.path).await?;
            let context = PanelContext {
                utility: self.utility.clone(),
                module_name: descriptor.module_name.clone(),
            };
            let created = std::panic::catch_unwind(AssertUnwindSafe(|| factory.create(context)))
                .unwrap_or_else(|payload| {
                    Err(PanelError::Panicked {
                        identifier: identifier.to_string(),
                        message: panic_message(payload.as_ref()),
                    })
                });
            let handle = created.map_err(|e| match e {
                PanelError::FactoryFailed { .. } | PanelError::Panicked { .. } => e,
                other => PanelError::FactoryFailed {
                    module_name: descriptor.module_name.clone(),
                    message: other.to_string(),
                },
            })?;
            slot.handle = Some(handle);
            self.set_state(slot, PanelStateKind::Initialized).await;
        }

        let handle = match &slot.handle {
            Some(handle) => handle.clone(),
            None => return Err(PanelError::BundleNotFound(descriptor.path.clone())),
        };

        if !slot.initialized {
            let mode = *slot.mode.get_or_insert(PanelMode::from_mobile(self.is_mobile()));
            let wrapper = PanelWrapper::from_descriptor(descriptor, mode == PanelMode::Mobile);
            slot.init_calls += 1;
            let call = async {
                match mode {
                    PanelMode::Desktop => handle.init(&wrapper, &self.utility, params).await,
                    PanelMode::Mobile => handle.init_mobile(&wrapper, &self.utility, params).await,
                }
            };
            guarded(identifier, call)
                .await
                .map_err(|e| init_error(identifier, e))?;
            slot.initialized = true;
            log::debug!("Panel {} initialized ({:?})", identifier, mode);
            Ok(PanelAction::Init)
        } else {
            let mode = slot.mode.unwrap_or(PanelMode::Desktop);
            slot.load_calls += 1;
            let call = async {
                match mode {
                    PanelMode::Desktop => handle.load(params).await,
                    PanelMode::Mobile => handle.load_mobile(params).await,
                }
            };
            guarded(identifier, call)
                .await
                .map_err(|e| load_error(identifier, e))?;
            Ok(PanelAction::Load)
        }
    }

    fn gate(&self, identifier: &str) -> Arc<Mutex<PanelSlot>> {
        self.panels
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entry(identifier.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(PanelSlot::new(identifier))))
            .clone()
    }

    pub(crate) fn existing_gate(&self, identifier: &str) -> Option<Arc<Mutex<PanelSlot>>> {
        self.panels
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(identifier)
            .cloned()
    }

    fn is_active(&self, identifier: &str) -> bool {
        self.active
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_deref()
            == Some(identifier)
    }

    /// Hide a panel if its gate is free. Otherwise whoever holds the gate
    /// settles the state when it is next taken.
    async fn hide(&self, identifier: &str) {
        let Some(gate) = self.existing_gate(identifier) else {
            return;
        };
        if let Ok(mut slot) = gate.try_lock() {
            self.settle_visibility(&mut slot).await;
        }
    }

    /// An `Active` panel that is no longer the selected one becomes `Hidden`
    async fn settle_visibility(&self, slot: &mut PanelSlot) {
        if slot.state == PanelStateKind::Active && !self.is_active(&slot.identifier) {
            self.set_state(slot, PanelStateKind::Hidden).await;
        }
    }

    async fn set_state(&self, slot: &mut PanelSlot, state: PanelStateKind) {
        if slot.state == state {
            return;
        }
        log::debug!("Panel {}: {} -> {}", slot.identifier, slot.state, state);
        slot.state = state;
        if let Some(events) = &self.events {
            events
                .dispatch(&SystemEvent::PanelStateChanged {
                    identifier: slot.identifier.clone(),
                    state,
                })
                .await;
        }
    }

    async fn report_failure(&self, identifier: &str, error: &PanelError) {
        log::warn!("Panel {} failed: {}", identifier, error);
        if let Some(events) = &self.events {
            events
                .dispatch(&SystemEvent::PanelFailed {
                    identifier: identifier.to_string(),
                    reason: error.to_string(),
                })
                .await;
        }
        self.utility.notifier().notify(messages::panel_failed(identifier, error));
    }
}

#[async_trait]
impl KernelComponent for HostShell {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn initialize(&self) -> KernelResult<()> {
        Ok(())
    }

    async fn start(&self) -> KernelResult<()> {
        Ok(())
    }

    async fn stop(&self) -> KernelResult<()> {
        self.deselect().await;
        Ok(())
    }
}
