use std::sync::Arc;

use crate::event::PanelStateKind;
use crate::shell::error::PanelError;
use crate::shell::panel::Panel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelMode {
    Desktop,
    Mobile,
}

impl PanelMode {
    pub fn from_mobile(mobile: bool) -> Self {
        if mobile { PanelMode::Mobile } else { PanelMode::Desktop }
    }
}

/// Which panel entry point a selection ended up calling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    Init,
    Load,
    /// Nothing was called because an earlier step failed
    None,
}

/// Result of one selection, also handed to the ready callback
#[derive(Debug, Clone, PartialEq)]
pub struct SelectOutcome {
    pub identifier: String,
    pub state: PanelStateKind,
    pub action: PanelAction,
    /// Whether the panel was still the active one when the call finished
    pub active: bool,
    pub error: Option<PanelError>,
}

/// Snapshot of a panel for inspection
#[derive(Debug, Clone, PartialEq)]
pub struct PanelStatus {
    pub identifier: String,
    pub state: PanelStateKind,
    pub mode: Option<PanelMode>,
    pub init_calls: usize,
    pub load_calls: usize,
    pub last_error: Option<PanelError>,
}

/// Per-panel bookkeeping, guarded by the panel's gate
pub(crate) struct PanelSlot {
    pub identifier: String,
    pub state: PanelStateKind,
    pub handle: Option<Arc<dyn Panel>>,
    pub mode: Option<PanelMode>,
    pub initialized: bool,
    pub init_calls: usize,
    pub load_calls: usize,
    pub last_error: Option<PanelError>,
}

impl PanelSlot {
    pub fn new(identifier: &str) -> Self {
        Self {
            identifier: identifier.to_string(),
            state: PanelStateKind::Unloaded,
            handle: None,
            mode: None,
            initialized: false,
            init_calls: 0,
            load_calls: 0,
            last_error: None,
        }
    }

    pub fn status(&self) -> PanelStatus {
        PanelStatus {
            identifier: self.identifier.clone(),
            state: self.state,
            mode: self.mode,
            init_calls: self.init_calls,
            load_calls: self.load_calls,
            last_error: self.last_error.clone(),
        }
    }
}
