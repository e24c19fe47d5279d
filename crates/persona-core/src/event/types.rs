use std::any::Any;
use std::fmt;

use crate::event::{Event, EventPriority};

/// Panel lifecycle state as published on the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelStateKind {
    Unloaded,
    Loading,
    Initialized,
    Active,
    Hidden,
    Failed,
}

impl fmt::Display for PanelStateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PanelStateKind::Unloaded => "unloaded",
            PanelStateKind::Loading => "loading",
            PanelStateKind::Initialized => "initialized",
            PanelStateKind::Active => "active",
            PanelStateKind::Hidden => "hidden",
            PanelStateKind::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Events raised by the kernel components
#[derive(Debug, Clone, PartialEq)]
pub enum SystemEvent {
    ApplicationStart,
    ApplicationShutdown,
    /// A feature's records were written and its controllers registered
    FeatureInstalled { feature: String },
    FeatureUninstalled { feature: String },
    /// The menu registry was re-read from the data service
    MenuReloaded { item_count: usize },
    PanelStateChanged { identifier: String, state: PanelStateKind },
    PanelFailed { identifier: String, reason: String },
    /// A skin lifecycle phase completed for a page
    SkinPhase { page_id: i32, phase: String },
    ConfigChange { key: String, value: String },
}

impl Event for SystemEvent {
    fn name(&self) -> &'static str {
        match self {
            SystemEvent::ApplicationStart => "application.start",
            SystemEvent::ApplicationShutdown => "application.shutdown",
            SystemEvent::FeatureInstalled { .. } => "feature.installed",
            SystemEvent::FeatureUninstalled { .. } => "feature.uninstalled",
            SystemEvent::MenuReloaded { .. } => "menu.reloaded",
            SystemEvent::PanelStateChanged { .. } => "panel.state",
            SystemEvent::PanelFailed { .. } => "panel.failed",
            SystemEvent::SkinPhase { .. } => "skin.phase",
            SystemEvent::ConfigChange { .. } => "config.change",
        }
    }

    fn priority(&self) -> EventPriority {
        match self {
            SystemEvent::ApplicationStart | SystemEvent::ApplicationShutdown => EventPriority::Critical,
            SystemEvent::PanelFailed { .. } => EventPriority::High,
            _ => EventPriority::Normal,
        }
    }

    fn is_cancelable(&self) -> bool {
        matches!(self, SystemEvent::ApplicationShutdown)
    }

    fn clone_event(&self) -> Box<dyn Event> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
#[derive(Debug, Clone)]
pub struct TestEvent {
    pub label: String,
}

#[cfg(test)]
impl TestEvent {
    pub fn new(label: &str) -> Self {
        TestEvent { label: label.to_string() }
    }
}

#[cfg(test)]
impl Event for TestEvent {
    fn name(&self) -> &'static str {
        "test.event"
    }

    fn clone_event(&self) -> Box<dyn Event> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
