//! # PersonaBar Event System
//!
//! Asynchronous publish/subscribe bus shared by the kernel components.
//! Handlers are registered by event name or by concrete event type and run in
//! registration order; a handler returning [`EventResult::Stop`] ends
//! propagation. Panel state changes, feature installation and skin phases are
//! published here as [`SystemEvent`]s.
pub mod dispatcher;
pub mod error;
pub mod manager;
pub mod types;

use std::any::Any;
use std::fmt;

use async_trait::async_trait;

/// Type for event handler identifiers
pub type EventId = u64;

/// Event priority level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum EventPriority {
    Low = 0,
    #[default]
    Normal = 1,
    High = 2,
    Critical = 3,
}

/// Result of event processing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Continue propagation to the next handler
    Continue,
    /// Stop propagation
    Stop,
}

/// Core event trait
pub trait Event: Any + fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    fn priority(&self) -> EventPriority {
        EventPriority::Normal
    }

    fn is_cancelable(&self) -> bool {
        false
    }

    fn clone_event(&self) -> Box<dyn Event>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Asynchronous event handler trait
#[async_trait]
pub trait AsyncEventHandler: Send + Sync {
    async fn handle(&self, event: &dyn Event) -> EventResult;
}

pub use dispatcher::{EventDispatcher, SharedEventDispatcher, create_dispatcher};
pub use manager::{BoxedEvent, DefaultEventManager, EventManager};
pub use types::{PanelStateKind, SystemEvent};

#[cfg(test)]
mod tests;
