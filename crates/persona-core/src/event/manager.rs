use std::fmt::Debug;

use async_trait::async_trait;

use crate::event::dispatcher::{self, NamedHandlerFn, SharedEventDispatcher};
use crate::event::{Event, EventId, EventResult, SystemEvent};
use crate::kernel::component::KernelComponent;
use crate::kernel::error::Result;

pub type BoxedEvent = Box<dyn Event>;

/// Event manager component interface
#[async_trait]
pub trait EventManager: KernelComponent + Send + Sync {
    async fn register_handler(&self, event_name: &'static str, handler: NamedHandlerFn) -> EventId;

    async fn unregister_handler(&self, id: EventId) -> bool;

    async fn dispatch(&self, event: &dyn Event) -> EventResult;

    async fn queue_event(&self, event: BoxedEvent);

    async fn process_queue(&self) -> usize;
}

#[derive(Clone, Debug)]
pub struct DefaultEventManager {
    name: &'static str,
    dispatcher: SharedEventDispatcher,
}

impl DefaultEventManager {
    pub fn new() -> Self {
        Self {
            name: "DefaultEventManager",
            dispatcher: dispatcher::create_dispatcher(),
        }
    }

    /// Handle to the shared dispatcher, for components that publish events
    pub fn dispatcher(&self) -> &SharedEventDispatcher {
        &self.dispatcher
    }

    pub async fn register_sync_handler<F>(&self, event_name: &'static str, handler: F) -> EventId
    where
        F: Fn(&dyn Event) -> EventResult + Send + Sync + 'static,
    {
        self.dispatcher
            .register_handler(event_name, dispatcher::sync_event_handler(handler))
            .await
    }

    pub async fn register_sync_type_handler<E, F>(&self, handler: F) -> EventId
    where
        E: Event + 'static,
        F: Fn(&E) -> EventResult + Send + Sync + 'static,
    {
        self.dispatcher
            .register_type_handler::<E>(dispatcher::sync_typed_handler(handler))
            .await
    }
}

#[async_trait]
impl KernelComponent for DefaultEventManager {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn initialize(&self) -> Result<()> {
        Ok(())
    }

    async fn start(&self) -> Result<()> {
        self.dispatch(&SystemEvent::ApplicationStart).await;
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        self.dispatch(&SystemEvent::ApplicationShutdown).await;
        let drained = self.process_queue().await;
        if drained > 0 {
            log::debug!("Drained {} queued event(s) on shutdown", drained);
        }
        Ok(())
    }
}

#[async_trait]
impl EventManager for DefaultEventManager {
    async fn register_handler(&self, event_name: &'static str, handler: NamedHandlerFn) -> EventId {
        self.dispatcher.register_handler(event_name, handler).await
    }

    async fn unregister_handler(&self, id: EventId) -> bool {
        self.dispatcher.unregister_handler(id).await
    }

    async fn dispatch(&self, event: &dyn Event) -> EventResult {
        self.dispatcher.dispatch(event).await
    }

    async fn queue_event(&self, event: BoxedEvent) {
        self.dispatcher.queue_event(event).await
    }

    async fn process_queue(&self) -> usize {
        self.dispatcher.process_queue().await
    }
}

impl Default for DefaultEventManager {
    fn default() -> Self {
        Self::new()
    }
}
