use std::any::TypeId;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::event::{AsyncEventHandler, Event, EventId, EventResult};

/// Owned future returned by event handler closures
pub type BoxFuture<'a> = Pin<Box<dyn Future<Output = EventResult> + Send + 'a>>;

/// Handler closure for events matched by name
pub type NamedHandlerFn = Box<dyn for<'a> Fn(&'a dyn Event) -> BoxFuture<'a> + Send + Sync>;

/// Handler closure for events matched by concrete type
pub type TypedHandlerFn<E> = Box<dyn for<'a> Fn(&'a E) -> BoxFuture<'a> + Send + Sync>;

type HandlerList = Vec<(EventId, Arc<dyn AsyncEventHandler>)>;

/// Handler table and pending event queue
pub struct EventDispatcher {
    handlers: HashMap<&'static str, HandlerList>,
    type_handlers: HashMap<TypeId, HandlerList>,
    next_handler_id: EventId,
    event_queue: VecDeque<Box<dyn Event>>,
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name_handler_count: usize = self.handlers.values().map(|v| v.len()).sum();
        let type_handler_count: usize = self.type_handlers.values().map(|v| v.len()).sum();
        f.debug_struct("EventDispatcher")
            .field("name_handlers_count", &name_handler_count)
            .field("type_handlers_count", &type_handler_count)
            .field("next_handler_id", &self.next_handler_id)
            .field("event_queue_size", &self.event_queue.len())
            .finish()
    }
}

struct SimpleHandler {
    handler: NamedHandlerFn,
}

#[async_trait]
impl AsyncEventHandler for SimpleHandler {
    async fn handle(&self, event: &dyn Event) -> EventResult {
        (self.handler)(event).await
    }
}

struct TypedEventHandler<E: Event + 'static> {
    handler: TypedHandlerFn<E>,
}

#[async_trait]
impl<E: Event + 'static> AsyncEventHandler for TypedEventHandler<E> {
    async fn handle(&self, event: &dyn Event) -> EventResult {
        match event.as_any().downcast_ref::<E>() {
            Some(typed) => (self.handler)(typed).await,
            None => EventResult::Continue,
        }
    }
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            type_handlers: HashMap::new(),
            next_handler_id: 1,
            event_queue: VecDeque::new(),
        }
    }

    fn next_id(&mut self) -> EventId {
        let id = self.next_handler_id;
        self.next_handler_id += 1;
        id
    }

    pub fn register_handler(&mut self, event_name: &'static str, handler: NamedHandlerFn) -> EventId {
        let id = self.next_id();
        self.handlers
            .entry(event_name)
            .or_default()
            .push((id, Arc::new(SimpleHandler { handler })));
        id
    }

    pub fn register_type_handler<E: Event + 'static>(&mut self, handler: TypedHandlerFn<E>) -> EventId {
        let id = self.next_id();
        self.type_handlers
            .entry(TypeId::of::<E>())
            .or_default()
            .push((id, Arc::new(TypedEventHandler { handler })));
        id
    }

    pub fn unregister_handler(&mut self, id: EventId) -> bool {
        let mut found = false;
        for handlers in self.handlers.values_mut().chain(self.type_handlers.values_mut()) {
            let len_before = handlers.len();
            handlers.retain(|(h_id, _)| *h_id != id);
            found |= handlers.len() < len_before;
        }
        found
    }

    /// Handlers for `event`: by-name handlers first, then by-type handlers.
    fn handlers_for(&self, event: &dyn Event) -> Vec<Arc<dyn AsyncEventHandler>> {
        let by_name = self.handlers.get(event.name()).into_iter().flatten();
        let by_type = self
            .type_handlers
            .get(&event.as_any().type_id())
            .into_iter()
            .flatten();
        by_name.chain(by_type).map(|(_, handler)| handler.clone()).collect()
    }

    pub fn queue_event(&mut self, event: Box<dyn Event>) {
        self.event_queue.push_back(event);
    }

    pub fn take_queue(&mut self) -> Vec<Box<dyn Event>> {
        self.event_queue.drain(..).collect()
    }

    pub fn queue_size(&self) -> usize {
        self.event_queue.len()
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

async fn run_handlers(handlers: Vec<Arc<dyn AsyncEventHandler>>, event: &dyn Event) -> EventResult {
    for handler in handlers {
        if handler.handle(event).await == EventResult::Stop {
            return EventResult::Stop;
        }
    }
    EventResult::Continue
}

/// Cloneable handle to a dispatcher shared between components.
///
/// The handler table lock is released before handlers run, so a handler may
/// itself dispatch or register handlers.
#[derive(Clone, Default)]
pub struct SharedEventDispatcher {
    dispatcher: Arc<Mutex<EventDispatcher>>,
}

impl fmt::Debug for SharedEventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedEventDispatcher").finish_non_exhaustive()
    }
}

impl SharedEventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn dispatch(&self, event: &dyn Event) -> EventResult {
        let handlers = self.dispatcher.lock().await.handlers_for(event);
        log::trace!("Dispatching '{}' to {} handler(s)", event.name(), handlers.len());
        run_handlers(handlers, event).await
    }

    pub async fn queue_event(&self, event: Box<dyn Event>) {
        self.dispatcher.lock().await.queue_event(event);
    }

    /// Dispatch every queued event in FIFO order, returning how many ran.
    pub async fn process_queue(&self) -> usize {
        let queued = self.dispatcher.lock().await.take_queue();
        let count = queued.len();
        for event in queued {
            self.dispatch(&*event).await;
        }
        count
    }

    pub async fn queue_size(&self) -> usize {
        self.dispatcher.lock().await.queue_size()
    }

    pub async fn register_handler(&self, event_name: &'static str, handler: NamedHandlerFn) -> EventId {
        self.dispatcher.lock().await.register_handler(event_name, handler)
    }

    pub async fn register_type_handler<E: Event + 'static>(&self, handler: TypedHandlerFn<E>) -> EventId {
        self.dispatcher.lock().await.register_type_handler::<E>(handler)
    }

    pub async fn unregister_handler(&self, id: EventId) -> bool {
        self.dispatcher.lock().await.unregister_handler(id)
    }
}

pub fn create_dispatcher() -> SharedEventDispatcher {
    SharedEventDispatcher::new()
}

/// Wrap a synchronous closure as a named handler
pub fn sync_event_handler<F>(f: F) -> NamedHandlerFn
where
    F: Fn(&dyn Event) -> EventResult + Send + Sync + 'static,
{
    Box::new(move |event| {
        let result = f(event);
        Box::pin(async move { result })
    })
}

/// Wrap a synchronous closure as a typed handler
pub fn sync_typed_handler<E, F>(f: F) -> TypedHandlerFn<E>
where
    E: Event + 'static,
    F: Fn(&E) -> EventResult + Send + Sync + 'static,
{
    Box::new(move |event| {
        let result = f(event);
        Box::pin(async move { result })
    })
}
