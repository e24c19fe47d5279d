use std::fmt;
use std::sync::Mutex;

use crate::service::client::ServiceClient;
use crate::service::error::ServiceError;
use crate::service::request::ServiceCall;
use crate::service::response::ApiResponse;

type Reducer<S, A> = Box<dyn Fn(&S, &A) -> S + Send + Sync>;
type Subscriber<S, A> = Box<dyn Fn(&S, &A) + Send + Sync>;

/// Panel state container: a reducer folds typed actions into the state and
/// subscribers observe every transition.
pub struct Store<S, A> {
    state: Mutex<S>,
    reducer: Reducer<S, A>,
    subscribers: Mutex<Vec<Subscriber<S, A>>>,
}

impl<S: fmt::Debug, A> fmt::Debug for Store<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.state.lock() {
            Ok(state) => f.debug_struct("Store").field("state", &*state).finish(),
            Err(_) => f.debug_struct("Store").field("state", &"<poisoned>").finish(),
        }
    }
}

impl<S: Clone, A> Store<S, A> {
    pub fn new(initial: S, reducer: impl Fn(&S, &A) -> S + Send + Sync + 'static) -> Self {
        Self {
            state: Mutex::new(initial),
            reducer: Box::new(reducer),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    pub fn state(&self) -> S {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Apply `action` and return the new state
    pub fn dispatch(&self, action: A) -> S {
        let next = {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            let next = (self.reducer)(&state, &action);
            *state = next.clone();
            next
        };
        let subscribers = self.subscribers.lock().unwrap_or_else(|e| e.into_inner());
        for subscriber in subscribers.iter() {
            subscriber(&next, &action);
        }
        next
    }

    pub fn subscribe(&self, subscriber: impl Fn(&S, &A) + Send + Sync + 'static) {
        self.subscribers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Box::new(subscriber));
    }
}

/// Issue `call` and, on success, dispatch the action built from the response
pub async fn dispatch_call<S, A, F>(
    client: &ServiceClient,
    store: &Store<S, A>,
    call: ServiceCall,
    to_action: F,
) -> Result<ApiResponse, ServiceError>
where
    S: Clone,
    F: FnOnce(&ApiResponse) -> A,
{
    let response = client.call(call).await?;
    store.dispatch(to_action(&response));
    Ok(response)
}

/// Like [`dispatch_call`], also dispatching a failure action on error
pub async fn dispatch_call_or<S, A, F, G>(
    client: &ServiceClient,
    store: &Store<S, A>,
    call: ServiceCall,
    to_action: F,
    to_failure: G,
) -> Result<ApiResponse, ServiceError>
where
    S: Clone,
    F: FnOnce(&ApiResponse) -> A,
    G: FnOnce(&ServiceError) -> A,
{
    match client.call(call).await {
        Ok(response) => {
            store.dispatch(to_action(&response));
            Ok(response)
        }
        Err(e) => {
            store.dispatch(to_failure(&e));
            Err(e)
        }
    }
}
