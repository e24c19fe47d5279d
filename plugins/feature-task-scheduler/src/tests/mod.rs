mod state_tests;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use persona_core::service::{ServiceCall, ServiceClient, ServiceError, ServiceTransport, Store};
use persona_core::ui_bridge::UnifiedUiManager;

use crate::actions::TaskScheduler;
use crate::state::{TaskState, reduce};

/// Replays canned bodies and records every call
#[derive(Debug, Default)]
pub(crate) struct FakeTransport {
    responses: Mutex<VecDeque<Result<Value, ServiceError>>>,
    pub calls: Mutex<Vec<ServiceCall>>,
}

impl FakeTransport {
    pub fn with(responses: Vec<Result<Value, ServiceError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn routes(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(ServiceCall::route).collect()
    }
}

#[async_trait]
impl ServiceTransport for FakeTransport {
    async fn send(&self, call: &ServiceCall) -> Result<Value, ServiceError> {
        self.calls.lock().unwrap().push(call.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(Value::Null))
    }
}

pub(crate) fn scheduler(transport: Arc<FakeTransport>) -> (TaskScheduler, Arc<UnifiedUiManager>) {
    let ui = Arc::new(UnifiedUiManager::new());
    let client = ServiceClient::new(transport, "PersonaBar").with_notifier(ui.clone());
    let store = Arc::new(Store::new(TaskState::default(), reduce));
    (TaskScheduler::new(client, store), ui)
}
