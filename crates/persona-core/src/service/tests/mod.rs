mod http_tests;

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::service::error::ServiceError;
use crate::service::request::ServiceCall;
use crate::service::transport::ServiceTransport;

/// Transport replaying canned results and recording every call
#[derive(Debug, Default)]
pub(super) struct FakeTransport {
    responses: Mutex<VecDeque<Result<Value, ServiceError>>>,
    pub calls: Mutex<Vec<ServiceCall>>,
}

impl FakeTransport {
    pub fn with(responses: Vec<Result<Value, ServiceError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
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
