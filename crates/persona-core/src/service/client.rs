use std::fmt;
use std::sync::Arc;

use crate::service::error::ServiceError;
use crate::service::request::{Method, ServiceCall};
use crate::service::response::ApiResponse;
use crate::service::transport::ServiceTransport;
use crate::service::validation::FormValidator;
use crate::ui_bridge::{UnifiedUiManager, messages};

/// Stateless facade over a [`ServiceTransport`].
///
/// Each call is independent, so one client may be shared by every panel.
/// Failures are reported once through the optional notifier as an error
/// toast; validation failures never leave the client.
#[derive(Clone)]
pub struct ServiceClient {
    transport: Arc<dyn ServiceTransport>,
    module_root: String,
    notifier: Option<Arc<UnifiedUiManager>>,
}

impl fmt::Debug for ServiceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceClient")
            .field("transport", &self.transport)
            .field("module_root", &self.module_root)
            .finish()
    }
}

impl ServiceClient {
    pub fn new(transport: Arc<dyn ServiceTransport>, module_root: impl Into<String>) -> Self {
        Self {
            transport,
            module_root: module_root.into(),
            notifier: None,
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<UnifiedUiManager>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn module_root(&self) -> &str {
        &self.module_root
    }

    /// Same transport, different module root
    pub fn for_module_root(&self, module_root: impl Into<String>) -> Self {
        Self {
            module_root: module_root.into(),
            ..self.clone()
        }
    }

    pub fn request(&self, method: Method, controller: &str, action: &str) -> ServiceCall {
        ServiceCall::new(self.module_root.clone(), controller, action, method)
    }

    pub fn get(&self, controller: &str, action: &str) -> ServiceCall {
        self.request(Method::Get, controller, action)
    }

    pub fn post(&self, controller: &str, action: &str) -> ServiceCall {
        self.request(Method::Post, controller, action)
    }

    pub async fn call(&self, call: ServiceCall) -> Result<ApiResponse, ServiceError> {
        let result = self.execute(&call).await;
        if let Err(e) = &result {
            self.report(&call, e);
        }
        result
    }

    async fn execute(&self, call: &ServiceCall) -> Result<ApiResponse, ServiceError> {
        call.validate()?;
        let route = call.route();
        let body = self.transport.send(call).await?;
        let response = ApiResponse::from_value(&route, body)?;
        if !response.success {
            return Err(ServiceError::Rejected {
                route,
                message: response.message.unwrap_or_default(),
            });
        }
        Ok(response)
    }

    /// Run `call` and fire exactly one of the two callbacks
    pub async fn call_with<S, E>(&self, call: ServiceCall, on_success: S, on_error: E)
    where
        S: FnOnce(ApiResponse),
        E: FnOnce(ServiceError),
    {
        match self.call(call).await {
            Ok(response) => on_success(response),
            Err(e) => on_error(e),
        }
    }

    /// Validate `call.params` first; an invalid form never reaches the server
    pub async fn submit(&self, call: ServiceCall, validator: &FormValidator) -> Result<ApiResponse, ServiceError> {
        if let Err(errors) = validator.validate(&call.params) {
            let messages: Vec<String> = errors.iter().map(|e| e.message.clone()).collect();
            if let Some(notifier) = &self.notifier {
                notifier.notify(messages::validation_failed(&call.route(), &messages));
            }
            return Err(ServiceError::Validation(errors));
        }
        self.call(call).await
    }

    fn report(&self, call: &ServiceCall, error: &ServiceError) {
        log::warn!("Service call {} {} failed: {}", call.method, call.route(), error);
        if let Some(notifier) = &self.notifier {
            notifier.notify(messages::service_failed(&call.route(), error));
        }
    }
}
