use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::service::error::ServiceError;
use crate::service::request::{Method, ServiceCall};
use crate::storage::PersonaBarSettings;

/// Carries a [`ServiceCall`] to the server and returns the decoded body
#[async_trait]
pub trait ServiceTransport: Send + Sync + fmt::Debug {
    async fn send(&self, call: &ServiceCall) -> Result<Value, ServiceError>;
}

/// `reqwest` transport against `{base_url}/{route}`
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport").field("base_url", &self.base_url).finish()
    }
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value.get("Message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.chars().take(200).collect())
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("personabar/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ServiceError::InvalidRequest(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn from_settings(settings: &PersonaBarSettings) -> Result<Self, ServiceError> {
        Self::new(
            settings.service_base_url.clone(),
            Duration::from_secs(settings.service_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ServiceTransport for HttpTransport {
    async fn send(&self, call: &ServiceCall) -> Result<Value, ServiceError> {
        let route = call.route();
        let url = call.url(&self.base_url);
        log::debug!("{} {}", call.method, url);

        let request = match (call.method, call.body()) {
            (Method::Post, Some(body)) => self.client.post(&url).json(&body),
            (Method::Post, None) => self.client.post(&url),
            (Method::Get, _) => self.client.get(&url),
        };
        let response = request
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| ServiceError::Network {
                route: route.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| ServiceError::Network {
            route: route.clone(),
            message: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(ServiceError::Http {
                route,
                status: status.as_u16(),
                message: error_message(&body),
            });
        }
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| ServiceError::Decode {
            route,
            message: e.to_string(),
        })
    }
}
