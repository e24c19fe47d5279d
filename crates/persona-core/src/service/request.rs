use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::service::error::ServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => f.write_str("GET"),
            Method::Post => f.write_str("POST"),
        }
    }
}

/// One request to `{module_root}/{controller}/{action}`.
///
/// Reads carry `params` in the query string, writes as a JSON object body.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceCall {
    pub module_root: String,
    pub controller: String,
    pub action: String,
    pub method: Method,
    pub params: Map<String, Value>,
}

fn query_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl ServiceCall {
    pub fn new(
        module_root: impl Into<String>,
        controller: impl Into<String>,
        action: impl Into<String>,
        method: Method,
    ) -> Self {
        Self {
            module_root: module_root.into(),
            controller: controller.into(),
            action: action.into(),
            method,
            params: Map::new(),
        }
    }

    pub fn get(module_root: impl Into<String>, controller: impl Into<String>, action: impl Into<String>) -> Self {
        Self::new(module_root, controller, action, Method::Get)
    }

    pub fn post(module_root: impl Into<String>, controller: impl Into<String>, action: impl Into<String>) -> Self {
        Self::new(module_root, controller, action, Method::Post)
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Merge the fields of a serializable payload into `params`
    pub fn with_payload<T: Serialize>(mut self, payload: &T) -> Result<Self, ServiceError> {
        match serde_json::to_value(payload) {
            Ok(Value::Object(fields)) => {
                self.params.extend(fields);
                Ok(self)
            }
            Ok(other) => Err(ServiceError::InvalidRequest(format!(
                "payload for {} must serialize to an object, got {}",
                self.route(),
                other
            ))),
            Err(e) => Err(ServiceError::InvalidRequest(e.to_string())),
        }
    }

    pub fn route(&self) -> String {
        format!(
            "{}/{}/{}",
            self.module_root.trim_matches('/'),
            self.controller.trim_matches('/'),
            self.action.trim_matches('/')
        )
    }

    /// Percent-encoded `k=v&...`; empty for writes
    pub fn query_string(&self) -> String {
        if self.method != Method::Get {
            return String::new();
        }
        self.params
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(key),
                    urlencoding::encode(&query_value(value))
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    pub fn url(&self, base_url: &str) -> String {
        let mut url = format!("{}/{}", base_url.trim_end_matches('/'), self.route());
        let query = self.query_string();
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }
        url
    }

    pub fn body(&self) -> Option<Value> {
        match self.method {
            Method::Get => None,
            Method::Post => Some(Value::Object(self.params.clone())),
        }
    }

    pub fn validate(&self) -> Result<(), ServiceError> {
        for (name, part) in [
            ("module root", &self.module_root),
            ("controller", &self.controller),
            ("action", &self.action),
        ] {
            if part.trim_matches('/').trim().is_empty() {
                return Err(ServiceError::InvalidRequest(format!("{} must not be empty", name)));
            }
        }
        Ok(())
    }
}
