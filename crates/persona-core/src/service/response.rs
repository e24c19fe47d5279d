use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::service::error::ServiceError;

const ENVELOPE_KEYS: [&str; 5] = ["Success", "Message", "Results", "Data", "TotalResults"];

fn default_success() -> bool {
    true
}

/// Response envelope shared by the PersonaBar controllers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiResponse {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub results: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_results: Option<u64>,
}

impl Default for ApiResponse {
    fn default() -> Self {
        Self {
            success: true,
            message: None,
            results: Value::Null,
            total_results: None,
        }
    }
}

impl ApiResponse {
    pub fn ok(results: Value) -> Self {
        Self {
            results,
            ..Self::default()
        }
    }

    /// Interpret a response body. Objects carrying envelope keys are read
    /// as an envelope; anything else becomes the `Results` payload.
    /// `Results` wins over `Data` when both are present.
    pub fn from_value(route: &str, mut body: Value) -> Result<Self, ServiceError> {
        let is_envelope = body
            .as_object()
            .is_some_and(|fields| ENVELOPE_KEYS.iter().any(|key| fields.contains_key(*key)));
        if !is_envelope {
            return Ok(Self::ok(body));
        }
        if let Some(fields) = body.as_object_mut() {
            if let Some(data) = fields.remove("Data") {
                fields.entry("Results").or_insert(data);
            }
        }
        serde_json::from_value(body).map_err(|e| ServiceError::Decode {
            route: route.to_string(),
            message: e.to_string(),
        })
    }

    pub fn results_as<T: DeserializeOwned>(&self) -> Result<T, ServiceError> {
        serde_json::from_value(self.results.clone()).map_err(|e| ServiceError::Decode {
            route: String::new(),
            message: e.to_string(),
        })
    }

    /// `Results.<field>`, or `Null` when absent
    pub fn field(&self, field: &str) -> &Value {
        self.results.get(field).unwrap_or(&Value::Null)
    }
}
