use std::collections::HashMap;
use std::sync::Arc;

use crate::feature::error::FeatureSystemError;
use crate::feature::traits::Feature;
use crate::feature::version::ApiVersion;

/// Activated features keyed by name, in activation order
pub struct FeatureRegistry {
    features: HashMap<String, Arc<dyn Feature>>,
    order: Vec<String>,
    api_version: ApiVersion,
}

impl FeatureRegistry {
    pub fn new(api_version: ApiVersion) -> Self {
        Self {
            features: HashMap::new(),
            order: Vec::new(),
            api_version,
        }
    }

    pub fn api_version(&self) -> &ApiVersion {
        &self.api_version
    }

    /// Check that `feature` supports this kernel's API version
    pub fn check_compatibility(&self, feature: &dyn Feature) -> Result<(), FeatureSystemError> {
        let ranges = feature.compatible_api_versions();
        if ranges.iter().any(|range| range.includes_api(&self.api_version)) {
            return Ok(());
        }
        Err(FeatureSystemError::IncompatibleApiVersion {
            feature: feature.name().to_string(),
            api_version: self.api_version.to_string(),
            supported: ranges
                .iter()
                .map(|range| range.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        })
    }

    pub fn register(&mut self, feature: Arc<dyn Feature>) -> Result<(), FeatureSystemError> {
        let name = feature.name().to_string();
        if self.features.contains_key(&name) {
            return Err(FeatureSystemError::DuplicateFeature(name));
        }
        self.check_compatibility(feature.as_ref())?;
        self.features.insert(name.clone(), feature);
        self.order.push(name);
        Ok(())
    }

    pub fn unregister(&mut self, name: &str) -> Result<Arc<dyn Feature>, FeatureSystemError> {
        let feature = self
            .features
            .remove(name)
            .ok_or_else(|| FeatureSystemError::FeatureNotFound(name.to_string()))?;
        self.order.retain(|n| n != name);
        Ok(feature)
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Feature>> {
        self.features.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.features.contains_key(name)
    }

    /// Features in activation order
    pub fn features(&self) -> Vec<Arc<dyn Feature>> {
        self.order
            .iter()
            .filter_map(|name| self.features.get(name).cloned())
            .collect()
    }

    pub fn names(&self) -> Vec<String> {
        self.order.clone()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
