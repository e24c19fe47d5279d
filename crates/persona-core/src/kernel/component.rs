use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;

use crate::kernel::error::Result;

/// Lifecycle shared by every kernel component (storage, events, menu, shell...)
#[async_trait]
pub trait KernelComponent: Any + Send + Sync + Debug {
    fn name(&self) -> &'static str;
    async fn initialize(&self) -> Result<()>;
    async fn start(&self) -> Result<()>;
    async fn stop(&self) -> Result<()>;
}

/// Component instances keyed by their concrete type
#[derive(Default, Debug)]
pub struct DependencyRegistry {
    instances: HashMap<TypeId, Arc<dyn KernelComponent>>,
}

impl DependencyRegistry {
    pub fn new() -> Self {
        Self {
            instances: HashMap::new(),
        }
    }

    /// Register a component instance under the `TypeId` of `V`.
    /// Re-registering a type replaces the previous instance.
    pub fn register_instance<V>(&mut self, instance: Arc<V>)
    where
        V: KernelComponent + 'static,
    {
        self.instances.insert(TypeId::of::<V>(), instance);
    }

    pub fn get_component_by_id(&self, type_id: &TypeId) -> Option<Arc<dyn KernelComponent>> {
        self.instances.get(type_id).cloned()
    }

    /// Get a component by concrete type, downcasting the stored trait object.
    pub fn get_concrete<T: KernelComponent + 'static>(&self) -> Option<Arc<T>> {
        self.instances.get(&TypeId::of::<T>()).and_then(|component| {
            let any: Arc<dyn Any + Send + Sync> = component.clone();
            Arc::downcast::<T>(any).ok()
        })
    }

    pub fn get_all_components(&self) -> Vec<Arc<dyn KernelComponent>> {
        self.instances.values().cloned().collect()
    }

    /// Names of all registered components, sorted for stable output.
    pub fn component_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.instances.values().map(|c| c.name()).collect();
        names.sort_unstable();
        names
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }
}
