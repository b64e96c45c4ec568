use std::sync::Arc;

use routemeter_core::{ResourceInfo, ResourceMethod, Result};

use super::chain::FilterChain;
use super::filter::ContainerFilter;

/// Called by the router once per binding, before any traffic is served.
pub trait DynamicFeature: Send + Sync {
    fn configure(&self, info: &ResourceInfo, ctx: &mut FeatureContext) -> Result<()>;
}

/// Filters collected for one binding, in registration order.
#[derive(Default)]
pub struct FeatureContext {
    filters: Vec<Arc<dyn ContainerFilter>>,
}

impl FeatureContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, filter: Arc<dyn ContainerFilter>) {
        self.filters.push(filter);
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn into_chain(self, method: Arc<ResourceMethod>) -> FilterChain {
        FilterChain::new(method, self.filters)
    }
}
