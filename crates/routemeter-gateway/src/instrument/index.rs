use std::sync::Arc;

use dashmap::DashMap;

use routemeter_core::{Meter, ResourceMethod, Timer};

/// Resource method -> timer, and resource method -> meter.
///
/// Filled at bind time and never pruned. Concurrent maps, so bindings may
/// race with early traffic.
#[derive(Default)]
pub struct MethodMetricIndex {
    timers: DashMap<ResourceMethod, Arc<Timer>>,
    meters: DashMap<ResourceMethod, Arc<Meter>>,
}

impl MethodMetricIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_timer(&self, method: ResourceMethod, timer: Arc<Timer>) {
        self.timers.insert(method, timer);
    }

    pub fn insert_meter(&self, method: ResourceMethod, meter: Arc<Meter>) {
        self.meters.insert(method, meter);
    }

    pub fn timer(&self, method: &ResourceMethod) -> Option<Arc<Timer>> {
        self.timers.get(method).map(|r| Arc::clone(r.value()))
    }

    pub fn meter(&self, method: &ResourceMethod) -> Option<Arc<Meter>> {
        self.meters.get(method).map(|r| Arc::clone(r.value()))
    }

    pub fn timed_methods(&self) -> Vec<ResourceMethod> {
        self.timers.iter().map(|e| e.key().clone()).collect()
    }

    pub fn metered_methods(&self) -> Vec<ResourceMethod> {
        self.meters.iter().map(|e| e.key().clone()).collect()
    }
}
