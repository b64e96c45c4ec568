use std::sync::Arc;

use routemeter_core::naming::annotation_name;
use routemeter_core::{MetricRegistry, ResolvedMethod, ResourceInfo, Result};

use super::filters::{MeterFilter, TimerFilter};
use super::index::MethodMetricIndex;
use crate::pipeline::{DynamicFeature, FeatureContext};

/// Registrar for timed and metered resource methods.
pub struct MetricsFeature {
    registry: Arc<MetricRegistry>,
    index: Arc<MethodMetricIndex>,
    timer_filter: Arc<TimerFilter>,
    meter_filter: Arc<MeterFilter>,
}

impl MetricsFeature {
    pub fn new(registry: Arc<MetricRegistry>) -> Self {
        let index = Arc::new(MethodMetricIndex::new());
        Self {
            registry,
            timer_filter: Arc::new(TimerFilter::new(Arc::clone(&index))),
            meter_filter: Arc::new(MeterFilter::new(Arc::clone(&index))),
            index,
        }
    }

    pub fn registry(&self) -> &Arc<MetricRegistry> {
        &self.registry
    }

    pub fn index(&self) -> &Arc<MethodMetricIndex> {
        &self.index
    }

    fn register_timed(&self, method: &ResolvedMethod<'_>) -> Result<()> {
        let Some(annotation) = &method.decl.timed else { return Ok(()) };
        let name = annotation_name(annotation, method);
        let timer = self.registry.timer(&name)?;
        tracing::debug!(method = %method.key(), metric = %name, "timed method registered");
        self.index.insert_timer(method.key(), timer);
        Ok(())
    }

    fn register_metered(&self, method: &ResolvedMethod<'_>) -> Result<()> {
        let Some(annotation) = &method.decl.metered else { return Ok(()) };
        let name = annotation_name(annotation, method);
        let meter = self.registry.meter(&name)?;
        tracing::debug!(method = %method.key(), metric = %name, "metered method registered");
        self.index.insert_meter(method.key(), meter);
        Ok(())
    }
}

impl DynamicFeature for MetricsFeature {
    fn configure(&self, info: &ResourceInfo, ctx: &mut FeatureContext) -> Result<()> {
        let method = info.resolve()?;
        self.register_timed(&method)?;
        self.register_metered(&method)?;

        ctx.register(self.timer_filter.clone());
        ctx.register(self.meter_filter.clone());
        Ok(())
    }
}
