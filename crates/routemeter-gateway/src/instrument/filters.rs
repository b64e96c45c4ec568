use std::sync::Arc;

use axum::response::Response;

use routemeter_core::TimerContext;

use super::index::MethodMetricIndex;
use crate::pipeline::{ContainerFilter, RequestContext};

/// Measurement started by the request hook, owned by the request.
#[derive(Clone)]
struct ActiveTimer(TimerContext);

/// Times timed methods: starts on the request hook, stops on the response hook.
///
/// One instance serves every binding and every concurrent request; the
/// running measurement is kept in the request's context, never here.
pub struct TimerFilter {
    index: Arc<MethodMetricIndex>,
}

impl TimerFilter {
    pub fn new(index: Arc<MethodMetricIndex>) -> Self {
        Self { index }
    }
}

impl ContainerFilter for TimerFilter {
    fn filter_request(&self, ctx: &mut RequestContext) {
        if let Some(timer) = self.index.timer(ctx.resource_method()) {
            ctx.properties_mut().insert(ActiveTimer(timer.time()));
        }
    }

    fn filter_response(&self, ctx: &mut RequestContext, _response: &mut Response) {
        if let Some(ActiveTimer(running)) = ctx.properties_mut().remove::<ActiveTimer>() {
            let elapsed = running.stop();
            tracing::trace!(method = %ctx.resource_method(), ?elapsed, "timed request");
        }
    }
}

/// Marks metered methods once per request.
pub struct MeterFilter {
    index: Arc<MethodMetricIndex>,
}

impl MeterFilter {
    pub fn new(index: Arc<MethodMetricIndex>) -> Self {
        Self { index }
    }
}

impl ContainerFilter for MeterFilter {
    fn filter_request(&self, ctx: &mut RequestContext) {
        if let Some(meter) = self.index.meter(ctx.resource_method()) {
            meter.mark();
        }
    }
}
