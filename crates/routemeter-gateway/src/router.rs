//! Axum router wiring.
//!
//! `ResourceRouter` is the binding surface: each `route` call binds one HTTP
//! method on one path to a resource method, runs every dynamic feature for it,
//! and wraps only that method's endpoint with the resulting filter chain.
//! `build_router` assembles the demo service.

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    handler::Handler,
    http::Method,
    middleware::from_fn_with_state,
    routing::{get, on, MethodFilter},
    Router,
};

use routemeter_core::{ResourceInfo, Result, RouteMeterError};

use crate::app_state::AppState;
use crate::pipeline::{run_chain, DynamicFeature, FeatureContext};
use crate::{ops, services::orders};

pub struct ResourceRouter<S = ()> {
    router: Router<S>,
    features: Vec<Arc<dyn DynamicFeature>>,
    bound: HashSet<(String, Method)>,
}

impl<S> Default for ResourceRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S> ResourceRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            router: Router::new(),
            features: Vec::new(),
            bound: HashSet::new(),
        }
    }

    /// Add a feature consulted for every subsequent binding.
    pub fn feature(mut self, feature: Arc<dyn DynamicFeature>) -> Self {
        self.features.push(feature);
        self
    }

    /// Bind `handler` for `method` at `path` as the given resource method.
    /// Any feature error aborts the binding, as does a second binding of the
    /// same method on the same path.
    pub fn route<H, T>(mut self, path: &str, method: Method, info: ResourceInfo, handler: H) -> Result<Self>
    where
        H: Handler<T, S>,
        T: 'static,
    {
        if !path.starts_with('/') {
            return Err(RouteMeterError::BadConfig(format!("route path must start with '/': {path}")));
        }
        let filter = MethodFilter::try_from(method.clone())
            .map_err(|e| RouteMeterError::BadConfig(format!("cannot route {method} {path}: {e}")))?;
        if self.bound.contains(&(path.to_string(), method.clone())) {
            return Err(RouteMeterError::BadConfig(format!("{method} {path} is already bound")));
        }

        let mut ctx = FeatureContext::new();
        for feature in &self.features {
            feature.configure(&info, &mut ctx).map_err(|e| {
                tracing::warn!(%path, %method, resource_method = %info.method_name(), error = %e, "binding failed");
                e
            })?;
        }

        let resource_method = Arc::new(info.resolve()?.key());
        tracing::debug!(%path, %method, %resource_method, filters = ctx.len(), "route bound");

        // route_layer: the 405 fallback for other methods stays outside the chain.
        let method_router = on(filter, handler);
        let method_router = if ctx.is_empty() {
            method_router
        } else {
            method_router.route_layer(from_fn_with_state(ctx.into_chain(resource_method), run_chain))
        };
        self.router = self.router.route(path, method_router);
        self.bound.insert((path.to_string(), method));
        Ok(self)
    }

    /// Add routes that are not resource methods (health, metrics, ...).
    pub fn merge(mut self, other: Router<S>) -> Self {
        self.router = self.router.merge(other);
        self
    }

    pub fn into_router(self) -> Router<S> {
        self.router
    }
}

/// Demo service: order resource plus ops endpoints.
pub fn build_router(state: AppState) -> Result<Router> {
    let ops_routes = Router::new()
        .route("/healthz", get(ops::healthz))
        .route(&state.cfg().server.metrics_path, get(ops::metrics));

    let place = state.resource_info(orders::RESOURCE, "placeOrder", ["String"])?;
    let list = state.resource_info(orders::RESOURCE, "listOrders", orders::NO_PARAMS)?;
    let lookup = state.resource_info(orders::RESOURCE, "getOrder", ["u64"])?;

    let router = ResourceRouter::<AppState>::new()
        .feature(state.metrics_feature())
        .route("/orders", Method::POST, place, orders::place_order)?
        .route("/orders", Method::GET, list, orders::list_orders)?
        .route("/orders/:id", Method::GET, lookup, orders::get_order)?
        .merge(ops_routes)
        .into_router();

    Ok(router.with_state(state))
}
