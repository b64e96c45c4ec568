use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use routemeter_core::ResourceMethod;

use super::filter::{ContainerFilter, RequestContext};

/// The resource method a request was routed to; inserted into request
/// extensions for handlers.
#[derive(Debug, Clone)]
pub struct MatchedResource(pub Arc<ResourceMethod>);

/// Filters bound to one resource method.
#[derive(Clone)]
pub struct FilterChain {
    method: Arc<ResourceMethod>,
    filters: Arc<[Arc<dyn ContainerFilter>]>,
}

impl FilterChain {
    pub fn new(method: Arc<ResourceMethod>, filters: Vec<Arc<dyn ContainerFilter>>) -> Self {
        Self {
            method,
            filters: filters.into(),
        }
    }

    pub fn method(&self) -> &Arc<ResourceMethod> {
        &self.method
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Request hooks in order.
    pub fn before(&self, ctx: &mut RequestContext) {
        for f in self.filters.iter() {
            f.filter_request(ctx);
        }
    }

    /// Response hooks in reverse order.
    pub fn after(&self, ctx: &mut RequestContext, response: &mut Response) {
        for f in self.filters.iter().rev() {
            f.filter_response(ctx, response);
        }
    }
}

/// Middleware running a chain around the handler.
pub async fn run_chain(State(chain): State<FilterChain>, mut req: Request, next: Next) -> Response {
    let mut ctx = RequestContext::new(Arc::clone(&chain.method));
    chain.before(&mut ctx);

    req.extensions_mut().insert(MatchedResource(Arc::clone(&chain.method)));
    let mut response = next.run(req).await;

    chain.after(&mut ctx, &mut response);
    response
}
