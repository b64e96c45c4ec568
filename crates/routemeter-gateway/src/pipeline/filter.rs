use std::sync::Arc;

use axum::http::Extensions;
use axum::response::Response;

use routemeter_core::ResourceMethod;

/// Request state for one in-flight request. Created by the chain before the
/// first request hook and dropped after the last response hook.
pub struct RequestContext {
    method: Arc<ResourceMethod>,
    properties: Extensions,
}

impl RequestContext {
    pub fn new(method: Arc<ResourceMethod>) -> Self {
        Self {
            method,
            properties: Extensions::new(),
        }
    }

    /// The resource method matched for this request.
    pub fn resource_method(&self) -> &ResourceMethod {
        &self.method
    }

    pub fn properties(&self) -> &Extensions {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut Extensions {
        &mut self.properties
    }
}

/// Synchronous hooks around a matched request.
pub trait ContainerFilter: Send + Sync {
    fn filter_request(&self, _ctx: &mut RequestContext) {}

    fn filter_response(&self, _ctx: &mut RequestContext, _response: &mut Response) {}
}
