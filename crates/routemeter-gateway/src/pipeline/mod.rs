//! Per-route request pipeline.
//!
//! A binding collects filters from every dynamic feature into a
//! `FilterChain`, which runs around the route's handler as axum middleware.
//! Filters are shared between bindings and concurrent requests; anything a
//! filter needs to carry from the request hook to the response hook lives in
//! the per-request `RequestContext`.

pub mod chain;
pub mod feature;
pub mod filter;

pub use chain::{run_chain, FilterChain, MatchedResource};
pub use feature::{DynamicFeature, FeatureContext};
pub use filter::{ContainerFilter, RequestContext};
