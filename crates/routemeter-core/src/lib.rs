//! routemeter core: resource model, metric naming, and the metric registry.
//!
//! This crate carries no HTTP or runtime dependencies. It describes resource
//! types and their methods explicitly (no reflection), computes metric names
//! for methods that ask to be timed or metered, and provides the registry the
//! gateway records into.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. All fallible paths
//! surface as `RouteMeterError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod catalog;
pub mod error;
pub mod metrics;
pub mod naming;
pub mod resource;

pub use catalog::ResourceCatalog;
/// Shared result type.
pub use error::{ErrorCode, Result, RouteMeterError};
pub use metrics::{Meter, MetricRegistry, Timer, TimerContext};
pub use resource::{
    MethodDecl, MetricAnnotation, ResolvedMethod, ResourceInfo, ResourceMethod, ResourceType,
};
