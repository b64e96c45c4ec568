//! Timed/metered resource methods.
//!
//! `MetricsFeature` is the dynamic feature that reads a method's metric
//! annotations at bind time, resolves timers and meters from the registry
//! into a `MethodMetricIndex`, and attaches the shared `TimerFilter` and
//! `MeterFilter` to every binding.

pub mod feature;
pub mod filters;
pub mod index;

pub use feature::MetricsFeature;
pub use filters::{MeterFilter, TimerFilter};
pub use index::MethodMetricIndex;
