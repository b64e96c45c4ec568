//! In-process metric registry.
//!
//! Timers and meters are stored as atomics behind `Arc` handles and keyed by
//! dotted names in a `DashMap`. Handles are cheap to clone and safe to record
//! into from any number of request tasks. `render` emits Prometheus text.

pub mod clock;
pub mod meter;
pub mod registry;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use meter::Meter;
pub use registry::MetricRegistry;
pub use timer::{Timer, TimerContext, TimerSnapshot};
