//! routemeter gateway library entry.
//!
//! This crate binds resource methods onto axum routes through dynamic
//! features, and provides the metrics feature that times and meters
//! annotated methods. It is consumed by the demo binary (`main.rs`) and by
//! integration tests.

pub mod app_state;
pub mod config;
pub mod instrument;
pub mod ops;
pub mod pipeline;
pub mod router;
pub mod services;
