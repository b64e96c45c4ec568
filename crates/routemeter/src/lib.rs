//! Top-level facade crate for routemeter.
//!
//! Re-exports the core model/registry and the gateway library so users can depend on a single crate.

pub mod core {
    pub use routemeter_core::*;
}

pub mod gateway {
    pub use routemeter_gateway::*;
}
