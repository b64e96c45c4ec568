//! Built-in demo resources.

pub mod orders;
