//! Shared error type across routemeter crates.

use thiserror::Error;

/// Stable error categories, usable in logs and assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// A route could not be bound (unresolvable method, metric kind clash).
    Binding,
    /// Invalid or unsupported configuration.
    Config,
    /// I/O or server failure.
    Internal,
}

impl ErrorCode {
    /// String representation used in log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Binding => "BINDING",
            ErrorCode::Config => "CONFIG",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, RouteMeterError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum RouteMeterError {
    #[error("no such method: {resource}.{method}")]
    NoSuchMethod { resource: String, method: String },
    #[error("metric {name} is already registered as a {existing}, not a {requested}")]
    MetricKindMismatch {
        name: String,
        existing: &'static str,
        requested: &'static str,
    },
    #[error("unknown resource type: {0}")]
    UnknownResource(String),
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl RouteMeterError {
    /// Map an error to its stable category.
    pub fn code(&self) -> ErrorCode {
        match self {
            RouteMeterError::NoSuchMethod { .. }
            | RouteMeterError::MetricKindMismatch { .. }
            | RouteMeterError::UnknownResource(_) => ErrorCode::Binding,
            RouteMeterError::BadConfig(_) | RouteMeterError::UnsupportedVersion => ErrorCode::Config,
            RouteMeterError::Internal(_) => ErrorCode::Internal,
        }
    }

    /// True for errors that must abort route binding at startup.
    pub fn is_fatal_binding(&self) -> bool {
        self.code() == ErrorCode::Binding
    }
}
