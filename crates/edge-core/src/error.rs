//! Error types for descriptor construction and group composition.

use thiserror::Error;

/// Result type alias for descriptor-building operations.
pub type CoreResult<T> = Result<T, ConfigurationError>;

/// A descriptor field value is out of range or malformed.
///
/// Raised locally where the accepted range is known ahead of provisioning;
/// anything the Provisioning Backend alone can judge is deferred to it.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigurationError {
    #[error("memory size {0} MiB out of range (16..=3008 MiB)")]
    MemoryOutOfRange(u64),

    #[error("timeout {0} s out of range (1..=900 s)")]
    TimeoutOutOfRange(u64),

    #[error("empty handler for function '{0}'")]
    EmptyHandler(String),

    #[error("unknown logger target: {0}")]
    UnknownLoggerTarget(String),

    #[error("unknown log level: {0}")]
    UnknownLogLevel(String),
}

/// A composed group violates a cross-reference invariant.
#[derive(Debug, Error, PartialEq)]
pub enum CompositionError {
    #[error("routing entry references function '{0}' which is not in the group's function set")]
    UnknownFunction(String),

    #[error("group '{0}' has no functions")]
    NoFunctions(String),
}
