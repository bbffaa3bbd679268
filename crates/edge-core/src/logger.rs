//! Local logger descriptors for the deployed group.

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Which component's output the logger captures.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LoggerTarget {
    /// Logs emitted by user functions.
    UserFunction,
    /// Logs emitted by the edge runtime itself.
    System,
}

impl LoggerTarget {
    pub fn parse(s: &str) -> Result<Self, ConfigurationError> {
        match s {
            "user_function" | "user" => Ok(LoggerTarget::UserFunction),
            "system" => Ok(LoggerTarget::System),
            other => Err(ConfigurationError::UnknownLoggerTarget(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl LogLevel {
    pub fn parse(s: &str) -> Result<Self, ConfigurationError> {
        match s.to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            "FATAL" => Ok(LogLevel::Fatal),
            other => Err(ConfigurationError::UnknownLogLevel(other.to_string())),
        }
    }
}

/// A local file logger with a bounded storage quota.
///
/// Loggers with distinct targets are independent resources; a group may
/// carry one per target with identical level and quota.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggerDescriptor {
    pub target: LoggerTarget,
    pub level: LogLevel,
    /// Local storage quota in MiB.
    pub space_mb: u64,
}

impl LoggerDescriptor {
    pub fn new(target: LoggerTarget, level: LogLevel, space_mb: u64) -> Self {
        Self { target, level, space_mb }
    }
}

impl Default for LoggerDescriptor {
    fn default() -> Self {
        Self {
            target: LoggerTarget::UserFunction,
            level: LogLevel::Debug,
            space_mb: 32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_target() {
        assert_eq!(LoggerTarget::parse("system").unwrap(), LoggerTarget::System);
        assert_eq!(LoggerTarget::parse("user").unwrap(), LoggerTarget::UserFunction);
        assert!(LoggerTarget::parse("cloudwatch").is_err());
    }

    #[test]
    fn test_parse_level_case_insensitive() {
        assert_eq!(LogLevel::parse("debug").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::parse("WARN").unwrap(), LogLevel::Warn);
        assert!(LogLevel::parse("trace").is_err());
    }
}
