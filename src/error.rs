//! Error types for tailor configuration

use std::fmt;

/// Errors that can occur while building a tailor from configuration
///
/// Sanitization itself never fails; only the configuration surface
/// (blocklist patterns, policy files) can be rejected.
#[derive(Debug)]
pub enum TailorError {
    /// A blocklist word could not be compiled into a matcher
    InvalidPattern(String),
    /// Policy or blocklist configuration could not be loaded
    InvalidConfig(String),
}

impl fmt::Display for TailorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TailorError::InvalidPattern(msg) => write!(f, "Invalid blocklist pattern: {}", msg),
            TailorError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for TailorError {}

impl From<serde_json::Error> for TailorError {
    fn from(err: serde_json::Error) -> Self {
        TailorError::InvalidConfig(err.to_string())
    }
}
