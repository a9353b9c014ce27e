//! Error types for Timple.
//!
//! This module provides a unified error handling approach using `thiserror`.

use thiserror::Error;

/// Result type alias for Timple operations.
pub type Result<T> = std::result::Result<T, TimpleError>;

/// Errors that can occur while locating or formatting duration ticks.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TimpleError {
    /// A numeric input was infinite or NaN.
    #[error("{what} must be finite, got {value}")]
    NonFinite { what: &'static str, value: f64 },

    /// A finite value too large to resolve to microseconds.
    #[error("{what} is too large to label at microsecond resolution, got {value}")]
    OutOfRange { what: &'static str, value: f64 },

    /// Unknown time unit name.
    #[error("Unknown time unit: {name} (expected one of days, hours, minutes, seconds, microseconds)")]
    UnknownUnit { name: String },

    /// Malformed duration format template.
    #[error("Invalid format string '{template}' for timedelta: {reason}")]
    InvalidFormat { template: String, reason: String },

    /// Configuration values that cannot work together.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Tick interval that is zero, negative or not finite.
    #[error("Invalid tick interval: {0}")]
    InvalidInterval(String),

    /// A label could not be parsed back into a duration.
    #[error("Cannot parse '{label}' as a duration: {reason}")]
    Parse { label: String, reason: String },
}

impl TimpleError {
    /// Create a NonFinite error.
    pub fn non_finite(what: &'static str, value: f64) -> Self {
        Self::NonFinite { what, value }
    }

    /// Create an OutOfRange error.
    pub fn out_of_range(what: &'static str, value: f64) -> Self {
        Self::OutOfRange { what, value }
    }

    /// Create an UnknownUnit error.
    pub fn unknown_unit(name: impl Into<String>) -> Self {
        Self::UnknownUnit { name: name.into() }
    }

    /// Create an InvalidFormat error.
    pub fn invalid_format(template: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            template: template.into(),
            reason: reason.into(),
        }
    }

    /// Create a Parse error.
    pub fn parse(label: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            label: label.into(),
            reason: reason.into(),
        }
    }
}

/// Reject infinite and NaN inputs with a descriptive error.
pub(crate) fn ensure_finite(what: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(TimpleError::non_finite(what, value))
    }
}
