//! Error types for tephra-cleanup.
//!
//! The core performs no I/O, so most variants describe rejected input.
//! All fallible functions return `Result<T, CleanupError>` instead of panicking.

use thiserror::Error;

/// Result type alias for clean-up model operations.
pub type CleanupResult<T> = Result<T, CleanupError>;

/// Unified error type for all tephra-cleanup operations.
#[derive(Debug, Error)]
pub enum CleanupError {
    // ===== Input Validation =====
    /// Lower bound of a range exceeds its upper bound.
    #[error("Invalid range for {quantity}: min {min} exceeds max {max}")]
    InvalidRange {
        /// Name of the ranged quantity.
        quantity: String,
        /// Supplied lower bound.
        min: f64,
        /// Supplied upper bound.
        max: f64,
    },

    /// A quantity that must be non-negative was negative.
    #[error("Negative value for {quantity}: {value}")]
    NegativeValue {
        /// Name of the quantity.
        quantity: String,
        /// Supplied value.
        value: f64,
    },

    /// NaN or infinite input.
    #[error("Non-finite value supplied for {location}")]
    NonFiniteValue {
        /// Where the value was supplied.
        location: String,
    },

    /// Monte Carlo run requested with no samples.
    #[error("Sample count must be at least 1")]
    InvalidSampleCount,

    /// Surface selector text did not name a known surface.
    #[error("Unknown surface selector '{0}' (expected 'all', 'roads' or 'roofs')")]
    UnknownSurface(String),

    // ===== Configuration Errors =====
    /// Invalid configuration parameter.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    // ===== I/O Errors =====
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CleanupError {
    /// Create a configuration error with a message.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    /// Create an I/O error with a message (wraps in `std::io::Error`).
    #[must_use]
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io(std::io::Error::other(message.into()))
    }

    /// Create an invalid range error.
    #[must_use]
    pub fn invalid_range(quantity: impl Into<String>, min: f64, max: f64) -> Self {
        Self::InvalidRange {
            quantity: quantity.into(),
            min,
            max,
        }
    }

    /// Check that `value` is finite and non-negative.
    ///
    /// # Errors
    ///
    /// Returns `NonFiniteValue` or `NegativeValue`.
    pub fn check_non_negative(quantity: &str, value: f64) -> CleanupResult<f64> {
        if !value.is_finite() {
            return Err(Self::NonFiniteValue {
                location: quantity.to_string(),
            });
        }
        if value < 0.0 {
            return Err(Self::NegativeValue {
                quantity: quantity.to_string(),
                value,
            });
        }
        Ok(value)
    }

    /// Check if this error was caused by rejected numeric input.
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidRange { .. }
                | Self::NegativeValue { .. }
                | Self::NonFiniteValue { .. }
                | Self::InvalidSampleCount
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_error_detection() {
        assert!(CleanupError::invalid_range("thickness", 10.0, 1.0).is_input_error());
        assert!(CleanupError::InvalidSampleCount.is_input_error());
        assert!(CleanupError::NonFiniteValue {
            location: "road_area".to_string()
        }
        .is_input_error());

        assert!(!CleanupError::config("bad").is_input_error());
        assert!(!CleanupError::UnknownSurface("walls".to_string()).is_input_error());
    }

    #[test]
    fn test_invalid_range_display() {
        let err = CleanupError::invalid_range("thickness (mm)", 30.0, 20.0);
        let msg = err.to_string();
        assert!(msg.contains("thickness (mm)"));
        assert!(msg.contains("30"));
        assert!(msg.contains("20"));
    }

    #[test]
    fn test_check_non_negative() {
        assert_eq!(CleanupError::check_non_negative("x", 0.0).ok(), Some(0.0));
        assert_eq!(CleanupError::check_non_negative("x", 5.5).ok(), Some(5.5));

        let neg = CleanupError::check_non_negative("road_area", -1.0);
        assert!(matches!(neg, Err(CleanupError::NegativeValue { .. })));

        let nan = CleanupError::check_non_negative("road_area", f64::NAN);
        assert!(matches!(nan, Err(CleanupError::NonFiniteValue { .. })));

        let inf = CleanupError::check_non_negative("road_area", f64::INFINITY);
        assert!(matches!(inf, Err(CleanupError::NonFiniteValue { .. })));
    }

    #[test]
    fn test_config_and_io_display() {
        let config = CleanupError::config("exposure 'OSM' needs a road measurement").to_string();
        assert!(config.starts_with("Configuration error:"));
        assert!(config.contains("'OSM'"));

        let io = CleanupError::io("Results/temp is read-only").to_string();
        assert!(io.starts_with("I/O error:"));
        assert!(io.ends_with("read-only"));
    }

    #[test]
    fn test_unknown_surface_display() {
        let err = CleanupError::UnknownSurface("walls".to_string());
        assert!(err.to_string().contains("'walls'"));
    }
}
