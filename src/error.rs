//! Error types for perfsci
//!
//! The scoring calculators never fail: insufficient or degenerate input
//! produces a placeholder insight instead. Errors only arise when a log
//! candidate is rejected, or when snapshots and settings are read from disk.

use rust_decimal::Decimal;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for all perfsci operations
#[derive(Debug, Error)]
pub enum PerfSciError {
    /// A training log candidate was rejected
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed snapshot JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Input text that could not be parsed
    #[error("Could not parse {field}: {reason}")]
    Parse { field: String, reason: String },

    /// Snapshot file missing
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Rejection reasons for a training log candidate
///
/// The `Display` output is the message shown next to the entry form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Duration must be between 1 and 480 minutes.")]
    Duration(Decimal),

    #[error("Intensity must be between 1 and 10.")]
    Intensity(Decimal),

    #[error("Sleep hours must be between 0 and 24.")]
    SleepHours(Decimal),

    #[error("Resting Heart Rate seems unrealistic (30-200 bpm).")]
    RestingHeartRate(Decimal),

    #[error("{0} is required.")]
    MissingField(&'static str),
}

impl ValidationError {
    /// Name of the offending field
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::Duration(_) => "duration",
            ValidationError::Intensity(_) => "intensity",
            ValidationError::SleepHours(_) => "sleepHours",
            ValidationError::RestingHeartRate(_) => "restingHeartRate",
            ValidationError::MissingField(field) => field,
        }
    }
}

/// Result type alias for perfsci operations
pub type Result<T> = std::result::Result<T, PerfSciError>;

impl PerfSciError {
    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            PerfSciError::Validation(_) => ErrorSeverity::Warning,
            PerfSciError::Parse { .. } => ErrorSeverity::Warning,
            PerfSciError::FileNotFound { .. } => ErrorSeverity::Warning,
            PerfSciError::Configuration(_) => ErrorSeverity::Error,
            PerfSciError::Json(_) => ErrorSeverity::Error,
            PerfSciError::Io(_) => ErrorSeverity::Error,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            PerfSciError::Validation(reason) => reason.to_string(),
            PerfSciError::FileNotFound { path } => {
                format!("Could not find training log snapshot: {}", path.display())
            }
            PerfSciError::Json(err) => {
                format!("Training log snapshot is malformed: {}", err)
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Error that prevents the operation
    Error,
    /// Rejected input, the caller can correct and retry
    Warning,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_severity() {
        let err = PerfSciError::from(ValidationError::Intensity(dec!(11)));
        assert_eq!(err.severity(), ErrorSeverity::Warning);
        assert_eq!(err.severity().to_tracing_level(), tracing::Level::WARN);

        let err = PerfSciError::Configuration("bad weights".to_string());
        assert_eq!(err.severity(), ErrorSeverity::Error);
    }

    #[test]
    fn test_user_messages() {
        let err = PerfSciError::from(ValidationError::Duration(dec!(500)));
        assert_eq!(
            err.user_message(),
            "Duration must be between 1 and 480 minutes."
        );

        let err = PerfSciError::FileNotFound {
            path: PathBuf::from("logs.json"),
        };
        assert!(err.user_message().contains("Could not find"));
    }

    #[test]
    fn test_validation_field_names() {
        assert_eq!(ValidationError::SleepHours(dec!(25)).field(), "sleepHours");
        assert_eq!(ValidationError::MissingField("intensity").field(), "intensity");
    }
}
