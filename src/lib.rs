//! Performance-science scoring for athlete training logs
//!
//! Turns a snapshot of training logs into display-ready insights: the
//! Acute:Chronic Workload Ratio, a composite recovery readiness score, and
//! the account calibration window. Every calculation is a pure function of
//! its inputs, including the `now` timestamp.

pub mod acwr;
pub mod badges;
pub mod calibration;
pub mod config;
pub mod error;
pub mod insights;
pub mod logging;
pub mod models;
pub mod momentum;
pub mod progress;
pub mod recovery;
pub mod snapshot;
pub mod streak;
pub mod validation;

use chrono::{DateTime, Utc};

// Re-export commonly used types for convenience
pub use models::*;
pub use acwr::{AcwrCalculator, AcwrConfig, AcwrZone};
pub use recovery::{RecoveryCalculator, RecoveryConfig, LOAD_NORMALIZATION_DIVISOR, RHR_PENALTY_MULTIPLIER};
pub use calibration::CalibrationConfig;
pub use momentum::{InjuryRisk, Momentum, MomentumReport};
pub use validation::TrainingInput;
pub use insights::{InsightEngine, InsightReport};
pub use config::AppConfig;
pub use error::{PerfSciError, Result, ValidationError};
pub use logging::{LogConfig, LogFormat, LogLevel};

/// ACWR insight with default settings; `logs` may be in any order
pub fn calculate_acwr(logs: &[TrainingLog], now: DateTime<Utc>) -> ScientificInsight {
    AcwrCalculator::new().calculate(logs, now)
}

/// Recovery readiness insight with default settings; `logs` may be in any order
pub fn calculate_recovery_score(logs: &[TrainingLog]) -> ScientificInsight {
    RecoveryCalculator::new().calculate(logs)
}

/// Calibration window state for an account created at `joined_at`
pub fn get_calibration_status(joined_at: DateTime<Utc>, now: DateTime<Utc>) -> CalibrationStatus {
    CalibrationConfig::default().status(joined_at, now)
}

/// First range violation among the provided fields, if any
pub fn validate_training_input(
    input: &TrainingInput,
) -> std::result::Result<(), ValidationError> {
    validation::validate_training_input(input)
}
