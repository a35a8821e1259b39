//! Recovery Readiness score (0-100)
//!
//! A weighted composite of three sub-scores, each on a 0-100 scale:
//!
//! - **Sleep (40%)**: hours slept before the latest session against an
//!   8-hour target. Missing sleep counts as meeting the target.
//! - **Resting heart rate (30%)**: deviation of the latest RHR from the mean
//!   of the last seven recorded readings. Only elevation (a fatigue signal)
//!   is penalised.
//! - **Recent load (30%)**: mean session load of the latest three sessions,
//!   inverted against a fixed normalization divisor.
//!
//! Logs are sorted newest-first internally, so callers may pass them in any
//! order.

use crate::error::{PerfSciError, Result};
use crate::models::{format_fixed, InsightStatus, ScientificInsight, TrainingLog};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const RECOVERY_LABEL: &str = "Recovery Readiness";

/// Divisor mapping mean recent load onto load-score points. Tunable; not
/// physiologically derived.
pub const LOAD_NORMALIZATION_DIVISOR: Decimal = dec!(10);

/// Score points lost per percent of RHR elevation above baseline. Tunable;
/// not physiologically derived.
pub const RHR_PENALTY_MULTIPLIER: Decimal = dec!(5);

/// Recovery score weights, defaults and thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryConfig {
    /// Minimum number of logs before a score is reported
    pub min_logs: usize,

    /// Sleep hours that earn the full sleep score
    pub sleep_target_hours: Decimal,

    /// Baseline RHR used when no reading is recorded
    pub default_resting_hr: Decimal,

    /// Number of recent RHR readings forming the baseline
    pub rhr_baseline_logs: usize,

    /// Number of recent sessions averaged for the load score
    pub recent_load_logs: usize,

    pub load_normalization: Decimal,

    pub rhr_penalty_multiplier: Decimal,

    pub sleep_weight: Decimal,
    pub rhr_weight: Decimal,
    pub load_weight: Decimal,

    /// Scores below this are `danger`
    pub danger_below: Decimal,

    /// Scores at or above this are `optimal`
    pub optimal_from: Decimal,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        RecoveryConfig {
            min_logs: 7,
            sleep_target_hours: dec!(8),
            default_resting_hr: dec!(60),
            rhr_baseline_logs: 7,
            recent_load_logs: 3,
            load_normalization: LOAD_NORMALIZATION_DIVISOR,
            rhr_penalty_multiplier: RHR_PENALTY_MULTIPLIER,
            sleep_weight: dec!(0.4),
            rhr_weight: dec!(0.3),
            load_weight: dec!(0.3),
            danger_below: dec!(50),
            optimal_from: dec!(75),
        }
    }
}

impl RecoveryConfig {
    /// Reject divisors and weights the calculator cannot score with
    pub fn validate(&self) -> Result<()> {
        if self.sleep_target_hours <= Decimal::ZERO {
            return Err(PerfSciError::Configuration(
                "Sleep target must be positive".to_string(),
            ));
        }
        if self.load_normalization <= Decimal::ZERO {
            return Err(PerfSciError::Configuration(
                "Load normalization divisor must be positive".to_string(),
            ));
        }
        if self.sleep_weight + self.rhr_weight + self.load_weight != Decimal::ONE {
            return Err(PerfSciError::Configuration(
                "Recovery weights must sum to 1".to_string(),
            ));
        }
        if self.danger_below > self.optimal_from {
            return Err(PerfSciError::Configuration(
                "Recovery thresholds must be ascending".to_string(),
            ));
        }
        Ok(())
    }
}

/// Sub-scores and intermediates behind a recovery score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryBreakdown {
    pub sleep_hours: Decimal,
    pub sleep_score: Decimal,

    /// Mean of the recent recorded RHR readings
    pub baseline_rhr: Decimal,
    pub current_rhr: Decimal,

    /// Percent deviation of current RHR from baseline (positive = elevated)
    pub rhr_deviation_pct: Decimal,
    pub rhr_score: Decimal,

    /// Mean load of the most recent sessions
    pub recent_load: Decimal,
    pub load_score: Decimal,

    /// Weighted composite, rounded
    pub score: u8,
}

pub struct RecoveryCalculator {
    config: RecoveryConfig,
}

impl RecoveryCalculator {
    /// Create new recovery calculator with default configuration
    pub fn new() -> Self {
        RecoveryCalculator {
            config: RecoveryConfig::default(),
        }
    }

    /// Create new recovery calculator with custom configuration
    pub fn with_config(config: RecoveryConfig) -> Result<Self> {
        config.validate()?;
        Ok(RecoveryCalculator { config })
    }

    pub fn config(&self) -> &RecoveryConfig {
        &self.config
    }

    /// Logs ordered newest-first; ties keep their input order
    fn newest_first(logs: &[TrainingLog]) -> Vec<&TrainingLog> {
        let mut sorted: Vec<&TrainingLog> = logs.iter().collect();
        sorted.sort_by(|a, b| b.date.cmp(&a.date));
        sorted
    }

    fn sleep_score(&self, latest: &TrainingLog) -> (Decimal, Decimal) {
        let hours = latest.sleep_hours.unwrap_or(self.config.sleep_target_hours);
        let score = hours
            .checked_div(self.config.sleep_target_hours)
            .map_or(Decimal::MAX, |ratio| ratio.saturating_mul(Decimal::ONE_HUNDRED))
            .min(Decimal::ONE_HUNDRED);
        (hours, score)
    }

    fn rhr_score(&self, sorted: &[&TrainingLog]) -> (Decimal, Decimal, Decimal, Decimal) {
        let readings: Vec<Decimal> = sorted
            .iter()
            .filter_map(|log| log.resting_heart_rate)
            .take(self.config.rhr_baseline_logs)
            .collect();

        let baseline = if readings.is_empty() {
            self.config.default_resting_hr
        } else {
            readings
                .iter()
                .fold(Decimal::ZERO, |acc, rhr| acc.saturating_add(*rhr))
                / Decimal::from(readings.len())
        };

        let current = sorted
            .first()
            .and_then(|log| log.resting_heart_rate)
            .unwrap_or(baseline);

        let deviation = if baseline.is_zero() {
            Decimal::ZERO
        } else {
            current
                .saturating_sub(baseline)
                .checked_div(baseline)
                .map_or(Decimal::MAX, |ratio| ratio.saturating_mul(Decimal::ONE_HUNDRED))
        };

        let penalty = if deviation > Decimal::ZERO {
            deviation.saturating_mul(self.config.rhr_penalty_multiplier)
        } else {
            Decimal::ZERO
        };
        let score = Decimal::ONE_HUNDRED
            .saturating_sub(penalty)
            .max(Decimal::ZERO);

        (baseline, current, deviation, score)
    }

    fn load_score(&self, sorted: &[&TrainingLog]) -> (Decimal, Decimal) {
        // Fixed divisor: the window size, not the number of sessions found
        let window = self.config.recent_load_logs.max(1);
        // Loads beyond `Decimal` range saturate, which floors the score at zero
        let recent_load = sorted
            .iter()
            .take(window)
            .map(|log| log.load().unwrap_or(Decimal::MAX))
            .fold(Decimal::ZERO, Decimal::saturating_add)
            / Decimal::from(window);

        let points = recent_load
            .checked_div(self.config.load_normalization)
            .unwrap_or(Decimal::MAX);
        let score = Decimal::ONE_HUNDRED
            .saturating_sub(points)
            .max(Decimal::ZERO);
        (recent_load, score)
    }

    /// Sub-scores for `logs`, or `None` while history is too short
    pub fn breakdown(&self, logs: &[TrainingLog]) -> Option<RecoveryBreakdown> {
        if logs.len() < self.config.min_logs {
            return None;
        }

        let sorted = Self::newest_first(logs);
        let latest = *sorted.first()?;

        let (sleep_hours, sleep_score) = self.sleep_score(latest);
        let (baseline_rhr, current_rhr, rhr_deviation_pct, rhr_score) = self.rhr_score(&sorted);
        let (recent_load, load_score) = self.load_score(&sorted);

        let composite = sleep_score
            .saturating_mul(self.config.sleep_weight)
            .saturating_add(rhr_score.saturating_mul(self.config.rhr_weight))
            .saturating_add(load_score.saturating_mul(self.config.load_weight));
        let score = composite
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
            .to_u8()
            .unwrap_or(0);

        Some(RecoveryBreakdown {
            sleep_hours,
            sleep_score,
            baseline_rhr,
            current_rhr,
            rhr_deviation_pct,
            rhr_score,
            recent_load,
            load_score,
            score,
        })
    }

    /// Classify a composite score
    pub fn classify(&self, score: u8) -> InsightStatus {
        let score = Decimal::from(score);
        if score < self.config.danger_below {
            InsightStatus::Danger
        } else if score < self.config.optimal_from {
            InsightStatus::Warning
        } else {
            InsightStatus::Optimal
        }
    }

    /// Produce the recovery readiness insight for `logs`
    pub fn calculate(&self, logs: &[TrainingLog]) -> ScientificInsight {
        let Some(breakdown) = self.breakdown(logs) else {
            debug!(
                logs = logs.len(),
                required = self.config.min_logs,
                "Recovery score calibrating"
            );
            return ScientificInsight::new(
                RECOVERY_LABEL,
                "Calibration",
                InsightStatus::Calibration,
                format!(
                    "Establishing baseline recovery metrics. Requires {} days of sleep and RHR data.",
                    self.config.min_logs
                ),
                format!(
                    "Weighted score based on Sleep Duration, Resting Heart Rate deviation, and {}-day training load.",
                    self.config.recent_load_logs
                ),
            );
        };

        let status = self.classify(breakdown.score);
        debug!(
            score = breakdown.score,
            sleep = %breakdown.sleep_score,
            rhr = %breakdown.rhr_score,
            load = %breakdown.load_score,
            %status,
            "Recovery score calculated"
        );

        let description = if status == InsightStatus::Optimal {
            "Body is well-recovered and ready for high intensity."
        } else {
            "Consider a recovery session or reduced intensity today."
        };

        ScientificInsight::new(
            RECOVERY_LABEL,
            format!("{}%", breakdown.score),
            status,
            description,
            format!(
                "Sleep ({}h): {}pts | RHR Dev ({}%): {}pts | Load Factor: {}pts",
                breakdown.sleep_hours.normalize(),
                format_fixed(breakdown.sleep_score, 0),
                format_fixed(breakdown.rhr_deviation_pct, 1),
                format_fixed(breakdown.rhr_score, 0),
                format_fixed(breakdown.load_score, 0)
            ),
        )
    }
}

impl Default for RecoveryCalculator {
    fn default() -> Self {
        Self::new()
    }
}
