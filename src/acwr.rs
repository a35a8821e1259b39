//! Acute:Chronic Workload Ratio (ACWR)
//!
//! Load for a session is `duration × intensity` (session-RPE). The acute load
//! is the summed load of every session in the trailing 7 days spread over a
//! fixed 7-day denominator; the chronic load does the same over 28 days.
//! Windows are selected by absolute date relative to `now`, so the order of
//! the input slice is irrelevant.
//!
//! | Ratio | Zone |
//! |---|---|
//! | < 0.8 | under-training |
//! | 0.8 – 1.3 | sweet spot |
//! | > 1.3 – 1.5 | high load |
//! | > 1.5 | spike |

use crate::error::{PerfSciError, Result};
use crate::models::{format_fixed, InsightStatus, ScientificInsight, TrainingLog};
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

pub const ACWR_LABEL: &str = "ACWR (Load Ratio)";

/// ACWR windows, minimum history and zone boundaries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcwrConfig {
    /// Acute window length in days (default: 7)
    pub acute_days: u16,

    /// Chronic window length in days (default: 28)
    pub chronic_days: u16,

    /// Minimum number of logs before a ratio is reported
    pub min_logs: usize,

    /// Ratios below this are under-training
    pub sweet_spot_lower: Decimal,

    /// Upper (inclusive) bound of the sweet spot
    pub sweet_spot_upper: Decimal,

    /// Upper (inclusive) bound of the high-load zone; above is a spike
    pub high_load_upper: Decimal,
}

impl Default for AcwrConfig {
    fn default() -> Self {
        AcwrConfig {
            acute_days: 7,
            chronic_days: 28,
            min_logs: 14,
            sweet_spot_lower: Decimal::new(8, 1),
            sweet_spot_upper: Decimal::new(13, 1),
            high_load_upper: Decimal::new(15, 1),
        }
    }
}

impl AcwrConfig {
    /// Reject windows and zone boundaries the calculator cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.acute_days == 0 || self.chronic_days == 0 {
            return Err(PerfSciError::Configuration(
                "ACWR windows must be at least one day".to_string(),
            ));
        }
        if self.acute_days > self.chronic_days {
            return Err(PerfSciError::Configuration(format!(
                "ACWR acute window ({}d) must not exceed the chronic window ({}d)",
                self.acute_days, self.chronic_days
            )));
        }
        if self.sweet_spot_lower > self.sweet_spot_upper
            || self.sweet_spot_upper > self.high_load_upper
        {
            return Err(PerfSciError::Configuration(
                "ACWR zone boundaries must be ascending".to_string(),
            ));
        }
        Ok(())
    }
}

/// Workload zone for a computed ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AcwrZone {
    UnderTraining,
    SweetSpot,
    HighLoad,
    Spike,
}

impl AcwrZone {
    /// Classify a ratio; every bracket includes its upper bound
    pub fn from_ratio(ratio: Decimal, config: &AcwrConfig) -> Self {
        if ratio < config.sweet_spot_lower {
            AcwrZone::UnderTraining
        } else if ratio <= config.sweet_spot_upper {
            AcwrZone::SweetSpot
        } else if ratio <= config.high_load_upper {
            AcwrZone::HighLoad
        } else {
            AcwrZone::Spike
        }
    }

    pub fn status(&self) -> InsightStatus {
        match self {
            AcwrZone::UnderTraining => InsightStatus::Warning,
            AcwrZone::SweetSpot => InsightStatus::Optimal,
            AcwrZone::HighLoad => InsightStatus::Warning,
            AcwrZone::Spike => InsightStatus::Danger,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AcwrZone::UnderTraining => "Under-training. Risk of detraining or loss of fitness.",
            AcwrZone::SweetSpot => "Workload is in the optimal \"Sweet Spot\" for adaptation.",
            AcwrZone::HighLoad => "High workload. Monitor for fatigue.",
            AcwrZone::Spike => {
                "Spike in workload detected. Significant increase in injury risk."
            }
        }
    }
}

/// Intermediate numbers behind a ratio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadSnapshot {
    /// Summed load inside the acute window
    pub acute_total: Decimal,

    /// Summed load inside the chronic window
    pub chronic_total: Decimal,

    /// Acute load per day
    pub acute_load: Decimal,

    /// Chronic load per day
    pub chronic_load: Decimal,

    /// `None` when there is no chronic load to divide by
    pub ratio: Option<Decimal>,
}

pub struct AcwrCalculator {
    config: AcwrConfig,
}

impl AcwrCalculator {
    /// Create new ACWR calculator with default configuration
    pub fn new() -> Self {
        AcwrCalculator {
            config: AcwrConfig::default(),
        }
    }

    /// Create new ACWR calculator with custom configuration
    pub fn with_config(config: AcwrConfig) -> Result<Self> {
        config.validate()?;
        Ok(AcwrCalculator { config })
    }

    pub fn config(&self) -> &AcwrConfig {
        &self.config
    }

    /// Sum of load over logs dated strictly after `now - days`
    fn window_total(logs: &[TrainingLog], now: DateTime<Utc>, days: u16) -> Option<Decimal> {
        let cutoff = now - Duration::days(i64::from(days));

        let total = logs
            .iter()
            .filter(|log| log.date > cutoff)
            .try_fold(Decimal::ZERO, |acc, log| acc.checked_add(log.load()?))?;

        trace!(days, %cutoff, %total, "Workload window");
        Some(total)
    }

    /// Compute acute/chronic loads and their ratio, ignoring the history minimum
    ///
    /// Returns `None` when the loads overflow `Decimal`.
    pub fn workload(&self, logs: &[TrainingLog], now: DateTime<Utc>) -> Option<WorkloadSnapshot> {
        let acute_days = Decimal::from(self.config.acute_days);
        let chronic_days = Decimal::from(self.config.chronic_days);

        let acute_total = Self::window_total(logs, now, self.config.acute_days)?;
        let chronic_total = Self::window_total(logs, now, self.config.chronic_days)?;

        // (acute/7) / (chronic/28) rearranged so exact boundaries stay exact
        let ratio = if chronic_total.is_zero() {
            None
        } else {
            let numerator = acute_total.checked_mul(chronic_days)?;
            let denominator = chronic_total.checked_mul(acute_days)?;
            Some(numerator.checked_div(denominator)?)
        };

        Some(WorkloadSnapshot {
            acute_total,
            chronic_total,
            acute_load: acute_total.checked_div(acute_days)?,
            chronic_load: chronic_total.checked_div(chronic_days)?,
            ratio,
        })
    }

    fn unavailable(description: &str) -> ScientificInsight {
        ScientificInsight::new(
            "ACWR",
            "N/A",
            InsightStatus::Neutral,
            description,
            "ACWR = Acute Load / Chronic Load",
        )
    }

    /// Produce the ACWR insight for `logs` as of `now`
    pub fn calculate(&self, logs: &[TrainingLog], now: DateTime<Utc>) -> ScientificInsight {
        if logs.len() < self.config.min_logs {
            debug!(
                logs = logs.len(),
                required = self.config.min_logs,
                "ACWR calibrating"
            );
            return ScientificInsight::new(
                ACWR_LABEL,
                "Calibration",
                InsightStatus::Calibration,
                format!(
                    "Insufficient data for reliable workload analysis. Requires {}+ days of consistent logging.",
                    self.config.min_logs
                ),
                format!(
                    "ACWR = ({}-day Average Load) / ({}-day Average Load). Load = Duration × Intensity (RPE).",
                    self.config.acute_days, self.config.chronic_days
                ),
            );
        }

        let Some(workload) = self.workload(logs, now) else {
            warn!(logs = logs.len(), "ACWR workload exceeds numeric range");
            return Self::unavailable("Workload values are out of range.");
        };

        let Some(ratio) = workload.ratio else {
            debug!("ACWR has no chronic load");
            return Self::unavailable("No chronic load data available.");
        };

        let zone = AcwrZone::from_ratio(ratio, &self.config);
        debug!(
            acute = %workload.acute_load,
            chronic = %workload.chronic_load,
            %ratio,
            ?zone,
            "ACWR calculated"
        );

        ScientificInsight::new(
            ACWR_LABEL,
            format_fixed(ratio, 2),
            zone.status(),
            zone.description(),
            format!(
                "Acute Load ({}d avg): {} | Chronic Load ({}d avg): {} | Ratio: {}",
                self.config.acute_days,
                format_fixed(workload.acute_load, 1),
                self.config.chronic_days,
                format_fixed(workload.chronic_load, 1),
                format_fixed(ratio, 2)
            ),
        )
    }
}

impl Default for AcwrCalculator {
    fn default() -> Self {
        Self::new()
    }
}
