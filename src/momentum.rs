//! Dashboard momentum read-out
//!
//! A quick heuristic shown next to the scientific insights. It looks at the
//! newest session and the trailing week and month to label injury risk and
//! training momentum, and turns both into a one-line suggestion.
//!
//! This is deliberately cruder than [`crate::acwr`] and [`crate::recovery`]:
//! windows count whole elapsed days (a session 7 days and 20 hours old is
//! still "within 7 days"), there is no minimum history, and the risk bands
//! (1.2 / 1.5) differ from the ACWR zones.

use crate::models::TrainingLog;
use chrono::{DateTime, Utc};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

const ACUTE_DAYS: i64 = 7;
const CHRONIC_DAYS: i64 = 28;

/// Ratios above this are a moderate injury risk
pub const MODERATE_RISK_RATIO: Decimal = dec!(1.2);

/// Ratios above this are a high injury risk
pub const HIGH_RISK_RATIO: Decimal = dec!(1.5);

const DEFAULT_SLEEP_HOURS: Decimal = dec!(7);
const DEFAULT_RESTING_HR: Decimal = dec!(65);

/// Injury risk band from the week-over-month load ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InjuryRisk {
    Low,
    Moderate,
    High,
}

impl InjuryRisk {
    pub fn from_ratio(ratio: Decimal) -> Self {
        if ratio > HIGH_RISK_RATIO {
            InjuryRisk::High
        } else if ratio > MODERATE_RISK_RATIO {
            InjuryRisk::Moderate
        } else {
            InjuryRisk::Low
        }
    }
}

impl fmt::Display for InjuryRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InjuryRisk::Low => write!(f, "Low"),
            InjuryRisk::Moderate => write!(f, "Moderate"),
            InjuryRisk::High => write!(f, "High"),
        }
    }
}

/// Training momentum class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Momentum {
    /// No sessions logged yet
    Stable,
    BurnoutRisk,
    PeakZone,
    BuildingMomentum,
    Plateau,
}

impl Momentum {
    pub fn description(&self) -> &'static str {
        match self {
            Momentum::Stable => "Awaiting data...",
            Momentum::BurnoutRisk => {
                "Acute load exceeds recovery capacity. Biological markers show high fatigue."
            }
            Momentum::PeakZone => {
                "Optimal balance of stimulus and adaptation. You are in your prime training window."
            }
            Momentum::BuildingMomentum => {
                "Increasing acute load relative to chronic baseline. Functional overreaching detected."
            }
            Momentum::Plateau => {
                "Your training load is consistent but lacks variability to trigger new adaptations."
            }
        }
    }
}

impl fmt::Display for Momentum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Momentum::Stable => write!(f, "Stable"),
            Momentum::BurnoutRisk => write!(f, "Burnout Risk"),
            Momentum::PeakZone => write!(f, "Peak Zone"),
            Momentum::BuildingMomentum => write!(f, "Building Momentum"),
            Momentum::Plateau => write!(f, "Plateau"),
        }
    }
}

/// Momentum, injury risk and the suggestion derived from them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MomentumReport {
    /// Quick 0-100 readiness from the newest session alone
    pub readiness: u8,

    /// Mean intensity over the trailing week
    pub average_intensity: Decimal,

    /// Sessions within the trailing week
    pub weekly_sessions: usize,

    /// Weekly average load over monthly average load
    pub load_ratio: Decimal,

    pub injury_risk: InjuryRisk,
    pub momentum: Momentum,
    pub suggestion: String,
}

/// Whole days elapsed between `date` and `now`, at most `days`
fn within_days(log: &TrainingLog, now: DateTime<Utc>, days: i64) -> bool {
    (now - log.date).num_days() <= days
}

fn saturating_load(logs: &[&TrainingLog]) -> Decimal {
    logs.iter()
        .map(|log| log.load().unwrap_or(Decimal::MAX))
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Readiness from the newest session's sleep, RHR and intensity
fn quick_readiness(latest: &TrainingLog) -> u8 {
    let sleep = latest.sleep_hours.unwrap_or(DEFAULT_SLEEP_HOURS);
    let rhr = latest.resting_heart_rate.unwrap_or(DEFAULT_RESTING_HR);

    let sleep_points = (sleep / dec!(10)).saturating_mul(dec!(40));
    let rhr_points = Decimal::ONE_HUNDRED
        .saturating_sub(rhr)
        .max(Decimal::ZERO)
        .saturating_mul(dec!(0.4));
    let intensity_points = dec!(10).saturating_sub(latest.intensity).saturating_mul(dec!(2));

    sleep_points
        .saturating_add(rhr_points)
        .saturating_add(intensity_points)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
        .to_u8()
        .unwrap_or(0)
}

/// `(acute/7) / (chronic/28)`, with an empty month treated as a divisor of 1
fn load_ratio(acute_total: Decimal, chronic_total: Decimal) -> Decimal {
    let acute_days = Decimal::from(ACUTE_DAYS);
    let chronic_days = Decimal::from(CHRONIC_DAYS);

    if chronic_total.is_zero() {
        return acute_total / acute_days;
    }

    acute_total
        .checked_mul(chronic_days)
        .zip(chronic_total.checked_mul(acute_days))
        .and_then(|(numerator, denominator)| numerator.checked_div(denominator))
        .or_else(|| (acute_total / acute_days).checked_div(chronic_total / chronic_days))
        .unwrap_or(Decimal::MAX)
}

impl MomentumReport {
    /// Evaluate `logs` (any order) as of `now`
    pub fn from_logs(logs: &[TrainingLog], now: DateTime<Utc>) -> Self {
        let Some(latest) = logs.iter().max_by_key(|log| log.date) else {
            return MomentumReport {
                readiness: 0,
                average_intensity: Decimal::ZERO,
                weekly_sessions: 0,
                load_ratio: Decimal::ZERO,
                injury_risk: InjuryRisk::Low,
                momentum: Momentum::Stable,
                suggestion: "Log your first session to begin.".to_string(),
            };
        };

        let readiness = quick_readiness(latest);

        let week: Vec<&TrainingLog> = logs
            .iter()
            .filter(|log| within_days(log, now, ACUTE_DAYS))
            .collect();
        let month: Vec<&TrainingLog> = logs
            .iter()
            .filter(|log| within_days(log, now, CHRONIC_DAYS))
            .collect();

        let average_intensity = week
            .iter()
            .fold(Decimal::ZERO, |acc, log| acc.saturating_add(log.intensity))
            / Decimal::from(week.len().max(1));

        let ratio = load_ratio(saturating_load(&week), saturating_load(&month));
        let injury_risk = InjuryRisk::from_ratio(ratio);

        let momentum = if average_intensity > dec!(7) && readiness < 40 {
            Momentum::BurnoutRisk
        } else if week.len() >= 5 && ratio >= dec!(1.1) {
            Momentum::PeakZone
        } else if week.len() >= 3 && ratio > Decimal::ONE {
            Momentum::BuildingMomentum
        } else {
            Momentum::Plateau
        };

        let suggestion = if injury_risk == InjuryRisk::High || readiness < 30 {
            "Mandatory recovery day. Focus on mobility."
        } else {
            match momentum {
                Momentum::Plateau => "Introduce 1 high-intensity interval session.",
                Momentum::PeakZone => "Maintain volume. Focus on precision and skill.",
                _ => "Maintain current load.",
            }
        };

        debug!(
            readiness,
            %average_intensity,
            weekly_sessions = week.len(),
            %ratio,
            %injury_risk,
            %momentum,
            "Momentum evaluated"
        );

        MomentumReport {
            readiness,
            average_intensity,
            weekly_sessions: week.len(),
            load_ratio: ratio,
            injury_risk,
            momentum,
            suggestion: suggestion.to_string(),
        }
    }
}
