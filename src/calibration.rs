//! Account-age calibration window
//!
//! New accounts spend their first two weeks gathering data. This check looks
//! only at the join date; the ACWR and recovery calculators gate themselves
//! separately on log count.

use crate::models::{CalibrationStatus, User};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Calibration window configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Length of the calibration window in days (default: 14)
    pub period_days: u32,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        CalibrationConfig { period_days: 14 }
    }
}

impl CalibrationConfig {
    /// Calibration state for an account created at `joined_at`
    ///
    /// Days are whole elapsed 24-hour periods, truncated toward zero. A join
    /// date in the future gives negative elapsed days, so the remaining count
    /// grows past the period length.
    pub fn status(&self, joined_at: DateTime<Utc>, now: DateTime<Utc>) -> CalibrationStatus {
        let days_since_joined = (now - joined_at).num_days();
        let period = i64::from(self.period_days);

        CalibrationStatus {
            is_calibrating: days_since_joined < period,
            days_remaining: u32::try_from((period - days_since_joined).max(0)).unwrap_or(0),
        }
    }

    pub fn status_for_user(&self, user: &User, now: DateTime<Utc>) -> CalibrationStatus {
        self.status(user.joined_at, now)
    }
}
