//! One-stop facade over the calculators
//!
//! `InsightEngine` owns the calculator configuration and produces the full
//! dashboard report for one athlete. It holds no state between calls: every
//! report is computed from the log slice and timestamp passed in.

use crate::acwr::{AcwrCalculator, AcwrConfig};
use crate::badges::BadgeBoard;
use crate::calibration::CalibrationConfig;
use crate::config::AppConfig;
use crate::error::Result;
use crate::models::{CalibrationStatus, ScientificInsight, TrainingLog, User};
use crate::momentum::MomentumReport;
use crate::progress::{
    intensity_trend, sport_distribution, weekly_durations, weekly_volume_trend, DailyVolume,
    IntensityPoint, LevelProgress, SportShare, TrainingSummary, VolumeTrend,
    INTENSITY_TREND_SESSIONS,
};
use crate::recovery::{RecoveryCalculator, RecoveryConfig};
use crate::streak::{current_streak, motivational_message};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info_span;

/// Everything the athlete dashboard renders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightReport {
    pub athlete_id: String,
    pub generated_at: DateTime<Utc>,
    pub acwr: ScientificInsight,
    pub recovery: ScientificInsight,
    pub calibration: CalibrationStatus,
    pub momentum: MomentumReport,
    pub streak: u32,
    pub streak_message: String,
    pub level: LevelProgress,
    pub volume_trend: VolumeTrend,
    pub volume_story: String,
    pub weekly_volume: Vec<DailyVolume>,
    pub sport_distribution: Vec<SportShare>,
    pub intensity_trend: Vec<IntensityPoint>,
    pub summary: TrainingSummary,
    pub badges: BadgeBoard,
    pub achievement_points: u32,
}

pub struct InsightEngine {
    acwr: AcwrCalculator,
    recovery: RecoveryCalculator,
    calibration: CalibrationConfig,
}

impl InsightEngine {
    /// Create new engine with default configuration
    pub fn new() -> Self {
        InsightEngine {
            acwr: AcwrCalculator::new(),
            recovery: RecoveryCalculator::new(),
            calibration: CalibrationConfig::default(),
        }
    }

    /// Create engine with custom configuration, rejecting invalid settings
    pub fn with_configs(
        acwr: AcwrConfig,
        recovery: RecoveryConfig,
        calibration: CalibrationConfig,
    ) -> Result<Self> {
        Ok(InsightEngine {
            acwr: AcwrCalculator::with_config(acwr)?,
            recovery: RecoveryCalculator::with_config(recovery)?,
            calibration,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::with_configs(
            config.acwr.clone(),
            config.recovery.clone(),
            config.calibration.clone(),
        )
    }

    pub fn acwr(&self, logs: &[TrainingLog], now: DateTime<Utc>) -> ScientificInsight {
        self.acwr.calculate(logs, now)
    }

    pub fn recovery(&self, logs: &[TrainingLog]) -> ScientificInsight {
        self.recovery.calculate(logs)
    }

    pub fn calibration(&self, user: &User, now: DateTime<Utc>) -> CalibrationStatus {
        self.calibration.status_for_user(user, now)
    }

    /// Build the full report; `logs` must already belong to `user`
    pub fn report(&self, user: &User, logs: &[TrainingLog], now: DateTime<Utc>) -> InsightReport {
        let _span = info_span!("insight_report", athlete = %user.id, logs = logs.len()).entered();

        let streak = current_streak(logs, now);
        let volume_trend = weekly_volume_trend(logs, now);
        let badges = BadgeBoard::evaluate(logs, now);

        InsightReport {
            athlete_id: user.id.clone(),
            generated_at: now,
            acwr: self.acwr(logs, now),
            recovery: self.recovery(logs),
            calibration: self.calibration(user, now),
            momentum: MomentumReport::from_logs(logs, now),
            streak,
            streak_message: motivational_message(streak).to_string(),
            level: LevelProgress::from_logs(logs),
            volume_story: volume_trend.narrative(),
            volume_trend,
            weekly_volume: weekly_durations(logs, now),
            sport_distribution: sport_distribution(logs),
            intensity_trend: intensity_trend(logs, INTENSITY_TREND_SESSIONS),
            summary: TrainingSummary::from_logs(logs),
            achievement_points: badges.points(),
            badges,
        }
    }
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InsightStatus, SubscriptionStatus, UserRole};
    use crate::progress::AthleteLevel;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 30, 18, 0, 0).unwrap()
    }

    fn create_test_user(days_since_joined: i64) -> User {
        User {
            id: "ath-1".to_string(),
            name: "Test Athlete".to_string(),
            email: "athlete@example.com".to_string(),
            role: UserRole::Athlete,
            subscription_status: SubscriptionStatus::Pro,
            sport_preference: None,
            joined_at: now() - Duration::days(days_since_joined),
        }
    }

    fn create_test_log(days_ago: i64) -> TrainingLog {
        TrainingLog {
            id: format!("log_{}", days_ago),
            athlete_id: "ath-1".to_string(),
            date: now() - Duration::days(days_ago),
            sport_type: Default::default(),
            training_type: Default::default(),
            duration: dec!(60),
            intensity: dec!(5),
            sleep_hours: Some(dec!(8)),
            resting_heart_rate: Some(dec!(55)),
            metrics: Default::default(),
            notes: String::new(),
        }
    }

    #[test]
    fn test_new_account_report() {
        let engine = InsightEngine::new();
        let user = create_test_user(2);
        let logs = vec![create_test_log(0), create_test_log(1)];

        let report = engine.report(&user, &logs, now());
        assert_eq!(report.acwr.status, InsightStatus::Calibration);
        assert_eq!(report.recovery.status, InsightStatus::Calibration);
        assert!(report.calibration.is_calibrating);
        assert_eq!(report.calibration.days_remaining, 12);
        assert_eq!(report.streak, 2);
        assert_eq!(report.level.level, AthleteLevel::Rookie);
        assert_eq!(report.intensity_trend.len(), 2);
    }

    #[test]
    fn test_established_account_report() {
        let engine = InsightEngine::new();
        let user = create_test_user(60);
        let logs: Vec<_> = (0..28).map(create_test_log).collect();

        let report = engine.report(&user, &logs, now());
        assert_eq!(report.acwr.value, "1.00");
        assert_eq!(report.acwr.status, InsightStatus::Optimal);
        // Load 300 per session: 100 - 30 = 70 load points
        assert_eq!(report.recovery.value, "91%");
        assert!(!report.calibration.is_calibrating);
        assert_eq!(report.streak, 28);
        // Both week windows include the session exactly 7 days back
        assert_eq!(report.volume_trend, VolumeTrend::Steady);
        assert_eq!(report.achievement_points, 100);
        assert_eq!(report.momentum.weekly_sessions, 8);
        assert_eq!(report.sport_distribution.len(), 1);
        assert_eq!(report.sport_distribution[0].sessions, 28);
        assert_eq!(report.intensity_trend.len(), 10);
    }

    #[test]
    fn test_engine_rejects_invalid_config() {
        let mut config = AppConfig::default();
        assert!(InsightEngine::from_config(&config).is_ok());

        config.acwr.chronic_days = 0;
        assert!(InsightEngine::from_config(&config).is_err());

        let bad_recovery = RecoveryConfig {
            load_normalization: dec!(0),
            ..RecoveryConfig::default()
        };
        assert!(InsightEngine::with_configs(
            AcwrConfig::default(),
            bad_recovery,
            CalibrationConfig::default()
        )
        .is_err());
    }

    #[test]
    fn test_report_is_idempotent() {
        let engine = InsightEngine::new();
        let user = create_test_user(30);
        let logs: Vec<_> = (0..20).map(create_test_log).collect();

        let first = serde_json::to_string(&engine.report(&user, &logs, now())).unwrap();
        let second = serde_json::to_string(&engine.report(&user, &logs, now())).unwrap();
        assert_eq!(first, second);
    }
}
