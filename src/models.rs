use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Sport disciplines an athlete can log sessions for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SportType {
    Gym,
    Running,
    Boxing,
    Badminton,
    Cricket,
    Football,
    Athletics,
    Swimming,
    Cycling,
    #[default]
    Other,
}

/// Session category chosen when logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TrainingType {
    #[default]
    Strength,
    Cardio,
    Skill,
    Match,
    Recovery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    #[default]
    Athlete,
    Coach,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SubscriptionStatus {
    #[default]
    Free,
    Pro,
}

/// Value of a sport-specific metric (sets, distance, pace, ...)
///
/// The scoring engine never interprets these; only badge evaluation peeks
/// at a few well-known numeric keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl MetricValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            MetricValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Bool(b) => write!(f, "{}", b),
            MetricValue::Number(n) => write!(f, "{}", n),
            MetricValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// A single logged training session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingLog {
    /// Unique identifier for the session
    pub id: String,

    /// Owning athlete (not checked by any calculator)
    pub athlete_id: String,

    /// When the session took place
    pub date: DateTime<Utc>,

    #[serde(default)]
    pub sport_type: SportType,

    #[serde(default)]
    pub training_type: TrainingType,

    /// Session length in minutes
    pub duration: Decimal,

    /// Rate of perceived exertion, 1-10
    pub intensity: Decimal,

    /// Hours slept before the session
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep_hours: Option<Decimal>,

    /// Resting heart rate in bpm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resting_heart_rate: Option<Decimal>,

    /// Free-form sport-specific metrics
    #[serde(default)]
    pub metrics: BTreeMap<String, MetricValue>,

    #[serde(default)]
    pub notes: String,
}

impl TrainingLog {
    /// Training load of the session: duration × intensity
    ///
    /// `None` when the product does not fit in a `Decimal`.
    pub fn load(&self) -> Option<Decimal> {
        self.duration.checked_mul(self.intensity)
    }

    /// Numeric metric value, if present and numeric
    pub fn metric_number(&self, key: &str) -> Option<f64> {
        self.metrics.get(key).and_then(MetricValue::as_number)
    }
}

/// Account owning a set of training logs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub role: UserRole,

    #[serde(default)]
    pub subscription_status: SubscriptionStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sport_preference: Option<SportType>,

    /// Account creation time, start of the calibration window
    pub joined_at: DateTime<Utc>,
}

/// Classification attached to every insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightStatus {
    Optimal,
    Warning,
    Danger,
    Calibration,
    Neutral,
}

impl fmt::Display for InsightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsightStatus::Optimal => write!(f, "optimal"),
            InsightStatus::Warning => write!(f, "warning"),
            InsightStatus::Danger => write!(f, "danger"),
            InsightStatus::Calibration => write!(f, "calibration"),
            InsightStatus::Neutral => write!(f, "neutral"),
        }
    }
}

/// Display-ready result of a scoring calculation
///
/// `value` is either a formatted number (`"1.12"`, `"65%"`) or one of the
/// placeholder tokens `"Calibration"` / `"N/A"`. `calculation_logic` is a
/// diagnostic trace of the intermediate numbers and carries no stable format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScientificInsight {
    pub label: String,
    pub value: String,
    pub status: InsightStatus,
    pub description: String,
    pub calculation_logic: String,
}

impl ScientificInsight {
    pub fn new(
        label: impl Into<String>,
        value: impl Into<String>,
        status: InsightStatus,
        description: impl Into<String>,
        calculation_logic: impl Into<String>,
    ) -> Self {
        ScientificInsight {
            label: label.into(),
            value: value.into(),
            status,
            description: description.into(),
            calculation_logic: calculation_logic.into(),
        }
    }

    /// True when the insight is a placeholder rather than a computed value
    pub fn is_placeholder(&self) -> bool {
        matches!(
            self.status,
            InsightStatus::Calibration | InsightStatus::Neutral
        )
    }
}

/// Account-age calibration window state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalibrationStatus {
    pub is_calibrating: bool,
    pub days_remaining: u32,
}

/// Round half away from zero and render with exactly `dp` decimals
pub fn format_fixed(value: Decimal, dp: u32) -> String {
    let rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}", dp as usize, rounded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_fixed() {
        assert_eq!(format_fixed(dec!(1.005), 2), "1.01");
        assert_eq!(format_fixed(dec!(0.8), 2), "0.80");
        assert_eq!(format_fixed(dec!(57.75), 0), "58");
        assert_eq!(format_fixed(dec!(100), 1), "100.0");
    }

    #[test]
    fn test_training_log_from_dashboard_json() {
        let json = r#"{
            "id": "k2j3h4",
            "athleteId": "ath-1",
            "date": "2024-06-01T07:30:00.000Z",
            "sportType": "Running",
            "trainingType": "Cardio",
            "duration": 45,
            "intensity": 7,
            "sleepHours": 7.5,
            "metrics": { "distance": 10.2, "pace": "4:25", "race": false },
            "notes": "tempo"
        }"#;

        let log: TrainingLog = serde_json::from_str(json).unwrap();
        assert_eq!(log.sport_type, SportType::Running);
        assert_eq!(log.load(), Some(dec!(315)));
        assert_eq!(log.sleep_hours, Some(dec!(7.5)));
        assert_eq!(log.resting_heart_rate, None);
        assert_eq!(log.metric_number("distance"), Some(10.2));
        assert_eq!(log.metric_number("pace"), None);
        assert_eq!(
            log.metrics.get("race"),
            Some(&MetricValue::Bool(false))
        );
    }

    #[test]
    fn test_insight_status_serialization() {
        let insight = ScientificInsight::new(
            "ACWR",
            "N/A",
            InsightStatus::Neutral,
            "No chronic load data available.",
            "ACWR = Acute Load / Chronic Load",
        );
        let json = serde_json::to_value(&insight).unwrap();
        assert_eq!(json["status"], "neutral");
        assert_eq!(json["calculationLogic"], "ACWR = Acute Load / Chronic Load");
        assert!(insight.is_placeholder());
    }

    #[test]
    fn test_user_roles() {
        let json = r#"{"id":"u1","role":"COACH","subscriptionStatus":"PRO","joinedAt":"2024-01-01T00:00:00Z"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.role, UserRole::Coach);
        assert_eq!(user.subscription_status, SubscriptionStatus::Pro);
    }
}
