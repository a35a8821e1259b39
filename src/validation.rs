//! Range checks for training log candidates
//!
//! Fields are checked in a fixed order (duration, intensity, sleep hours,
//! resting heart rate) and the first violation wins. Fields that have not
//! been provided are skipped, not treated as zero.

use crate::error::ValidationError;
use crate::models::{MetricValue, SportType, TrainingLog, TrainingType};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use uuid::Uuid;

/// Accepted session length in minutes
pub const DURATION_MINUTES: RangeInclusive<Decimal> = dec!(1)..=dec!(480);

/// Accepted RPE scale
pub const INTENSITY_RPE: RangeInclusive<Decimal> = dec!(1)..=dec!(10);

pub const SLEEP_HOURS: RangeInclusive<Decimal> = dec!(0)..=dec!(24);

/// Plausible resting heart rate in bpm
pub const RESTING_HEART_RATE_BPM: RangeInclusive<Decimal> = dec!(30)..=dec!(200);

/// A partially filled training log, as captured by the entry form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingInput {
    #[serde(default)]
    pub sport_type: Option<SportType>,

    #[serde(default)]
    pub training_type: Option<TrainingType>,

    #[serde(default)]
    pub duration: Option<Decimal>,

    #[serde(default)]
    pub intensity: Option<Decimal>,

    #[serde(default)]
    pub sleep_hours: Option<Decimal>,

    #[serde(default)]
    pub resting_heart_rate: Option<Decimal>,

    #[serde(default)]
    pub metrics: BTreeMap<String, MetricValue>,

    #[serde(default)]
    pub notes: Option<String>,
}

fn check(
    value: Option<Decimal>,
    range: &RangeInclusive<Decimal>,
    reject: fn(Decimal) -> ValidationError,
) -> Result<(), ValidationError> {
    match value {
        Some(v) if !range.contains(&v) => Err(reject(v)),
        _ => Ok(()),
    }
}

/// Check the provided fields of a candidate, returning the first violation
pub fn validate_training_input(input: &TrainingInput) -> Result<(), ValidationError> {
    check(input.duration, &DURATION_MINUTES, ValidationError::Duration)?;
    check(input.intensity, &INTENSITY_RPE, ValidationError::Intensity)?;
    check(input.sleep_hours, &SLEEP_HOURS, ValidationError::SleepHours)?;
    check(
        input.resting_heart_rate,
        &RESTING_HEART_RATE_BPM,
        ValidationError::RestingHeartRate,
    )?;
    Ok(())
}

impl TrainingInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_training_input(self)
    }

    /// Accept the candidate as a new log with a fresh id
    ///
    /// Duration and intensity must be present; everything else falls back to
    /// the entry form defaults.
    pub fn into_log(
        self,
        athlete_id: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Result<TrainingLog, ValidationError> {
        self.validate()?;

        let duration = self
            .duration
            .ok_or(ValidationError::MissingField("duration"))?;
        let intensity = self
            .intensity
            .ok_or(ValidationError::MissingField("intensity"))?;

        Ok(TrainingLog {
            id: Uuid::new_v4().to_string(),
            athlete_id: athlete_id.into(),
            date,
            sport_type: self.sport_type.unwrap_or(SportType::Gym),
            training_type: self.training_type.unwrap_or_default(),
            duration,
            intensity,
            sleep_hours: self.sleep_hours,
            resting_heart_rate: self.resting_heart_rate,
            metrics: self.metrics,
            notes: self.notes.unwrap_or_default(),
        })
    }
}

impl From<&TrainingLog> for TrainingInput {
    fn from(log: &TrainingLog) -> Self {
        TrainingInput {
            sport_type: Some(log.sport_type),
            training_type: Some(log.training_type),
            duration: Some(log.duration),
            intensity: Some(log.intensity),
            sleep_hours: log.sleep_hours,
            resting_heart_rate: log.resting_heart_rate,
            metrics: log.metrics.clone(),
            notes: Some(log.notes.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_empty_input_is_valid() {
        assert_eq!(validate_training_input(&TrainingInput::default()), Ok(()));
    }

    #[test]
    fn test_duration_out_of_range() {
        let input = TrainingInput {
            duration: Some(dec!(500)),
            ..Default::default()
        };
        let err = validate_training_input(&input).unwrap_err();
        assert_eq!(err, ValidationError::Duration(dec!(500)));
        assert_eq!(err.to_string(), "Duration must be between 1 and 480 minutes.");

        let zero = TrainingInput {
            duration: Some(dec!(0)),
            ..Default::default()
        };
        assert!(validate_training_input(&zero).is_err());
    }

    #[test]
    fn test_valid_duration_does_not_mask_intensity() {
        let input = TrainingInput {
            duration: Some(dec!(60)),
            intensity: Some(dec!(11)),
            ..Default::default()
        };
        let err = validate_training_input(&input).unwrap_err();
        assert_eq!(err.field(), "intensity");
        assert!(err.to_string().contains("Intensity"));
    }

    #[test]
    fn test_first_violation_wins() {
        let input = TrainingInput {
            duration: Some(dec!(600)),
            intensity: Some(dec!(0)),
            sleep_hours: Some(dec!(30)),
            resting_heart_rate: Some(dec!(10)),
            ..Default::default()
        };
        assert_eq!(
            validate_training_input(&input),
            Err(ValidationError::Duration(dec!(600)))
        );
    }

    #[test]
    fn test_optional_field_ranges() {
        let sleep = TrainingInput {
            sleep_hours: Some(dec!(24.5)),
            ..Default::default()
        };
        assert_eq!(
            validate_training_input(&sleep).unwrap_err().field(),
            "sleepHours"
        );

        let no_sleep = TrainingInput {
            sleep_hours: Some(dec!(0)),
            ..Default::default()
        };
        assert!(validate_training_input(&no_sleep).is_ok());

        let rhr = TrainingInput {
            resting_heart_rate: Some(dec!(201)),
            ..Default::default()
        };
        assert_eq!(
            validate_training_input(&rhr).unwrap_err().to_string(),
            "Resting Heart Rate seems unrealistic (30-200 bpm)."
        );
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let input = TrainingInput {
            duration: Some(dec!(480)),
            intensity: Some(dec!(1)),
            sleep_hours: Some(dec!(24)),
            resting_heart_rate: Some(dec!(30)),
            ..Default::default()
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_into_log() {
        let date = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
        let input = TrainingInput {
            duration: Some(dec!(60)),
            intensity: Some(dec!(5)),
            sleep_hours: Some(dec!(8)),
            resting_heart_rate: Some(dec!(60)),
            ..Default::default()
        };

        let log = input.into_log("ath-1", date).unwrap();
        assert_eq!(log.athlete_id, "ath-1");
        assert_eq!(log.load(), Some(dec!(300)));
        assert_eq!(log.sport_type, SportType::Gym);
        assert!(Uuid::parse_str(&log.id).is_ok());

        let round_trip = TrainingInput::from(&log);
        assert!(round_trip.validate().is_ok());
    }

    #[test]
    fn test_into_log_requires_core_fields() {
        let date = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
        let input = TrainingInput {
            duration: Some(dec!(60)),
            ..Default::default()
        };
        assert_eq!(
            input.into_log("ath-1", date).unwrap_err(),
            ValidationError::MissingField("intensity")
        );
    }

    #[test]
    fn test_input_from_form_json() {
        let input: TrainingInput =
            serde_json::from_str(r#"{"duration": 60, "intensity": 11}"#).unwrap();
        assert_eq!(input.validate().unwrap_err().field(), "intensity");
    }
}
