use chrono::{DateTime, Duration, TimeZone, Utc};
use perfsci::models::{InsightStatus, TrainingLog};
use perfsci::{calculate_acwr, calculate_recovery_score, get_calibration_status, AcwrCalculator};
use proptest::prelude::*;
use rust_decimal::Decimal;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap()
}

fn log(index: usize, hours_ago: i64, duration: u32, intensity: u32) -> TrainingLog {
    TrainingLog {
        id: format!("log_{}", index),
        athlete_id: "prop_athlete".to_string(),
        date: now() - Duration::hours(hours_ago),
        sport_type: Default::default(),
        training_type: Default::default(),
        duration: Decimal::from(duration),
        intensity: Decimal::from(intensity),
        sleep_hours: None,
        resting_heart_rate: None,
        metrics: Default::default(),
        notes: String::new(),
    }
}

/// (hours ago, duration, intensity) for sessions spread over ~6 weeks
fn sessions(range: std::ops::Range<usize>) -> impl Strategy<Value = Vec<TrainingLog>> {
    prop::collection::vec((0i64..1000, 1u32..=480, 1u32..=10), range).prop_map(|raw| {
        raw.into_iter()
            .enumerate()
            .map(|(i, (hours, duration, intensity))| log(i, hours, duration, intensity))
            .collect()
    })
}

proptest! {
    #[test]
    fn test_short_history_always_calibrates(logs in sessions(0..14)) {
        prop_assert_eq!(calculate_acwr(&logs, now()).status, InsightStatus::Calibration);
    }

    #[test]
    fn test_acwr_monotonic_in_acute_load(
        logs in sessions(14..40),
        pick in any::<prop::sample::Index>(),
        extra in 1u32..120,
    ) {
        let calculator = AcwrCalculator::new();
        let cutoff = now() - Duration::days(7);
        let acute: Vec<usize> = logs
            .iter()
            .enumerate()
            .filter(|(_, l)| l.date > cutoff)
            .map(|(i, _)| i)
            .collect();
        prop_assume!(!acute.is_empty());

        let before = calculator.workload(&logs, now()).unwrap().ratio.unwrap();

        let mut heavier = logs.clone();
        let target = acute[pick.index(acute.len())];
        heavier[target].duration += Decimal::from(extra);
        let after = calculator.workload(&heavier, now()).unwrap().ratio.unwrap();

        prop_assert!(after >= before);
    }

    #[test]
    fn test_calculations_are_idempotent(logs in sessions(0..40), joined_hours in 0i64..1000) {
        prop_assert_eq!(calculate_acwr(&logs, now()), calculate_acwr(&logs, now()));
        prop_assert_eq!(calculate_recovery_score(&logs), calculate_recovery_score(&logs));

        let joined = now() - Duration::hours(joined_hours);
        prop_assert_eq!(
            get_calibration_status(joined, now()),
            get_calibration_status(joined, now())
        );
    }

    #[test]
    fn test_recovery_value_is_bounded(logs in sessions(7..30)) {
        let insight = calculate_recovery_score(&logs);
        let score: u32 = insight.value.trim_end_matches('%').parse().unwrap();
        prop_assert!(score <= 100);
    }
}
