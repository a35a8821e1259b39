//! Achievement badges
//!
//! Streak badges unlock at fixed streak lengths and report progress toward
//! them. Performance badges unlock once any single session crosses a
//! sport-specific metric threshold.

use crate::models::{SportType, TrainingLog};
use crate::streak::current_streak;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Points awarded per unlocked streak badge
pub const STREAK_BADGE_POINTS: u32 = 100;

/// Points awarded per unlocked performance badge
pub const PERFORMANCE_BADGE_POINTS: u32 = 250;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BadgeCategory {
    Streak,
    Performance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: BadgeCategory,
    pub unlocked: bool,

    /// Percent progress toward unlocking, streak badges only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<Decimal>,
}

struct StreakMilestone {
    id: &'static str,
    name: &'static str,
    days: u32,
}

const STREAK_MILESTONES: [StreakMilestone; 3] = [
    StreakMilestone {
        id: "s7",
        name: "Week Warrior",
        days: 7,
    },
    StreakMilestone {
        id: "s30",
        name: "Monthly Master",
        days: 30,
    },
    StreakMilestone {
        id: "s90",
        name: "Quarterly King",
        days: 90,
    },
];

fn streak_badges(streak: u32) -> Vec<Badge> {
    STREAK_MILESTONES
        .iter()
        .map(|milestone| {
            let progress = (Decimal::from(streak) / Decimal::from(milestone.days)
                * Decimal::ONE_HUNDRED)
                .min(Decimal::ONE_HUNDRED);
            Badge {
                id: milestone.id.to_string(),
                name: milestone.name.to_string(),
                description: format!("Achieve a {}-day training streak.", milestone.days),
                category: BadgeCategory::Streak,
                unlocked: streak >= milestone.days,
                progress: Some(progress),
            }
        })
        .collect()
}

/// Heaviest-lift threshold in kg for the gym badge
const IRON_TITAN_KG: f64 = 80.0;
const SPEED_DEMON_KM: f64 = 10.0;
const ELITE_TALENT_RATING: f64 = 9.0;

/// Session rating, preferring `performance` over `skill`
fn session_rating(log: &TrainingLog) -> f64 {
    log.metric_number("performance")
        .filter(|rating| *rating != 0.0)
        .or_else(|| log.metric_number("skill"))
        .unwrap_or(0.0)
}

fn performance_badges(logs: &[TrainingLog]) -> Vec<Badge> {
    let iron_titan = logs.iter().any(|log| {
        log.sport_type == SportType::Gym
            && log.metric_number("weight").unwrap_or(0.0) >= IRON_TITAN_KG
    });
    let speed_demon = logs.iter().any(|log| {
        log.sport_type == SportType::Running
            && log.metric_number("distance").unwrap_or(0.0) >= SPEED_DEMON_KM
    });
    let elite_talent = logs
        .iter()
        .any(|log| session_rating(log) >= ELITE_TALENT_RATING);

    let badge = |id: &str, name: &str, description: &str, unlocked: bool| Badge {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        category: BadgeCategory::Performance,
        unlocked,
        progress: None,
    };

    vec![
        badge(
            "p_gym",
            "Iron Titan",
            "Lift 80kg or more in a single session.",
            iron_titan,
        ),
        badge(
            "p_run",
            "Speed Demon",
            "Complete a 10km run session.",
            speed_demon,
        ),
        badge(
            "p_skill",
            "Elite Talent",
            "Achieve a 9+ performance rating.",
            elite_talent,
        ),
    ]
}

/// All badges for an athlete's logs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeBoard {
    pub streak: Vec<Badge>,
    pub performance: Vec<Badge>,
}

impl BadgeBoard {
    pub fn evaluate(logs: &[TrainingLog], now: DateTime<Utc>) -> Self {
        BadgeBoard {
            streak: streak_badges(current_streak(logs, now)),
            performance: performance_badges(logs),
        }
    }

    pub fn unlocked(&self) -> impl Iterator<Item = &Badge> {
        self.streak
            .iter()
            .chain(self.performance.iter())
            .filter(|badge| badge.unlocked)
    }

    /// Achievement points for every unlocked badge
    pub fn points(&self) -> u32 {
        self.unlocked()
            .map(|badge| match badge.category {
                BadgeCategory::Streak => STREAK_BADGE_POINTS,
                BadgeCategory::Performance => PERFORMANCE_BADGE_POINTS,
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MetricValue;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 30, 18, 0, 0).unwrap()
    }

    fn create_test_log(days_ago: i64, sport: SportType, metrics: &[(&str, f64)]) -> TrainingLog {
        TrainingLog {
            id: format!("log_{}", days_ago),
            athlete_id: "test_athlete".to_string(),
            date: now() - Duration::days(days_ago),
            sport_type: sport,
            training_type: Default::default(),
            duration: dec!(60),
            intensity: dec!(6),
            sleep_hours: None,
            resting_heart_rate: None,
            metrics: metrics
                .iter()
                .map(|(k, v)| (k.to_string(), MetricValue::Number(*v)))
                .collect(),
            notes: String::new(),
        }
    }

    #[test]
    fn test_streak_badges() {
        let logs: Vec<_> = (0..8)
            .map(|d| create_test_log(d, SportType::Running, &[]))
            .collect();

        let board = BadgeBoard::evaluate(&logs, now());
        assert!(board.streak[0].unlocked);
        assert_eq!(board.streak[0].progress, Some(dec!(100)));
        assert!(!board.streak[1].unlocked);
        assert_eq!(
            board.streak[1].progress.unwrap().round_dp(2),
            dec!(26.67)
        );
        assert_eq!(board.points(), STREAK_BADGE_POINTS);
    }

    #[test]
    fn test_performance_badges() {
        let logs = vec![
            create_test_log(40, SportType::Gym, &[("weight", 85.0)]),
            create_test_log(41, SportType::Cycling, &[("distance", 40.0)]),
            create_test_log(42, SportType::Cricket, &[("performance", 0.0), ("skill", 9.0)]),
        ];

        let board = BadgeBoard::evaluate(&logs, now());
        let unlocked: Vec<_> = board.unlocked().map(|b| b.id.as_str()).collect();
        assert_eq!(unlocked, vec!["p_gym", "p_skill"]);
        assert_eq!(board.points(), 2 * PERFORMANCE_BADGE_POINTS);
    }

    #[test]
    fn test_running_distance_badge() {
        let short = vec![create_test_log(3, SportType::Running, &[("distance", 9.9)])];
        assert!(!BadgeBoard::evaluate(&short, now()).performance[1].unlocked);

        let long = vec![create_test_log(3, SportType::Running, &[("distance", 10.0)])];
        assert!(BadgeBoard::evaluate(&long, now()).performance[1].unlocked);
    }

    #[test]
    fn test_empty_board() {
        let board = BadgeBoard::evaluate(&[], now());
        assert_eq!(board.streak.len(), 3);
        assert_eq!(board.performance.len(), 3);
        assert_eq!(board.points(), 0);
    }
}
