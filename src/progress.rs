//! Athlete progress indicators shown around the scoring engine: level,
//! week-over-week volume, the 7-day duration chart, sport mix, the recent
//! intensity trend and overall totals.

use crate::models::{format_fixed, SportType, TrainingLog};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Experience tier earned by total session count
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AthleteLevel {
    Rookie,
    Amateur,
    Advanced,
    Elite,
    Pro,
}

impl AthleteLevel {
    pub fn from_sessions(sessions: usize) -> Self {
        if sessions >= 50 {
            AthleteLevel::Pro
        } else if sessions >= 31 {
            AthleteLevel::Elite
        } else if sessions >= 16 {
            AthleteLevel::Advanced
        } else if sessions >= 6 {
            AthleteLevel::Amateur
        } else {
            AthleteLevel::Rookie
        }
    }
}

impl fmt::Display for AthleteLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AthleteLevel::Rookie => write!(f, "Rookie"),
            AthleteLevel::Amateur => write!(f, "Amateur"),
            AthleteLevel::Advanced => write!(f, "Advanced"),
            AthleteLevel::Elite => write!(f, "Elite"),
            AthleteLevel::Pro => write!(f, "Pro"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelProgress {
    pub level: AthleteLevel,

    /// Progress through the current block of ten sessions
    pub xp_percent: u8,

    pub total_sessions: usize,
}

impl LevelProgress {
    pub fn from_logs(logs: &[TrainingLog]) -> Self {
        let total_sessions = logs.len();
        LevelProgress {
            level: AthleteLevel::from_sessions(total_sessions),
            xp_percent: ((total_sessions % 10) * 10) as u8,
            total_sessions,
        }
    }
}

/// This week's training volume against last week's
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "trend", content = "percent", rename_all = "camelCase")]
pub enum VolumeTrend {
    NotEnoughData,
    Surge(i64),
    Deload(i64),
    Steady,
}

impl VolumeTrend {
    pub fn narrative(&self) -> String {
        match self {
            VolumeTrend::NotEnoughData => {
                "Your performance story is just beginning. Every session counts.".to_string()
            }
            VolumeTrend::Surge(pct) => format!(
                "Dominant week! You've surged {}% in volume. Consistency is your superpower right now.",
                pct
            ),
            VolumeTrend::Deload(pct) => format!(
                "Strategic deload? Volume is down {}%. Use this time to sharpen your technique.",
                pct
            ),
            VolumeTrend::Steady => {
                "Steady as a rock. You matched your weekly volume exactly. That's true athletic discipline."
                    .to_string()
            }
        }
    }
}

/// Summed duration of logs dated within `[start, end]`
fn duration_between(logs: &[TrainingLog], start: DateTime<Utc>, end: DateTime<Utc>) -> Decimal {
    logs.iter()
        .filter(|log| log.date >= start && log.date <= end)
        .map(|log| log.duration)
        .sum()
}

/// Compare minutes trained in the last 7 days with the 7 days before
pub fn weekly_volume_trend(logs: &[TrainingLog], now: DateTime<Utc>) -> VolumeTrend {
    if logs.len() < 2 {
        return VolumeTrend::NotEnoughData;
    }

    let week_ago = now - Duration::days(7);
    let this_week = duration_between(logs, week_ago, now);
    let last_week = duration_between(logs, now - Duration::days(14), week_ago);

    let diff = if last_week > Decimal::ZERO {
        // Half-up rounding, including for negative changes
        ((this_week - last_week) / last_week * Decimal::ONE_HUNDRED + Decimal::new(5, 1))
            .floor()
            .to_i64()
            .unwrap_or(0)
    } else {
        0
    };

    match diff {
        d if d > 0 => VolumeTrend::Surge(d),
        d if d < 0 => VolumeTrend::Deload(-d),
        _ => VolumeTrend::Steady,
    }
}

/// Minutes trained on one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyVolume {
    pub date: NaiveDate,

    /// Abbreviated weekday name ("Mon")
    pub weekday: String,

    pub duration_minutes: Decimal,
}

/// One entry per calendar day for the 7 days ending today, oldest first
pub fn weekly_durations(logs: &[TrainingLog], now: DateTime<Utc>) -> Vec<DailyVolume> {
    let today = now.date_naive();

    (0..7)
        .rev()
        .filter_map(|offset| today.checked_sub_days(chrono::Days::new(offset)))
        .map(|date| DailyVolume {
            date,
            weekday: date.format("%a").to_string(),
            duration_minutes: logs
                .iter()
                .filter(|log| log.date.date_naive() == date)
                .map(|log| log.duration)
                .sum(),
        })
        .collect()
}

/// Number of sessions logged for one sport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SportShare {
    pub sport: SportType,
    pub sessions: usize,
}

/// Session count per sport, most practised first
///
/// Sports with equal counts keep the order in which they first appear.
pub fn sport_distribution(logs: &[TrainingLog]) -> Vec<SportShare> {
    let mut shares: Vec<SportShare> = Vec::new();
    for log in logs {
        match shares.iter_mut().find(|share| share.sport == log.sport_type) {
            Some(share) => share.sessions += 1,
            None => shares.push(SportShare {
                sport: log.sport_type,
                sessions: 1,
            }),
        }
    }
    shares.sort_by(|a, b| b.sessions.cmp(&a.sessions));
    shares
}

/// Sessions plotted on the intensity trend chart
pub const INTENSITY_TREND_SESSIONS: usize = 10;

/// One session on the intensity trend chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntensityPoint {
    pub date: DateTime<Utc>,
    pub intensity: Decimal,
    pub duration: Decimal,
}

/// The most recent `limit` sessions, newest first
pub fn intensity_trend(logs: &[TrainingLog], limit: usize) -> Vec<IntensityPoint> {
    let mut recent: Vec<&TrainingLog> = logs.iter().collect();
    recent.sort_by(|a, b| b.date.cmp(&a.date));

    recent
        .into_iter()
        .take(limit)
        .map(|log| IntensityPoint {
            date: log.date,
            intensity: log.intensity,
            duration: log.duration,
        })
        .collect()
}

/// Lifetime totals for the analytics view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingSummary {
    pub sessions: usize,

    /// Mean intensity, one decimal; `None` without sessions
    pub average_intensity: Option<Decimal>,

    /// Total training time in whole hours
    pub total_hours: Decimal,
}

impl TrainingSummary {
    pub fn from_logs(logs: &[TrainingLog]) -> Self {
        let sessions = logs.len();

        let average_intensity = (sessions > 0).then(|| {
            let mean = logs.iter().map(|log| log.intensity).sum::<Decimal>()
                / Decimal::from(sessions);
            mean.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
        });

        let total_minutes: Decimal = logs.iter().map(|log| log.duration).sum();
        let total_hours = (total_minutes / Decimal::from(60))
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

        TrainingSummary {
            sessions,
            average_intensity,
            total_hours,
        }
    }
}

impl fmt::Display for TrainingSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let intensity = self
            .average_intensity
            .map(|i| format_fixed(i, 1))
            .unwrap_or_else(|| "-".to_string());
        write!(
            f,
            "{} sessions, avg intensity {}, {}h total",
            self.sessions, intensity, self.total_hours
        )
    }
}
