//! Consecutive-day training streak

use crate::models::TrainingLog;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeSet;

/// Number of consecutive calendar days (UTC) with at least one session,
/// counted back from the most recent training day
///
/// The streak is broken (0) when the most recent training day is more than
/// one day before `now`, so a streak survives until the end of the day after
/// the last session.
pub fn current_streak(logs: &[TrainingLog], now: DateTime<Utc>) -> u32 {
    let days: BTreeSet<NaiveDate> = logs.iter().map(|log| log.date.date_naive()).collect();

    let mut newest_first = days.iter().rev();
    let Some(&latest) = newest_first.next() else {
        return 0;
    };

    if (now.date_naive() - latest).num_days() > 1 {
        return 0;
    }

    let mut streak = 1;
    let mut previous = latest;
    for &day in newest_first {
        if (previous - day).num_days() != 1 {
            break;
        }
        streak += 1;
        previous = day;
    }

    streak
}

/// Encouragement shown next to the streak counter
pub fn motivational_message(streak: u32) -> &'static str {
    match streak {
        0 => "Start a new journey today!",
        1..=2 => "Great start! Keep pushing.",
        3..=6 => "Almost a full week! Power on.",
        7..=13 => "You're on fire! Unstoppable.",
        _ => "Legendary consistency!",
    }
}
