//! Streak, completion-rate, and longest-run calculations
//!
//! Convention: an incomplete "today" does not break a streak. If today has
//! no completion yet, the walk starts from yesterday.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Local, NaiveDate, Utc};

use crate::domain::Habit;

/// Derived numbers for a single habit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HabitMetrics {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub completion_rate: u32,
    pub days_since_creation: u32,
    pub total_completions: u32,
}

/// Consecutive completed days ending today (or yesterday, if today is not
/// completed yet)
pub fn current_streak(completions: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    current_streak_bridged(completions, today, &BTreeSet::new())
}

/// Like [`current_streak`], but `bridged` days (streak savers, vacation)
/// neither count nor break the run.
pub fn current_streak_bridged(
    completions: &BTreeSet<NaiveDate>,
    today: NaiveDate,
    bridged: &BTreeSet<NaiveDate>,
) -> u32 {
    let Some(earliest) = completions.first().copied() else {
        return 0;
    };

    let mut day = if completions.contains(&today) {
        today
    } else {
        today - Duration::days(1)
    };

    let mut streak = 0;
    while day >= earliest {
        if completions.contains(&day) {
            streak += 1;
        } else if !bridged.contains(&day) {
            break;
        }
        day -= Duration::days(1);
    }
    streak
}

/// Longest run of consecutive completed days anywhere in the history
pub fn longest_streak(completions: &BTreeSet<NaiveDate>) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    let mut prev: Option<NaiveDate> = None;

    // Walk newest to oldest
    for &date in completions.iter().rev() {
        run = match prev {
            Some(p) if (p - date).num_days() == 1 => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        prev = Some(date);
    }
    longest
}

/// `floor((now - createdAt) / 1 day) + 1`, never less than 1
pub fn days_since_creation(created_at: DateTime<Utc>, now: DateTime<Local>) -> u32 {
    let elapsed = now.with_timezone(&Utc) - created_at;
    let days = elapsed.num_milliseconds().div_euclid(86_400_000) + 1;
    days.max(1) as u32
}

/// Percentage of days since creation with a completion, clamped to 0..=100
pub fn completion_rate(habit: &Habit, now: DateTime<Local>) -> u32 {
    let days = days_since_creation(habit.created_at, now);
    rounded_percent(habit.completion_count() as u64, days as u64)
}

/// Completion percentage over an explicit inclusive date window
pub fn completion_rate_between(habit: &Habit, from: NaiveDate, to: NaiveDate) -> u32 {
    if to < from {
        return 0;
    }
    let window = (to - from).num_days() as u64 + 1;
    let done = habit.completions.range(from..=to).count() as u64;
    rounded_percent(done, window)
}

pub(crate) fn rounded_percent(part: u64, whole: u64) -> u32 {
    if whole == 0 {
        return 0;
    }
    let pct = (100.0 * part as f64 / whole as f64).round();
    pct.clamp(0.0, 100.0) as u32
}

/// All derived numbers for a habit at `now`
pub fn habit_metrics(habit: &Habit, now: DateTime<Local>) -> HabitMetrics {
    let today = now.date_naive();
    HabitMetrics {
        current_streak: current_streak(&habit.completions, today),
        longest_streak: longest_streak(&habit.completions),
        completion_rate: completion_rate(habit, now),
        days_since_creation: days_since_creation(habit.created_at, now),
        total_completions: habit.completion_count() as u32,
    }
}

/// Best current streak across a collection
pub fn max_current_streak(habits: &[Habit], today: NaiveDate) -> u32 {
    habits
        .iter()
        .map(|h| current_streak(&h.completions, today))
        .max()
        .unwrap_or(0)
}

/// Total completed habit-days across a collection
pub fn total_completions(habits: &[Habit]) -> u64 {
    habits.iter().map(|h| h.completion_count() as u64).sum()
}
