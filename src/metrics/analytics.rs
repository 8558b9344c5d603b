//! Aggregate analytics over the habit collection

use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, Weekday};
use serde::Serialize;

use super::streaks::{
    completion_rate, current_streak, days_since_creation, longest_streak, rounded_percent,
};
use crate::calendar::{month_key, month_start_back, weekday_short};
use crate::domain::Habit;

/// One day of the completion trend
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub completed: u32,
    pub total: u32,
    pub percentage: u32,
}

/// Completion ratio for a weekday across all habits
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayStats {
    pub weekday: Weekday,
    pub day_name: &'static str,
    pub completions: u32,
    /// Habit-days on this weekday between each habit's creation and today
    pub opportunities: u32,
    pub average: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HabitPerformance {
    pub id: String,
    pub name: String,
    pub total_completions: u32,
    pub completion_rate: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub days_since_creation: u32,
    pub last_completed: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthStats {
    /// "YYYY-MM"
    pub month: String,
    pub completions: u32,
    pub habits_tracked: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct OverallStats {
    pub total_habits: u32,
    pub total_completions: u64,
    pub average_completion_rate: u32,
    pub longest_streak: u32,
    pub active_days: u32,
}

/// Direction of recent completions vs the week before
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Improving,
    Declining,
    Stable,
}

impl TrendDirection {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Improving => "Improving",
            Self::Declining => "Declining",
            Self::Stable => "Stable",
        }
    }
}

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

fn completed_on(habits: &[Habit], date: NaiveDate) -> u32 {
    habits.iter().filter(|h| h.is_completed(date)).count() as u32
}

/// Per-day completion counts for the last `days` days, oldest first
pub fn completion_trend(habits: &[Habit], today: NaiveDate, days: u32) -> Vec<TrendPoint> {
    let total = habits.len() as u32;
    (0..days as i64)
        .rev()
        .map(|offset| {
            let date = today - Duration::days(offset);
            let completed = completed_on(habits, date);
            TrendPoint {
                date,
                completed,
                total,
                percentage: rounded_percent(completed as u64, total as u64),
            }
        })
        .collect()
}

/// Weekdays ranked by completion ratio, best first
pub fn best_performing_days(habits: &[Habit], now: DateTime<Local>) -> Vec<WeekdayStats> {
    let today = now.date_naive();
    let mut completions = [0u32; 7];
    let mut opportunities = [0u32; 7];

    for habit in habits {
        for date in habit.completions.range(..=today) {
            completions[date.weekday().num_days_from_sunday() as usize] += 1;
        }

        let created = habit.created_at.with_timezone(&Local).date_naive();
        let start = created.min(habit.completions.first().copied().unwrap_or(created));
        let mut day = start;
        while day <= today {
            opportunities[day.weekday().num_days_from_sunday() as usize] += 1;
            day += Duration::days(1);
        }
    }

    let mut stats: Vec<WeekdayStats> = (0..7)
        .map(|i| {
            let weekday = WEEKDAYS[i];
            WeekdayStats {
                weekday,
                day_name: weekday_short(weekday),
                completions: completions[i],
                opportunities: opportunities[i],
                average: if opportunities[i] > 0 {
                    completions[i] as f64 / opportunities[i] as f64
                } else {
                    0.0
                },
            }
        })
        .collect();

    stats.sort_by(|a, b| b.average.total_cmp(&a.average));
    stats
}

/// Per-habit performance, sorted by completion rate (highest first)
pub fn habit_performance(habits: &[Habit], now: DateTime<Local>) -> Vec<HabitPerformance> {
    let today = now.date_naive();
    let mut rows: Vec<HabitPerformance> = habits
        .iter()
        .map(|h| HabitPerformance {
            id: h.id.clone(),
            name: h.name.clone(),
            total_completions: h.completion_count() as u32,
            completion_rate: completion_rate(h, now),
            current_streak: current_streak(&h.completions, today),
            longest_streak: longest_streak(&h.completions),
            days_since_creation: days_since_creation(h.created_at, now),
            last_completed: h.last_completed(),
        })
        .collect();

    rows.sort_by(|a, b| b.completion_rate.cmp(&a.completion_rate));
    rows
}

/// Completion totals for the last six calendar months, oldest first
pub fn monthly_stats(habits: &[Habit], today: NaiveDate) -> Vec<MonthStats> {
    (0..6u32)
        .rev()
        .map(|back| {
            let key = month_key(month_start_back(today, back));
            let completions = habits
                .iter()
                .flat_map(|h| h.completions.iter())
                .filter(|d| month_key(**d) == key)
                .count() as u32;
            MonthStats {
                month: key,
                completions,
                habits_tracked: habits.len() as u32,
            }
        })
        .collect()
}

/// Headline numbers for the whole collection
pub fn overall_stats(habits: &[Habit], now: DateTime<Local>) -> OverallStats {
    if habits.is_empty() {
        return OverallStats::default();
    }

    let today = now.date_naive();
    let rate_sum: f64 = habits
        .iter()
        .map(|h| {
            let days = days_since_creation(h.created_at, now) as f64;
            (h.completion_count() as f64 / days).min(1.0)
        })
        .sum();

    let active_days: BTreeSet<NaiveDate> = habits
        .iter()
        .flat_map(|h| h.completions.iter().copied())
        .collect();

    OverallStats {
        total_habits: habits.len() as u32,
        total_completions: habits.iter().map(|h| h.completion_count() as u64).sum(),
        average_completion_rate: (rate_sum / habits.len() as f64 * 100.0).round() as u32,
        longest_streak: habits
            .iter()
            .map(|h| current_streak(&h.completions, today))
            .max()
            .unwrap_or(0),
        active_days: active_days.len() as u32,
    }
}

/// Compare the last 7 days' average completions to the 7 days before.
/// More than 10% above is improving, more than 10% below is declining.
pub fn trend_direction(habits: &[Habit], today: NaiveDate) -> TrendDirection {
    let window_avg = |skip: i64| -> f64 {
        let sum: u32 = (skip..skip + 7)
            .map(|offset| completed_on(habits, today - Duration::days(offset)))
            .sum();
        sum as f64 / 7.0
    };

    let recent = window_avg(0);
    let previous = window_avg(7);

    if recent > previous * 1.1 {
        TrendDirection::Improving
    } else if recent < previous * 0.9 {
        TrendDirection::Declining
    } else {
        TrendDirection::Stable
    }
}
