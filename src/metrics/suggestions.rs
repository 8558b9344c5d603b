//! Pattern analysis and prioritized suggestions over the habit collection
//!
//! Suggestion ids are stable for the situation they describe (a habit, a
//! weekday, a trend), so a dismissed suggestion stays dismissed until the
//! situation changes.

use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, Timelike, Weekday};
use serde::Serialize;

use super::analytics::{trend_direction, TrendDirection};
use super::streaks::{completion_rate, current_streak, rounded_percent};
use crate::calendar::{day_key, weekday_name};
use crate::domain::Habit;

/// Habits above this completion rate are going well
pub const SUCCESS_RATE: u32 = 70;

/// Habits below this completion rate are struggling
pub const STRUGGLING_RATE: u32 = 40;

const WEAK_DAY_RATE: u32 = 50;
const PATTERN_WINDOW_DAYS: i64 = 30;
const MAX_SUGGESTIONS: usize = 5;
const STREAK_MILESTONES: [u32; 5] = [7, 30, 50, 100, 365];

/// Name keywords and the habits that pair well with them
const COMPLEMENTS: &[(&str, [&str; 3])] = &[
    ("exercise", ["Meditation", "Healthy eating", "Stretching"]),
    ("meditation", ["Journaling", "Reading", "Gratitude practice"]),
    ("reading", ["Writing", "Learning", "Creative time"]),
    ("productivity", ["Break time", "Exercise", "Sleep routine"]),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayRate {
    pub weekday: Weekday,
    pub rate: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HabitRate {
    pub id: String,
    pub name: String,
    pub rate: u32,
}

/// What the last weeks of completions say about the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HabitPatterns {
    pub best_day: Option<DayRate>,
    pub worst_day: Option<DayRate>,
    pub average_rate: u32,
    pub trend: TrendDirection,
    pub successful: Vec<HabitRate>,
    pub struggling: Vec<HabitRate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuggestionCategory {
    GettingStarted,
    DifficultyAdjustment,
    ScheduleOptimization,
    Motivation,
    Challenge,
    TimeReminder,
    Complementary,
    Milestone,
    Bundle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartSuggestion {
    pub id: String,
    pub category: SuggestionCategory,
    pub title: String,
    pub description: String,
    /// 1 is most urgent
    pub priority: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub habit_id: Option<String>,
}

impl SmartSuggestion {
    fn new(
        id: impl Into<String>,
        category: SuggestionCategory,
        priority: u8,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            category,
            title: title.into(),
            description: description.into(),
            priority,
            habit_id: None,
        }
    }

    fn for_habit(mut self, habit_id: &str) -> Self {
        self.habit_id = Some(habit_id.to_string());
        self
    }
}

/// Completion ratio per weekday over the last 30 days, Sunday first
fn weekday_rates(habits: &[Habit], today: NaiveDate) -> Vec<DayRate> {
    let mut completions = [0u64; 7];
    let mut totals = [0u64; 7];
    for offset in 0..PATTERN_WINDOW_DAYS {
        let date = today - Duration::days(offset);
        let idx = date.weekday().num_days_from_sunday() as usize;
        totals[idx] += habits.len() as u64;
        completions[idx] += habits.iter().filter(|h| h.is_completed(date)).count() as u64;
    }

    [
        Weekday::Sun,
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
    ]
    .into_iter()
    .enumerate()
    .filter(|(idx, _)| totals[*idx] > 0)
    .map(|(idx, weekday)| DayRate {
        weekday,
        rate: rounded_percent(completions[idx], totals[idx]),
    })
    .collect()
}

/// Analyze completion patterns. `None` without habits.
pub fn analyze_patterns(habits: &[Habit], now: DateTime<Local>) -> Option<HabitPatterns> {
    if habits.is_empty() {
        return None;
    }
    let today = now.date_naive();

    let rates: Vec<HabitRate> = habits
        .iter()
        .map(|h| HabitRate {
            id: h.id.clone(),
            name: h.name.clone(),
            rate: completion_rate(h, now),
        })
        .collect();
    let average_rate =
        rounded_percent(rates.iter().map(|r| r.rate as u64).sum(), 100 * rates.len() as u64);

    let days = weekday_rates(habits, today);
    // Ties go to the earliest weekday, Sunday first
    let best_day = days.iter().copied().reduce(|best, d| if d.rate > best.rate { d } else { best });
    let worst_day = days.iter().copied().reduce(|worst, d| if d.rate < worst.rate { d } else { worst });

    Some(HabitPatterns {
        best_day,
        worst_day,
        average_rate,
        trend: trend_direction(habits, today),
        successful: rates.iter().filter(|r| r.rate > SUCCESS_RATE).cloned().collect(),
        struggling: rates.into_iter().filter(|r| r.rate < STRUGGLING_RATE).collect(),
    })
}

/// Up to five suggestions, most urgent first, skipping `dismissed` ids
pub fn smart_suggestions(
    habits: &[Habit],
    now: DateTime<Local>,
    dismissed: &BTreeSet<String>,
) -> Vec<SmartSuggestion> {
    let Some(patterns) = analyze_patterns(habits, now) else {
        return vec![SmartSuggestion::new(
            "welcome",
            SuggestionCategory::GettingStarted,
            1,
            "Welcome to HabitQuest!",
            "Start by creating your first habit. Begin with something small and achievable.",
        )];
    };
    let today = now.date_naive();
    let mut out = Vec::new();

    if let Some(habit) = patterns.struggling.first() {
        out.push(
            SmartSuggestion::new(
                format!("struggling-{}", habit.id),
                SuggestionCategory::DifficultyAdjustment,
                1,
                "Lower the barrier to success",
                format!(
                    "You're struggling with \"{}\". Consider breaking it into smaller steps or adjusting the difficulty.",
                    habit.name
                ),
            )
            .for_habit(&habit.id),
        );
    }

    if let Some(worst) = patterns.worst_day.filter(|d| d.rate < WEAK_DAY_RATE) {
        let day = weekday_name(worst.weekday);
        out.push(SmartSuggestion::new(
            format!("weak-day-{}", day.to_lowercase()),
            SuggestionCategory::ScheduleOptimization,
            2,
            format!("Improve your {}s", day),
            format!(
                "{} is your weakest day ({}% completion). Try scheduling easier habits or setting reminders.",
                day, worst.rate
            ),
        ));
    }

    match patterns.trend {
        TrendDirection::Declining => out.push(SmartSuggestion::new(
            "trend-declining",
            SuggestionCategory::Motivation,
            1,
            "Momentum is slipping",
            "Your completion rate has dropped recently. Consider Vacation Mode or reviewing your goals.",
        )),
        TrendDirection::Improving => out.push(SmartSuggestion::new(
            "trend-improving",
            SuggestionCategory::Challenge,
            3,
            "You're on fire!",
            "Your consistency is improving. Ready to level up? Add a challenging habit or build a bundle.",
        )),
        TrendDirection::Stable => {}
    }

    if (6..10).contains(&now.hour()) {
        let pending = habits.iter().filter(|h| !h.is_completed(today)).count();
        if pending > 0 {
            out.push(SmartSuggestion::new(
                format!("morning-{}", day_key(today)),
                SuggestionCategory::TimeReminder,
                2,
                "Perfect time for morning habits",
                format!(
                    "You have {} habit{} to complete today. Start your day strong!",
                    pending,
                    if pending == 1 { "" } else { "s" }
                ),
            ));
        }
    }

    let lower_names: Vec<String> = habits.iter().map(|h| h.name.to_lowercase()).collect();
    for (keyword, complements) in COMPLEMENTS {
        let Some(habit) = habits
            .iter()
            .zip(&lower_names)
            .find(|(_, name)| name.contains(keyword))
            .map(|(h, _)| h)
        else {
            continue;
        };
        let paired = complements.iter().any(|c| {
            let c = c.to_lowercase();
            lower_names.iter().any(|name| name.contains(&c))
        });
        if !paired {
            out.push(SmartSuggestion::new(
                format!("complement-{}", keyword),
                SuggestionCategory::Complementary,
                3,
                format!("Pair with {}", complements[0]),
                format!(
                    "You track \"{}\". {} complements it well.",
                    habit.name, complements[0]
                ),
            ));
        }
    }

    for habit in habits {
        let streak = current_streak(&habit.completions, today);
        let Some(next) = STREAK_MILESTONES.iter().copied().find(|m| *m > streak) else {
            continue;
        };
        let left = next - streak;
        if left <= 3 {
            out.push(
                SmartSuggestion::new(
                    format!("milestone-{}-{}", habit.id, next),
                    SuggestionCategory::Milestone,
                    2,
                    format!("{} days to milestone!", left),
                    format!(
                        "Keep going with \"{}\". You're {} day{} away from a {}-day streak!",
                        habit.name,
                        left,
                        if left == 1 { "" } else { "s" },
                        next
                    ),
                )
                .for_habit(&habit.id),
            );
        }
    }

    if habits.len() >= 3 {
        let morning = lower_names
            .iter()
            .filter(|n| n.contains("morning") || n.contains("breakfast"))
            .count();
        if morning >= 2 {
            out.push(SmartSuggestion::new(
                "bundle-morning",
                SuggestionCategory::Bundle,
                3,
                "Create a morning bundle",
                "Stack your morning habits together for better consistency and bonus XP.",
            ));
        }
    }

    out.retain(|s| !dismissed.contains(&s.id));
    out.sort_by_key(|s| s.priority);
    out.truncate(MAX_SUGGESTIONS);
    out
}
