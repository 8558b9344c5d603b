//! Streak and metrics calculator
//!
//! Pure functions of a habit's completion set and the clock. Every surface
//! (CLI, achievements, milestones, recovery, export) derives its numbers
//! from here.

mod analytics;
mod difficulty;
mod streaks;
mod suggestions;

pub use analytics::{
    best_performing_days, completion_trend, habit_performance, monthly_stats, overall_stats,
    trend_direction, HabitPerformance, MonthStats, OverallStats, TrendDirection, TrendPoint,
    WeekdayStats,
};
pub use difficulty::{suggest_difficulty_change, DifficultySuggestion, SuggestionKind};
pub use streaks::{
    completion_rate, completion_rate_between, current_streak, current_streak_bridged,
    days_since_creation, habit_metrics, longest_streak, max_current_streak, total_completions,
    HabitMetrics,
};
pub(crate) use streaks::rounded_percent;
pub use suggestions::{
    analyze_patterns, smart_suggestions, DayRate, HabitPatterns, HabitRate, SmartSuggestion,
    SuggestionCategory, STRUGGLING_RATE, SUCCESS_RATE,
};
