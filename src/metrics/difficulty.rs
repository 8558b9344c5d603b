//! Habit difficulty suggestions from recent completion

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::domain::{Habit, HabitDifficulty};

const WINDOW_DAYS: i64 = 14;
const INCREASE_ABOVE: f64 = 0.85;
const DECREASE_BELOW: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Increase,
    Decrease,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DifficultySuggestion {
    pub kind: SuggestionKind,
    pub current: HabitDifficulty,
    pub suggested: HabitDifficulty,
    /// Completion percentage over the window
    pub completion_rate: u32,
    pub reason: String,
}

/// Suggest one step harder when the last 14 days are above 85% complete,
/// one step easier when below 40%.
pub fn suggest_difficulty_change(
    habit: &Habit,
    current: HabitDifficulty,
    today: NaiveDate,
) -> Option<DifficultySuggestion> {
    let from = today - Duration::days(WINDOW_DAYS - 1);
    let done = habit.completions.range(from..=today).count();
    let ratio = done as f64 / WINDOW_DAYS as f64;
    let pct = (ratio * 100.0).round() as u32;

    if ratio > INCREASE_ABOVE {
        let suggested = current.harder()?;
        return Some(DifficultySuggestion {
            kind: SuggestionKind::Increase,
            current,
            suggested,
            completion_rate: pct,
            reason: format!("You're crushing it! {pct}% completion rate."),
        });
    }

    if ratio < DECREASE_BELOW {
        let suggested = current.easier()?;
        return Some(DifficultySuggestion {
            kind: SuggestionKind::Decrease,
            current,
            suggested,
            completion_rate: pct,
            reason: format!("Let's make this easier. {pct}% completion rate."),
        });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn habit_with_days(today: NaiveDate, days: i64) -> Habit {
        let mut h = Habit::new("Run", Utc::now()).unwrap();
        for i in 0..days {
            h.toggle(today - Duration::days(i));
        }
        h
    }

    #[test]
    fn test_suggests_increase_when_consistent() {
        let today = date(2024, 3, 20);
        let habit = habit_with_days(today, 13);
        let s = suggest_difficulty_change(&habit, HabitDifficulty::Normal, today).unwrap();
        assert_eq!(s.kind, SuggestionKind::Increase);
        assert_eq!(s.suggested, HabitDifficulty::Hard);
        assert_eq!(s.completion_rate, 93);
    }

    #[test]
    fn test_suggests_decrease_when_struggling() {
        let today = date(2024, 3, 20);
        let habit = habit_with_days(today, 2);
        let s = suggest_difficulty_change(&habit, HabitDifficulty::Easy, today).unwrap();
        assert_eq!(s.kind, SuggestionKind::Decrease);
        assert_eq!(s.suggested, HabitDifficulty::VeryEasy);
    }

    #[test]
    fn test_no_suggestion_at_bounds_or_middle() {
        let today = date(2024, 3, 20);
        assert!(
            suggest_difficulty_change(&habit_with_days(today, 14), HabitDifficulty::VeryHard, today)
                .is_none()
        );
        assert!(
            suggest_difficulty_change(&habit_with_days(today, 0), HabitDifficulty::VeryEasy, today)
                .is_none()
        );
        assert!(
            suggest_difficulty_change(&habit_with_days(today, 8), HabitDifficulty::Normal, today)
                .is_none()
        );
    }
}
