//! Achievement and milestone checking logic
//!
//! Each check takes the current numbers plus the already-unlocked ids and
//! returns only ids that are newly earned.

use chrono::{Duration, NaiveDate};

use super::definitions::AchievementId;
use super::milestones::MilestoneId;
use super::traits::{max_trait_level, TraitBook, MAX_TRAIT_LEVEL};
use crate::domain::Habit;
use crate::metrics::{max_current_streak, total_completions};

/// Snapshot of everything the unlock rules look at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressContext {
    pub habit_count: u64,
    pub max_streak: u32,
    pub total_completions: u64,
    pub perfect_week: bool,
    pub level: u32,
    pub completed_challenges: u64,
    pub max_trait_level: u32,
}

impl ProgressContext {
    pub fn gather(
        habits: &[Habit],
        today: NaiveDate,
        level: u32,
        completed_challenges: u64,
        traits: &TraitBook,
    ) -> Self {
        Self {
            habit_count: habits.len() as u64,
            max_streak: max_current_streak(habits, today),
            total_completions: total_completions(habits),
            perfect_week: is_perfect_week(habits, today),
            level,
            completed_challenges,
            max_trait_level: max_trait_level(traits),
        }
    }
}

/// All habits completed on each of the last 7 days. An unfinished today
/// shifts the window back by one day, same as a streak.
pub fn is_perfect_week(habits: &[Habit], today: NaiveDate) -> bool {
    if habits.is_empty() {
        return false;
    }
    let all_done = |date: NaiveDate| habits.iter().all(|h| h.is_completed(date));
    let end = if all_done(today) {
        today
    } else {
        today - Duration::days(1)
    };
    (0..7).all(|i| all_done(end - Duration::days(i)))
}

fn is_unlocked(unlocked: &[String], id: &str) -> bool {
    unlocked.iter().any(|u| u == id)
}

fn thresholds<const N: usize>(
    value: u64,
    table: [(u64, AchievementId); N],
    unlocked: &[String],
) -> Vec<AchievementId> {
    table
        .into_iter()
        .filter(|(threshold, id)| value >= *threshold && !is_unlocked(unlocked, id.as_str()))
        .map(|(_, id)| id)
        .collect()
}

/// Habit count achievements (1 achievement)
pub fn check_habit_achievements(habit_count: u64, unlocked: &[String]) -> Vec<AchievementId> {
    thresholds(habit_count, [(1, AchievementId::FirstHabit)], unlocked)
}

/// Streak achievements (2 achievements)
pub fn check_streak_achievements(max_streak: u32, unlocked: &[String]) -> Vec<AchievementId> {
    thresholds(
        u64::from(max_streak),
        [
            (7, AchievementId::WeekWarrior),
            (30, AchievementId::MonthMaster),
        ],
        unlocked,
    )
}

/// Completion-count and consistency achievements (2 achievements)
pub fn check_completion_achievements(
    total_completions: u64,
    perfect_week: bool,
    unlocked: &[String],
) -> Vec<AchievementId> {
    let mut newly_unlocked = thresholds(
        total_completions,
        [(100, AchievementId::CenturyClub)],
        unlocked,
    );

    if perfect_week && !is_unlocked(unlocked, AchievementId::PerfectWeek.as_str()) {
        newly_unlocked.push(AchievementId::PerfectWeek);
    }

    newly_unlocked
}

/// Level achievements (2 achievements)
pub fn check_level_achievements(level: u32, unlocked: &[String]) -> Vec<AchievementId> {
    thresholds(
        u64::from(level),
        [(10, AchievementId::Level10), (25, AchievementId::Level25)],
        unlocked,
    )
}

/// Challenge and trait achievements (2 achievements)
pub fn check_challenge_achievements(
    completed_challenges: u64,
    max_trait_level: u32,
    unlocked: &[String],
) -> Vec<AchievementId> {
    let mut newly_unlocked = thresholds(
        completed_challenges,
        [(50, AchievementId::ChallengeMaster)],
        unlocked,
    );
    newly_unlocked.extend(thresholds(
        u64::from(max_trait_level),
        [(u64::from(MAX_TRAIT_LEVEL), AchievementId::TraitSpecialist)],
        unlocked,
    ));
    newly_unlocked
}

/// Run every achievement rule against a snapshot
pub fn check_all_achievements(ctx: &ProgressContext, unlocked: &[String]) -> Vec<AchievementId> {
    let mut newly_unlocked = Vec::new();
    newly_unlocked.extend(check_habit_achievements(ctx.habit_count, unlocked));
    newly_unlocked.extend(check_streak_achievements(ctx.max_streak, unlocked));
    newly_unlocked.extend(check_completion_achievements(
        ctx.total_completions,
        ctx.perfect_week,
        unlocked,
    ));
    newly_unlocked.extend(check_level_achievements(ctx.level, unlocked));
    newly_unlocked.extend(check_challenge_achievements(
        ctx.completed_challenges,
        ctx.max_trait_level,
        unlocked,
    ));
    newly_unlocked
}

/// Milestones newly reached by a snapshot
pub fn check_milestones(ctx: &ProgressContext, unlocked: &[String]) -> Vec<MilestoneId> {
    MilestoneId::all()
        .iter()
        .copied()
        .filter(|id| !is_unlocked(unlocked, id.as_str()))
        .filter(|id| milestone_reached(*id, ctx))
        .collect()
}

fn milestone_reached(id: MilestoneId, ctx: &ProgressContext) -> bool {
    match id {
        MilestoneId::FirstHabit => ctx.habit_count >= 1,
        MilestoneId::ThreeHabits => ctx.habit_count >= 3,
        MilestoneId::FirstWeek => ctx.max_streak >= 7,
        MilestoneId::FirstMonth => ctx.max_streak >= 30,
        MilestoneId::FiftyStreak => ctx.max_streak >= 50,
        MilestoneId::HundredStreak => ctx.max_streak >= 100,
        MilestoneId::YearStreak => ctx.max_streak >= 365,
        MilestoneId::HundredDays => ctx.total_completions >= 100,
        MilestoneId::FiveHundredDays => ctx.total_completions >= 500,
        MilestoneId::PerfectWeek => ctx.perfect_week,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn habit_done_through(today: NaiveDate, days: i64) -> Habit {
        let mut h = Habit::new("h", Utc::now()).unwrap();
        for i in 0..days {
            h.toggle(today - Duration::days(i));
        }
        h
    }

    #[test]
    fn test_streak_thresholds_skip_unlocked() {
        assert_eq!(
            check_streak_achievements(30, &[]),
            vec![AchievementId::WeekWarrior, AchievementId::MonthMaster]
        );
        let unlocked = vec!["week_warrior".to_string()];
        assert_eq!(
            check_streak_achievements(30, &unlocked),
            vec![AchievementId::MonthMaster]
        );
        assert!(check_streak_achievements(6, &[]).is_empty());
    }

    #[test]
    fn test_perfect_week_needs_every_habit() {
        let today = date(2024, 5, 10);
        let full = habit_done_through(today, 7);
        let partial = habit_done_through(today, 6);
        assert!(is_perfect_week(&[full.clone()], today));
        assert!(!is_perfect_week(&[full.clone(), partial], today));
        assert!(!is_perfect_week(&[], today));

        // Unfinished today still counts the seven days ending yesterday
        let yesterday_run = habit_done_through(today - Duration::days(1), 7);
        assert!(is_perfect_week(&[yesterday_run], today));
    }

    #[test]
    fn test_check_all_on_fresh_user() {
        let ctx = ProgressContext {
            habit_count: 1,
            level: 1,
            ..Default::default()
        };
        assert_eq!(check_all_achievements(&ctx, &[]), vec![AchievementId::FirstHabit]);
        assert_eq!(check_milestones(&ctx, &[]), vec![MilestoneId::FirstHabit]);
    }

    #[test]
    fn test_level_and_trait_rules() {
        let ctx = ProgressContext {
            level: 25,
            completed_challenges: 50,
            max_trait_level: 10,
            ..Default::default()
        };
        let ids = check_all_achievements(&ctx, &[]);
        assert!(ids.contains(&AchievementId::Level10));
        assert!(ids.contains(&AchievementId::Level25));
        assert!(ids.contains(&AchievementId::ChallengeMaster));
        assert!(ids.contains(&AchievementId::TraitSpecialist));
    }

    #[test]
    fn test_milestones_by_streak_and_total() {
        let ctx = ProgressContext {
            habit_count: 3,
            max_streak: 50,
            total_completions: 120,
            ..Default::default()
        };
        let ids = check_milestones(&ctx, &["firstHabit".to_string()]);
        assert_eq!(
            ids,
            vec![
                MilestoneId::ThreeHabits,
                MilestoneId::FirstWeek,
                MilestoneId::FirstMonth,
                MilestoneId::HundredDays,
                MilestoneId::FiftyStreak,
            ]
        );
    }
}
