//! End-to-end habit tracking: streaks, XP and unlocks across days

mod common;

use chrono::Duration;

use common::{app_on, date, memory_repo};
use habitquest::metrics::{completion_rate, current_streak, days_since_creation, habit_metrics};
use habitquest::progression::{AchievementId, GamificationEvent, MilestoneId};

#[test]
fn test_five_day_streak_queried_next_day() {
    let repo = memory_repo();
    let start = date(2024, 1, 1);

    let day_one = app_on(&repo, start);
    let (habit, _) = day_one.add_habit("Read").unwrap();

    for offset in 0..5 {
        let day = start + Duration::days(offset);
        app_on(&repo, day).toggle_habit(&habit.id, day).unwrap();
    }

    let later = app_on(&repo, date(2024, 1, 6));
    let habit = later.habits().get(&habit.id).unwrap();
    let now = later.clock().now();

    assert_eq!(current_streak(&habit.completions, date(2024, 1, 6)), 5);
    assert_eq!(days_since_creation(habit.created_at, now), 6);
    assert_eq!(completion_rate(&habit, now), 83);
}

#[test]
fn test_every_day_since_creation_is_perfect() {
    let repo = memory_repo();
    let start = date(2024, 2, 1);
    let (habit, _) = app_on(&repo, start).add_habit("Walk").unwrap();

    for offset in 0..10 {
        let day = start + Duration::days(offset);
        app_on(&repo, day).toggle_habit(&habit.id, day).unwrap();
    }

    let app = app_on(&repo, date(2024, 2, 10));
    let habit = app.habits().get(&habit.id).unwrap();
    let metrics = habit_metrics(&habit, app.clock().now());
    assert_eq!(metrics.completion_rate, 100);
    assert_eq!(metrics.current_streak, metrics.days_since_creation);
    assert_eq!(metrics.current_streak, 10);
}

#[test]
fn test_empty_habit_has_no_streak() {
    let repo = memory_repo();
    let app = app_on(&repo, date(2024, 2, 1));
    let (habit, _) = app.add_habit("Stretch").unwrap();

    let metrics = habit_metrics(&habit, app.clock().now());
    assert_eq!(metrics.current_streak, 0);
    assert_eq!(metrics.completion_rate, 0);
}

#[test]
fn test_double_toggle_restores_state() {
    let repo = memory_repo();
    let app = app_on(&repo, date(2024, 2, 1));
    let (habit, _) = app.add_habit("Stretch").unwrap();

    app.toggle_habit(&habit.id, date(2024, 2, 1)).unwrap();
    app.toggle_habit(&habit.id, date(2024, 2, 1)).unwrap();
    let after = app.habits().get(&habit.id).unwrap();
    assert_eq!(after.completions, habit.completions);
}

#[test]
fn test_future_completion_rejected() {
    let repo = memory_repo();
    let app = app_on(&repo, date(2024, 2, 1));
    let (habit, _) = app.add_habit("Stretch").unwrap();
    assert!(app.toggle_habit(&habit.id, date(2024, 2, 2)).is_err());
}

#[test]
fn test_xp_250_reaches_level_3() {
    let app = app_on(&memory_repo(), date(2024, 1, 1));
    let events = app.progression().add_xp(250, "test").unwrap();

    assert_eq!(app.progression().xp(), 250);
    assert_eq!(app.progression().level(), 3);
    assert!(events.iter().any(|e| matches!(
        e,
        GamificationEvent::LevelUp(up) if up.old_level == 1 && up.new_level == 3
    )));
}

#[test]
fn test_unlocked_achievement_is_never_queued_twice() {
    let repo = memory_repo();
    let app = app_on(&repo, date(2024, 1, 1));
    app.add_habit("Read").unwrap();

    let pending = app.progression().drain_pending_achievements().unwrap();
    assert!(pending.iter().any(|a| a.id == AchievementId::FirstHabit));

    // The rule still holds, but the id is already unlocked
    app.add_habit("Write").unwrap();
    app.evaluate_progress().unwrap();
    assert!(app
        .progression()
        .pending_achievements()
        .iter()
        .all(|a| a.id != AchievementId::FirstHabit));
}

#[test]
fn test_first_habit_milestone_celebrated_once() {
    let repo = memory_repo();
    let app = app_on(&repo, date(2024, 1, 1));
    let (_, events) = app.add_habit("Read").unwrap();

    assert!(events.iter().any(|e| matches!(
        e,
        GamificationEvent::MilestoneReached { milestone } if milestone.id == MilestoneId::FirstHabit
    )));
    assert!(app.progression().dismiss_celebration(MilestoneId::FirstHabit).unwrap());
    assert!(!app.progression().dismiss_celebration(MilestoneId::FirstHabit).unwrap());
}

#[test]
fn test_delete_removes_attached_data() {
    let repo = memory_repo();
    let app = app_on(&repo, date(2024, 1, 1));
    let (habit, _) = app.add_habit("Read").unwrap();
    app.notes()
        .add(&habit.id, date(2024, 1, 1), "Chapter one", None)
        .unwrap();

    app.delete_habit(&habit.id).unwrap();
    assert!(app.habits().get(&habit.id).is_none());
    assert!(app.notes().for_habit(&habit.id).is_empty());
}
