//! Weekly goals, keyed to the Sunday that starts their week

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{bail, Result};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::calendar::{day_key, week_start, Clock};
use crate::store::{Repository, StoreKey};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyGoal {
    pub id: String,
    pub title: String,
    pub target_count: u32,
    pub current_count: u32,
    /// Habit whose completions advance this goal
    #[serde(default)]
    pub habit_id: Option<String>,
    pub week_key: NaiveDate,
    pub created_at: i64,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
}

impl WeeklyGoal {
    /// Add progress. `completed_at` is set only on the first crossing.
    fn advance(&mut self, increment: u32, now: i64) {
        self.current_count += increment;
        let completed = self.current_count >= self.target_count;
        if completed && !self.completed {
            self.completed_at = Some(now);
        }
        self.completed = completed;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct GoalStats {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub not_started: usize,
    pub completion_rate: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekHistory {
    pub week_key: NaiveDate,
    pub goals: Vec<WeeklyGoal>,
    pub completion_rate: u32,
}

type GoalMap = BTreeMap<String, WeeklyGoal>;

fn percent_completed(goals: &[WeeklyGoal]) -> u32 {
    if goals.is_empty() {
        return 0;
    }
    let done = goals.iter().filter(|g| g.completed).count();
    ((done as f64 / goals.len() as f64) * 100.0).round() as u32
}

#[derive(Clone)]
pub struct GoalBook {
    repo: Repository,
    clock: Arc<dyn Clock>,
}

impl GoalBook {
    pub fn new(repo: Repository, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    fn goals(&self) -> GoalMap {
        self.repo.load(StoreKey::WeeklyGoals)
    }

    pub fn all(&self) -> Vec<WeeklyGoal> {
        self.goals().into_values().collect()
    }

    pub fn get(&self, id: &str) -> Option<WeeklyGoal> {
        self.goals().remove(id)
    }

    /// Create a goal for the current week. Target is raised to at least 1.
    pub fn create(
        &self,
        title: &str,
        target_count: u32,
        habit_id: Option<String>,
    ) -> Result<WeeklyGoal> {
        let title = title.trim();
        if title.is_empty() {
            bail!("Goal title cannot be empty");
        }

        let week_key = week_start(self.clock.today());
        let created_at = self.clock.timestamp_ms();
        let goal = WeeklyGoal {
            id: format!("{}-{}", day_key(week_key), crate::domain::new_id()),
            title: title.to_string(),
            target_count: target_count.max(1),
            current_count: 0,
            habit_id,
            week_key,
            created_at,
            completed: false,
            completed_at: None,
        };

        self.repo.update(StoreKey::WeeklyGoals, |goals: &mut GoalMap| {
            goals.insert(goal.id.clone(), goal.clone())
        })?;
        Ok(goal)
    }

    pub fn update_progress(&self, id: &str, increment: u32) -> Result<Option<WeeklyGoal>> {
        let now = self.clock.timestamp_ms();
        self.repo.update(StoreKey::WeeklyGoals, |goals: &mut GoalMap| {
            let goal = goals.get_mut(id)?;
            goal.advance(increment, now);
            Some(goal.clone())
        })
    }

    /// Advance every current-week goal linked to a habit by one
    pub fn record_habit_completion(&self, habit_id: &str) -> Result<Vec<WeeklyGoal>> {
        let now = self.clock.timestamp_ms();
        let week_key = week_start(self.clock.today());
        self.repo.update(StoreKey::WeeklyGoals, |goals: &mut GoalMap| {
            goals
                .values_mut()
                .filter(|g| g.week_key == week_key && g.habit_id.as_deref() == Some(habit_id))
                .map(|g| {
                    g.advance(1, now);
                    g.clone()
                })
                .collect()
        })
    }

    pub fn delete(&self, id: &str) -> Result<bool> {
        self.repo
            .update(StoreKey::WeeklyGoals, |goals: &mut GoalMap| goals.remove(id).is_some())
    }

    fn week(&self, week_key: NaiveDate) -> Vec<WeeklyGoal> {
        let mut goals: Vec<WeeklyGoal> = self
            .goals()
            .into_values()
            .filter(|g| g.week_key == week_key)
            .collect();
        goals.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        goals
    }

    /// This week's goals, newest first
    pub fn current_week(&self) -> Vec<WeeklyGoal> {
        self.week(week_start(self.clock.today()))
    }

    pub fn stats(&self) -> GoalStats {
        let goals = self.current_week();
        GoalStats {
            total: goals.len(),
            completed: goals.iter().filter(|g| g.completed).count(),
            in_progress: goals
                .iter()
                .filter(|g| !g.completed && g.current_count > 0)
                .count(),
            not_started: goals.iter().filter(|g| g.current_count == 0).count(),
            completion_rate: percent_completed(&goals),
        }
    }

    /// The last `weeks` weeks, current week first
    pub fn history(&self, weeks: u32) -> Vec<WeekHistory> {
        let this_week = week_start(self.clock.today());
        (0..weeks as i64)
            .map(|i| {
                let week_key = this_week - Duration::weeks(i);
                let goals = self.week(week_key);
                WeekHistory {
                    week_key,
                    completion_rate: percent_completed(&goals),
                    goals,
                }
            })
            .collect()
    }
}
