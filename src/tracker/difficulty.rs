//! Per-habit difficulty settings and change history

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::calendar::Clock;
use crate::domain::{Habit, HabitDifficulty};
use crate::metrics::{suggest_difficulty_change, DifficultySuggestion};
use crate::store::{Repository, StoreKey};

/// How many recent changes `stats` reports
const RECENT_CHANGES: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyChange {
    pub level: HabitDifficulty,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DifficultyStats {
    pub current: HabitDifficulty,
    pub changes: usize,
    pub recent: Vec<DifficultyChange>,
    pub xp_bonus: u32,
}

type LevelMap = BTreeMap<String, HabitDifficulty>;
type HistoryMap = BTreeMap<String, Vec<DifficultyChange>>;

#[derive(Clone)]
pub struct DifficultyBook {
    repo: Repository,
    clock: Arc<dyn Clock>,
}

impl DifficultyBook {
    pub fn new(repo: Repository, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    /// Current level, `normal` if never set
    pub fn get(&self, habit_id: &str) -> HabitDifficulty {
        let levels: LevelMap = self.repo.load(StoreKey::HabitDifficulty);
        levels.get(habit_id).copied().unwrap_or_default()
    }

    pub fn set(&self, habit_id: &str, level: HabitDifficulty) -> Result<()> {
        let timestamp = self.clock.timestamp_ms();
        self.repo.update(StoreKey::HabitDifficulty, |levels: &mut LevelMap| {
            levels.insert(habit_id.to_string(), level)
        })?;
        self.repo
            .update(StoreKey::DifficultyHistory, |history: &mut HistoryMap| {
                history
                    .entry(habit_id.to_string())
                    .or_default()
                    .push(DifficultyChange { level, timestamp })
            })?;
        tracing::debug!("Habit {} difficulty set to {:?}", habit_id, level);
        Ok(())
    }

    pub fn history(&self, habit_id: &str) -> Vec<DifficultyChange> {
        let mut history: HistoryMap = self.repo.load(StoreKey::DifficultyHistory);
        history.remove(habit_id).unwrap_or_default()
    }

    pub fn xp_bonus(&self, habit_id: &str) -> u32 {
        self.get(habit_id).xp_bonus()
    }

    pub fn stats(&self, habit_id: &str) -> DifficultyStats {
        let current = self.get(habit_id);
        let history = self.history(habit_id);
        let skip = history.len().saturating_sub(RECENT_CHANGES);
        DifficultyStats {
            current,
            changes: history.len(),
            recent: history[skip..].to_vec(),
            xp_bonus: current.xp_bonus(),
        }
    }

    /// Suggest a change based on the last two weeks
    pub fn suggestion(&self, habit: &Habit) -> Option<DifficultySuggestion> {
        suggest_difficulty_change(habit, self.get(&habit.id), self.clock.today())
    }

    pub(crate) fn remove_habit(&self, habit_id: &str) -> Result<()> {
        self.repo.update(StoreKey::HabitDifficulty, |levels: &mut LevelMap| {
            levels.remove(habit_id)
        })?;
        self.repo
            .update(StoreKey::DifficultyHistory, |history: &mut HistoryMap| {
                history.remove(habit_id)
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::FixedClock;
    use chrono::NaiveDate;

    #[test]
    fn test_default_set_and_stats() {
        let clock = FixedClock::on(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        let book = DifficultyBook::new(Repository::in_memory(), Arc::new(clock));

        assert_eq!(book.get("h"), HabitDifficulty::Normal);
        assert_eq!(book.xp_bonus("h"), 10);

        for level in [
            HabitDifficulty::Hard,
            HabitDifficulty::VeryHard,
            HabitDifficulty::Hard,
            HabitDifficulty::Normal,
            HabitDifficulty::Easy,
            HabitDifficulty::VeryEasy,
        ] {
            book.set("h", level).unwrap();
        }

        let stats = book.stats("h");
        assert_eq!(stats.current, HabitDifficulty::VeryEasy);
        assert_eq!(stats.changes, 6);
        assert_eq!(stats.recent.len(), 5);
        assert_eq!(stats.recent[0].level, HabitDifficulty::VeryHard);
        assert_eq!(stats.xp_bonus, 5);
    }
}
