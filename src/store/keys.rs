//! Recognized storage keys

/// One key per persisted concern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    // Records
    Habits,
    Tasks,

    // Progression
    Xp,
    Level,
    UnlockedAchievements,
    PendingAchievements,
    UnlockedMilestones,
    PendingMilestones,

    // Habit difficulty
    HabitDifficulty,
    DifficultyHistory,

    // Challenges
    ActiveChallenges,
    CompletedChallenges,
    SkippedChallenges,
    Traits,
    ChallengeStreak,
    DailyStats,
    DailySkipCount,
    DifficultyLevel,

    // Tracker extras
    WeeklyGoals,
    HabitNotes,
    StreakSavers,
    VacationMode,
    GracePeriod,
    HabitBundles,
    ProgressPhotos,
    DismissedSuggestions,
}

impl StoreKey {
    /// Get the string key used in the backing store
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Habits => "habits-data",
            Self::Tasks => "tasks-data",
            Self::Xp => "xp-data",
            Self::Level => "level-data",
            Self::UnlockedAchievements => "achievements",
            Self::PendingAchievements => "pending-achievements",
            Self::UnlockedMilestones => "unlocked-milestones",
            Self::PendingMilestones => "pending-milestones",
            Self::HabitDifficulty => "habit-difficulty",
            Self::DifficultyHistory => "difficulty-history",
            Self::ActiveChallenges => "active-challenges",
            Self::CompletedChallenges => "completed-challenges",
            Self::SkippedChallenges => "skipped-challenges",
            Self::Traits => "user-traits",
            Self::ChallengeStreak => "challenge-streak",
            Self::DailyStats => "daily-stats",
            Self::DailySkipCount => "daily-skip-count",
            Self::DifficultyLevel => "difficulty-level",
            Self::WeeklyGoals => "weekly-goals",
            Self::HabitNotes => "habit-notes",
            Self::StreakSavers => "streak-savers",
            Self::VacationMode => "vacation-mode",
            Self::GracePeriod => "grace-period",
            Self::HabitBundles => "habit-bundles",
            Self::ProgressPhotos => "progress-photos",
            Self::DismissedSuggestions => "dismissed-suggestions",
        }
    }

    /// Parse from the backing store key
    pub fn from_str(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|k| k.as_str() == s)
    }

    /// Get all keys
    pub fn all() -> &'static [StoreKey] {
        &[
            Self::Habits,
            Self::Tasks,
            Self::Xp,
            Self::Level,
            Self::UnlockedAchievements,
            Self::PendingAchievements,
            Self::UnlockedMilestones,
            Self::PendingMilestones,
            Self::HabitDifficulty,
            Self::DifficultyHistory,
            Self::ActiveChallenges,
            Self::CompletedChallenges,
            Self::SkippedChallenges,
            Self::Traits,
            Self::ChallengeStreak,
            Self::DailyStats,
            Self::DailySkipCount,
            Self::DifficultyLevel,
            Self::WeeklyGoals,
            Self::HabitNotes,
            Self::StreakSavers,
            Self::VacationMode,
            Self::GracePeriod,
            Self::HabitBundles,
            Self::ProgressPhotos,
            Self::DismissedSuggestions,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_keys_unique() {
        let mut keys: Vec<_> = StoreKey::all().iter().map(|k| k.as_str()).collect();
        keys.sort();
        let count = keys.len();
        keys.dedup();
        assert_eq!(keys.len(), count, "Storage keys must be unique");
    }

    #[test]
    fn test_from_str_roundtrip() {
        for key in StoreKey::all() {
            assert_eq!(StoreKey::from_str(key.as_str()), Some(*key));
        }
        assert_eq!(StoreKey::from_str("theme-data"), None);
    }
}
