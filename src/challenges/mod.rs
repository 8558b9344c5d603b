//! Daily challenges: the pool and the adaptive scheduler

mod catalog;
mod scheduler;

pub use catalog::{ChallengeCatalog, ChallengeDefinition};
pub use scheduler::{
    difficulty_distribution, ActiveChallenge, ChallengeError, ChallengeScheduler, ChallengeStatus,
    ChallengeStreak, CompletionOutcome, DailySummary, DayStats, HistoryEntry, SchedulerSettings,
    SkipCount,
};
