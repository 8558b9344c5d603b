//! Progression engine: XP, levels, achievements, milestones and traits
//!
//! Unlocks are one-way. Once an id is in an unlocked set it is never
//! evaluated again, and new unlocks are queued as pending until drained.

mod checker;
mod definitions;
mod levels;
mod manager;
mod milestones;
mod traits;

pub use checker::{is_perfect_week, ProgressContext};
pub use definitions::{Achievement, AchievementId, AchievementTier, ACHIEVEMENTS};
pub use levels::{level_for_xp, xp_for_level, PlayerStats, XpRewards, XP_PER_LEVEL};
pub use manager::{
    GamificationEvent, LevelUp, ProgressionManager, UnlockProgress, UnlockedAchievement,
};
pub use milestones::{Milestone, MilestoneId, MILESTONES};
pub use traits::{
    initial_traits, max_trait_level, TraitBook, TraitInfo, TraitKind, TraitProgress,
    MAX_TRAIT_LEVEL, PROGRESS_PER_LEVEL, TRAITS,
};
