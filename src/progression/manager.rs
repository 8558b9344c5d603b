//! Progression Manager - Core gamification logic
//!
//! Handles XP awards, achievement and milestone unlocks, and the pending
//! queues that presentation code drains once.

use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;

use super::checker::{check_all_achievements, check_milestones, ProgressContext};
use super::definitions::{Achievement, AchievementId, AchievementTier, ACHIEVEMENTS};
use super::levels::{level_for_xp, PlayerStats};
use super::milestones::{Milestone, MilestoneId, MILESTONES};
use super::traits::{initial_traits, TraitBook, TraitKind};
use crate::calendar::Clock;
use crate::store::{Repository, StoreKey};

/// An achievement that was just unlocked
#[derive(Debug, Clone, Serialize)]
pub struct UnlockedAchievement {
    pub achievement: &'static Achievement,
    pub unlocked_at: i64,
}

/// A level up event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelUp {
    pub old_level: u32,
    pub new_level: u32,
}

/// Events that can happen during progression updates
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GamificationEvent {
    AchievementUnlocked(UnlockedAchievement),
    MilestoneReached { milestone: &'static Milestone },
    LevelUp(LevelUp),
    XpAwarded { amount: u32, reason: String },
    TraitLevelUp { trait_kind: TraitKind, new_level: u32 },
    StreakExtended { count: u32 },
    BundleCompleted { name: String, bonus_xp: u32 },
}

/// Unlock counts for a collection of one-time rewards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UnlockProgress {
    pub total: usize,
    pub unlocked: usize,
    pub percentage: u32,
}

impl UnlockProgress {
    fn new(total: usize, unlocked: usize) -> Self {
        let percentage = if total == 0 {
            0
        } else {
            ((unlocked as f64 / total as f64) * 100.0).round() as u32
        };
        Self {
            total,
            unlocked,
            percentage,
        }
    }
}

/// Main manager for XP, achievements and milestones
#[derive(Clone)]
pub struct ProgressionManager {
    repo: Repository,
    clock: Arc<dyn Clock>,
}

impl ProgressionManager {
    pub fn new(repo: Repository, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    // ========================================
    // XP & LEVEL OPERATIONS
    // ========================================

    pub fn xp(&self) -> u64 {
        self.repo.load(StoreKey::Xp)
    }

    /// Level derived from the stored XP total
    pub fn level(&self) -> u32 {
        level_for_xp(self.xp())
    }

    pub fn player_stats(&self) -> PlayerStats {
        PlayerStats::new(self.xp())
    }

    /// Award XP and check for level up
    pub fn add_xp(&self, amount: u32, reason: &str) -> Result<Vec<GamificationEvent>> {
        let old_xp = self.xp();
        let new_xp = old_xp + u64::from(amount);
        let old_level = level_for_xp(old_xp);
        let new_level = level_for_xp(new_xp);

        self.repo.save(StoreKey::Xp, &new_xp)?;
        self.repo.save(StoreKey::Level, &new_level)?;

        let mut events = Vec::new();
        if amount > 0 {
            tracing::debug!("+{} XP ({}), total {}", amount, reason, new_xp);
            events.push(GamificationEvent::XpAwarded {
                amount,
                reason: reason.to_string(),
            });
        }
        if new_level > old_level {
            tracing::info!("Level up: {} -> {}", old_level, new_level);
            events.push(GamificationEvent::LevelUp(LevelUp {
                old_level,
                new_level,
            }));
        }
        Ok(events)
    }

    // ========================================
    // ACHIEVEMENT OPERATIONS
    // ========================================

    /// Get all unlocked achievement IDs
    pub fn unlocked_ids(&self) -> Vec<String> {
        self.repo.load(StoreKey::UnlockedAchievements)
    }

    pub fn is_unlocked(&self, id: AchievementId) -> bool {
        self.unlocked_ids().iter().any(|u| u == id.as_str())
    }

    /// Evaluate every achievement rule, unlocking and rewarding new ones.
    ///
    /// Reward XP can itself cross a level threshold, so rules are re-run
    /// until nothing new unlocks.
    pub fn check_achievements(&self, ctx: &ProgressContext) -> Result<Vec<GamificationEvent>> {
        let mut events = Vec::new();
        let mut ctx = *ctx;

        loop {
            let unlocked = self.unlocked_ids();
            let newly_unlocked = check_all_achievements(&ctx, &unlocked);
            if newly_unlocked.is_empty() {
                break;
            }

            let mut reward = 0u32;
            for id in newly_unlocked {
                let unlocked = self.unlock_achievement(id)?;
                reward += unlocked.achievement.xp_reward;
                events.push(GamificationEvent::AchievementUnlocked(unlocked));
            }

            events.extend(self.add_xp(reward, "achievements")?);
            ctx.level = self.level();
        }

        Ok(events)
    }

    fn unlock_achievement(&self, id: AchievementId) -> Result<UnlockedAchievement> {
        let key = id.as_str().to_string();
        self.repo
            .update(StoreKey::UnlockedAchievements, |ids: &mut Vec<String>| {
                if !ids.contains(&key) {
                    ids.push(key.clone());
                }
            })?;
        self.repo
            .update(StoreKey::PendingAchievements, |ids: &mut Vec<String>| {
                ids.push(key.clone())
            })?;

        let achievement = Achievement::get(id);
        tracing::info!("Achievement unlocked: {} {}", achievement.icon, achievement.name);
        Ok(UnlockedAchievement {
            achievement,
            unlocked_at: self.clock.timestamp_ms(),
        })
    }

    /// Achievements unlocked but not yet acknowledged
    pub fn pending_achievements(&self) -> Vec<&'static Achievement> {
        let pending: Vec<String> = self.repo.load(StoreKey::PendingAchievements);
        pending
            .iter()
            .filter_map(|s| AchievementId::from_str(s))
            .map(Achievement::get)
            .collect()
    }

    /// Return the pending queue and clear it
    pub fn drain_pending_achievements(&self) -> Result<Vec<&'static Achievement>> {
        let pending = self.pending_achievements();
        self.repo
            .save(StoreKey::PendingAchievements, &Vec::<String>::new())?;
        Ok(pending)
    }

    pub fn achievement_progress(&self) -> UnlockProgress {
        let unlocked = self.unlocked_ids();
        let count = ACHIEVEMENTS
            .iter()
            .filter(|a| unlocked.iter().any(|u| u == a.id.as_str()))
            .count();
        UnlockProgress::new(ACHIEVEMENTS.len(), count)
    }

    /// Achievements of a tier, each with its unlock state
    pub fn achievements_by_tier(&self, tier: AchievementTier) -> Vec<(&'static Achievement, bool)> {
        let unlocked = self.unlocked_ids();
        Achievement::by_tier(tier)
            .map(|a| (a, unlocked.iter().any(|u| u == a.id.as_str())))
            .collect()
    }

    // ========================================
    // MILESTONE OPERATIONS
    // ========================================

    pub fn unlocked_milestones(&self) -> Vec<String> {
        self.repo.load(StoreKey::UnlockedMilestones)
    }

    /// Unlock newly reached milestones and queue their celebrations
    pub fn check_milestones(&self, ctx: &ProgressContext) -> Result<Vec<GamificationEvent>> {
        let unlocked = self.unlocked_milestones();
        let newly = check_milestones(ctx, &unlocked);
        if newly.is_empty() {
            return Ok(Vec::new());
        }

        let keys: Vec<String> = newly.iter().map(|m| m.as_str().to_string()).collect();
        self.repo
            .update(StoreKey::UnlockedMilestones, |ids: &mut Vec<String>| {
                ids.extend(keys.iter().cloned())
            })?;
        self.repo
            .update(StoreKey::PendingMilestones, |ids: &mut Vec<String>| {
                ids.extend(keys.iter().cloned())
            })?;

        Ok(newly
            .into_iter()
            .map(|id| {
                let milestone = Milestone::get(id);
                tracing::info!("Milestone reached: {} {}", milestone.icon, milestone.name);
                GamificationEvent::MilestoneReached { milestone }
            })
            .collect())
    }

    pub fn pending_celebrations(&self) -> Vec<&'static Milestone> {
        let pending: Vec<String> = self.repo.load(StoreKey::PendingMilestones);
        pending
            .iter()
            .filter_map(|s| MilestoneId::from_str(s))
            .map(Milestone::get)
            .collect()
    }

    /// Acknowledge one celebration. Returns false if it was not pending.
    pub fn dismiss_celebration(&self, id: MilestoneId) -> Result<bool> {
        self.repo
            .update(StoreKey::PendingMilestones, |ids: &mut Vec<String>| {
                let before = ids.len();
                ids.retain(|s| s != id.as_str());
                ids.len() != before
            })
    }

    /// Every milestone with its unlock state
    pub fn all_milestones(&self) -> Vec<(&'static Milestone, bool)> {
        let unlocked = self.unlocked_milestones();
        MILESTONES
            .iter()
            .map(|m| (m, unlocked.iter().any(|u| u == m.id.as_str())))
            .collect()
    }

    pub fn milestone_progress(&self) -> UnlockProgress {
        let count = self.all_milestones().iter().filter(|(_, u)| *u).count();
        UnlockProgress::new(MILESTONES.len(), count)
    }

    // ========================================
    // TRAITS
    // ========================================

    /// Current trait levels, with every known trait present
    pub fn traits(&self) -> TraitBook {
        let stored: TraitBook = self.repo.load(StoreKey::Traits);
        let mut book = initial_traits();
        book.extend(stored);
        book
    }
}
