//! XP and Level system
//!
//! Level is a step function of total XP: every 100 XP is one level,
//! starting at level 1.

use serde::Serialize;

use crate::domain::Difficulty;

/// XP needed per level
pub const XP_PER_LEVEL: u64 = 100;

/// Level for a given XP total: `floor(xp / 100) + 1`
pub fn level_for_xp(xp: u64) -> u32 {
    (xp / XP_PER_LEVEL) as u32 + 1
}

/// XP at which a level starts
pub fn xp_for_level(level: u32) -> u64 {
    u64::from(level.saturating_sub(1)) * XP_PER_LEVEL
}

/// Player stats derived from the stored XP total
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PlayerStats {
    pub total_xp: u64,
    pub level: u32,
    /// XP at which the current level started
    pub current_level_xp: u64,
    /// XP at which the next level starts
    pub next_level_xp: u64,
}

impl PlayerStats {
    pub fn new(total_xp: u64) -> Self {
        let level = level_for_xp(total_xp);
        Self {
            total_xp,
            level,
            current_level_xp: xp_for_level(level),
            next_level_xp: xp_for_level(level + 1),
        }
    }

    /// Calculate progress percentage to next level (0.0 - 1.0)
    pub fn progress_to_next(&self) -> f32 {
        let xp_in_level = self.total_xp - self.current_level_xp;
        let xp_for_level = self.next_level_xp - self.current_level_xp;
        if xp_for_level == 0 {
            1.0
        } else {
            (xp_in_level as f32) / (xp_for_level as f32)
        }
    }

    pub fn xp_to_next(&self) -> u64 {
        self.next_level_xp - self.total_xp
    }
}

/// XP rewards for various actions
pub struct XpRewards;

impl XpRewards {
    /// XP for marking a habit complete for a day
    pub const HABIT_COMPLETED: u32 = 5;

    /// XP for creating a habit from a template
    pub const TEMPLATE_HABIT: u32 = 10;

    /// XP for completing a task
    pub const TASK_COMPLETED: u32 = 15;

    /// XP for a batch of AI-generated tasks
    pub const TASKS_GENERATED: u32 = 20;

    /// XP per habit brought in by an import
    pub const IMPORT_PER_HABIT: u32 = 5;

    /// Challenge XP: base by difficulty plus a time bonus of 5 XP per
    /// 10 estimated minutes, capped at 25
    pub fn challenge(difficulty: Difficulty, estimated_minutes: u32) -> u32 {
        let time_bonus = ((estimated_minutes / 10) * 5).min(25);
        difficulty.base_xp() + time_bonus
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_xp() {
        assert_eq!(level_for_xp(0), 1);
        assert_eq!(level_for_xp(99), 1);
        assert_eq!(level_for_xp(100), 2);
        assert_eq!(level_for_xp(250), 3);
        assert_eq!(level_for_xp(2400), 25);
    }

    #[test]
    fn test_player_stats_progress() {
        let stats = PlayerStats::new(250);
        assert_eq!(stats.level, 3);
        assert_eq!(stats.current_level_xp, 200);
        assert_eq!(stats.next_level_xp, 300);
        assert_eq!(stats.xp_to_next(), 50);
        assert!((stats.progress_to_next() - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_challenge_xp() {
        assert_eq!(XpRewards::challenge(Difficulty::Easy, 0), 15);
        assert_eq!(XpRewards::challenge(Difficulty::Medium, 25), 40);
        assert_eq!(XpRewards::challenge(Difficulty::Hard, 120), 75);
    }
}
