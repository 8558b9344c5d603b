//! Achievement definitions and metadata
//!
//! All achievements are defined here with their rewards. Unlock predicates
//! live in `checker`.

use serde::Serialize;

/// Unique identifier for each achievement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementId {
    FirstHabit,
    WeekWarrior,
    MonthMaster,
    CenturyClub,
    PerfectWeek,
    Level10,
    Level25,
    ChallengeMaster,
    TraitSpecialist,
}

impl AchievementId {
    /// Get the string ID for storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstHabit => "first_habit",
            Self::WeekWarrior => "week_warrior",
            Self::MonthMaster => "month_master",
            Self::CenturyClub => "century_club",
            Self::PerfectWeek => "perfect_week",
            Self::Level10 => "level_10",
            Self::Level25 => "level_25",
            Self::ChallengeMaster => "challenge_master",
            Self::TraitSpecialist => "trait_specialist",
        }
    }

    /// Parse from storage string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "first_habit" => Some(Self::FirstHabit),
            "week_warrior" => Some(Self::WeekWarrior),
            "month_master" => Some(Self::MonthMaster),
            "century_club" => Some(Self::CenturyClub),
            "perfect_week" => Some(Self::PerfectWeek),
            "level_10" => Some(Self::Level10),
            "level_25" => Some(Self::Level25),
            "challenge_master" => Some(Self::ChallengeMaster),
            "trait_specialist" => Some(Self::TraitSpecialist),
            _ => None,
        }
    }

    /// Get all achievement IDs
    pub fn all() -> &'static [AchievementId] {
        &[
            Self::FirstHabit,
            Self::WeekWarrior,
            Self::MonthMaster,
            Self::CenturyClub,
            Self::PerfectWeek,
            Self::Level10,
            Self::Level25,
            Self::ChallengeMaster,
            Self::TraitSpecialist,
        ]
    }
}

/// Reward tier for grouping in the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AchievementTier {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl AchievementTier {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Bronze => "Bronze",
            Self::Silver => "Silver",
            Self::Gold => "Gold",
            Self::Platinum => "Platinum",
        }
    }

    pub fn all() -> &'static [AchievementTier] {
        &[Self::Bronze, Self::Silver, Self::Gold, Self::Platinum]
    }
}

/// Achievement definition with all metadata
#[derive(Debug, Clone, Serialize)]
pub struct Achievement {
    pub id: AchievementId,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub tier: AchievementTier,
    pub xp_reward: u32,
}

/// All achievement definitions, in `AchievementId` declaration order
pub static ACHIEVEMENTS: &[Achievement] = &[
    Achievement {
        id: AchievementId::FirstHabit,
        name: "Getting Started",
        description: "Create your first habit",
        icon: "🌱",
        tier: AchievementTier::Bronze,
        xp_reward: 50,
    },
    Achievement {
        id: AchievementId::WeekWarrior,
        name: "Week Warrior",
        description: "Maintain a 7-day streak",
        icon: "🔥",
        tier: AchievementTier::Silver,
        xp_reward: 100,
    },
    Achievement {
        id: AchievementId::MonthMaster,
        name: "Month Master",
        description: "Maintain a 30-day streak",
        icon: "⭐",
        tier: AchievementTier::Gold,
        xp_reward: 500,
    },
    Achievement {
        id: AchievementId::CenturyClub,
        name: "Century Club",
        description: "Complete 100 habits",
        icon: "💯",
        tier: AchievementTier::Platinum,
        xp_reward: 1000,
    },
    Achievement {
        id: AchievementId::PerfectWeek,
        name: "Perfect Week",
        description: "Complete all habits for 7 days straight",
        icon: "✨",
        tier: AchievementTier::Silver,
        xp_reward: 200,
    },
    Achievement {
        id: AchievementId::Level10,
        name: "Rising Star",
        description: "Reach level 10",
        icon: "🌟",
        tier: AchievementTier::Gold,
        xp_reward: 300,
    },
    Achievement {
        id: AchievementId::Level25,
        name: "Champion",
        description: "Reach level 25",
        icon: "🏆",
        tier: AchievementTier::Platinum,
        xp_reward: 750,
    },
    Achievement {
        id: AchievementId::ChallengeMaster,
        name: "Challenge Master",
        description: "Complete 50 daily challenges",
        icon: "🎯",
        tier: AchievementTier::Gold,
        xp_reward: 400,
    },
    Achievement {
        id: AchievementId::TraitSpecialist,
        name: "Trait Specialist",
        description: "Max out any psychological trait",
        icon: "🧠",
        tier: AchievementTier::Platinum,
        xp_reward: 600,
    },
];

impl Achievement {
    /// Get achievement by ID
    pub fn get(id: AchievementId) -> &'static Achievement {
        &ACHIEVEMENTS[id as usize]
    }

    pub fn by_tier(tier: AchievementTier) -> impl Iterator<Item = &'static Achievement> {
        ACHIEVEMENTS.iter().filter(move |a| a.tier == tier)
    }

    /// Get total number of achievements
    pub fn total_count() -> usize {
        ACHIEVEMENTS.len()
    }

    /// Get total possible XP from all achievements
    pub fn total_xp() -> u32 {
        ACHIEVEMENTS.iter().map(|a| a.xp_reward).sum()
    }
}
