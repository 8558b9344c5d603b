//! Milestone definitions
//!
//! Milestones are celebration-only unlocks: they carry no XP and are
//! surfaced once through the pending celebration queue.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MilestoneId {
    FirstHabit,
    ThreeHabits,
    FirstWeek,
    FirstMonth,
    HundredDays,
    PerfectWeek,
    FiftyStreak,
    HundredStreak,
    FiveHundredDays,
    YearStreak,
}

impl MilestoneId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstHabit => "firstHabit",
            Self::ThreeHabits => "threeHabits",
            Self::FirstWeek => "firstWeek",
            Self::FirstMonth => "firstMonth",
            Self::HundredDays => "hundredDays",
            Self::PerfectWeek => "perfectWeek",
            Self::FiftyStreak => "fiftyStreak",
            Self::HundredStreak => "hundredStreak",
            Self::FiveHundredDays => "fiveHundredDays",
            Self::YearStreak => "yearStreak",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|m| m.as_str() == s)
    }

    pub fn all() -> &'static [MilestoneId] {
        &[
            Self::FirstHabit,
            Self::ThreeHabits,
            Self::FirstWeek,
            Self::FirstMonth,
            Self::HundredDays,
            Self::PerfectWeek,
            Self::FiftyStreak,
            Self::HundredStreak,
            Self::FiveHundredDays,
            Self::YearStreak,
        ]
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Milestone {
    pub id: MilestoneId,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

impl Milestone {
    pub fn get(id: MilestoneId) -> &'static Milestone {
        &MILESTONES[id as usize]
    }
}

/// All milestones, in `MilestoneId` declaration order
pub static MILESTONES: &[Milestone] = &[
    Milestone {
        id: MilestoneId::FirstHabit,
        name: "First Step",
        description: "Created your first habit",
        icon: "🌱",
    },
    Milestone {
        id: MilestoneId::ThreeHabits,
        name: "Building Momentum",
        description: "Created 3 habits",
        icon: "🚀",
    },
    Milestone {
        id: MilestoneId::FirstWeek,
        name: "Week Warrior",
        description: "Maintained a 7-day streak",
        icon: "🔥",
    },
    Milestone {
        id: MilestoneId::FirstMonth,
        name: "Month Master",
        description: "Maintained a 30-day streak",
        icon: "👑",
    },
    Milestone {
        id: MilestoneId::HundredDays,
        name: "Century Club",
        description: "Completed 100 total habit days",
        icon: "💯",
    },
    Milestone {
        id: MilestoneId::PerfectWeek,
        name: "Perfect Week",
        description: "Completed all habits for 7 consecutive days",
        icon: "✨",
    },
    Milestone {
        id: MilestoneId::FiftyStreak,
        name: "Half Century",
        description: "Maintained a 50-day streak",
        icon: "⭐",
    },
    Milestone {
        id: MilestoneId::HundredStreak,
        name: "Legendary",
        description: "Maintained a 100-day streak",
        icon: "🏆",
    },
    Milestone {
        id: MilestoneId::FiveHundredDays,
        name: "Hall of Fame",
        description: "Completed 500 total habit days",
        icon: "🎖️",
    },
    Milestone {
        id: MilestoneId::YearStreak,
        name: "Year Champion",
        description: "Maintained a 365-day streak",
        icon: "🌟",
    },
];
