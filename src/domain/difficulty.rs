use serde::{Deserialize, Serialize};

/// Difficulty of a challenge or task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }

    /// Trait progress gained when a challenge of this difficulty is completed
    pub fn trait_gain(&self) -> u32 {
        match self {
            Self::Easy => 1,
            Self::Medium => 2,
            Self::Hard => 3,
        }
    }

    /// Base XP for completing a challenge of this difficulty
    pub fn base_xp(&self) -> u32 {
        match self {
            Self::Easy => 15,
            Self::Medium => 30,
            Self::Hard => 50,
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-habit difficulty setting, ordered from easiest to hardest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HabitDifficulty {
    VeryEasy,
    Easy,
    #[default]
    Normal,
    Hard,
    VeryHard,
}

/// Static metadata for a habit difficulty level
#[derive(Debug, Clone)]
pub struct DifficultyInfo {
    pub level: HabitDifficulty,
    pub name: &'static str,
    pub multiplier: f64,
    pub description: &'static str,
    pub icon: &'static str,
}

/// All habit difficulty levels, easiest first
pub static HABIT_DIFFICULTIES: &[DifficultyInfo] = &[
    DifficultyInfo {
        level: HabitDifficulty::VeryEasy,
        name: "Very Easy",
        multiplier: 0.5,
        description: "Just starting out - small steps",
        icon: "🌱",
    },
    DifficultyInfo {
        level: HabitDifficulty::Easy,
        name: "Easy",
        multiplier: 0.75,
        description: "Building confidence",
        icon: "🌿",
    },
    DifficultyInfo {
        level: HabitDifficulty::Normal,
        name: "Normal",
        multiplier: 1.0,
        description: "Standard challenge",
        icon: "🎯",
    },
    DifficultyInfo {
        level: HabitDifficulty::Hard,
        name: "Hard",
        multiplier: 1.5,
        description: "Pushing your limits",
        icon: "💪",
    },
    DifficultyInfo {
        level: HabitDifficulty::VeryHard,
        name: "Very Hard",
        multiplier: 2.0,
        description: "Maximum challenge",
        icon: "🔥",
    },
];

impl HabitDifficulty {
    pub fn info(&self) -> &'static DifficultyInfo {
        let idx = self.index();
        &HABIT_DIFFICULTIES[idx]
    }

    fn index(&self) -> usize {
        match self {
            Self::VeryEasy => 0,
            Self::Easy => 1,
            Self::Normal => 2,
            Self::Hard => 3,
            Self::VeryHard => 4,
        }
    }

    /// One step harder, or None at the top
    pub fn harder(&self) -> Option<Self> {
        HABIT_DIFFICULTIES.get(self.index() + 1).map(|d| d.level)
    }

    /// One step easier, or None at the bottom
    pub fn easier(&self) -> Option<Self> {
        self.index()
            .checked_sub(1)
            .and_then(|i| HABIT_DIFFICULTIES.get(i))
            .map(|d| d.level)
    }

    /// XP bonus for completing a habit at this difficulty
    pub fn xp_bonus(&self) -> u32 {
        (10.0 * self.info().multiplier).floor() as u32
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "very-easy" => Some(Self::VeryEasy),
            "easy" => Some(Self::Easy),
            "normal" => Some(Self::Normal),
            "hard" => Some(Self::Hard),
            "very-hard" => Some(Self::VeryHard),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_order_matches_levels() {
        for (i, info) in HABIT_DIFFICULTIES.iter().enumerate() {
            assert_eq!(info.level.index(), i);
        }
    }

    #[test]
    fn test_steps_and_bounds() {
        assert_eq!(HabitDifficulty::Normal.harder(), Some(HabitDifficulty::Hard));
        assert_eq!(HabitDifficulty::Normal.easier(), Some(HabitDifficulty::Easy));
        assert_eq!(HabitDifficulty::VeryHard.harder(), None);
        assert_eq!(HabitDifficulty::VeryEasy.easier(), None);
    }

    #[test]
    fn test_xp_bonus() {
        assert_eq!(HabitDifficulty::VeryEasy.xp_bonus(), 5);
        assert_eq!(HabitDifficulty::Easy.xp_bonus(), 7);
        assert_eq!(HabitDifficulty::Normal.xp_bonus(), 10);
        assert_eq!(HabitDifficulty::VeryHard.xp_bonus(), 20);
    }

    #[test]
    fn test_trait_gain_by_difficulty() {
        assert_eq!(Difficulty::Easy.trait_gain(), 1);
        assert_eq!(Difficulty::Medium.trait_gain(), 2);
        assert_eq!(Difficulty::Hard.trait_gain(), 3);
    }
}
