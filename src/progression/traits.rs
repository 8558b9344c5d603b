//! Psychological traits grown by completing challenges

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Progress points per trait level
pub const PROGRESS_PER_LEVEL: u32 = 10;

/// Trait level counted as "maxed out"
pub const MAX_TRAIT_LEVEL: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TraitKind {
    SelfControl,
    EmotionalRegulation,
    Confidence,
    Awareness,
    Communication,
    Resilience,
    Discipline,
    SocialIntelligence,
}

impl TraitKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SelfControl => "self-control",
            Self::EmotionalRegulation => "emotional-regulation",
            Self::Confidence => "confidence",
            Self::Awareness => "awareness",
            Self::Communication => "communication",
            Self::Resilience => "resilience",
            Self::Discipline => "discipline",
            Self::SocialIntelligence => "social-intelligence",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|k| k.as_str() == s)
    }

    pub fn all() -> &'static [TraitKind] {
        &[
            Self::SelfControl,
            Self::EmotionalRegulation,
            Self::Confidence,
            Self::Awareness,
            Self::Communication,
            Self::Resilience,
            Self::Discipline,
            Self::SocialIntelligence,
        ]
    }

    pub fn info(&self) -> &'static TraitInfo {
        &TRAITS[*self as usize]
    }
}

impl std::fmt::Display for TraitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct TraitInfo {
    pub kind: TraitKind,
    pub name: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
}

/// Trait metadata, in `TraitKind` declaration order
pub static TRAITS: &[TraitInfo] = &[
    TraitInfo {
        kind: TraitKind::SelfControl,
        name: "Self-Control",
        icon: "🎯",
        description: "Managing impulses and delayed gratification",
    },
    TraitInfo {
        kind: TraitKind::EmotionalRegulation,
        name: "Emotional Regulation",
        icon: "🧘",
        description: "Staying calm under pressure",
    },
    TraitInfo {
        kind: TraitKind::Confidence,
        name: "Confidence",
        icon: "💪",
        description: "Self-assured presence and boundaries",
    },
    TraitInfo {
        kind: TraitKind::Awareness,
        name: "Awareness",
        icon: "👁️",
        description: "Mindful observation of self and surroundings",
    },
    TraitInfo {
        kind: TraitKind::Communication,
        name: "Communication",
        icon: "💬",
        description: "Clear, intentional expression",
    },
    TraitInfo {
        kind: TraitKind::Resilience,
        name: "Resilience",
        icon: "🛡️",
        description: "Bouncing back from setbacks",
    },
    TraitInfo {
        kind: TraitKind::Discipline,
        name: "Discipline",
        icon: "⚡",
        description: "Consistent action toward goals",
    },
    TraitInfo {
        kind: TraitKind::SocialIntelligence,
        name: "Social Intelligence",
        icon: "🤝",
        description: "Reading and navigating social dynamics",
    },
];

/// Accumulated progress on one trait
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraitProgress {
    pub level: u32,
    pub total_progress: u32,
}

impl TraitProgress {
    /// Add progress and recompute the level as `total_progress / 10`.
    /// Returns the level before the gain.
    pub fn add(&mut self, gain: u32) -> u32 {
        let old = self.level;
        self.total_progress += gain;
        self.level = self.total_progress / PROGRESS_PER_LEVEL;
        old
    }

    /// Progress into the current level (0..10)
    pub fn progress_in_level(&self) -> u32 {
        self.total_progress % PROGRESS_PER_LEVEL
    }
}

/// Stored trait map, keyed by trait
pub type TraitBook = BTreeMap<TraitKind, TraitProgress>;

/// Every trait at level 0
pub fn initial_traits() -> TraitBook {
    TraitKind::all()
        .iter()
        .map(|k| (*k, TraitProgress::default()))
        .collect()
}

/// Highest level across all traits
pub fn max_trait_level(traits: &TraitBook) -> u32 {
    traits.values().map(|t| t.level).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_order() {
        for kind in TraitKind::all() {
            assert_eq!(kind.info().kind, *kind);
            assert_eq!(TraitKind::from_str(kind.as_str()), Some(*kind));
        }
    }

    #[test]
    fn test_hard_challenge_crosses_level() {
        let mut confidence = TraitProgress {
            level: 0,
            total_progress: 8,
        };
        let old = confidence.add(3);
        assert_eq!(old, 0);
        assert_eq!(confidence.total_progress, 11);
        assert_eq!(confidence.level, 1);
        assert_eq!(confidence.progress_in_level(), 1);
    }

    #[test]
    fn test_book_serializes_with_kebab_keys() {
        let mut book = initial_traits();
        if let Some(t) = book.get_mut(&TraitKind::SelfControl) {
            t.add(2);
        }
        let json = serde_json::to_value(&book).unwrap();
        assert_eq!(json["self-control"]["totalProgress"], 2);
        assert_eq!(json["social-intelligence"]["level"], 0);
        assert_eq!(max_trait_level(&book), 0);
    }
}
