//! Challenge pool
//!
//! A built-in set of challenges covering every trait at every difficulty,
//! or a JSON pool file (`[...]` or `{"challenges": [...]}`).

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Weekday;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::Difficulty;
use crate::progression::{TraitKind, XpRewards};

/// One challenge in the pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeDefinition {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: TraitKind,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub estimated_minutes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reflection_prompt: Option<String>,
    #[serde(default)]
    pub requires_reflection: bool,
}

impl ChallengeDefinition {
    /// XP for completing this challenge
    pub fn xp_reward(&self) -> u32 {
        XpRewards::challenge(self.difficulty, self.estimated_minutes)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PoolFile {
    List(Vec<ChallengeDefinition>),
    Wrapped { challenges: Vec<ChallengeDefinition> },
}

#[derive(Debug, Clone)]
pub struct ChallengeCatalog {
    challenges: Vec<ChallengeDefinition>,
}

impl ChallengeCatalog {
    pub fn new(challenges: Vec<ChallengeDefinition>) -> Self {
        Self { challenges }
    }

    /// The built-in pool
    pub fn builtin() -> Self {
        let challenges = BUILTIN
            .iter()
            .map(|(id, title, description, category, difficulty, minutes)| {
                ChallengeDefinition {
                    id: id.to_string(),
                    title: title.to_string(),
                    description: description.to_string(),
                    category: *category,
                    difficulty: *difficulty,
                    estimated_minutes: *minutes,
                    context: None,
                    reflection_prompt: None,
                    requires_reflection: false,
                }
            })
            .collect();
        Self { challenges }
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let file: PoolFile = serde_json::from_str(raw).context("Invalid challenge pool JSON")?;
        let challenges = match file {
            PoolFile::List(list) => list,
            PoolFile::Wrapped { challenges } => challenges,
        };
        Ok(Self { challenges })
    }

    /// Load a pool file
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read challenge pool {}", path.display()))?;
        Self::from_json_str(&raw)
    }

    /// Load a pool file if configured, falling back to the built-in pool
    pub fn load_or_builtin(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::builtin();
        };
        match Self::load(path) {
            Ok(catalog) if !catalog.is_empty() => catalog,
            Ok(_) => {
                tracing::warn!("Challenge pool {} is empty, using built-in pool", path.display());
                Self::builtin()
            }
            Err(e) => {
                tracing::warn!("{:#}, using built-in pool", e);
                Self::builtin()
            }
        }
    }

    pub fn all(&self) -> &[ChallengeDefinition] {
        &self.challenges
    }

    pub fn len(&self) -> usize {
        self.challenges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.challenges.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ChallengeDefinition> {
        self.challenges.iter().find(|c| c.id == id)
    }

    pub fn by_category(&self, category: TraitKind) -> Vec<&ChallengeDefinition> {
        self.challenges
            .iter()
            .filter(|c| c.category == category)
            .collect()
    }

    pub fn by_difficulty(&self, difficulty: Difficulty) -> Vec<&ChallengeDefinition> {
        self.challenges
            .iter()
            .filter(|c| c.difficulty == difficulty)
            .collect()
    }

    /// Themed mix for a weekday: Mon/Wed/Fri 2 medium + 1 easy, Sunday
    /// 3 hard, other days 2 medium + 1 hard. Order is shuffled.
    pub fn daily_mix<R: Rng + ?Sized>(&self, weekday: Weekday, rng: &mut R) -> Vec<ChallengeDefinition> {
        let plan: &[(Difficulty, usize)] = match weekday {
            Weekday::Mon | Weekday::Wed | Weekday::Fri => {
                &[(Difficulty::Medium, 2), (Difficulty::Easy, 1)]
            }
            Weekday::Sun => &[(Difficulty::Hard, 3)],
            _ => &[(Difficulty::Medium, 2), (Difficulty::Hard, 1)],
        };

        let mut selected: Vec<ChallengeDefinition> = plan
            .iter()
            .flat_map(|(difficulty, count)| pick_random(self.by_difficulty(*difficulty), *count, rng))
            .collect();
        selected.shuffle(rng);
        selected
    }
}

fn pick_random<R: Rng + ?Sized>(
    mut pool: Vec<&ChallengeDefinition>,
    count: usize,
    rng: &mut R,
) -> Vec<ChallengeDefinition> {
    pool.shuffle(rng);
    pool.into_iter().take(count).cloned().collect()
}

type BuiltinRow = (&'static str, &'static str, &'static str, TraitKind, Difficulty, u32);

static BUILTIN: &[BuiltinRow] = &[
    (
        "sc-no-snooze",
        "No Snooze",
        "Get up on the first alarm without hitting snooze",
        TraitKind::SelfControl,
        Difficulty::Easy,
        5,
    ),
    (
        "sc-delay-craving",
        "Delay a Craving",
        "When a craving hits, wait 20 minutes before deciding",
        TraitKind::SelfControl,
        Difficulty::Medium,
        20,
    ),
    (
        "sc-dopamine-fast",
        "Half-Day Dopamine Fast",
        "No social media, games, or snacks until evening",
        TraitKind::SelfControl,
        Difficulty::Hard,
        240,
    ),
    (
        "er-name-emotion",
        "Name the Emotion",
        "Pause three times today and name what you are feeling",
        TraitKind::EmotionalRegulation,
        Difficulty::Easy,
        5,
    ),
    (
        "er-box-breathing",
        "Box Breathing",
        "Do four rounds of box breathing when you feel tense",
        TraitKind::EmotionalRegulation,
        Difficulty::Medium,
        10,
    ),
    (
        "er-pause-reply",
        "Pause Before Replying",
        "In a heated moment, wait a full minute before you respond",
        TraitKind::EmotionalRegulation,
        Difficulty::Hard,
        15,
    ),
    (
        "cf-eye-contact",
        "Hold Eye Contact",
        "Keep eye contact through every conversation today",
        TraitKind::Confidence,
        Difficulty::Easy,
        10,
    ),
    (
        "cf-speak-first",
        "Speak First",
        "Share your opinion first in a meeting or group chat",
        TraitKind::Confidence,
        Difficulty::Medium,
        15,
    ),
    (
        "cf-ask-for-it",
        "Ask For It",
        "Make a request you expect might be turned down",
        TraitKind::Confidence,
        Difficulty::Hard,
        30,
    ),
    (
        "aw-five-senses",
        "Five Senses Check",
        "Notice five things you can see, four you can hear, three you can touch",
        TraitKind::Awareness,
        Difficulty::Easy,
        5,
    ),
    (
        "aw-mindful-meal",
        "Mindful Meal",
        "Eat one meal with no screen and no distractions",
        TraitKind::Awareness,
        Difficulty::Medium,
        25,
    ),
    (
        "aw-trigger-log",
        "Trigger Log",
        "Write down every moment you reached for your phone without deciding to",
        TraitKind::Awareness,
        Difficulty::Hard,
        60,
    ),
    (
        "cm-thank-you",
        "Specific Thanks",
        "Thank someone and say exactly what they did that helped",
        TraitKind::Communication,
        Difficulty::Easy,
        5,
    ),
    (
        "cm-active-listen",
        "Active Listening",
        "In one conversation, summarize what the other person said before replying",
        TraitKind::Communication,
        Difficulty::Medium,
        20,
    ),
    (
        "cm-hard-conversation",
        "The Hard Conversation",
        "Start a conversation you have been putting off",
        TraitKind::Communication,
        Difficulty::Hard,
        45,
    ),
    (
        "rs-reframe",
        "Reframe a Setback",
        "Write one thing you learned from a recent setback",
        TraitKind::Resilience,
        Difficulty::Easy,
        10,
    ),
    (
        "rs-cold-finish",
        "Cold Finish",
        "End your shower with 30 seconds of cold water",
        TraitKind::Resilience,
        Difficulty::Medium,
        5,
    ),
    (
        "rs-retry",
        "Try Again",
        "Go back to something you gave up on and make one more attempt",
        TraitKind::Resilience,
        Difficulty::Hard,
        60,
    ),
    (
        "ds-make-bed",
        "Make the Bed",
        "Make your bed as soon as you get up",
        TraitKind::Discipline,
        Difficulty::Easy,
        5,
    ),
    (
        "ds-deep-work",
        "Deep Work Block",
        "Work on one task for 50 minutes with notifications off",
        TraitKind::Discipline,
        Difficulty::Medium,
        50,
    ),
    (
        "ds-finish-dreaded",
        "Eat the Frog",
        "Finish the task you have been avoiding the longest",
        TraitKind::Discipline,
        Difficulty::Hard,
        90,
    ),
    (
        "si-remember-names",
        "Remember a Name",
        "Learn and use the name of someone you meet today",
        TraitKind::SocialIntelligence,
        Difficulty::Easy,
        5,
    ),
    (
        "si-read-the-room",
        "Read the Room",
        "Before joining a group conversation, watch for a minute and note the mood",
        TraitKind::SocialIntelligence,
        Difficulty::Medium,
        15,
    ),
    (
        "si-start-conversation",
        "Start a Conversation",
        "Start a real conversation with a stranger",
        TraitKind::SocialIntelligence,
        Difficulty::Hard,
        20,
    ),
];

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_builtin_covers_every_trait() {
        let catalog = ChallengeCatalog::builtin();
        assert_eq!(catalog.len(), 24);
        for kind in TraitKind::all() {
            assert_eq!(catalog.by_category(*kind).len(), 3);
        }
        assert_eq!(catalog.by_difficulty(Difficulty::Hard).len(), 8);
    }

    #[test]
    fn test_parse_both_pool_shapes() {
        let item = r#"{"id":"x","title":"X","description":"d","category":"confidence","difficulty":"hard","estimatedMinutes":30}"#;
        let list = ChallengeCatalog::from_json_str(&format!("[{item}]")).unwrap();
        let wrapped = ChallengeCatalog::from_json_str(&format!(r#"{{"challenges":[{item}]}}"#)).unwrap();
        assert_eq!(list.all(), wrapped.all());
        assert_eq!(list.all()[0].category, TraitKind::Confidence);
        assert_eq!(list.all()[0].xp_reward(), 65);
        assert!(ChallengeCatalog::from_json_str("{\"nope\": 1}").is_err());
    }

    #[test]
    fn test_daily_mix_by_weekday() {
        let catalog = ChallengeCatalog::builtin();
        let mut rng = StdRng::seed_from_u64(7);

        let sunday = catalog.daily_mix(Weekday::Sun, &mut rng);
        assert_eq!(sunday.len(), 3);
        assert!(sunday.iter().all(|c| c.difficulty == Difficulty::Hard));

        let monday = catalog.daily_mix(Weekday::Mon, &mut rng);
        let easy = monday.iter().filter(|c| c.difficulty == Difficulty::Easy).count();
        let medium = monday.iter().filter(|c| c.difficulty == Difficulty::Medium).count();
        assert_eq!((easy, medium), (1, 2));

        let tuesday = catalog.daily_mix(Weekday::Tue, &mut rng);
        let hard = tuesday.iter().filter(|c| c.difficulty == Difficulty::Hard).count();
        assert_eq!(hard, 1);
    }

    #[test]
    fn test_missing_pool_falls_back() {
        let catalog = ChallengeCatalog::load_or_builtin(Some(Path::new("/nonexistent/pool.json")));
        assert_eq!(catalog.len(), 24);
    }
}
