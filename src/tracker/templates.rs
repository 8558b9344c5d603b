//! Habit templates
//!
//! Static starter habits grouped by category. Picking one creates a habit
//! with the template's name.

use serde::Serialize;

use crate::domain::Difficulty;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateCategory {
    Health,
    Productivity,
    Learning,
    Social,
    Personal,
    Mindfulness,
    Career,
    Finance,
    Relationships,
    Creativity,
}

impl TemplateCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::Productivity => "productivity",
            Self::Learning => "learning",
            Self::Social => "social",
            Self::Personal => "personal",
            Self::Mindfulness => "mindfulness",
            Self::Career => "career",
            Self::Finance => "finance",
            Self::Relationships => "relationships",
            Self::Creativity => "creativity",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|c| c.as_str() == s.to_ascii_lowercase())
    }

    pub fn all() -> &'static [TemplateCategory] {
        &[
            Self::Health,
            Self::Productivity,
            Self::Learning,
            Self::Social,
            Self::Personal,
            Self::Mindfulness,
            Self::Career,
            Self::Finance,
            Self::Relationships,
            Self::Creativity,
        ]
    }
}

impl std::fmt::Display for TemplateCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HabitTemplate {
    pub name: &'static str,
    pub category: TemplateCategory,
    pub icon: &'static str,
    pub description: &'static str,
    pub difficulty: Difficulty,
}

const fn template(
    name: &'static str,
    category: TemplateCategory,
    icon: &'static str,
    description: &'static str,
    difficulty: Difficulty,
) -> HabitTemplate {
    HabitTemplate {
        name,
        category,
        icon,
        description,
        difficulty,
    }
}

use Difficulty::{Easy, Hard, Medium};
use TemplateCategory::*;

pub static TEMPLATES: &[HabitTemplate] = &[
    template("Morning Exercise", Health, "🏃", "Start the day with 20 minutes of movement", Medium),
    template("Drink 8 Glasses of Water", Health, "💧", "Stay hydrated throughout the day", Easy),
    template("Sleep by 11pm", Health, "😴", "Keep a consistent bedtime", Medium),
    template("Deep Work Session", Productivity, "🎯", "90 minutes of focused, distraction-free work", Hard),
    template("Plan Tomorrow", Productivity, "📋", "Write tomorrow's top three priorities", Easy),
    template("Inbox Zero", Productivity, "📥", "Clear your inbox before signing off", Medium),
    template("Read 30 Minutes", Learning, "📚", "Read a book for half an hour", Easy),
    template("Practice Language", Learning, "🗣️", "Study a new language for 15 minutes", Medium),
    template("Connect with Friend", Social, "👋", "Reach out to someone you care about", Easy),
    template("Attend Community Event", Social, "🤝", "Show up for a club, meetup or class", Hard),
    template("Journal Entry", Personal, "📝", "Write down your thoughts for the day", Easy),
    template("Make Your Bed", Personal, "🛏️", "Start the day with a small win", Easy),
    template("Morning Meditation", Mindfulness, "🧘", "Ten minutes of quiet breathing", Easy),
    template("Mindful Eating", Mindfulness, "🍎", "Eat one meal without screens", Medium),
    template("Gratitude List", Mindfulness, "🙏", "Write three things you are grateful for", Easy),
    template("Skill Development", Career, "💼", "Spend 30 minutes on a professional skill", Medium),
    template("Update Portfolio", Career, "🗂️", "Add recent work to your portfolio", Hard),
    template("Track Expenses", Finance, "💰", "Log everything you spent today", Easy),
    template("No Impulse Buys", Finance, "🛑", "Wait a day before any unplanned purchase", Medium),
    template("Quality Time Partner", Relationships, "❤️", "Undistracted time with your partner", Easy),
    template("Call Family", Relationships, "📞", "Check in with a family member", Easy),
    template("Write", Creativity, "✍️", "Write 300 words of anything", Medium),
    template("Sketch", Creativity, "🎨", "Draw something for 15 minutes", Easy),
];

/// Templates surfaced first in pickers
const POPULAR: &[&str] = &[
    "Morning Exercise",
    "Read 30 Minutes",
    "Drink 8 Glasses of Water",
    "Morning Meditation",
    "Journal Entry",
    "Plan Tomorrow",
];

impl HabitTemplate {
    pub fn all() -> &'static [HabitTemplate] {
        TEMPLATES
    }

    pub fn by_category(category: TemplateCategory) -> Vec<&'static HabitTemplate> {
        TEMPLATES.iter().filter(|t| t.category == category).collect()
    }

    pub fn by_difficulty(difficulty: Difficulty) -> Vec<&'static HabitTemplate> {
        TEMPLATES
            .iter()
            .filter(|t| t.difficulty == difficulty)
            .collect()
    }

    /// Case-insensitive match on name or description
    pub fn search(query: &str) -> Vec<&'static HabitTemplate> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return TEMPLATES.iter().collect();
        }
        TEMPLATES
            .iter()
            .filter(|t| {
                t.name.to_lowercase().contains(&query)
                    || t.description.to_lowercase().contains(&query)
            })
            .collect()
    }

    pub fn popular() -> Vec<&'static HabitTemplate> {
        POPULAR.iter().filter_map(|name| Self::find(name)).collect()
    }

    /// Exact name lookup, ignoring case
    pub fn find(name: &str) -> Option<&'static HabitTemplate> {
        TEMPLATES
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_category_has_templates() {
        for category in TemplateCategory::all() {
            assert!(
                !HabitTemplate::by_category(*category).is_empty(),
                "no templates for {}",
                category
            );
        }
    }

    #[test]
    fn test_names_unique() {
        let mut names: Vec<_> = TEMPLATES.iter().map(|t| t.name).collect();
        names.sort();
        let count = names.len();
        names.dedup();
        assert_eq!(names.len(), count);
    }

    #[test]
    fn test_search_and_find() {
        let hits = HabitTemplate::search("MEDITATION");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].category, TemplateCategory::Mindfulness);

        assert!(HabitTemplate::find("read 30 minutes").is_some());
        assert!(HabitTemplate::find("Juggle").is_none());
        assert_eq!(HabitTemplate::popular().len(), POPULAR.len());
        assert_eq!(TemplateCategory::from_str("Finance"), Some(TemplateCategory::Finance));
    }

    #[test]
    fn test_by_difficulty() {
        let hard = HabitTemplate::by_difficulty(Difficulty::Hard);
        assert!(hard.iter().all(|t| t.difficulty == Difficulty::Hard));
        assert!(hard.iter().any(|t| t.name == "Deep Work Session"));
    }
}
