//! Per-habit, per-date journal notes with an optional mood

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::{day_key, Clock};
use crate::store::{Repository, StoreKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Great,
    Good,
    Okay,
    Struggling,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Great => "great",
            Self::Good => "good",
            Self::Okay => "okay",
            Self::Struggling => "struggling",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "great" => Some(Self::Great),
            "good" => Some(Self::Good),
            "okay" => Some(Self::Okay),
            "struggling" => Some(Self::Struggling),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitNote {
    pub id: String,
    pub habit_id: String,
    pub date: NaiveDate,
    pub content: String,
    #[serde(default)]
    pub mood: Option<Mood>,
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

/// Mood tallies for a habit's recent notes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MoodStats {
    pub great: u32,
    pub good: u32,
    pub okay: u32,
    pub struggling: u32,
}

type NoteMap = BTreeMap<String, HabitNote>;

#[derive(Clone)]
pub struct NoteBook {
    repo: Repository,
    clock: Arc<dyn Clock>,
}

impl NoteBook {
    pub fn new(repo: Repository, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    fn notes(&self) -> NoteMap {
        self.repo.load(StoreKey::HabitNotes)
    }

    pub fn add(
        &self,
        habit_id: &str,
        date: NaiveDate,
        content: &str,
        mood: Option<Mood>,
    ) -> Result<HabitNote> {
        let timestamp = self.clock.timestamp_ms();
        let note = HabitNote {
            id: format!("{}-{}-{}", habit_id, day_key(date), timestamp),
            habit_id: habit_id.to_string(),
            date,
            content: content.trim().to_string(),
            mood,
            timestamp,
            updated_at: None,
        };
        self.repo.update(StoreKey::HabitNotes, |notes: &mut NoteMap| {
            notes.insert(note.id.clone(), note.clone())
        })?;
        Ok(note)
    }

    /// Replace the content. A `None` mood keeps the existing one.
    pub fn update(&self, id: &str, content: &str, mood: Option<Mood>) -> Result<Option<HabitNote>> {
        let now = self.clock.timestamp_ms();
        self.repo.update(StoreKey::HabitNotes, |notes: &mut NoteMap| {
            let note = notes.get_mut(id)?;
            note.content = content.trim().to_string();
            if mood.is_some() {
                note.mood = mood;
            }
            note.updated_at = Some(now);
            Some(note.clone())
        })
    }

    pub fn delete(&self, id: &str) -> Result<bool> {
        self.repo
            .update(StoreKey::HabitNotes, |notes: &mut NoteMap| notes.remove(id).is_some())
    }

    /// Newest first
    pub fn for_habit(&self, habit_id: &str) -> Vec<HabitNote> {
        let mut notes: Vec<HabitNote> = self
            .notes()
            .into_values()
            .filter(|n| n.habit_id == habit_id)
            .collect();
        notes.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        notes
    }

    /// Newest first
    pub fn for_date(&self, date: NaiveDate) -> Vec<HabitNote> {
        let mut notes: Vec<HabitNote> = self
            .notes()
            .into_values()
            .filter(|n| n.date == date)
            .collect();
        notes.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        notes
    }

    /// Mood counts over the `limit` most recent notes that have a mood
    pub fn mood_stats(&self, habit_id: &str, limit: usize) -> MoodStats {
        let mut stats = MoodStats::default();
        for mood in self
            .for_habit(habit_id)
            .into_iter()
            .filter_map(|n| n.mood)
            .take(limit)
        {
            match mood {
                Mood::Great => stats.great += 1,
                Mood::Good => stats.good += 1,
                Mood::Okay => stats.okay += 1,
                Mood::Struggling => stats.struggling += 1,
            }
        }
        stats
    }

    pub(crate) fn remove_for_habit(&self, habit_id: &str) -> Result<()> {
        self.repo.update(StoreKey::HabitNotes, |notes: &mut NoteMap| {
            notes.retain(|_, n| n.habit_id != habit_id)
        })
    }
}
