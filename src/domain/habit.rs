use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Rejections for habit mutations
#[derive(Debug, thiserror::Error)]
pub enum HabitError {
    #[error("Habit name cannot be empty")]
    EmptyName,

    #[error("Habit not found: {0}")]
    NotFound(String),

    #[error("Cannot record a completion in the future ({0})")]
    FutureDate(NaiveDate),

    #[error("A habit with id {0} already exists")]
    DuplicateId(String),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// Generate a fresh opaque identifier
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// A user-defined recurring action tracked by per-date completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    pub name: String,
    /// Completed dates. Serialized as `{"YYYY-MM-DD": true}`; absence means
    /// not completed.
    #[serde(default, with = "completion_map")]
    pub completions: BTreeSet<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Habit {
    /// Create a habit with a trimmed, non-empty name
    pub fn new(name: &str, created_at: DateTime<Utc>) -> Result<Self, HabitError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(HabitError::EmptyName);
        }
        Ok(Self {
            id: new_id(),
            name: name.to_string(),
            completions: BTreeSet::new(),
            created_at,
        })
    }

    pub fn is_completed(&self, date: NaiveDate) -> bool {
        self.completions.contains(&date)
    }

    /// Flip the completion state of a single date, returning the new state
    pub fn toggle(&mut self, date: NaiveDate) -> bool {
        if self.completions.remove(&date) {
            false
        } else {
            self.completions.insert(date);
            true
        }
    }

    pub fn completion_count(&self) -> usize {
        self.completions.len()
    }

    pub fn last_completed(&self) -> Option<NaiveDate> {
        self.completions.iter().next_back().copied()
    }
}

/// Serde adapter between `BTreeSet<NaiveDate>` and a `{date: true}` map.
///
/// Entries with a `false` value or an unparseable key are dropped on read.
mod completion_map {
    use std::collections::{BTreeMap, BTreeSet};

    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::calendar::{day_key, parse_day_key};

    pub fn serialize<S>(dates: &BTreeSet<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(dates.iter().map(|d| (day_key(*d), true)))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BTreeSet<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, bool>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .filter(|(_, done)| *done)
            .filter_map(|(key, _)| parse_day_key(&key))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_trims_and_rejects_empty() {
        let habit = Habit::new("  Read  ", Utc::now()).unwrap();
        assert_eq!(habit.name, "Read");
        assert!(habit.completions.is_empty());

        assert!(matches!(
            Habit::new("   ", Utc::now()),
            Err(HabitError::EmptyName)
        ));
    }

    #[test]
    fn test_toggle_twice_restores_state() {
        let mut habit = Habit::new("Walk", Utc::now()).unwrap();
        let day = date(2024, 1, 3);
        let before = habit.clone();

        assert!(habit.toggle(day));
        assert!(habit.is_completed(day));
        assert!(!habit.toggle(day));
        assert_eq!(habit, before);
    }

    #[test]
    fn test_completions_serialize_as_date_map() {
        let mut habit = Habit::new("Walk", Utc::now()).unwrap();
        habit.toggle(date(2024, 1, 2));
        habit.toggle(date(2024, 1, 1));

        let json = serde_json::to_value(&habit).unwrap();
        assert_eq!(json["completions"]["2024-01-01"], serde_json::json!(true));
        assert_eq!(json["completions"]["2024-01-02"], serde_json::json!(true));
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_false_and_invalid_entries_are_dropped() {
        let json = r#"{
            "id": "1",
            "name": "Walk",
            "completions": {"2024-01-01": true, "2024-01-02": false, "nope": true},
            "createdAt": "2024-01-01T00:00:00Z"
        }"#;
        let habit: Habit = serde_json::from_str(json).unwrap();
        assert_eq!(habit.completion_count(), 1);
        assert_eq!(habit.last_completed(), Some(date(2024, 1, 1)));
    }
}
