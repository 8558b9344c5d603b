//! JSON/CSV export and JSON import of habits

use std::collections::BTreeMap;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::{day_key, parse_day_key};
use crate::domain::{new_id, Habit};
use crate::metrics::{completion_rate, days_since_creation};

pub const EXPORT_VERSION: &str = "1.0.0";

const CSV_HEADERS: &str = "Habit Name,Created Date,Total Completions,Completion Rate";

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Malformed JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error("Invalid format: habits array not found")]
    MissingHabits,

    #[error("Invalid habit at index {index}: {reason}")]
    InvalidHabit { index: usize, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    pub include_stats: bool,
    pub include_completions: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            include_stats: true,
            include_completions: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportStats {
    pub total_completions: u32,
    pub completion_rate: u32,
    pub days_since_creation: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedHabit {
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completions: Option<BTreeMap<String, bool>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<ExportStats>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub version: String,
    pub export_date: DateTime<Utc>,
    pub habits: Vec<ExportedHabit>,
}

impl ExportDocument {
    pub fn build(habits: &[Habit], now: DateTime<Local>, options: ExportOptions) -> Self {
        let habits = habits
            .iter()
            .map(|habit| ExportedHabit {
                name: habit.name.clone(),
                created_at: habit.created_at,
                completions: options.include_completions.then(|| {
                    habit
                        .completions
                        .iter()
                        .map(|d| (day_key(*d), true))
                        .collect()
                }),
                stats: options.include_stats.then(|| ExportStats {
                    total_completions: habit.completion_count() as u32,
                    completion_rate: completion_rate(habit, now),
                    days_since_creation: days_since_creation(habit.created_at, now),
                }),
            })
            .collect();

        Self {
            version: EXPORT_VERSION.to_string(),
            export_date: now.with_timezone(&Utc),
            habits,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Quote a CSV field when it contains a separator, quote or newline
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub fn export_csv(habits: &[Habit], now: DateTime<Local>) -> String {
    let mut lines = vec![CSV_HEADERS.to_string()];
    for habit in habits {
        let created = habit.created_at.with_timezone(&Local).date_naive();
        lines.push(format!(
            "{},{},{},{}%",
            csv_field(&habit.name),
            day_key(created),
            habit.completion_count(),
            completion_rate(habit, now)
        ));
    }
    lines.join("\n")
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportedHabit {
    name: String,
    #[serde(default)]
    completions: Option<BTreeMap<String, serde_json::Value>>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

/// Parse an export document into fresh habits.
///
/// Every habit gets a new id. Completions dated after today are dropped.
/// Nothing is stored here, so a rejected payload leaves no trace.
pub fn import_json(raw: &str, now: DateTime<Local>) -> Result<Vec<Habit>, ImportError> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    let entries = value
        .get("habits")
        .and_then(|h| h.as_array())
        .ok_or(ImportError::MissingHabits)?;

    let today = now.date_naive();
    let mut habits = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let imported: ImportedHabit =
            serde_json::from_value(entry.clone()).map_err(|e| ImportError::InvalidHabit {
                index,
                reason: e.to_string(),
            })?;

        let name = imported.name.trim();
        if name.is_empty() {
            return Err(ImportError::InvalidHabit {
                index,
                reason: "empty name".to_string(),
            });
        }

        let completions = imported
            .completions
            .unwrap_or_default()
            .into_iter()
            .filter(|(_, done)| done.as_bool() == Some(true))
            .filter_map(|(key, _)| parse_day_key(&key))
            .filter(|date| *date <= today)
            .collect();

        habits.push(Habit {
            id: new_id(),
            name: name.to_string(),
            completions,
            created_at: imported
                .created_at
                .unwrap_or_else(|| now.with_timezone(&Utc)),
        });
    }

    tracing::debug!("Parsed {} habits for import", habits.len());
    Ok(habits)
}
