use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::difficulty::Difficulty;
use super::habit::new_id;

/// A generated, time-boxed actionable item distinct from a recurring habit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xp_reward: Option<u32>,
    #[serde(default)]
    pub ai_generated: bool,
}

impl Task {
    pub fn new(name: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            completed: false,
            created_at,
            difficulty: None,
            category: None,
            estimated_minutes: None,
            xp_reward: None,
            ai_generated: false,
        }
    }
}
