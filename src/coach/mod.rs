//! Coach: remote text generation for encouragement, insights and tasks
//!
//! The engine only depends on [`TextGenerator`]. Every remote failure is
//! caught in [`Coach`] and turned into a fallback string or a
//! [`CoachError`] value; nothing here panics or retries.

mod client;
mod prompts;
mod service;

pub use client::{AnthropicClient, Unconfigured};
pub use prompts::{CoachContext, HabitSummary};
pub use service::{parse_task_list, Coach, ASK_FALLBACK, INSIGHTS_FALLBACK};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One role-tagged message sent to the generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Request/response text completion
pub trait TextGenerator: Send + Sync {
    /// Complete a conversation, producing at most roughly `max_tokens` tokens
    fn complete(&self, messages: &[ChatMessage], max_tokens: u32) -> anyhow::Result<String>;
}

#[derive(Debug, thiserror::Error)]
pub enum CoachError {
    #[error("A request is already in flight")]
    InFlight,

    #[error("Please wait {0}s before generating again")]
    CoolingDown(u64),

    #[error("Coach service failed: {0:#}")]
    Service(anyhow::Error),

    #[error("Could not parse coach response: {0}")]
    Parse(String),

    #[error("API key not configured (set {0})")]
    MissingCredential(String),
}
