//! Configuration loading and management

mod io;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::challenges::SchedulerSettings;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Where habit data lives
    #[serde(default)]
    pub storage: StorageSettings,

    /// Daily challenge limits
    #[serde(default)]
    pub challenges: ChallengeSettings,

    /// Remote coach settings
    #[serde(default)]
    pub coach: CoachSettings,
}

/// Storage settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// SQLite database file
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    Config::global_config_dir().join("habitquest.db")
}

/// Challenge scheduler settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeSettings {
    /// Challenges generated per day
    #[serde(default = "default_daily_limit")]
    pub daily_limit: usize,

    /// Days before a completed challenge can be offered again
    #[serde(default = "default_cooldown_days")]
    pub cooldown_days: i64,

    /// Skips allowed per day
    #[serde(default = "default_max_skips")]
    pub max_skips_per_day: u32,

    /// JSON challenge pool replacing the built-in catalog
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<PathBuf>,
}

fn default_daily_limit() -> usize {
    3
}

fn default_cooldown_days() -> i64 {
    7
}

fn default_max_skips() -> u32 {
    2
}

impl Default for ChallengeSettings {
    fn default() -> Self {
        Self {
            daily_limit: default_daily_limit(),
            cooldown_days: default_cooldown_days(),
            max_skips_per_day: default_max_skips(),
            catalog_path: None,
        }
    }
}

impl ChallengeSettings {
    pub fn scheduler(&self) -> SchedulerSettings {
        SchedulerSettings {
            daily_limit: self.daily_limit,
            cooldown_days: self.cooldown_days,
            max_skips_per_day: self.max_skips_per_day,
        }
    }
}

/// Remote text-generation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachSettings {
    /// Messages endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// API version header value
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Environment variable holding the API key. The key itself is never
    /// written to the config file.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Minimum seconds between task-generation requests
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    "https://api.anthropic.com/v1/messages".to_string()
}

fn default_model() -> String {
    "claude-3-5-sonnet-20241022".to_string()
}

fn default_api_version() -> String {
    "2023-06-01".to_string()
}

fn default_api_key_env() -> String {
    "ANTHROPIC_API_KEY".to_string()
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_cooldown_secs() -> u64 {
    5
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for CoachSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            api_version: default_api_version(),
            api_key_env: default_api_key_env(),
            max_tokens: default_max_tokens(),
            cooldown_secs: default_cooldown_secs(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.challenges.scheduler(), SchedulerSettings::default());
        assert_eq!(config.coach.max_tokens, 1000);
        assert_eq!(config.coach.cooldown_secs, 5);
    }

    #[test]
    fn test_partial_sections() {
        let config: Config = toml::from_str(
            r#"
            [challenges]
            daily_limit = 5
            catalog_path = "/tmp/pool.json"

            [coach]
            api_key_env = "HQ_KEY"
            "#,
        )
        .unwrap();
        assert_eq!(config.challenges.daily_limit, 5);
        assert_eq!(config.challenges.cooldown_days, 7);
        assert_eq!(
            config.challenges.catalog_path,
            Some(PathBuf::from("/tmp/pool.json"))
        );
        assert_eq!(config.coach.api_key_env, "HQ_KEY");
        assert_eq!(config.coach.model, default_model());
    }
}
