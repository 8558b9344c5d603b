//! Init command implementation

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use habitquest::config::Config;

/// Default configuration content for habitquest init
pub const DEFAULT_CONFIG: &str = r#"# HabitQuest Configuration
# ========================

# ============================================================================
# STORAGE
# ============================================================================
#
#   path - SQLite database file (default: ~/.habitquest/habitquest.db)

[storage]
# path = "/home/me/.habitquest/habitquest.db"

# ============================================================================
# CHALLENGES - Daily trait-building challenges
# ============================================================================
#
#   daily_limit       - Challenges generated per day (default: 3)
#   cooldown_days     - Days before a completed challenge comes back (default: 7)
#   max_skips_per_day - Skips allowed per day (default: 2)
#   catalog_path      - Optional JSON pool replacing the built-in challenges

[challenges]
daily_limit = 3
cooldown_days = 7
max_skips_per_day = 2
# catalog_path = "/home/me/.habitquest/challenges.json"

# ============================================================================
# COACH - Optional AI coach
# ============================================================================
#
# The API key is read from the environment variable named by api_key_env.
# It is never stored in this file.

[coach]
endpoint = "https://api.anthropic.com/v1/messages"
model = "claude-3-5-sonnet-20241022"
api_version = "2023-06-01"
api_key_env = "ANTHROPIC_API_KEY"
max_tokens = 1000
cooldown_secs = 5
timeout_secs = 30
"#;

pub fn init_command(config_path: Option<PathBuf>, force: bool) -> Result<()> {
    let config_path = config_path.unwrap_or_else(Config::global_config_path);
    write_default_config(&config_path, force)?;
    println!("Created: {}", config_path.display());
    Ok(())
}

fn write_default_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration already exists: {}\nUse --force to overwrite.",
            config_path.display()
        );
    }

    if let Some(parent) = config_path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;
    tracing::info!("Wrote default config to {}", config_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_matches_defaults() {
        let parsed: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        write_default_config(&path, false).unwrap();
        assert!(write_default_config(&path, false).is_err());
        write_default_config(&path, true).unwrap();
        assert!(Config::from_file(&path).is_ok());
    }
}
