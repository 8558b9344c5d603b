//! CLI command implementations

pub mod bundle;
pub mod challenge;
pub mod coach;
pub mod goal;
pub mod habit;
pub mod init;
pub mod note;
pub mod photo;
pub mod recovery;
pub mod stats;
pub mod suggest;
pub mod task;
pub mod transfer;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;

use habitquest::calendar::parse_day_key;
use habitquest::config::Config;
use habitquest::progression::GamificationEvent;
use habitquest::HabitQuest;

/// Load the config (creating it if missing) and open the data store
pub fn open(
    config_path: Option<&PathBuf>,
    data_path: Option<&PathBuf>,
) -> Result<(Config, HabitQuest)> {
    let config = match config_path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let db_path: &Path = data_path.map(|p| p.as_path()).unwrap_or(config.storage.path.as_path());
    let app = HabitQuest::open_at(&config, db_path)?;
    Ok((config, app))
}

/// Parse an optional YYYY-MM-DD argument, defaulting to today
pub fn parse_date(raw: Option<&str>, today: NaiveDate) -> Result<NaiveDate> {
    match raw {
        None => Ok(today),
        Some(raw) => parse_day_key(raw)
            .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", raw)),
    }
}

/// Print progression events as they happened
pub fn print_events(events: &[GamificationEvent]) {
    for event in events {
        match event {
            GamificationEvent::XpAwarded { amount, reason } => {
                println!("  +{} XP ({})", amount, reason);
            }
            GamificationEvent::LevelUp(up) => {
                println!("  ⬆️  Level up! {} -> {}", up.old_level, up.new_level);
            }
            GamificationEvent::AchievementUnlocked(unlocked) => {
                let a = unlocked.achievement;
                println!(
                    "  {} Achievement unlocked: {} (+{} XP)",
                    a.icon, a.name, a.xp_reward
                );
            }
            GamificationEvent::MilestoneReached { milestone } => {
                println!("  {} Milestone: {}", milestone.icon, milestone.name);
            }
            GamificationEvent::TraitLevelUp {
                trait_kind,
                new_level,
            } => {
                println!("  {} reached level {}", trait_kind.info().name, new_level);
            }
            GamificationEvent::StreakExtended { count } => {
                println!("  🔥 Streak: {} day(s)", count);
            }
            GamificationEvent::BundleCompleted { name, bonus_xp } => {
                println!("  📦 Bundle complete: {} (+{} XP)", name, bonus_xp);
            }
        }
    }
}
