//! Habit bundle command implementations

use anyhow::{bail, Result};

use habitquest::tracker::{Bundle, NewBundle, TimeOfDay, PRESETS};
use habitquest::HabitQuest;

use super::habit::{resolve, short_id};

fn resolve_bundle(app: &HabitQuest, needle: &str) -> Result<Bundle> {
    if let Some(bundle) = app.bundles().find(needle) {
        return Ok(bundle);
    }
    let mut matches: Vec<Bundle> = app
        .bundles()
        .list()
        .into_iter()
        .filter(|b| b.id.starts_with(needle.trim()))
        .collect();
    match matches.len() {
        1 => Ok(matches.remove(0)),
        0 => bail!("Bundle not found: {}", needle),
        n => bail!("'{}' matches {} bundles, use a longer id", needle, n),
    }
}

fn resolve_all(app: &HabitQuest, habits: &[String]) -> Result<Vec<String>> {
    habits
        .iter()
        .map(|h| resolve(app, h).map(|habit| habit.id))
        .collect()
}

pub fn list_command(app: &HabitQuest) -> Result<()> {
    let bundles = app.bundles().list();
    if bundles.is_empty() {
        println!("No bundles yet. Try 'habitquest bundle presets'.");
        return Ok(());
    }

    let habits = app.habits().list();
    let today = app.clock().today();
    for bundle in &bundles {
        let stats = bundle.stats(&habits, today);
        let paused = if bundle.is_active { "" } else { " (paused)" };
        println!(
            "{} {} [{}]{}  {}/{} today  🔥 {}  +{} XP",
            bundle.icon,
            bundle.name,
            short_id(&bundle.id),
            paused,
            stats.completed_today,
            stats.total_habits,
            stats.current_streak,
            stats.bonus_xp
        );
        for id in &bundle.habit_ids {
            if let Some(habit) = habits.iter().find(|h| &h.id == id) {
                let mark = if habit.is_completed(today) { "✓" } else { " " };
                println!("    [{}] {}", mark, habit.name);
            }
        }
    }
    Ok(())
}

pub fn presets_command() -> Result<()> {
    for preset in PRESETS {
        println!(
            "{} {} ({}, ~{} min)  {}",
            preset.icon,
            preset.key,
            preset.time_of_day.as_str(),
            preset.estimated_minutes,
            preset.description
        );
        println!("    Suggested: {}", preset.suggested_habits.join(", "));
    }
    Ok(())
}

pub fn create_command(
    app: &HabitQuest,
    name: &str,
    habits: &[String],
    preset: Option<&str>,
    time: Option<&str>,
    bonus: Option<u32>,
) -> Result<()> {
    let habit_ids = resolve_all(app, habits)?;
    let bundle = match preset {
        Some(key) => app.bundles().create_from_preset(key, habit_ids)?,
        None => {
            let time_of_day = match time {
                Some(raw) => match TimeOfDay::from_str(&raw.to_lowercase()) {
                    Some(t) => Some(t),
                    None => bail!(
                        "Unknown time '{}'. Use morning, afternoon, evening or anytime.",
                        raw
                    ),
                },
                None => None,
            };
            app.bundles().create(NewBundle {
                name: name.to_string(),
                habit_ids,
                time_of_day,
                completion_bonus: bonus,
                ..Default::default()
            })?
        }
    };
    println!(
        "Created bundle: {} ({}) with {} habit(s)",
        bundle.name,
        short_id(&bundle.id),
        bundle.habit_ids.len()
    );
    Ok(())
}

pub fn add_command(app: &HabitQuest, bundle: &str, habit: &str) -> Result<()> {
    let bundle = resolve_bundle(app, bundle)?;
    let habit = resolve(app, habit)?;
    app.bundles().add_habit(&bundle.id, &habit.id)?;
    println!("Added {} to {}", habit.name, bundle.name);
    Ok(())
}

pub fn remove_command(app: &HabitQuest, bundle: &str, habit: &str) -> Result<()> {
    let bundle = resolve_bundle(app, bundle)?;
    let habit = resolve(app, habit)?;
    app.bundles().remove_habit(&bundle.id, &habit.id)?;
    println!("Removed {} from {}", habit.name, bundle.name);
    Ok(())
}

pub fn pause_command(app: &HabitQuest, bundle: &str, resume: bool) -> Result<()> {
    let bundle = resolve_bundle(app, bundle)?;
    let bundle = app.bundles().set_active(&bundle.id, resume)?;
    println!(
        "{} {}",
        if bundle.is_active { "Resumed" } else { "Paused" },
        bundle.name
    );
    Ok(())
}

pub fn reorder_command(app: &HabitQuest, bundles: &[String]) -> Result<()> {
    let ids = bundles
        .iter()
        .map(|b| resolve_bundle(app, b).map(|bundle| bundle.id))
        .collect::<Result<Vec<_>>>()?;
    app.bundles().reorder(&ids)?;
    list_command(app)
}

pub fn delete_command(app: &HabitQuest, bundle: &str) -> Result<()> {
    let bundle = resolve_bundle(app, bundle)?;
    let removed = app.bundles().delete(&bundle.id)?;
    println!("Deleted bundle: {}", removed.name);
    Ok(())
}
