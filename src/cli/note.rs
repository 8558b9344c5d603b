//! Habit note command implementations

use anyhow::{bail, Result};

use habitquest::tracker::Mood;
use habitquest::HabitQuest;

use super::habit::resolve;
use super::parse_date;

pub fn add_command(
    app: &HabitQuest,
    habit: &str,
    content: &str,
    mood: Option<&str>,
    date: Option<&str>,
) -> Result<()> {
    let habit = resolve(app, habit)?;
    if content.trim().is_empty() {
        bail!("Note cannot be empty");
    }
    let mood = match mood {
        Some(raw) => match Mood::from_str(&raw.to_lowercase()) {
            Some(m) => Some(m),
            None => bail!("Unknown mood '{}'. Use great, good, okay or struggling.", raw),
        },
        None => None,
    };
    let date = parse_date(date, app.clock().today())?;

    app.notes().add(&habit.id, date, content, mood)?;
    println!("Noted for {} on {}", habit.name, date);
    Ok(())
}

pub fn list_command(app: &HabitQuest, habit: &str) -> Result<()> {
    let habit = resolve(app, habit)?;
    let notes = app.notes().for_habit(&habit.id);
    if notes.is_empty() {
        println!("No notes for {}", habit.name);
        return Ok(());
    }

    for note in &notes {
        let mood = note.mood.map(|m| format!(" [{}]", m.as_str())).unwrap_or_default();
        println!("{}{}  {}", note.date, mood, note.content);
    }

    let moods = app.notes().mood_stats(&habit.id, 30);
    println!();
    println!(
        "Recent moods: {} great, {} good, {} okay, {} struggling",
        moods.great, moods.good, moods.okay, moods.struggling
    );
    Ok(())
}
