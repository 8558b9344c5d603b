//! Streak recovery command implementations

use anyhow::Result;

use habitquest::HabitQuest;

use super::habit::resolve;
use super::parse_date;

pub fn status_command(app: &HabitQuest) -> Result<()> {
    let recovery = app.recovery();
    let stats = recovery.stats();

    println!("Streak savers: {} available ({} used)", stats.savers_available, stats.savers_used);
    if stats.vacation_active {
        println!(
            "Vacation:      on, {} day(s) left, {} habit(s) paused",
            stats.vacation_days_remaining, stats.paused_habits
        );
    } else {
        println!("Vacation:      off");
    }
    println!(
        "Grace period:  {} ({}h)",
        if stats.grace_enabled { "on" } else { "off" },
        stats.grace_hours
    );

    for habit in app.habits().list() {
        if let Some(days) = recovery.saver_eligibility(&habit) {
            println!("  {} hit a {}-day streak and can earn a saver", habit.name, days);
        }
    }

    let suggestions = recovery.suggestions();
    if !suggestions.is_empty() {
        println!();
        println!("Options:");
        for s in suggestions {
            println!("  {}: {}", s.title, s.description);
        }
    }
    Ok(())
}

/// Spend a saver on a missed day (yesterday by default)
pub fn saver_command(app: &HabitQuest, habit: &str, date: Option<&str>) -> Result<()> {
    let habit = resolve(app, habit)?;
    let yesterday = app.clock().today() - chrono::Duration::days(1);
    let date = parse_date(date, yesterday)?;

    let remaining = app.recovery().use_saver(&habit.id, date)?;
    println!(
        "Saver used for {} on {}. Streak: {}. {} saver(s) left.",
        habit.name,
        date,
        app.recovery().current_streak(&habit),
        remaining
    );
    Ok(())
}

pub fn vacation_command(
    app: &HabitQuest,
    start: &str,
    end: &str,
    habits: &[String],
) -> Result<()> {
    let today = app.clock().today();
    let start = parse_date(Some(start), today)?;
    let end = parse_date(Some(end), today)?;

    let paused = if habits.is_empty() {
        app.habits().list().into_iter().map(|h| h.id).collect()
    } else {
        habits
            .iter()
            .map(|needle| resolve(app, needle).map(|h| h.id))
            .collect::<Result<Vec<_>>>()?
    };

    let days = app.recovery().activate_vacation(start, end, paused)?;
    println!("Vacation mode on: {} to {} ({} days)", start, end, days);
    Ok(())
}

pub fn vacation_off_command(app: &HabitQuest) -> Result<()> {
    app.recovery().deactivate_vacation()?;
    println!("Vacation mode off");
    Ok(())
}

pub fn grace_command(app: &HabitQuest, hours: Option<u32>, toggle: bool) -> Result<()> {
    let recovery = app.recovery();
    if let Some(hours) = hours {
        let set = recovery.set_grace_hours(hours)?;
        println!("Grace period set to {}h", set);
    }
    if toggle {
        let enabled = recovery.toggle_grace()?;
        println!("Grace period {}", if enabled { "enabled" } else { "disabled" });
    }
    if hours.is_none() && !toggle {
        let grace = recovery.grace();
        println!(
            "Grace period {} ({}h)",
            if grace.enabled { "on" } else { "off" },
            grace.hours
        );
    }
    Ok(())
}
