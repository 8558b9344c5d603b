//! Habit command implementations

use anyhow::{bail, Result};

use habitquest::calendar::days_before;
use habitquest::metrics::habit_metrics;
use habitquest::tracker::{HabitTemplate, TemplateCategory};
use habitquest::{Habit, HabitDifficulty, HabitQuest};

use super::{parse_date, print_events};

/// Resolve a habit by id, name or unique id prefix
pub(super) fn resolve(app: &HabitQuest, needle: &str) -> Result<Habit> {
    if let Some(habit) = app.habits().find(needle) {
        return Ok(habit);
    }
    let mut matches: Vec<Habit> = app
        .habits()
        .list()
        .into_iter()
        .filter(|h| h.id.starts_with(needle.trim()))
        .collect();
    match matches.len() {
        1 => Ok(matches.remove(0)),
        0 => bail!("Habit not found: {}", needle),
        n => bail!("'{}' matches {} habits, use a longer id", needle, n),
    }
}

pub fn add_command(app: &HabitQuest, name: &str) -> Result<()> {
    let (habit, events) = app.add_habit(name)?;
    println!("Added habit: {} ({})", habit.name, short_id(&habit.id));
    print_events(&events);
    Ok(())
}

pub fn list_command(app: &HabitQuest) -> Result<()> {
    let habits = app.habits().list();
    if habits.is_empty() {
        println!("No habits yet. Add one with `habitquest habit add <name>`.");
        return Ok(());
    }

    let now = app.clock().now();
    let today = now.date_naive();

    println!(
        "{:<10} {:<28} {:>7} {:>7} {:>6}  LAST 7 DAYS",
        "ID", "NAME", "STREAK", "BEST", "RATE"
    );
    println!("{}", "-".repeat(78));

    for habit in &habits {
        let metrics = habit_metrics(habit, now);
        let week: String = (0..7)
            .rev()
            .map(|offset| {
                if habit.is_completed(days_before(today, offset)) {
                    '■'
                } else {
                    '·'
                }
            })
            .collect();

        println!(
            "{:<10} {:<28} {:>7} {:>7} {:>5}%  {}",
            short_id(&habit.id),
            truncate(&habit.name, 28),
            app.recovery().current_streak(habit),
            metrics.longest_streak,
            metrics.completion_rate,
            week
        );
    }

    Ok(())
}

pub fn toggle_command(app: &HabitQuest, needle: &str, date: Option<&str>) -> Result<()> {
    let habit = resolve(app, needle)?;
    let date = parse_date(date, app.clock().today())?;

    let outcome = app.toggle_habit(&habit.id, date)?;
    if outcome.completed {
        println!("✓ {} done for {}", habit.name, date);
    } else {
        println!("○ {} unmarked for {}", habit.name, date);
    }
    print_events(&outcome.events);
    Ok(())
}

pub fn delete_command(app: &HabitQuest, needle: &str) -> Result<()> {
    let habit = resolve(app, needle)?;
    app.delete_habit(&habit.id)?;
    println!("Deleted habit: {}", habit.name);
    Ok(())
}

/// Show or set a habit's difficulty, with a suggestion from the last two weeks
pub fn difficulty_command(app: &HabitQuest, needle: &str, level: Option<&str>) -> Result<()> {
    let habit = resolve(app, needle)?;
    let book = app.difficulty();

    if let Some(raw) = level {
        let Some(level) = HabitDifficulty::from_str(raw) else {
            bail!(
                "Unknown difficulty '{}'. Use very-easy, easy, normal, hard or very-hard.",
                raw
            );
        };
        book.set(&habit.id, level)?;
    }

    let stats = book.stats(&habit.id);
    let info = stats.current.info();
    println!(
        "{} {}: {} (+{} XP bonus, {} change(s))",
        info.icon, habit.name, info.name, stats.xp_bonus, stats.changes
    );
    if let Some(suggestion) = book.suggestion(&habit) {
        println!(
            "  Suggestion: {} -> {}. {}",
            suggestion.current.info().name,
            suggestion.suggested.info().name,
            suggestion.reason
        );
    }
    Ok(())
}

/// List templates, or add one when a name is given
pub fn template_command(
    app: &HabitQuest,
    name: Option<&str>,
    category: Option<&str>,
) -> Result<()> {
    if let Some(name) = name {
        let Some(template) = HabitTemplate::find(name) else {
            bail!("Template not found: {}", name);
        };
        let (habit, events) = app.add_habit_from_template(template)?;
        println!("Added {} {} ({})", template.icon, habit.name, short_id(&habit.id));
        print_events(&events);
        return Ok(());
    }

    let templates = match category {
        Some(raw) => {
            let Some(category) = TemplateCategory::from_str(raw) else {
                let known: Vec<_> = TemplateCategory::all().iter().map(|c| c.as_str()).collect();
                bail!("Unknown category '{}'. Known: {}", raw, known.join(", "));
            };
            HabitTemplate::by_category(category)
        }
        None => HabitTemplate::all().iter().collect(),
    };

    for template in templates {
        println!(
            "{} {:<28} {:<14} {:<7} {}",
            template.icon,
            template.name,
            template.category.as_str(),
            template.difficulty.as_str(),
            template.description
        );
    }
    Ok(())
}

pub(super) fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", head)
    }
}
