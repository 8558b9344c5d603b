//! Task command implementations

use anyhow::{bail, Result};

use habitquest::coach::Coach;
use habitquest::config::Config;
use habitquest::HabitQuest;

use super::habit::short_id;
use super::print_events;

/// Resolve a task by id or unique id prefix
fn resolve(app: &HabitQuest, needle: &str) -> Result<String> {
    let ids: Vec<String> = app
        .tasks()
        .list()
        .into_iter()
        .map(|t| t.id)
        .filter(|id| id.starts_with(needle.trim()))
        .collect();
    match ids.as_slice() {
        [id] => Ok(id.clone()),
        [] => bail!("Task not found: {}", needle),
        _ => bail!("'{}' matches {} tasks, use a longer id", needle, ids.len()),
    }
}

pub fn list_command(app: &HabitQuest) -> Result<()> {
    let tasks = app.tasks().list();
    if tasks.is_empty() {
        println!("No tasks. Try `habitquest task generate`.");
        return Ok(());
    }
    for task in &tasks {
        let mark = if task.completed { "[✓]" } else { "[ ]" };
        let source = if task.ai_generated { " (coach)" } else { "" };
        println!("{} {}  {}{}", mark, short_id(&task.id), task.name, source);
    }
    let done = tasks.iter().filter(|t| t.completed).count();
    println!();
    println!("{}/{} done", done, tasks.len());
    Ok(())
}

pub fn add_command(app: &HabitQuest, name: &str) -> Result<()> {
    let added = app.tasks().add_names([name], false)?;
    match added.first() {
        Some(task) => println!("Added task {}  {}", short_id(&task.id), task.name),
        None => bail!("Task name cannot be empty"),
    }
    Ok(())
}

pub fn toggle_command(app: &HabitQuest, needle: &str) -> Result<()> {
    let id = resolve(app, needle)?;
    match app.toggle_task(&id)? {
        Some((true, events)) => {
            println!("✓ Task done");
            print_events(&events);
        }
        Some((false, _)) => println!("○ Task reopened"),
        None => bail!("Task not found: {}", needle),
    }
    Ok(())
}

pub fn delete_command(app: &HabitQuest, needle: &str) -> Result<()> {
    let id = resolve(app, needle)?;
    app.tasks().delete(&id)?;
    println!("Deleted task {}", short_id(&id));
    Ok(())
}

pub fn clear_command(app: &HabitQuest) -> Result<()> {
    let removed = app.tasks().clear_completed()?;
    println!("Removed {} completed task(s)", removed);
    Ok(())
}

/// Ask the coach for today's tasks. Coach failures are reported, not
/// returned as errors.
pub fn generate_command(app: &HabitQuest, config: &Config) -> Result<()> {
    let coach = Coach::from_settings(&config.coach);
    let (tasks, events) = match app.generate_tasks(&coach) {
        Ok(generated) => generated,
        Err(e) => {
            println!("Couldn't generate tasks: {}", e);
            return Ok(());
        }
    };
    println!("Generated {} task(s):", tasks.len());
    for task in &tasks {
        println!("  [ ] {}  {}", short_id(&task.id), task.name);
    }
    print_events(&events);
    Ok(())
}
