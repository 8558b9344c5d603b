//! Weekly goal command implementations

use anyhow::{bail, Result};

use habitquest::tracker::WeeklyGoal;
use habitquest::HabitQuest;

/// Goal ids are `{week}-{uuid}`; show the uuid head
fn short_goal_id(goal: &WeeklyGoal) -> &str {
    let uuid = goal.id.get(11..).unwrap_or(&goal.id);
    uuid.get(..8).unwrap_or(uuid)
}

fn resolve(app: &HabitQuest, needle: &str) -> Result<WeeklyGoal> {
    let needle = needle.trim();
    if let Some(goal) = app.goals().get(needle) {
        return Ok(goal);
    }
    let mut matches: Vec<WeeklyGoal> = app
        .goals()
        .current_week()
        .into_iter()
        .filter(|g| short_goal_id(g).starts_with(needle) || g.id.starts_with(needle))
        .collect();
    match matches.len() {
        1 => Ok(matches.remove(0)),
        0 => bail!("Goal not found: {}", needle),
        n => bail!("'{}' matches {} goals, use a longer id", needle, n),
    }
}

/// Create a goal for this week, optionally linked to a habit
pub fn add_command(app: &HabitQuest, title: &str, target: u32, habit: Option<&str>) -> Result<()> {
    let habit_id = match habit {
        Some(needle) => match app.habits().find(needle) {
            Some(h) => Some(h.id),
            None => bail!("Habit not found: {}", needle),
        },
        None => None,
    };
    let goal = app.goals().create(title, target, habit_id)?;
    println!(
        "Added goal {}  {} (0/{})",
        short_goal_id(&goal),
        goal.title,
        goal.target_count
    );
    Ok(())
}

pub fn list_command(app: &HabitQuest, weeks: Option<u32>) -> Result<()> {
    if let Some(weeks) = weeks {
        for week in app.goals().history(weeks) {
            println!(
                "Week of {}: {} goal(s), {}% completed",
                week.week_key,
                week.goals.len(),
                week.completion_rate
            );
        }
        return Ok(());
    }

    let goals = app.goals().current_week();
    if goals.is_empty() {
        println!("No goals this week. Add one with `habitquest goal add`.");
        return Ok(());
    }

    let habits = app.habits().list();
    for goal in &goals {
        let mark = if goal.completed { "[✓]" } else { "[ ]" };
        let linked = goal
            .habit_id
            .as_deref()
            .and_then(|id| habits.iter().find(|h| h.id == id))
            .map(|h| format!("  ← {}", h.name))
            .unwrap_or_default();
        println!(
            "{} {}  {} ({}/{}){}",
            mark,
            short_goal_id(goal),
            goal.title,
            goal.current_count,
            goal.target_count,
            linked
        );
    }

    let stats = app.goals().stats();
    println!();
    println!(
        "{}/{} completed ({}%), {} in progress",
        stats.completed, stats.total, stats.completion_rate, stats.in_progress
    );
    Ok(())
}

pub fn progress_command(app: &HabitQuest, needle: &str, by: u32) -> Result<()> {
    let goal = resolve(app, needle)?;
    let Some(goal) = app.goals().update_progress(&goal.id, by)? else {
        bail!("Goal not found: {}", needle);
    };
    println!(
        "{} {} ({}/{})",
        if goal.completed { "✓" } else { "→" },
        goal.title,
        goal.current_count,
        goal.target_count
    );
    Ok(())
}
