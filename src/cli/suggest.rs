//! Smart suggestion command implementations

use anyhow::Result;

use habitquest::metrics::analyze_patterns;
use habitquest::HabitQuest;

pub fn list_command(app: &HabitQuest, patterns: bool) -> Result<()> {
    let habits = app.habits().list();

    if patterns {
        if let Some(p) = analyze_patterns(&habits, app.clock().now()) {
            println!("Average completion: {}%  Trend: {}", p.average_rate, p.trend.label());
            if let (Some(best), Some(worst)) = (p.best_day, p.worst_day) {
                println!(
                    "Best day: {} ({}%)  Weakest day: {} ({}%)",
                    best.weekday, best.rate, worst.weekday, worst.rate
                );
            }
            for h in &p.successful {
                println!("  ✓ {} ({}%)", h.name, h.rate);
            }
            for h in &p.struggling {
                println!("  ! {} ({}%)", h.name, h.rate);
            }
            println!();
        }
    }

    let suggestions = app.suggestions().current(&habits);
    if suggestions.is_empty() {
        println!("No suggestions right now.");
        return Ok(());
    }
    for s in &suggestions {
        println!("[{}] {}", s.id, s.title);
        println!("    {}", s.description);
    }
    Ok(())
}

pub fn dismiss_command(app: &HabitQuest, id: &str) -> Result<()> {
    if app.suggestions().dismiss(id)? {
        println!("Dismissed {}", id);
    } else {
        println!("{} was already dismissed", id);
    }
    Ok(())
}

pub fn reset_command(app: &HabitQuest) -> Result<()> {
    app.suggestions().clear_dismissed()?;
    println!("Dismissed suggestions cleared");
    Ok(())
}
