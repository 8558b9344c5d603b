//! Export and import command implementations

use std::path::Path;

use anyhow::{bail, Context, Result};

use habitquest::tracker::ExportOptions;
use habitquest::HabitQuest;

use super::print_events;

/// Write an export to `output`, or stdout when absent
pub fn export_command(
    app: &HabitQuest,
    format: &str,
    output: Option<&Path>,
    no_stats: bool,
) -> Result<()> {
    let content = match format {
        "json" => app.export_json(ExportOptions {
            include_stats: !no_stats,
            ..ExportOptions::default()
        })?,
        "csv" => app.export_csv(),
        other => bail!("Unknown export format '{}'. Use json or csv.", other),
    };

    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write export: {}", path.display()))?;
            println!("Exported to {}", path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}

pub fn import_command(app: &HabitQuest, file: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read import file: {}", file.display()))?;
    let (habits, events) = app.import_habits(&raw)?;
    println!("Imported {} habit(s):", habits.len());
    for habit in &habits {
        println!("  {} ({} completions)", habit.name, habit.completion_count());
    }
    print_events(&events);
    Ok(())
}
