//! Progress photo command implementations

use std::path::Path;

use anyhow::Result;

use habitquest::tracker::ProgressPhoto;
use habitquest::HabitQuest;

use super::habit::resolve;

pub fn add_command(
    app: &HabitQuest,
    habit: &str,
    path: &Path,
    caption: Option<&str>,
    tags: &[String],
) -> Result<()> {
    let habit = resolve(app, habit)?;
    let size = std::fs::metadata(path).ok().map(|m| m.len());
    if size.is_none() {
        tracing::warn!("Photo file {} is not readable, recording it anyway", path.display());
    }
    let photo = app.photos().add(
        &habit.id,
        &path.to_string_lossy(),
        caption.unwrap_or_default(),
        tags,
        size,
    )?;
    println!("Recorded photo {} for {}", photo.id, habit.name);
    Ok(())
}

pub fn list_command(app: &HabitQuest, habit: Option<&str>, limit: Option<usize>) -> Result<()> {
    match habit {
        Some(h) => {
            let habit = resolve(app, h)?;
            let photos = app.photos().for_habit(&habit.id, limit);
            if photos.is_empty() {
                println!("No progress photos for {}", habit.name);
                return Ok(());
            }
            for photo in &photos {
                print_photo(photo);
            }
        }
        None => {
            let timeline = app.photos().timeline(None);
            if timeline.is_empty() {
                println!("No progress photos yet");
                return Ok(());
            }
            let mut shown = 0;
            'months: for (month, photos) in &timeline {
                println!("{}", month);
                for photo in photos {
                    if limit.is_some_and(|l| shown >= l) {
                        break 'months;
                    }
                    print_photo(photo);
                    shown += 1;
                }
            }
        }
    }

    let stats = app.photos().stats();
    println!();
    println!(
        "{} photo(s) across {} habit(s), {} KB",
        stats.total_photos,
        stats.habits_with_photos,
        stats.total_bytes / 1024
    );
    Ok(())
}

fn print_photo(photo: &ProgressPhoto) {
    let tags = if photo.tags.is_empty() {
        String::new()
    } else {
        format!("  #{}", photo.tags.join(" #"))
    };
    println!("  {}  {}  {}{}", photo.date, photo.path, photo.caption, tags);
}

pub fn caption_command(app: &HabitQuest, id: &str, caption: &str) -> Result<()> {
    let photo = app.photos().update_caption(id, caption)?;
    println!("Caption updated for {}", photo.id);
    Ok(())
}

pub fn tag_command(app: &HabitQuest, id: &str, tags: &[String]) -> Result<()> {
    let photo = app.photos().update_tags(id, tags)?;
    println!("Tags for {}: {}", photo.id, photo.tags.join(", "));
    Ok(())
}

pub fn delete_command(app: &HabitQuest, id: &str) -> Result<()> {
    let photo = app.photos().delete(id)?;
    println!("Removed photo record {} (the file is untouched)", photo.id);
    Ok(())
}
