//! Challenge command implementations

use anyhow::Result;

use habitquest::challenges::{ActiveChallenge, ChallengeError, ChallengeStatus};
use habitquest::HabitQuest;

use super::{parse_date, print_events};

fn status_mark(status: &ChallengeStatus) -> &'static str {
    match status {
        ChallengeStatus::Active => "[ ]",
        ChallengeStatus::Completed { .. } => "[✓]",
        ChallengeStatus::Skipped { .. } => "[»]",
        ChallengeStatus::Failed { .. } => "[✗]",
    }
}

fn print_challenge(active: &ActiveChallenge) {
    let c = &active.challenge;
    println!(
        "{} {:<24} {:<7} {:<20} {:>3} XP",
        status_mark(&active.status),
        c.id,
        c.difficulty.as_str(),
        c.category.info().name,
        c.xp_reward()
    );
    println!("    {}", c.title);
    if let Some(context) = &c.context {
        println!("    ({})", context);
    }
    if active.status.is_active() && c.requires_reflection {
        if let Some(prompt) = &c.reflection_prompt {
            println!("    Reflect: {}", prompt);
        }
    }
}

pub fn generate_command(app: &HabitQuest) -> Result<()> {
    let mut rng = rand::thread_rng();
    match app.generate_challenges(&mut rng) {
        Ok(generated) => {
            println!("Today's challenges:");
            for active in &generated {
                print_challenge(active);
            }
            Ok(())
        }
        Err(ChallengeError::AlreadyGenerated) => {
            println!("Challenges already generated for today:");
            list_command(app)
        }
        Err(e) => Err(e.into()),
    }
}

pub fn list_command(app: &HabitQuest) -> Result<()> {
    let today = app.challenges().today_challenges();
    if today.is_empty() {
        println!("No challenges yet today. Run `habitquest challenge generate`.");
        return Ok(());
    }
    for active in &today {
        print_challenge(active);
    }
    println!();
    println!("Skips remaining today: {}", app.challenges().skips_remaining());
    Ok(())
}

pub fn complete_command(app: &HabitQuest, id: &str, reflection: Option<String>) -> Result<()> {
    let reward = app.complete_challenge(id, reflection)?;
    println!(
        "✓ {} (+{} XP, {} level {})",
        reward.outcome.challenge.title,
        reward.outcome.xp_reward,
        reward.outcome.trait_kind.info().name,
        reward.outcome.trait_level
    );
    print_events(&reward.events);
    Ok(())
}

pub fn skip_command(app: &HabitQuest, id: &str) -> Result<()> {
    let remaining = app.challenges().skip(id)?;
    println!("Skipped {}. {} skip(s) left today.", id, remaining);
    Ok(())
}

pub fn fail_command(app: &HabitQuest, id: &str, note: Option<String>) -> Result<()> {
    app.challenges().fail(id, note)?;
    println!("Marked {} as failed. No penalty, try again tomorrow.", id);
    Ok(())
}

pub fn summary_command(app: &HabitQuest, date: Option<&str>) -> Result<()> {
    let date = parse_date(date, app.clock().today())?;
    let summary = app.challenges().daily_summary(Some(date));

    println!("Challenges on {}", summary.date);
    println!("  Total:     {}", summary.total);
    println!("  Completed: {}", summary.completed);
    println!("  Skipped:   {}", summary.skipped);
    println!("  Failed:    {}", summary.failed);
    println!("  Streak:    {}", summary.streak);
    if !summary.traits_improved.is_empty() {
        let names: Vec<_> = summary
            .traits_improved
            .iter()
            .map(|t| t.info().name)
            .collect();
        println!("  Improved:  {}", names.join(", "));
    }
    Ok(())
}

/// Preview the weekday-themed mix without storing anything
pub fn mix_command(app: &HabitQuest) -> Result<()> {
    let mut rng = rand::thread_rng();
    let weekday = chrono::Datelike::weekday(&app.clock().today());
    for challenge in app.challenges().catalog().daily_mix(weekday, &mut rng) {
        println!(
            "  {:<24} {:<7} {:<20} {}",
            challenge.id,
            challenge.difficulty.as_str(),
            challenge.category.info().name,
            challenge.title
        );
    }
    Ok(())
}
