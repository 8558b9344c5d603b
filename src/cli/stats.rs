//! Stats, XP and achievement command implementations

use anyhow::Result;

use habitquest::metrics::{
    best_performing_days, completion_trend, habit_performance, monthly_stats, trend_direction,
};
use habitquest::progression::{AchievementTier, TraitKind, PROGRESS_PER_LEVEL};
use habitquest::HabitQuest;

/// Analytics overview across all habits
pub fn stats_command(app: &HabitQuest) -> Result<()> {
    let habits = app.habits().list();
    let now = app.clock().now();
    let today = now.date_naive();
    let overall = app.overview();

    println!("Overview");
    println!("  Habits:            {}", overall.total_habits);
    println!("  Completions:       {}", overall.total_completions);
    println!("  Avg completion:    {}%", overall.average_completion_rate);
    println!("  Longest streak:    {}", overall.longest_streak);
    println!("  Active days:       {}", overall.active_days);
    println!("  Trend:             {}", trend_direction(&habits, today).label());

    if habits.is_empty() {
        return Ok(());
    }

    println!();
    println!("Last 7 days");
    for point in completion_trend(&habits, today, 7) {
        println!(
            "  {}  {}/{}  {:>3}%",
            point.date, point.completed, point.total, point.percentage
        );
    }

    println!();
    println!("Best days");
    for day in best_performing_days(&habits, now).iter().take(3) {
        println!(
            "  {}  {:.0}% ({}/{})",
            day.day_name,
            day.average * 100.0,
            day.completions,
            day.opportunities
        );
    }

    println!();
    println!("Habits");
    for perf in habit_performance(&habits, now) {
        println!(
            "  {:<28} {:>4} done  {:>3}%  streak {} (best {})",
            perf.name,
            perf.total_completions,
            perf.completion_rate,
            perf.current_streak,
            perf.longest_streak
        );
    }

    println!();
    println!("Months");
    for month in monthly_stats(&habits, today) {
        println!(
            "  {}  {} completions across {} habit(s)",
            month.month, month.completions, month.habits_tracked
        );
    }

    Ok(())
}

/// Level, XP progress and trait levels
pub fn xp_command(app: &HabitQuest) -> Result<()> {
    let stats = app.progression().player_stats();
    let progress = stats.progress_to_next();
    let filled = (progress * 20.0).round() as usize;

    println!("Level {}  ({} XP)", stats.level, stats.total_xp);
    println!(
        "  [{}{}] {:.0}%  {} XP to level {}",
        "#".repeat(filled),
        "-".repeat(20 - filled.min(20)),
        progress * 100.0,
        stats.xp_to_next(),
        stats.level + 1
    );

    println!();
    println!("Traits");
    let traits = app.progression().traits();
    for kind in TraitKind::all() {
        let info = kind.info();
        let progress = traits.get(kind).copied().unwrap_or_default();
        println!(
            "  {} {:<20} level {:>2}  ({}/{})",
            info.icon,
            info.name,
            progress.level,
            progress.progress_in_level(),
            PROGRESS_PER_LEVEL
        );
    }

    let challenge_streak = app.challenges().streak();
    println!();
    println!(
        "Challenge streak: {} (best {})",
        challenge_streak.current, challenge_streak.best
    );
    Ok(())
}

/// Achievements by tier, then milestones
pub fn achievements_command(app: &HabitQuest) -> Result<()> {
    let progression = app.progression();
    let progress = progression.achievement_progress();
    println!(
        "Achievements: {}/{} ({}%)",
        progress.unlocked, progress.total, progress.percentage
    );

    for tier in AchievementTier::all() {
        println!();
        println!("{}", tier.label());
        for (achievement, unlocked) in progression.achievements_by_tier(*tier) {
            let mark = if unlocked { "✓" } else { " " };
            println!(
                "  [{}] {} {:<20} {:>4} XP  {}",
                mark, achievement.icon, achievement.name, achievement.xp_reward, achievement.description
            );
        }
    }

    let milestones = progression.milestone_progress();
    println!();
    println!(
        "Milestones: {}/{} ({}%)",
        milestones.unlocked,
        milestones.total,
        milestones.percentage
    );
    for (milestone, unlocked) in progression.all_milestones() {
        let mark = if unlocked { "✓" } else { " " };
        println!(
            "  [{}] {} {:<20} {}",
            mark, milestone.icon, milestone.name, milestone.description
        );
    }

    // Shown once, then cleared
    let drained = progression.drain_pending_achievements()?;
    let celebrations = progression.pending_celebrations();
    if !drained.is_empty() || !celebrations.is_empty() {
        println!();
        println!("New since last time:");
        for achievement in drained {
            println!("  {} {}", achievement.icon, achievement.name);
        }
        for milestone in celebrations {
            println!("  {} {}", milestone.icon, milestone.name);
            progression.dismiss_celebration(milestone.id)?;
        }
    }
    Ok(())
}
