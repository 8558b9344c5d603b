use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "habitquest")]
#[command(about = "HabitQuest - level up by keeping your habits")]
#[command(version)]
struct Cli {
    /// Path to the config file (defaults to ~/.habitquest/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the SQLite data file (overrides storage.path)
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage habits
    Habit {
        #[command(subcommand)]
        command: HabitCommands,
    },

    /// Show analytics across all habits
    Stats,

    /// Show level, XP and trait progress
    Xp,

    /// List achievements and milestones
    Achievements,

    /// Daily trait-building challenges
    Challenge {
        #[command(subcommand)]
        command: ChallengeCommands,
    },

    /// Daily tasks
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },

    /// Weekly goals
    Goal {
        #[command(subcommand)]
        command: GoalCommands,
    },

    /// Notes and moods attached to habits
    Note {
        #[command(subcommand)]
        command: NoteCommands,
    },

    /// Streak savers, vacation mode and grace period
    Recovery {
        #[command(subcommand)]
        command: RecoveryCommands,
    },

    /// Habit bundles completed together for bonus XP
    Bundle {
        #[command(subcommand)]
        command: BundleCommands,
    },

    /// Suggestions based on your completion patterns
    Suggest {
        #[command(subcommand)]
        command: Option<SuggestCommands>,
    },

    /// Progress photo records
    Photo {
        #[command(subcommand)]
        command: PhotoCommands,
    },

    /// Export habits as JSON or CSV
    Export {
        /// Output format: json or csv
        #[arg(long, default_value = "json")]
        format: String,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Leave per-habit stats out of the JSON export
        #[arg(long)]
        no_stats: bool,
    },

    /// Import habits from a JSON export
    Import {
        /// Export file to read
        file: PathBuf,
    },

    /// Ask the coach a question (insights when no question is given)
    Coach {
        question: Option<String>,
    },

    /// Write a default config file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum HabitCommands {
    /// Add a habit
    Add { name: String },

    /// List habits with streaks and the last 7 days
    List,

    /// Mark or unmark a habit as done
    Toggle {
        /// Habit id, id prefix or name
        habit: String,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },

    /// Delete a habit and everything attached to it
    Delete { habit: String },

    /// List templates, or add the named one
    Template {
        name: Option<String>,

        /// Only show templates in this category
        #[arg(long)]
        category: Option<String>,
    },

    /// Show or set a habit's difficulty
    Difficulty {
        habit: String,

        /// very-easy, easy, normal, hard or very-hard
        #[arg(long)]
        set: Option<String>,
    },
}

#[derive(Subcommand)]
enum ChallengeCommands {
    /// Generate today's challenges
    Generate,

    /// Show today's challenges
    List,

    /// Complete a challenge
    Complete {
        id: String,

        #[arg(long)]
        reflection: Option<String>,
    },

    /// Skip a challenge
    Skip { id: String },

    /// Mark a challenge as failed
    Fail {
        id: String,

        #[arg(long)]
        note: Option<String>,
    },

    /// Summarize a day (today by default)
    Summary {
        #[arg(long)]
        date: Option<String>,
    },

    /// Preview the weekday-themed mix
    Mix,
}

#[derive(Subcommand)]
enum TaskCommands {
    /// List tasks
    List,

    /// Add a task
    Add { name: String },

    /// Mark or unmark a task as done
    Toggle { id: String },

    /// Delete a task
    Delete { id: String },

    /// Remove completed tasks
    Clear,

    /// Ask the coach for today's tasks
    Generate,
}

#[derive(Subcommand)]
enum GoalCommands {
    /// Add a goal for this week
    Add {
        title: String,

        /// Completions needed
        #[arg(long, default_value_t = 1)]
        target: u32,

        /// Habit whose completions count toward this goal
        #[arg(long)]
        habit: Option<String>,
    },

    /// List this week's goals, or past weeks with --weeks
    List {
        #[arg(long)]
        weeks: Option<u32>,
    },

    /// Record progress on a goal
    Progress {
        id: String,

        #[arg(long, default_value_t = 1)]
        by: u32,
    },
}

#[derive(Subcommand)]
enum NoteCommands {
    /// Attach a note to a habit
    Add {
        habit: String,
        content: String,

        /// great, good, okay or struggling
        #[arg(long)]
        mood: Option<String>,

        #[arg(long)]
        date: Option<String>,
    },

    /// List a habit's notes
    List { habit: String },
}

#[derive(Subcommand)]
enum RecoveryCommands {
    /// Show recovery options
    Status,

    /// Spend a streak saver on a missed day
    Saver {
        habit: String,

        /// Missed date (YYYY-MM-DD), defaults to yesterday
        #[arg(long)]
        date: Option<String>,
    },

    /// Pause habits between two dates
    Vacation {
        start: String,
        end: String,

        /// Habits to pause (all when omitted)
        #[arg(long = "habit")]
        habits: Vec<String>,
    },

    /// End vacation mode
    VacationOff,

    /// Show or change the grace period
    Grace {
        #[arg(long)]
        hours: Option<u32>,

        #[arg(long)]
        toggle: bool,
    },
}

#[derive(Subcommand)]
enum BundleCommands {
    /// List bundles with today's progress
    List,

    /// List the preset bundles
    Presets,

    /// Create a bundle
    Create {
        name: String,

        /// Habits to include, in order
        #[arg(long = "habit")]
        habits: Vec<String>,

        /// Start from a preset (see 'bundle presets'); the name is ignored
        #[arg(long)]
        preset: Option<String>,

        /// morning, afternoon, evening or anytime
        #[arg(long)]
        time: Option<String>,

        /// Bonus XP when every habit is done (defaults to 5 per habit)
        #[arg(long)]
        bonus: Option<u32>,
    },

    /// Add a habit to a bundle
    Add { bundle: String, habit: String },

    /// Remove a habit from a bundle
    Remove { bundle: String, habit: String },

    /// Stop paying a bundle's bonus until resumed
    Pause { bundle: String },

    /// Resume a paused bundle
    Resume { bundle: String },

    /// Put the named bundles first, in this order
    Reorder { bundles: Vec<String> },

    /// Delete a bundle (its habits are kept)
    Delete { bundle: String },
}

#[derive(Subcommand)]
enum SuggestCommands {
    /// Show current suggestions
    List {
        /// Also print the completion patterns behind them
        #[arg(long)]
        patterns: bool,
    },

    /// Hide a suggestion by id
    Dismiss { id: String },

    /// Show dismissed suggestions again
    Reset,
}

#[derive(Subcommand)]
enum PhotoCommands {
    /// Record a photo for a habit
    Add {
        habit: String,
        path: PathBuf,

        #[arg(long)]
        caption: Option<String>,

        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// Show photos by month
    List {
        /// Only this habit's photos
        #[arg(long)]
        habit: Option<String>,

        #[arg(long)]
        limit: Option<usize>,
    },

    /// Change a photo's caption
    Caption { id: String, caption: String },

    /// Replace a photo's tags
    Tag { id: String, tags: Vec<String> },

    /// Forget a photo record
    Delete { id: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Commands::Init { force } = cli.command {
        return cli::init::init_command(cli.config, force);
    }

    let (config, app) = cli::open(cli.config.as_ref(), cli.data.as_ref())?;

    match cli.command {
        Commands::Habit { command } => match command {
            HabitCommands::Add { name } => cli::habit::add_command(&app, &name)?,
            HabitCommands::List => cli::habit::list_command(&app)?,
            HabitCommands::Toggle { habit, date } => {
                cli::habit::toggle_command(&app, &habit, date.as_deref())?
            }
            HabitCommands::Delete { habit } => cli::habit::delete_command(&app, &habit)?,
            HabitCommands::Template { name, category } => {
                cli::habit::template_command(&app, name.as_deref(), category.as_deref())?
            }
            HabitCommands::Difficulty { habit, set } => {
                cli::habit::difficulty_command(&app, &habit, set.as_deref())?
            }
        },
        Commands::Stats => cli::stats::stats_command(&app)?,
        Commands::Xp => cli::stats::xp_command(&app)?,
        Commands::Achievements => cli::stats::achievements_command(&app)?,
        Commands::Challenge { command } => match command {
            ChallengeCommands::Generate => cli::challenge::generate_command(&app)?,
            ChallengeCommands::List => cli::challenge::list_command(&app)?,
            ChallengeCommands::Complete { id, reflection } => {
                cli::challenge::complete_command(&app, &id, reflection)?
            }
            ChallengeCommands::Skip { id } => cli::challenge::skip_command(&app, &id)?,
            ChallengeCommands::Fail { id, note } => cli::challenge::fail_command(&app, &id, note)?,
            ChallengeCommands::Summary { date } => {
                cli::challenge::summary_command(&app, date.as_deref())?
            }
            ChallengeCommands::Mix => cli::challenge::mix_command(&app)?,
        },
        Commands::Task { command } => match command {
            TaskCommands::List => cli::task::list_command(&app)?,
            TaskCommands::Add { name } => cli::task::add_command(&app, &name)?,
            TaskCommands::Toggle { id } => cli::task::toggle_command(&app, &id)?,
            TaskCommands::Delete { id } => cli::task::delete_command(&app, &id)?,
            TaskCommands::Clear => cli::task::clear_command(&app)?,
            TaskCommands::Generate => cli::task::generate_command(&app, &config)?,
        },
        Commands::Goal { command } => match command {
            GoalCommands::Add {
                title,
                target,
                habit,
            } => cli::goal::add_command(&app, &title, target, habit.as_deref())?,
            GoalCommands::List { weeks } => cli::goal::list_command(&app, weeks)?,
            GoalCommands::Progress { id, by } => cli::goal::progress_command(&app, &id, by)?,
        },
        Commands::Note { command } => match command {
            NoteCommands::Add {
                habit,
                content,
                mood,
                date,
            } => cli::note::add_command(
                &app,
                &habit,
                &content,
                mood.as_deref(),
                date.as_deref(),
            )?,
            NoteCommands::List { habit } => cli::note::list_command(&app, &habit)?,
        },
        Commands::Recovery { command } => match command {
            RecoveryCommands::Status => cli::recovery::status_command(&app)?,
            RecoveryCommands::Saver { habit, date } => {
                cli::recovery::saver_command(&app, &habit, date.as_deref())?
            }
            RecoveryCommands::Vacation { start, end, habits } => {
                cli::recovery::vacation_command(&app, &start, &end, &habits)?
            }
            RecoveryCommands::VacationOff => cli::recovery::vacation_off_command(&app)?,
            RecoveryCommands::Grace { hours, toggle } => {
                cli::recovery::grace_command(&app, hours, toggle)?
            }
        },
        Commands::Bundle { command } => match command {
            BundleCommands::List => cli::bundle::list_command(&app)?,
            BundleCommands::Presets => cli::bundle::presets_command()?,
            BundleCommands::Create {
                name,
                habits,
                preset,
                time,
                bonus,
            } => cli::bundle::create_command(
                &app,
                &name,
                &habits,
                preset.as_deref(),
                time.as_deref(),
                bonus,
            )?,
            BundleCommands::Add { bundle, habit } => {
                cli::bundle::add_command(&app, &bundle, &habit)?
            }
            BundleCommands::Remove { bundle, habit } => {
                cli::bundle::remove_command(&app, &bundle, &habit)?
            }
            BundleCommands::Pause { bundle } => cli::bundle::pause_command(&app, &bundle, false)?,
            BundleCommands::Resume { bundle } => cli::bundle::pause_command(&app, &bundle, true)?,
            BundleCommands::Reorder { bundles } => cli::bundle::reorder_command(&app, &bundles)?,
            BundleCommands::Delete { bundle } => cli::bundle::delete_command(&app, &bundle)?,
        },
        Commands::Suggest { command } => match command {
            None => cli::suggest::list_command(&app, false)?,
            Some(SuggestCommands::List { patterns }) => {
                cli::suggest::list_command(&app, patterns)?
            }
            Some(SuggestCommands::Dismiss { id }) => cli::suggest::dismiss_command(&app, &id)?,
            Some(SuggestCommands::Reset) => cli::suggest::reset_command(&app)?,
        },
        Commands::Photo { command } => match command {
            PhotoCommands::Add {
                habit,
                path,
                caption,
                tags,
            } => cli::photo::add_command(&app, &habit, &path, caption.as_deref(), &tags)?,
            PhotoCommands::List { habit, limit } => {
                cli::photo::list_command(&app, habit.as_deref(), limit)?
            }
            PhotoCommands::Caption { id, caption } => {
                cli::photo::caption_command(&app, &id, &caption)?
            }
            PhotoCommands::Tag { id, tags } => cli::photo::tag_command(&app, &id, &tags)?,
            PhotoCommands::Delete { id } => cli::photo::delete_command(&app, &id)?,
        },
        Commands::Export {
            format,
            output,
            no_stats,
        } => cli::transfer::export_command(&app, &format, output.as_deref(), no_stats)?,
        Commands::Import { file } => cli::transfer::import_command(&app, &file)?,
        Commands::Coach { question } => {
            cli::coach::coach_command(&app, &config, question.as_deref())?
        }
        Commands::Init { .. } => {}
    }

    Ok(())
}
