//! Habit tracking: habits, tasks, weekly goals, notes, recovery mode,
//! bundles, progress photos, templates and export/import
//!
//! Each book owns one or two store keys and nothing else. Cross-book
//! effects (XP for a completion, goal progress) are wired in [`crate::app`].

mod bundles;
mod difficulty;
mod export;
mod goals;
mod habits;
mod notes;
mod photos;
mod recovery;
mod suggestions;
mod tasks;
mod templates;

pub use bundles::{
    preset, Bundle, BundleBook, BundleError, BundlePreset, BundleStats, NewBundle, TimeOfDay,
    BONUS_PER_HABIT, PRESETS,
};
pub use difficulty::{DifficultyBook, DifficultyChange, DifficultyStats};
pub use export::{
    export_csv, import_json, ExportDocument, ExportOptions, ExportStats, ExportedHabit, ImportError,
    EXPORT_VERSION,
};
pub use goals::{GoalBook, GoalStats, WeekHistory, WeeklyGoal};
pub use habits::HabitBook;
pub use notes::{HabitNote, Mood, MoodStats, NoteBook};
pub use photos::{media_type, PhotoBook, PhotoError, PhotoStats, PhotoTimeline, ProgressPhoto};
pub use recovery::{
    GracePeriod, RecoveryBook, RecoveryError, RecoveryStats, RecoverySuggestion, SaverGrant,
    SaverUse, StreakSavers, RecoveryKind, VacationMode, FREE_SAVERS, MAX_GRACE_HOURS,
    MAX_VACATION_DAYS, SAVER_MILESTONES,
};
pub use suggestions::SuggestionBook;
pub use tasks::TaskList;
pub use templates::{HabitTemplate, TemplateCategory, TEMPLATES};
