//! Core domain types for HabitQuest

mod difficulty;
mod habit;
mod task;

pub use difficulty::{Difficulty, DifficultyInfo, HabitDifficulty, HABIT_DIFFICULTIES};
pub use habit::{new_id, Habit, HabitError};
pub use task::Task;
