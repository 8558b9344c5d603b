//! HabitQuest - a gamified habit tracker engine
//!
//! HabitQuest records daily habit completions and turns them into streaks,
//! XP, levels, achievements and milestones. A daily challenge scheduler
//! hands out trait-building challenges that adapt to the user's streak.
//!
//! ## Layout
//!
//! - [`metrics`]: streaks, completion rates, analytics and suggestions as pure
//!   functions
//! - [`progression`]: XP, levels, achievements, milestones and traits
//! - [`challenges`]: the challenge pool and the adaptive daily scheduler
//! - [`tracker`]: habits, tasks, goals, notes, recovery, bundles, photos,
//!   templates, export
//! - [`coach`]: optional text-generation coach behind a [`coach::TextGenerator`]
//! - [`store`]: key-value persistence (SQLite or in-memory)
//! - [`app`]: the [`HabitQuest`] facade wiring everything over one store

pub mod app;
pub mod calendar;
pub mod challenges;
pub mod coach;
pub mod config;
pub mod domain;
pub mod metrics;
pub mod progression;
pub mod store;
pub mod tracker;

pub use app::{ChallengeReward, HabitQuest, ToggleOutcome};
pub use domain::*;
