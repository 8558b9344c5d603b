//! Shared test utilities for HabitQuest integration tests

#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;

use habitquest::calendar::FixedClock;
use habitquest::challenges::{ChallengeCatalog, SchedulerSettings};
use habitquest::store::{MemoryStore, Repository};
use habitquest::HabitQuest;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Fresh in-memory repository
pub fn memory_repo() -> Repository {
    Repository::new(Arc::new(MemoryStore::new()))
}

/// An app over `repo` whose clock is fixed at noon on `day`
pub fn app_on(repo: &Repository, day: NaiveDate) -> HabitQuest {
    app_with(repo, day, ChallengeCatalog::builtin())
}

pub fn app_with(repo: &Repository, day: NaiveDate, catalog: ChallengeCatalog) -> HabitQuest {
    HabitQuest::new(
        repo.clone(),
        Arc::new(FixedClock::on(day)),
        catalog,
        SchedulerSettings::default(),
    )
}
