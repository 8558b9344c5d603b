//! SQLite persistence, config files and export/import across app instances

mod common;

use std::sync::Arc;

use tempfile::TempDir;

use common::{app_on, date, memory_repo};
use habitquest::calendar::FixedClock;
use habitquest::challenges::{ChallengeCatalog, SchedulerSettings};
use habitquest::config::Config;
use habitquest::store::{KeyValueStore, Repository, SqliteStore, StoreKey};
use habitquest::tracker::{ExportDocument, ExportOptions};
use habitquest::HabitQuest;

fn sqlite_app(path: &std::path::Path, day: chrono::NaiveDate) -> HabitQuest {
    let store = SqliteStore::open(path).unwrap();
    HabitQuest::new(
        Repository::new(Arc::new(store)),
        Arc::new(FixedClock::on(day)),
        ChallengeCatalog::builtin(),
        SchedulerSettings::default(),
    )
}

#[test]
fn test_sqlite_state_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data").join("habitquest.db");

    {
        let app = sqlite_app(&path, date(2024, 5, 1));
        let (habit, _) = app.add_habit("Journal").unwrap();
        app.toggle_habit(&habit.id, date(2024, 5, 1)).unwrap();
    }

    let app = sqlite_app(&path, date(2024, 5, 2));
    let habits = app.habits().list();
    assert_eq!(habits.len(), 1);
    assert!(habits[0].is_completed(date(2024, 5, 1)));
    // first_habit (50) + one completion (5)
    assert_eq!(app.progression().xp(), 55);
}

#[test]
fn test_corrupt_value_reads_as_default() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("habitquest.db");
    let store = SqliteStore::open(&path).unwrap();
    store.set(StoreKey::Habits.as_str(), "{not json").unwrap();

    let app = sqlite_app(&path, date(2024, 5, 1));
    assert!(app.habits().list().is_empty());
    // Still writable afterwards
    app.add_habit("Recover").unwrap();
    assert_eq!(app.habits().list().len(), 1);
}

#[test]
fn test_open_at_uses_config_settings() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.toml");
    let mut config = Config::load_from(&config_path).unwrap();
    config.challenges.daily_limit = 2;
    config.save_to_file(&config_path).unwrap();

    let config = Config::from_file(&config_path).unwrap();
    let app = HabitQuest::open_at(&config, &dir.path().join("hq.db")).unwrap();
    assert_eq!(app.challenges().settings().daily_limit, 2);
}

#[test]
fn test_export_then_import_into_fresh_app() {
    let source = app_on(&memory_repo(), date(2024, 6, 10));
    let (read, _) = source.add_habit("Read").unwrap();
    source.add_habit("Run").unwrap();
    source.toggle_habit(&read.id, date(2024, 6, 9)).unwrap();
    source.toggle_habit(&read.id, date(2024, 6, 10)).unwrap();

    let json = source.export_json(ExportOptions::default()).unwrap();
    let doc: ExportDocument = serde_json::from_str(&json).unwrap();
    assert_eq!(doc.habits.len(), 2);
    let stats = doc.habits[0].stats.as_ref().unwrap();
    assert_eq!(stats.total_completions, 2);

    let target = app_on(&memory_repo(), date(2024, 6, 10));
    let (imported, _) = target.import_habits(&json).unwrap();
    assert_eq!(imported.len(), 2);
    assert_ne!(imported[0].id, read.id);
    assert_eq!(imported[0].completions, read_completions(&source, &read.id));
}

fn read_completions(
    app: &HabitQuest,
    id: &str,
) -> std::collections::BTreeSet<chrono::NaiveDate> {
    app.habits().get(id).unwrap().completions
}

#[test]
fn test_csv_export_has_header_and_rows() {
    let app = app_on(&memory_repo(), date(2024, 6, 10));
    app.add_habit("Read, daily").unwrap();

    let csv = app.export_csv();
    let mut lines = csv.lines();
    assert!(lines.next().unwrap().starts_with("Habit Name"));
    assert!(lines.next().unwrap().starts_with("\"Read, daily\""));
}
