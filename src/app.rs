//! Application facade
//!
//! Wires the books, the progression manager and the challenge scheduler
//! over one repository and clock. Compound operations (toggle a habit,
//! award XP, advance linked goals, pay bundle bonuses, check unlocks) run here as a sequence of
//! independent writes, each leaving the store consistent on its own.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rand::Rng;

use crate::calendar::{Clock, SystemClock};
use crate::challenges::{
    ActiveChallenge, ChallengeCatalog, ChallengeError, ChallengeScheduler, CompletionOutcome,
    SchedulerSettings,
};
use crate::coach::{Coach, CoachContext, CoachError, HabitSummary};
use crate::config::Config;
use crate::domain::{Habit, HabitError, Task};
use crate::metrics::{completion_rate, overall_stats, OverallStats};
use crate::progression::{GamificationEvent, ProgressContext, ProgressionManager, XpRewards};
use crate::store::{Repository, SqliteStore};
use crate::tracker::{
    export_csv, import_json, BundleBook, DifficultyBook, ExportDocument, ExportOptions, GoalBook,
    HabitBook, HabitTemplate, NoteBook, PhotoBook, RecoveryBook, SuggestionBook, TaskList,
};

/// Result of flipping a habit's completion
#[derive(Debug, Clone)]
pub struct ToggleOutcome {
    pub completed: bool,
    pub events: Vec<GamificationEvent>,
}

/// Result of completing a challenge, with the XP and unlocks it caused
#[derive(Debug, Clone)]
pub struct ChallengeReward {
    pub outcome: CompletionOutcome,
    pub events: Vec<GamificationEvent>,
}

pub struct HabitQuest {
    clock: Arc<dyn Clock>,
    habits: HabitBook,
    tasks: TaskList,
    goals: GoalBook,
    notes: NoteBook,
    difficulty: DifficultyBook,
    recovery: RecoveryBook,
    bundles: BundleBook,
    photos: PhotoBook,
    suggestions: SuggestionBook,
    progression: ProgressionManager,
    challenges: ChallengeScheduler,
}

impl HabitQuest {
    pub fn new(
        repo: Repository,
        clock: Arc<dyn Clock>,
        catalog: ChallengeCatalog,
        settings: SchedulerSettings,
    ) -> Self {
        Self {
            habits: HabitBook::new(repo.clone(), clock.clone()),
            tasks: TaskList::new(repo.clone(), clock.clone()),
            goals: GoalBook::new(repo.clone(), clock.clone()),
            notes: NoteBook::new(repo.clone(), clock.clone()),
            difficulty: DifficultyBook::new(repo.clone(), clock.clone()),
            recovery: RecoveryBook::new(repo.clone(), clock.clone()),
            bundles: BundleBook::new(repo.clone(), clock.clone()),
            photos: PhotoBook::new(repo.clone(), clock.clone()),
            suggestions: SuggestionBook::new(repo.clone(), clock.clone()),
            progression: ProgressionManager::new(repo.clone(), clock.clone()),
            challenges: ChallengeScheduler::new(repo, clock.clone(), catalog, settings),
            clock,
        }
    }

    /// Open the SQLite store and challenge pool named by the config
    pub fn open(config: &Config) -> Result<Self> {
        Self::open_at(config, &config.storage.path)
    }

    /// Like [`HabitQuest::open`] with an explicit database path
    pub fn open_at(config: &Config, db_path: &std::path::Path) -> Result<Self> {
        let store = SqliteStore::open(db_path)
            .with_context(|| format!("Failed to open data store: {}", db_path.display()))?;
        let catalog = ChallengeCatalog::load_or_builtin(config.challenges.catalog_path.as_deref());
        Ok(Self::new(
            Repository::new(Arc::new(store)),
            Arc::new(SystemClock),
            catalog,
            config.challenges.scheduler(),
        ))
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn habits(&self) -> &HabitBook {
        &self.habits
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    pub fn goals(&self) -> &GoalBook {
        &self.goals
    }

    pub fn notes(&self) -> &NoteBook {
        &self.notes
    }

    pub fn difficulty(&self) -> &DifficultyBook {
        &self.difficulty
    }

    pub fn recovery(&self) -> &RecoveryBook {
        &self.recovery
    }

    pub fn bundles(&self) -> &BundleBook {
        &self.bundles
    }

    pub fn photos(&self) -> &PhotoBook {
        &self.photos
    }

    pub fn suggestions(&self) -> &SuggestionBook {
        &self.suggestions
    }

    pub fn progression(&self) -> &ProgressionManager {
        &self.progression
    }

    pub fn challenges(&self) -> &ChallengeScheduler {
        &self.challenges
    }

    // ========================================
    // PROGRESS
    // ========================================

    fn progress_context(&self) -> ProgressContext {
        ProgressContext::gather(
            &self.habits.list(),
            self.clock.today(),
            self.progression.level(),
            self.challenges.completed_count(),
            &self.progression.traits(),
        )
    }

    /// Check achievements, then milestones against the post-reward level
    pub fn evaluate_progress(&self) -> Result<Vec<GamificationEvent>> {
        let mut events = self.progression.check_achievements(&self.progress_context())?;
        events.extend(self.progression.check_milestones(&self.progress_context())?);
        Ok(events)
    }

    fn award(&self, amount: u32, reason: &str) -> Result<Vec<GamificationEvent>> {
        let mut events = self.progression.add_xp(amount, reason)?;
        events.extend(self.evaluate_progress()?);
        Ok(events)
    }

    pub fn overview(&self) -> OverallStats {
        overall_stats(&self.habits.list(), self.clock.now())
    }

    // ========================================
    // HABITS
    // ========================================

    pub fn add_habit(&self, name: &str) -> Result<(Habit, Vec<GamificationEvent>), HabitError> {
        let habit = self.habits.add(name)?;
        let events = self.evaluate_progress()?;
        Ok((habit, events))
    }

    pub fn add_habit_from_template(
        &self,
        template: &HabitTemplate,
    ) -> Result<(Habit, Vec<GamificationEvent>), HabitError> {
        let habit = self.habits.add_from_template(template)?;
        let events = self.award(XpRewards::TEMPLATE_HABIT, "template habit")?;
        Ok((habit, events))
    }

    pub fn delete_habit(&self, id: &str) -> Result<Habit, HabitError> {
        self.habits.delete(id)
    }

    /// Flip a habit for a date. A new completion awards XP, advances this
    /// week's goals linked to the habit, pays the bonus of any bundle it
    /// finishes and re-checks unlocks. Removing a completion takes nothing
    /// back.
    pub fn toggle_habit(&self, id: &str, date: NaiveDate) -> Result<ToggleOutcome, HabitError> {
        let completed = self.habits.toggle(id, date)?;
        if !completed {
            return Ok(ToggleOutcome {
                completed,
                events: Vec::new(),
            });
        }

        let mut events = self
            .progression
            .add_xp(XpRewards::HABIT_COMPLETED, "habit completed")?;

        let advanced = self.goals.record_habit_completion(id)?;
        if !advanced.is_empty() {
            tracing::debug!("Advanced {} weekly goal(s) for {}", advanced.len(), id);
        }

        let habits = self.habits.list();
        for bundle in self.bundles.completed_with(id, &habits, date) {
            let bonus_xp = bundle.bonus_xp();
            events.extend(self.progression.add_xp(bonus_xp, "bundle completed")?);
            events.push(GamificationEvent::BundleCompleted {
                name: bundle.name,
                bonus_xp,
            });
        }

        if date == self.clock.today() {
            if let Some(habit) = habits.iter().find(|h| h.id == id) {
                let count = self.recovery.current_streak(habit);
                events.push(GamificationEvent::StreakExtended { count });
            }
        }

        events.extend(self.evaluate_progress()?);
        Ok(ToggleOutcome { completed, events })
    }

    // ========================================
    // TASKS
    // ========================================

    /// Flip a task. Completing it awards XP. `None` if the id is unknown.
    pub fn toggle_task(&self, id: &str) -> Result<Option<(bool, Vec<GamificationEvent>)>> {
        let Some(completed) = self.tasks.toggle(id)? else {
            return Ok(None);
        };
        let events = if completed {
            self.award(XpRewards::TASK_COMPLETED, "task completed")?
        } else {
            Vec::new()
        };
        Ok(Some((completed, events)))
    }

    /// Snapshot handed to the coach prompts
    pub fn coach_context(&self) -> CoachContext {
        let now = self.clock.now();
        let today = now.date_naive();
        let tasks = self.tasks.list();
        CoachContext {
            level: self.progression.level(),
            xp: self.progression.xp(),
            habits: self
                .habits
                .list()
                .iter()
                .map(|h| HabitSummary {
                    name: h.name.clone(),
                    streak: self.recovery.current_streak(h),
                    completion_rate: completion_rate(h, now),
                    done_today: h.is_completed(today),
                })
                .collect(),
            tasks_completed: tasks.iter().filter(|t| t.completed).count(),
            tasks_total: tasks.len(),
        }
    }

    /// Ask the coach for today's tasks and store them
    pub fn generate_tasks(
        &self,
        coach: &Coach,
    ) -> Result<(Vec<Task>, Vec<GamificationEvent>), CoachError> {
        let names = coach.generate_daily_tasks(&self.coach_context())?;
        let tasks = self
            .tasks
            .add_names(names, true)
            .map_err(CoachError::Service)?;
        let events = self
            .award(XpRewards::TASKS_GENERATED, "tasks generated")
            .map_err(CoachError::Service)?;
        Ok((tasks, events))
    }

    // ========================================
    // CHALLENGES
    // ========================================

    pub fn generate_challenges<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<Vec<ActiveChallenge>, ChallengeError> {
        self.challenges.generate_daily(rng)
    }

    /// Complete a challenge and pay out its XP
    pub fn complete_challenge(
        &self,
        id: &str,
        reflection: Option<String>,
    ) -> Result<ChallengeReward, ChallengeError> {
        let outcome = self.challenges.complete(id, reflection)?;

        let mut events = self.progression.add_xp(outcome.xp_reward, "challenge")?;
        if outcome.trait_level > outcome.old_trait_level {
            events.push(GamificationEvent::TraitLevelUp {
                trait_kind: outcome.trait_kind,
                new_level: outcome.trait_level,
            });
        }
        if let Some(count) = outcome.streak_extended {
            events.push(GamificationEvent::StreakExtended { count });
        }
        events.extend(self.evaluate_progress()?);

        Ok(ChallengeReward { outcome, events })
    }

    // ========================================
    // EXPORT / IMPORT
    // ========================================

    pub fn export_json(&self, options: ExportOptions) -> Result<String> {
        ExportDocument::build(&self.habits.list(), self.clock.now(), options)
            .to_json()
            .context("Failed to serialize export")
    }

    pub fn export_csv(&self) -> String {
        export_csv(&self.habits.list(), self.clock.now())
    }

    /// Import habits from an export document. A rejected payload changes
    /// nothing. Returns the imported habits and the events their XP caused.
    pub fn import_habits(&self, raw: &str) -> Result<(Vec<Habit>, Vec<GamificationEvent>)> {
        let habits = import_json(raw, self.clock.now())?;
        self.habits.insert_all(habits.clone())?;

        let xp = XpRewards::IMPORT_PER_HABIT.saturating_mul(habits.len() as u32);
        let events = self.award(xp, "import")?;
        tracing::info!("Imported {} habit(s)", habits.len());
        Ok((habits, events))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::FixedClock;
    use crate::config::CoachSettings;
    use crate::domain::HabitDifficulty;
    use crate::progression::AchievementId;
    use crate::tracker::{ImportError, NewBundle};
    use chrono::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn app_on(repo: &Repository, day: NaiveDate) -> HabitQuest {
        HabitQuest::new(
            repo.clone(),
            Arc::new(FixedClock::on(day)),
            ChallengeCatalog::builtin(),
            SchedulerSettings::default(),
        )
    }

    #[test]
    fn test_first_habit_unlocks_achievement() {
        let app = app_on(&Repository::in_memory(), date(2024, 1, 10));
        let (_, events) = app.add_habit("Read").unwrap();
        assert!(events.iter().any(|e| matches!(
            e,
            GamificationEvent::AchievementUnlocked(u) if u.achievement.id == AchievementId::FirstHabit
        )));
        // first_habit pays 50 XP
        assert_eq!(app.progression().xp(), 50);
    }

    #[test]
    fn test_toggle_awards_xp_only_on_completion() {
        let app = app_on(&Repository::in_memory(), date(2024, 1, 10));
        let (habit, _) = app.add_habit("Read").unwrap();
        let before = app.progression().xp();

        let on = app.toggle_habit(&habit.id, date(2024, 1, 10)).unwrap();
        assert!(on.completed);
        assert_eq!(app.progression().xp(), before + 5);
        assert!(on
            .events
            .iter()
            .any(|e| matches!(e, GamificationEvent::StreakExtended { count: 1 })));

        let off = app.toggle_habit(&habit.id, date(2024, 1, 10)).unwrap();
        assert!(!off.completed);
        assert!(off.events.is_empty());
        assert_eq!(app.progression().xp(), before + 5);
    }

    #[test]
    fn test_toggle_advances_linked_goal() {
        let app = app_on(&Repository::in_memory(), date(2024, 1, 10));
        let (habit, _) = app.add_habit("Run").unwrap();
        let goal = app.goals().create("Run twice", 2, Some(habit.id.clone())).unwrap();

        app.toggle_habit(&habit.id, date(2024, 1, 9)).unwrap();
        app.toggle_habit(&habit.id, date(2024, 1, 10)).unwrap();
        let goal = app.goals().get(&goal.id).unwrap();
        assert_eq!(goal.current_count, 2);
        assert!(goal.completed);
    }

    #[test]
    fn test_week_streak_unlocks_week_warrior() {
        let repo = Repository::in_memory();
        let today = date(2024, 3, 20);
        let app = app_on(&repo, today);
        let (habit, _) = app.add_habit("Meditate").unwrap();
        for i in (0..7).rev() {
            app.toggle_habit(&habit.id, today - Duration::days(i)).unwrap();
        }
        assert!(app.progression().is_unlocked(AchievementId::WeekWarrior));
        assert!(app.progression().is_unlocked(AchievementId::PerfectWeek));
    }

    #[test]
    fn test_task_completion_xp() {
        let app = app_on(&Repository::in_memory(), date(2024, 1, 10));
        let task = app.tasks().add_names(["Stretch"], false).unwrap().remove(0);
        let (done, _) = app.toggle_task(&task.id).unwrap().unwrap();
        assert!(done);
        assert_eq!(app.progression().xp(), 15);
        assert!(app.toggle_task("missing").unwrap().is_none());
    }

    #[test]
    fn test_import_rejects_without_mutation() {
        let app = app_on(&Repository::in_memory(), date(2024, 1, 10));
        let err = app.import_habits(r#"{"habits": 3}"#).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ImportError>(),
            Some(ImportError::MissingHabits)
        ));
        assert!(app.habits().list().is_empty());
        assert_eq!(app.progression().xp(), 0);
    }

    #[test]
    fn test_import_awards_per_habit() {
        let app = app_on(&Repository::in_memory(), date(2024, 1, 10));
        let (imported, _) = app
            .import_habits(r#"{"habits": [{"name": "A"}, {"name": "B"}]}"#)
            .unwrap();
        assert_eq!(imported.len(), 2);
        // 2 x 5 import XP + 50 for first_habit
        assert_eq!(app.progression().xp(), 60);
    }

    #[test]
    fn test_difficulty_does_not_change_completion_xp() {
        let app = app_on(&Repository::in_memory(), date(2024, 1, 10));
        let (habit, _) = app.add_habit("Cold shower").unwrap();
        app.difficulty().set(&habit.id, HabitDifficulty::VeryHard).unwrap();
        let before = app.progression().xp();

        app.toggle_habit(&habit.id, date(2024, 1, 8)).unwrap();
        assert_eq!(app.progression().xp(), before + XpRewards::HABIT_COMPLETED as u64);
    }

    #[test]
    fn test_finishing_bundle_pays_bonus_once_per_completion() {
        let app = app_on(&Repository::in_memory(), date(2024, 1, 10));
        let (water, _) = app.add_habit("Water").unwrap();
        let (stretch, _) = app.add_habit("Stretch").unwrap();
        app.bundles()
            .create(NewBundle {
                name: "Morning".into(),
                habit_ids: vec![water.id.clone(), stretch.id.clone()],
                ..Default::default()
            })
            .unwrap();
        let day = date(2024, 1, 8);

        let first = app.toggle_habit(&water.id, day).unwrap();
        assert!(!first
            .events
            .iter()
            .any(|e| matches!(e, GamificationEvent::BundleCompleted { .. })));

        let before = app.progression().xp();
        let second = app.toggle_habit(&stretch.id, day).unwrap();
        assert!(second.events.iter().any(|e| matches!(
            e,
            GamificationEvent::BundleCompleted { bonus_xp: 10, .. }
        )));
        // 5 for the habit, 10 for the two-habit bundle
        assert_eq!(app.progression().xp(), before + 15);
    }

    #[test]
    fn test_generate_tasks_without_key_adds_nothing() {
        let app = app_on(&Repository::in_memory(), date(2024, 1, 10));
        let coach = Coach::with_key(&CoachSettings::default(), None);
        let err = app.generate_tasks(&coach).unwrap_err();
        assert!(matches!(err, CoachError::MissingCredential(_)));
        assert!(app.tasks().list().is_empty());
        assert_eq!(app.progression().xp(), 0);
    }
}
