//! Habit bundles: ordered stacks of habits completed together for bonus XP

use std::sync::Arc;

use anyhow::Result;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::calendar::Clock;
use crate::domain::{new_id, Habit};
use crate::metrics::rounded_percent;
use crate::store::{Repository, StoreKey};

/// Bonus per habit when a bundle has no explicit completion bonus
pub const BONUS_PER_HABIT: u32 = 5;

const STATS_WINDOW_DAYS: i64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    #[error("Bundle name cannot be empty")]
    EmptyName,

    #[error("Bundle not found: {0}")]
    NotFound(String),

    #[error("Unknown bundle preset: {0}")]
    UnknownPreset(String),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Anytime,
}

impl TimeOfDay {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
            Self::Anytime => "anytime",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "morning" => Some(Self::Morning),
            "afternoon" => Some(Self::Afternoon),
            "evening" => Some(Self::Evening),
            "anytime" => Some(Self::Anytime),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    /// Habits in the order they should be done
    #[serde(default)]
    pub habit_ids: Vec<String>,
    #[serde(default)]
    pub order: u32,
    #[serde(default = "default_time_of_day")]
    pub time_of_day: TimeOfDay,
    #[serde(default)]
    pub estimated_minutes: Option<u32>,
    pub created_at: i64,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub completion_bonus: Option<u32>,
}

fn default_time_of_day() -> TimeOfDay {
    TimeOfDay::Anytime
}

fn default_active() -> bool {
    true
}

impl Bundle {
    /// XP paid the first time every habit in the bundle is done on a day
    pub fn bonus_xp(&self) -> u32 {
        self.completion_bonus
            .unwrap_or(self.habit_ids.len() as u32 * BONUS_PER_HABIT)
    }

    /// Every habit done on `date`. An empty bundle is never complete.
    pub fn is_complete(&self, habits: &[Habit], date: NaiveDate) -> bool {
        !self.habit_ids.is_empty() && self.completed_count(habits, date) == self.habit_ids.len()
    }

    fn completed_count(&self, habits: &[Habit], date: NaiveDate) -> usize {
        self.habit_ids
            .iter()
            .filter(|id| habits.iter().any(|h| &h.id == *id && h.is_completed(date)))
            .count()
    }

    /// Percent of the bundle's habits done on `date`
    pub fn progress(&self, habits: &[Habit], date: NaiveDate) -> u32 {
        rounded_percent(
            self.completed_count(habits, date) as u64,
            self.habit_ids.len() as u64,
        )
    }

    /// Consecutive complete days ending today, or yesterday while today is
    /// still open
    pub fn streak(&self, habits: &[Habit], today: NaiveDate) -> u32 {
        let mut day = if self.is_complete(habits, today) {
            today
        } else {
            today - Duration::days(1)
        };
        let mut streak = 0;
        while self.is_complete(habits, day) {
            streak += 1;
            day -= Duration::days(1);
        }
        streak
    }

    pub fn stats(&self, habits: &[Habit], today: NaiveDate) -> BundleStats {
        let completed_days = (0..STATS_WINDOW_DAYS)
            .filter(|back| self.is_complete(habits, today - Duration::days(*back)))
            .count() as u32;
        BundleStats {
            total_habits: self.habit_ids.len(),
            completed_today: self.completed_count(habits, today),
            progress_today: self.progress(habits, today),
            current_streak: self.streak(habits, today),
            completed_days,
            completion_rate: rounded_percent(completed_days as u64, STATS_WINDOW_DAYS as u64),
            bonus_xp: self.bonus_xp(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleStats {
    pub total_habits: usize,
    pub completed_today: usize,
    pub progress_today: u32,
    pub current_streak: u32,
    /// Complete days in the last 30
    pub completed_days: u32,
    pub completion_rate: u32,
    pub bonus_xp: u32,
}

/// Fields for a new bundle
#[derive(Debug, Clone, Default)]
pub struct NewBundle {
    pub name: String,
    pub description: String,
    pub icon: String,
    pub habit_ids: Vec<String>,
    pub time_of_day: Option<TimeOfDay>,
    pub estimated_minutes: Option<u32>,
    pub completion_bonus: Option<u32>,
}

pub struct BundlePreset {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub time_of_day: TimeOfDay,
    pub estimated_minutes: u32,
    pub suggested_habits: &'static [&'static str],
}

pub const PRESETS: &[BundlePreset] = &[
    BundlePreset {
        key: "morning-routine",
        name: "Morning Routine",
        description: "Start your day with energy and focus",
        icon: "🌅",
        time_of_day: TimeOfDay::Morning,
        estimated_minutes: 30,
        suggested_habits: &["Drink water", "Stretch", "Meditate", "Plan the day"],
    },
    BundlePreset {
        key: "evening-wind-down",
        name: "Evening Wind Down",
        description: "Relax and prepare for restful sleep",
        icon: "🌙",
        time_of_day: TimeOfDay::Evening,
        estimated_minutes: 45,
        suggested_habits: &["No screens", "Read", "Journal", "Prepare tomorrow"],
    },
    BundlePreset {
        key: "workout-stack",
        name: "Workout Stack",
        description: "Complete fitness routine",
        icon: "💪",
        time_of_day: TimeOfDay::Anytime,
        estimated_minutes: 60,
        suggested_habits: &["Warm up", "Workout", "Cool down", "Protein"],
    },
    BundlePreset {
        key: "productivity-block",
        name: "Productivity Block",
        description: "Focused work session",
        icon: "🎯",
        time_of_day: TimeOfDay::Morning,
        estimated_minutes: 120,
        suggested_habits: &["Clear desk", "Deep work", "Review progress"],
    },
    BundlePreset {
        key: "self-care",
        name: "Self Care",
        description: "Take care of your wellbeing",
        icon: "🧘",
        time_of_day: TimeOfDay::Evening,
        estimated_minutes: 30,
        suggested_habits: &["Skincare", "Gratitude", "Call a friend"],
    },
];

pub fn preset(key: &str) -> Option<&'static BundlePreset> {
    PRESETS.iter().find(|p| p.key == key)
}

#[derive(Clone)]
pub struct BundleBook {
    repo: Repository,
    clock: Arc<dyn Clock>,
}

impl BundleBook {
    pub fn new(repo: Repository, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    /// By display order
    pub fn list(&self) -> Vec<Bundle> {
        let mut bundles: Vec<Bundle> = self.repo.load(StoreKey::HabitBundles);
        bundles.sort_by_key(|b| b.order);
        bundles
    }

    /// Find by id, or by case-insensitive name
    pub fn find(&self, needle: &str) -> Option<Bundle> {
        let bundles = self.list();
        if let Some(b) = bundles.iter().find(|b| b.id == needle) {
            return Some(b.clone());
        }
        bundles
            .into_iter()
            .find(|b| b.name.eq_ignore_ascii_case(needle.trim()))
    }

    pub fn create(&self, draft: NewBundle) -> Result<Bundle, BundleError> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(BundleError::EmptyName);
        }
        let mut habit_ids: Vec<String> = Vec::new();
        for id in draft.habit_ids {
            if !habit_ids.contains(&id) {
                habit_ids.push(id);
            }
        }

        let created_at = self.clock.timestamp_ms();
        let bundle = self
            .repo
            .update(StoreKey::HabitBundles, |bundles: &mut Vec<Bundle>| {
                let order = bundles.iter().map(|b| b.order + 1).max().unwrap_or(0);
                let bundle = Bundle {
                    id: new_id(),
                    name: name.to_string(),
                    description: draft.description.trim().to_string(),
                    icon: draft.icon,
                    habit_ids,
                    order,
                    time_of_day: draft.time_of_day.unwrap_or(TimeOfDay::Anytime),
                    estimated_minutes: draft.estimated_minutes,
                    created_at,
                    is_active: true,
                    completion_bonus: draft.completion_bonus,
                };
                bundles.push(bundle.clone());
                bundle
            })?;
        tracing::info!("Created bundle {} ({})", bundle.name, bundle.id);
        Ok(bundle)
    }

    pub fn create_from_preset(
        &self,
        key: &str,
        habit_ids: Vec<String>,
    ) -> Result<Bundle, BundleError> {
        let preset = preset(key).ok_or_else(|| BundleError::UnknownPreset(key.to_string()))?;
        self.create(NewBundle {
            name: preset.name.to_string(),
            description: preset.description.to_string(),
            icon: preset.icon.to_string(),
            habit_ids,
            time_of_day: Some(preset.time_of_day),
            estimated_minutes: Some(preset.estimated_minutes),
            completion_bonus: None,
        })
    }

    pub fn delete(&self, id: &str) -> Result<Bundle, BundleError> {
        let removed = self
            .repo
            .update(StoreKey::HabitBundles, |bundles: &mut Vec<Bundle>| {
                let idx = bundles.iter().position(|b| b.id == id)?;
                Some(bundles.remove(idx))
            })?
            .ok_or_else(|| BundleError::NotFound(id.to_string()))?;
        tracing::info!("Deleted bundle {} ({})", removed.name, removed.id);
        Ok(removed)
    }

    fn modify(
        &self,
        id: &str,
        f: impl FnOnce(&mut Bundle),
    ) -> Result<Bundle, BundleError> {
        self.repo
            .update(StoreKey::HabitBundles, |bundles: &mut Vec<Bundle>| {
                let bundle = bundles.iter_mut().find(|b| b.id == id)?;
                f(bundle);
                Some(bundle.clone())
            })?
            .ok_or_else(|| BundleError::NotFound(id.to_string()))
    }

    /// Append a habit. Already-present habits keep their position.
    pub fn add_habit(&self, bundle_id: &str, habit_id: &str) -> Result<Bundle, BundleError> {
        self.modify(bundle_id, |b| {
            if !b.habit_ids.iter().any(|id| id == habit_id) {
                b.habit_ids.push(habit_id.to_string());
            }
        })
    }

    pub fn remove_habit(&self, bundle_id: &str, habit_id: &str) -> Result<Bundle, BundleError> {
        self.modify(bundle_id, |b| b.habit_ids.retain(|id| id != habit_id))
    }

    pub fn set_active(&self, bundle_id: &str, active: bool) -> Result<Bundle, BundleError> {
        self.modify(bundle_id, |b| b.is_active = active)
    }

    /// Reassign display order from the given id sequence. Bundles not named
    /// keep their relative order after the named ones.
    pub fn reorder(&self, ids: &[String]) -> Result<()> {
        self.repo
            .update(StoreKey::HabitBundles, |bundles: &mut Vec<Bundle>| {
                bundles.sort_by_key(|b| {
                    let pos = ids.iter().position(|id| *id == b.id).unwrap_or(ids.len());
                    (pos, b.order)
                });
                for (order, bundle) in bundles.iter_mut().enumerate() {
                    bundle.order = order as u32;
                }
            })
    }

    /// Drop a deleted habit from every bundle. Returns how many bundles
    /// referenced it.
    pub fn remove_habit_everywhere(&self, habit_id: &str) -> Result<usize> {
        self.repo
            .update(StoreKey::HabitBundles, |bundles: &mut Vec<Bundle>| {
                let mut touched = 0;
                for bundle in bundles.iter_mut() {
                    let before = bundle.habit_ids.len();
                    bundle.habit_ids.retain(|id| id != habit_id);
                    if bundle.habit_ids.len() != before {
                        touched += 1;
                    }
                }
                touched
            })
    }

    /// Active bundles containing `habit_id` that are complete on `date`
    pub fn completed_with(&self, habit_id: &str, habits: &[Habit], date: NaiveDate) -> Vec<Bundle> {
        self.list()
            .into_iter()
            .filter(|b| b.is_active && b.habit_ids.iter().any(|id| id == habit_id))
            .filter(|b| b.is_complete(habits, date))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::FixedClock;
    use chrono::Utc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn book() -> BundleBook {
        BundleBook::new(
            Repository::in_memory(),
            Arc::new(FixedClock::on(date(2024, 5, 10))),
        )
    }

    fn habit(name: &str, done: &[NaiveDate]) -> Habit {
        let mut h = Habit::new(name, Utc::now()).unwrap();
        for d in done {
            h.toggle(*d);
        }
        h
    }

    #[test]
    fn test_create_and_membership() {
        let b = book();
        assert!(matches!(b.create(NewBundle::default()), Err(BundleError::EmptyName)));

        let bundle = b
            .create(NewBundle {
                name: " Morning ".into(),
                habit_ids: vec!["a".into(), "b".into(), "a".into()],
                ..Default::default()
            })
            .unwrap();
        assert_eq!(bundle.name, "Morning");
        assert_eq!(bundle.habit_ids, vec!["a", "b"]);
        assert_eq!(bundle.bonus_xp(), 10);

        let bundle = b.add_habit(&bundle.id, "c").unwrap();
        let bundle = b.add_habit(&bundle.id, "a").unwrap();
        assert_eq!(bundle.habit_ids, vec!["a", "b", "c"]);
        let bundle = b.remove_habit(&bundle.id, "b").unwrap();
        assert_eq!(bundle.habit_ids, vec!["a", "c"]);

        assert!(matches!(b.add_habit("nope", "a"), Err(BundleError::NotFound(_))));
        assert_eq!(b.find("morning").map(|f| f.id), Some(bundle.id.clone()));
        b.delete(&bundle.id).unwrap();
        assert!(b.list().is_empty());
    }

    #[test]
    fn test_presets() {
        let b = book();
        let bundle = b
            .create_from_preset("workout-stack", vec!["x".into()])
            .unwrap();
        assert_eq!(bundle.name, "Workout Stack");
        assert_eq!(bundle.estimated_minutes, Some(60));
        assert!(matches!(
            b.create_from_preset("nap-time", vec![]),
            Err(BundleError::UnknownPreset(_))
        ));
        assert_eq!(PRESETS.len(), 5);
    }

    #[test]
    fn test_completion_progress_and_streak() {
        let today = date(2024, 5, 10);
        let water = habit("Water", &[date(2024, 5, 8), date(2024, 5, 9), today]);
        let stretch = habit("Stretch", &[date(2024, 5, 8), date(2024, 5, 9)]);
        let habits = vec![water.clone(), stretch.clone()];

        let b = book();
        let bundle = b
            .create(NewBundle {
                name: "Morning".into(),
                habit_ids: vec![water.id.clone(), stretch.id.clone()],
                completion_bonus: Some(25),
                ..Default::default()
            })
            .unwrap();

        assert!(!bundle.is_complete(&habits, today));
        assert_eq!(bundle.progress(&habits, today), 50);
        // Today still open, so yesterday's run counts
        assert_eq!(bundle.streak(&habits, today), 2);
        assert_eq!(bundle.bonus_xp(), 25);

        let stats = bundle.stats(&habits, today);
        assert_eq!(stats.completed_days, 2);
        assert_eq!(stats.completion_rate, 7);

        let empty = b
            .create(NewBundle {
                name: "Empty".into(),
                ..Default::default()
            })
            .unwrap();
        assert!(!empty.is_complete(&habits, today));
        assert_eq!(empty.progress(&habits, today), 0);

        let done = b.completed_with(&water.id, &habits, date(2024, 5, 9));
        assert_eq!(done.len(), 1);
        b.set_active(&bundle.id, false).unwrap();
        assert!(b.completed_with(&water.id, &habits, date(2024, 5, 9)).is_empty());
    }

    #[test]
    fn test_reorder_and_remove_everywhere() {
        let b = book();
        let first = b
            .create(NewBundle { name: "One".into(), habit_ids: vec!["h".into()], ..Default::default() })
            .unwrap();
        let second = b
            .create(NewBundle { name: "Two".into(), habit_ids: vec!["h".into(), "k".into()], ..Default::default() })
            .unwrap();
        let third = b
            .create(NewBundle { name: "Three".into(), ..Default::default() })
            .unwrap();

        b.reorder(&[third.id.clone(), first.id.clone()]).unwrap();
        let names: Vec<String> = b.list().into_iter().map(|x| x.name).collect();
        assert_eq!(names, vec!["Three", "One", "Two"]);

        assert_eq!(b.remove_habit_everywhere("h").unwrap(), 2);
        assert_eq!(b.find(&second.id).unwrap().habit_ids, vec!["k"]);
        assert!(b.find(&first.id).unwrap().habit_ids.is_empty());
    }
}
