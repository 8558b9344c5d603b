//! Habit collection

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use super::bundles::BundleBook;
use super::difficulty::DifficultyBook;
use super::notes::NoteBook;
use super::photos::PhotoBook;
use super::templates::HabitTemplate;
use crate::calendar::Clock;
use crate::domain::{Habit, HabitError};
use crate::store::{Repository, StoreKey};

#[derive(Clone)]
pub struct HabitBook {
    repo: Repository,
    clock: Arc<dyn Clock>,
}

impl HabitBook {
    pub fn new(repo: Repository, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    pub fn list(&self) -> Vec<Habit> {
        self.repo.load(StoreKey::Habits)
    }

    pub fn get(&self, id: &str) -> Option<Habit> {
        self.list().into_iter().find(|h| h.id == id)
    }

    /// Find by id, or by case-insensitive name
    pub fn find(&self, needle: &str) -> Option<Habit> {
        let habits = self.list();
        if let Some(h) = habits.iter().find(|h| h.id == needle) {
            return Some(h.clone());
        }
        habits
            .into_iter()
            .find(|h| h.name.eq_ignore_ascii_case(needle.trim()))
    }

    /// Create a habit with a trimmed, non-empty name
    pub fn add(&self, name: &str) -> Result<Habit, HabitError> {
        let habit = Habit::new(name, self.clock.now().with_timezone(&Utc))?;
        self.repo
            .update(StoreKey::Habits, |habits: &mut Vec<Habit>| {
                habits.push(habit.clone())
            })?;
        tracing::info!("Added habit {} ({})", habit.name, habit.id);
        Ok(habit)
    }

    pub fn add_from_template(&self, template: &HabitTemplate) -> Result<Habit, HabitError> {
        self.add(template.name)
    }

    /// Append already-built habits, rejecting the batch if any id collides
    pub fn insert_all(&self, incoming: Vec<Habit>) -> Result<usize, HabitError> {
        let mut habits = self.list();
        for h in &incoming {
            if habits.iter().any(|existing| existing.id == h.id) {
                return Err(HabitError::DuplicateId(h.id.clone()));
            }
        }
        let count = incoming.len();
        habits.extend(incoming);
        self.repo.save(StoreKey::Habits, &habits)?;
        Ok(count)
    }

    /// Delete a habit along with its notes, difficulty records, photos and
    /// bundle memberships
    pub fn delete(&self, id: &str) -> Result<Habit, HabitError> {
        let mut habits = self.list();
        let idx = habits
            .iter()
            .position(|h| h.id == id)
            .ok_or_else(|| HabitError::NotFound(id.to_string()))?;
        let removed = habits.remove(idx);
        self.repo.save(StoreKey::Habits, &habits)?;

        NoteBook::new(self.repo.clone(), self.clock.clone()).remove_for_habit(id)?;
        DifficultyBook::new(self.repo.clone(), self.clock.clone()).remove_habit(id)?;
        PhotoBook::new(self.repo.clone(), self.clock.clone()).remove_for_habit(id)?;
        BundleBook::new(self.repo.clone(), self.clock.clone()).remove_habit_everywhere(id)?;

        tracing::info!("Deleted habit {} ({})", removed.name, removed.id);
        Ok(removed)
    }

    /// Flip completion for a date. Returns true if the habit is now
    /// completed on that date. Future dates are rejected.
    pub fn toggle(&self, id: &str, date: NaiveDate) -> Result<bool, HabitError> {
        if date > self.clock.today() {
            return Err(HabitError::FutureDate(date));
        }

        let mut habits = self.list();
        let habit = habits
            .iter_mut()
            .find(|h| h.id == id)
            .ok_or_else(|| HabitError::NotFound(id.to_string()))?;
        let completed = habit.toggle(date);
        self.repo.save(StoreKey::Habits, &habits)?;
        Ok(completed)
    }
}
