//! Daily task list

use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;

use crate::calendar::Clock;
use crate::domain::Task;
use crate::store::{Repository, StoreKey};

#[derive(Clone)]
pub struct TaskList {
    repo: Repository,
    clock: Arc<dyn Clock>,
}

impl TaskList {
    pub fn new(repo: Repository, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    pub fn list(&self) -> Vec<Task> {
        self.repo.load(StoreKey::Tasks)
    }

    pub fn pending(&self) -> Vec<Task> {
        self.list().into_iter().filter(|t| !t.completed).collect()
    }

    /// Append tasks, returning how many were added
    pub fn add_tasks(&self, tasks: Vec<Task>) -> Result<usize> {
        let count = tasks.len();
        self.repo
            .update(StoreKey::Tasks, |list: &mut Vec<Task>| list.extend(tasks))?;
        Ok(count)
    }

    /// Create tasks from plain names. Blank names are skipped.
    pub fn add_names<I, S>(&self, names: I, ai_generated: bool) -> Result<Vec<Task>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let created_at = self.clock.now().with_timezone(&Utc);
        let tasks: Vec<Task> = names
            .into_iter()
            .filter_map(|name| {
                let name = name.as_ref().trim();
                if name.is_empty() {
                    return None;
                }
                let mut task = Task::new(name, created_at);
                task.ai_generated = ai_generated;
                Some(task)
            })
            .collect();
        self.add_tasks(tasks.clone())?;
        Ok(tasks)
    }

    /// Flip completion. Returns the new state, or `None` if the id is unknown.
    pub fn toggle(&self, id: &str) -> Result<Option<bool>> {
        self.repo.update(StoreKey::Tasks, |list: &mut Vec<Task>| {
            let task = list.iter_mut().find(|t| t.id == id)?;
            task.completed = !task.completed;
            Some(task.completed)
        })
    }

    pub fn delete(&self, id: &str) -> Result<bool> {
        self.repo.update(StoreKey::Tasks, |list: &mut Vec<Task>| {
            let before = list.len();
            list.retain(|t| t.id != id);
            list.len() != before
        })
    }

    /// Remove completed tasks, returning how many were cleared
    pub fn clear_completed(&self) -> Result<usize> {
        self.repo.update(StoreKey::Tasks, |list: &mut Vec<Task>| {
            let before = list.len();
            list.retain(|t| !t.completed);
            before - list.len()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::FixedClock;
    use chrono::NaiveDate;

    fn tasks() -> TaskList {
        let clock = FixedClock::on(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        TaskList::new(Repository::in_memory(), Arc::new(clock))
    }

    #[test]
    fn test_add_names_skips_blank() {
        let list = tasks();
        let added = list.add_names(["Stretch", "  ", " Call mom "], true).unwrap();
        assert_eq!(added.len(), 2);
        assert_eq!(added[1].name, "Call mom");
        assert!(added.iter().all(|t| t.ai_generated));
        assert_eq!(list.list().len(), 2);
    }

    #[test]
    fn test_toggle_delete_clear() {
        let list = tasks();
        let added = list.add_names(["A", "B"], false).unwrap();

        assert_eq!(list.toggle(&added[0].id).unwrap(), Some(true));
        assert_eq!(list.toggle("missing").unwrap(), None);
        assert_eq!(list.pending().len(), 1);

        assert!(list.delete(&added[1].id).unwrap());
        assert!(!list.delete(&added[1].id).unwrap());

        assert_eq!(list.clear_completed().unwrap(), 1);
        assert!(list.list().is_empty());
    }
}
