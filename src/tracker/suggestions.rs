//! Dismissed smart suggestions

use std::collections::BTreeSet;
use std::sync::Arc;

use anyhow::Result;

use crate::calendar::Clock;
use crate::domain::Habit;
use crate::metrics::{smart_suggestions, SmartSuggestion};
use crate::store::{Repository, StoreKey};

#[derive(Clone)]
pub struct SuggestionBook {
    repo: Repository,
    clock: Arc<dyn Clock>,
}

impl SuggestionBook {
    pub fn new(repo: Repository, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    pub fn dismissed(&self) -> BTreeSet<String> {
        self.repo.load(StoreKey::DismissedSuggestions)
    }

    /// Suggestions for `habits` right now, minus dismissed ones
    pub fn current(&self, habits: &[Habit]) -> Vec<SmartSuggestion> {
        smart_suggestions(habits, self.clock.now(), &self.dismissed())
    }

    /// Returns false if the id was already dismissed
    pub fn dismiss(&self, id: &str) -> Result<bool> {
        self.repo
            .update(StoreKey::DismissedSuggestions, |ids: &mut BTreeSet<String>| {
                ids.insert(id.to_string())
            })
    }

    pub fn clear_dismissed(&self) -> Result<()> {
        self.repo.remove(StoreKey::DismissedSuggestions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::FixedClock;
    use chrono::NaiveDate;

    #[test]
    fn test_dismiss_hides_until_cleared() {
        let clock = FixedClock::on(NaiveDate::from_ymd_opt(2024, 3, 20).unwrap());
        let book = SuggestionBook::new(Repository::in_memory(), Arc::new(clock));

        let first = book.current(&[]);
        assert_eq!(first[0].id, "welcome");

        assert!(book.dismiss("welcome").unwrap());
        assert!(!book.dismiss("welcome").unwrap());
        assert!(book.current(&[]).is_empty());

        book.clear_dismissed().unwrap();
        assert_eq!(book.current(&[]).len(), 1);
    }
}
