//! Recovery mode: streak savers, vacation mode and the grace period
//!
//! Saver-covered days, paused vacation days and missed days still inside
//! the grace window bridge a streak. They neither count toward it nor
//! break it.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{Duration, Local, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use crate::calendar::Clock;
use crate::domain::Habit;
use crate::metrics::current_streak_bridged;
use crate::store::{Repository, StoreKey};

/// Savers granted to a fresh profile
pub const FREE_SAVERS: u32 = 3;

/// Longest allowed vacation, in days
pub const MAX_VACATION_DAYS: i64 = 14;

/// Upper bound for the grace window, in hours
pub const MAX_GRACE_HOURS: u32 = 48;

/// Streak lengths that earn a saver
pub const SAVER_MILESTONES: &[u32] = &[30, 60, 90, 120, 180, 365];

#[derive(Debug, thiserror::Error)]
pub enum RecoveryError {
    #[error("No streak savers available")]
    NoSaversAvailable,

    #[error("End date must be after start date")]
    InvalidVacationRange,

    #[error("Maximum vacation period is {MAX_VACATION_DAYS} days (requested {0})")]
    VacationTooLong(i64),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaverUse {
    pub habit_id: String,
    pub date: NaiveDate,
    pub used_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaverGrant {
    pub reason: String,
    pub count: u32,
    pub earned_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakSavers {
    pub available: u32,
    #[serde(default)]
    pub used: Vec<SaverUse>,
    #[serde(default)]
    pub earned: Vec<SaverGrant>,
}

impl Default for StreakSavers {
    fn default() -> Self {
        Self {
            available: FREE_SAVERS,
            used: Vec::new(),
            earned: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VacationMode {
    pub is_active: bool,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Empty means every habit is paused
    #[serde(default)]
    pub paused_habits: Vec<String>,
}

impl VacationMode {
    fn range(&self) -> Option<(NaiveDate, NaiveDate)> {
        if !self.is_active {
            return None;
        }
        Some((self.start_date?, self.end_date?))
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        self.range()
            .is_some_and(|(start, end)| start <= date && date <= end)
    }

    pub fn pauses(&self, habit_id: &str) -> bool {
        self.paused_habits.is_empty() || self.paused_habits.iter().any(|h| h == habit_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GracePeriod {
    pub enabled: bool,
    pub hours: u32,
}

impl Default for GracePeriod {
    fn default() -> Self {
        Self {
            enabled: true,
            hours: 24,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RecoveryKind {
    StreakSaver,
    Vacation,
    GracePeriod,
    Earn,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecoverySuggestion {
    pub kind: RecoveryKind,
    pub title: &'static str,
    pub description: String,
    pub priority: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecoveryStats {
    pub savers_available: u32,
    pub savers_used: usize,
    pub savers_earned: u32,
    pub vacation_active: bool,
    pub vacation_days_remaining: i64,
    pub paused_habits: usize,
    pub grace_enabled: bool,
    pub grace_hours: u32,
}

#[derive(Clone)]
pub struct RecoveryBook {
    repo: Repository,
    clock: Arc<dyn Clock>,
}

impl RecoveryBook {
    pub fn new(repo: Repository, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    // ========================================
    // Streak savers
    // ========================================

    pub fn savers(&self) -> StreakSavers {
        self.repo.load(StoreKey::StreakSavers)
    }

    /// Spend a saver on a missed date. Returns the savers left.
    pub fn use_saver(&self, habit_id: &str, date: NaiveDate) -> Result<u32, RecoveryError> {
        let mut savers = self.savers();
        if savers.available == 0 {
            return Err(RecoveryError::NoSaversAvailable);
        }
        savers.available -= 1;
        savers.used.push(SaverUse {
            habit_id: habit_id.to_string(),
            date,
            used_at: self.clock.timestamp_ms(),
        });
        self.repo.save(StoreKey::StreakSavers, &savers)?;
        tracing::info!("Streak saver used for {} on {}", habit_id, date);
        Ok(savers.available)
    }

    /// Grant savers. Returns the new total available.
    pub fn earn_savers(&self, reason: &str, count: u32) -> Result<u32, RecoveryError> {
        let earned_at = self.clock.timestamp_ms();
        let available = self
            .repo
            .update(StoreKey::StreakSavers, |savers: &mut StreakSavers| {
                savers.available = savers.available.saturating_add(count);
                savers.earned.push(SaverGrant {
                    reason: reason.to_string(),
                    count,
                    earned_at,
                });
                savers.available
            })?;
        Ok(available)
    }

    /// The milestone a habit's streak sits on exactly, if any
    pub fn saver_eligibility(&self, habit: &Habit) -> Option<u32> {
        let streak = self.current_streak(habit);
        SAVER_MILESTONES.iter().copied().find(|days| *days == streak)
    }

    // ========================================
    // Vacation mode
    // ========================================

    pub fn vacation(&self) -> VacationMode {
        self.repo.load(StoreKey::VacationMode)
    }

    /// Pause habits from `start` through `end`. Returns the length in days.
    pub fn activate_vacation(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        paused_habits: Vec<String>,
    ) -> Result<i64, RecoveryError> {
        if end <= start {
            return Err(RecoveryError::InvalidVacationRange);
        }
        let days = (end - start).num_days();
        if days > MAX_VACATION_DAYS {
            return Err(RecoveryError::VacationTooLong(days));
        }

        let vacation = VacationMode {
            is_active: true,
            start_date: Some(start),
            end_date: Some(end),
            paused_habits,
        };
        self.repo.save(StoreKey::VacationMode, &vacation)?;
        tracing::info!("Vacation mode on: {} to {}", start, end);
        Ok(days)
    }

    pub fn deactivate_vacation(&self) -> Result<(), RecoveryError> {
        self.repo
            .save(StoreKey::VacationMode, &VacationMode::default())?;
        Ok(())
    }

    pub fn is_in_vacation(&self, date: NaiveDate) -> bool {
        self.vacation().covers(date)
    }

    pub fn is_habit_paused(&self, habit_id: &str, date: NaiveDate) -> bool {
        let vacation = self.vacation();
        vacation.covers(date) && vacation.pauses(habit_id)
    }

    // ========================================
    // Grace period
    // ========================================

    pub fn grace(&self) -> GracePeriod {
        self.repo.load(StoreKey::GracePeriod)
    }

    /// Set the window length, clamped to `0..=48` hours
    pub fn set_grace_hours(&self, hours: u32) -> Result<u32, RecoveryError> {
        let hours = hours.min(MAX_GRACE_HOURS);
        self.repo
            .update(StoreKey::GracePeriod, |grace: &mut GracePeriod| grace.hours = hours)?;
        Ok(hours)
    }

    /// Flip the grace period on or off, returning the new state
    pub fn toggle_grace(&self) -> Result<bool, RecoveryError> {
        let enabled = self
            .repo
            .update(StoreKey::GracePeriod, |grace: &mut GracePeriod| {
                grace.enabled = !grace.enabled;
                grace.enabled
            })?;
        Ok(enabled)
    }

    /// Whether a missed day can still be completed. The window opens when
    /// the day ends.
    pub fn is_in_grace_period(&self, missed: NaiveDate) -> bool {
        let grace = self.grace();
        if !grace.enabled {
            return false;
        }
        let Some(day_end) = (missed + Duration::days(1)).and_hms_opt(0, 0, 0) else {
            return false;
        };
        let Some(day_end) = Local.from_local_datetime(&day_end).earliest() else {
            return false;
        };
        let elapsed = self.clock.now() - day_end;
        elapsed >= Duration::zero() && elapsed <= Duration::hours(grace.hours as i64)
    }

    // ========================================
    // Streaks
    // ========================================

    /// Days that neither count toward nor break a habit's streak
    pub fn bridged_dates(&self, habit_id: &str) -> BTreeSet<NaiveDate> {
        let mut dates: BTreeSet<NaiveDate> = self
            .savers()
            .used
            .into_iter()
            .filter(|s| s.habit_id == habit_id)
            .map(|s| s.date)
            .collect();

        let vacation = self.vacation();
        if let Some((start, end)) = vacation.range() {
            if vacation.pauses(habit_id) {
                dates.extend(start.iter_days().take_while(|d| *d <= end));
            }
        }

        // At most 48 hours, so two days back is the furthest a window reaches
        let today = self.clock.today();
        dates.extend(
            (1..=2)
                .map(|back| today - Duration::days(back))
                .filter(|d| self.is_in_grace_period(*d)),
        );
        dates
    }

    /// Current streak with saver, vacation and grace days bridged
    pub fn current_streak(&self, habit: &Habit) -> u32 {
        current_streak_bridged(
            &habit.completions,
            self.clock.today(),
            &self.bridged_dates(&habit.id),
        )
    }

    // ========================================
    // Reporting
    // ========================================

    /// Recovery options, most useful first
    pub fn suggestions(&self) -> Vec<RecoverySuggestion> {
        let savers = self.savers();
        let mut out = Vec::new();

        if savers.available > 0 {
            out.push(RecoverySuggestion {
                kind: RecoveryKind::StreakSaver,
                title: "Use Streak Saver",
                description: format!(
                    "Preserve your streak with a freeze ({} available)",
                    savers.available
                ),
                priority: 1,
            });
        }

        out.push(RecoverySuggestion {
            kind: RecoveryKind::Vacation,
            title: "Activate Vacation Mode",
            description: format!(
                "Pause habits for up to {} days without breaking streaks",
                MAX_VACATION_DAYS
            ),
            priority: 2,
        });

        if !self.grace().enabled {
            out.push(RecoverySuggestion {
                kind: RecoveryKind::GracePeriod,
                title: "Enable Grace Period",
                description: "24-hour window to complete yesterday's habits".to_string(),
                priority: 3,
            });
        }

        if savers.available == 0 {
            out.push(RecoverySuggestion {
                kind: RecoveryKind::Earn,
                title: "Earn Streak Savers",
                description: "Reach 30, 60, or 90-day streaks to earn more".to_string(),
                priority: 4,
            });
        }

        out.sort_by_key(|s| s.priority);
        out
    }

    pub fn stats(&self) -> RecoveryStats {
        let savers = self.savers();
        let vacation = self.vacation();
        let grace = self.grace();
        let days_remaining = vacation
            .range()
            .map(|(_, end)| (end - self.clock.today()).num_days().max(0))
            .unwrap_or(0);

        RecoveryStats {
            savers_available: savers.available,
            savers_used: savers.used.len(),
            savers_earned: savers
                .earned
                .iter()
                .fold(0u32, |total, e| total.saturating_add(e.count)),
            vacation_active: vacation.is_active,
            vacation_days_remaining: days_remaining,
            paused_habits: vacation.paused_habits.len(),
            grace_enabled: grace.enabled,
            grace_hours: grace.hours,
        }
    }
}
