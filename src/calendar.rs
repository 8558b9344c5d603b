//! Clock and day-key utilities
//!
//! A "day" is the local-timezone calendar date, keyed as "YYYY-MM-DD".
//! There is no timezone normalization: behaviour across DST or timezone
//! changes follows whatever the local clock reports.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime, TimeZone, Weekday};

/// Source of "now" for every engine component
pub trait Clock: Send + Sync {
    /// Current local time
    fn now(&self) -> DateTime<Local>;

    /// Current local calendar date
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    /// Current time as Unix milliseconds
    fn timestamp_ms(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

/// Clock backed by the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Clock frozen at a single instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Local>,
}

impl FixedClock {
    pub fn new(now: DateTime<Local>) -> Self {
        Self { now }
    }

    /// Build from a local wall-clock time. Ambiguous times resolve to the
    /// earliest instant; times inside a DST gap fall back to UTC interpretation.
    pub fn at(local: NaiveDateTime) -> Self {
        let now = Local
            .from_local_datetime(&local)
            .earliest()
            .unwrap_or_else(|| Local.from_utc_datetime(&local));
        Self { now }
    }

    /// Noon on the given date, which is never inside a DST transition
    pub fn on(date: NaiveDate) -> Self {
        Self::at(date.and_hms_opt(12, 0, 0).unwrap_or_default())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.now
    }
}

/// Format a date as its day key ("YYYY-MM-DD")
pub fn day_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// Parse a day key back into a date
pub fn parse_day_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, "%Y-%m-%d").ok()
}

/// Date `days` before `date`
pub fn days_before(date: NaiveDate, days: i64) -> NaiveDate {
    date - Duration::days(days)
}

/// Start of the week (Sunday) containing `date`, used to key weekly goals
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_sunday() as i64;
    date - Duration::days(offset)
}

/// "YYYY-MM" key for the month containing `date`
pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// First day of the month `months_back` months before the month of `date`
pub fn month_start_back(date: NaiveDate, months_back: u32) -> NaiveDate {
    let total = date.year() * 12 + date.month0() as i32 - months_back as i32;
    let year = total.div_euclid(12);
    let month0 = total.rem_euclid(12) as u32;
    NaiveDate::from_ymd_opt(year, month0 + 1, 1).unwrap_or(date)
}

/// Check if a date falls on a weekend
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Short English weekday name, Sunday first
pub fn weekday_short(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sun => "Sun",
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
    }
}

/// Full English weekday name
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sun => "Sunday",
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
    }
}
