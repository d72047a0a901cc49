//! Monday-aligned week windows and the cache keys derived from them.

use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::Serialize;
use std::fmt;

use crate::error::AgendaError;

/// Wire and cache-key encoding for a calendar day.
const DATE_FORMAT: &str = "%Y%m%d";

/// Monday of the week `offset` weeks away from the week containing `today`.
///
/// Returns `None` only when the result falls outside chrono's calendar range.
pub fn week_start(offset: i64, today: NaiveDate) -> Option<NaiveDate> {
    // weekday encoded 0 = Sunday .. 6 = Saturday
    let weekday = i64::from(today.weekday().num_days_from_sunday());
    let back_to_monday = (weekday + 6) % 7;
    let monday = today.checked_sub_signed(Duration::days(back_to_monday))?;
    let shift = Duration::try_days(offset.checked_mul(7)?)?;
    monday.checked_add_signed(shift)
}

/// Sunday closing the week that starts at [`week_start`].
pub fn week_end(offset: i64, today: NaiveDate) -> Option<NaiveDate> {
    week_start(offset, today)?.checked_add_signed(Duration::days(6))
}

/// Format a date as `YYYYMMDD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// An inclusive Monday..Sunday window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateInterval {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateInterval {
    /// Window for the week `offset` weeks away from `today`.
    pub fn for_week(offset: i64, today: NaiveDate) -> Result<Self, AgendaError> {
        let start = week_start(offset, today).ok_or(AgendaError::DateOutOfRange(offset))?;
        let end = start
            .checked_add_signed(Duration::days(6))
            .ok_or(AgendaError::DateOutOfRange(offset))?;
        Ok(Self { start, end })
    }

    /// Window for the week `offset` weeks away from the local calendar day.
    pub fn current(offset: i64) -> Result<Self, AgendaError> {
        Self::for_week(offset, Local::now().date_naive())
    }

    /// `start` as sent to the backend.
    pub fn start_param(&self) -> String {
        format_date(self.start)
    }

    /// `end` as sent to the backend.
    pub fn end_param(&self) -> String {
        format_date(self.end)
    }

    pub fn key(&self) -> CacheKey {
        CacheKey::from(self)
    }

    /// Every day of the window, Monday first.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take_while({
            let end = self.end;
            move |day| *day <= end
        })
    }
}

impl fmt::Display for DateInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start_param(), self.end_param())
    }
}

/// Cache key for one [`DateInterval`]: `YYYYMMDD_YYYYMMDD`.
///
/// `_` never occurs inside a formatted date, so distinct intervals never share
/// a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&DateInterval> for CacheKey {
    fn from(interval: &DateInterval) -> Self {
        CacheKey(format!("{}_{}", interval.start_param(), interval.end_param()))
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
