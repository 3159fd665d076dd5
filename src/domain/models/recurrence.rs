//! Recurrence patterns for class series.
//!
//! A pattern expands lazily into the candidate dates of a series. Expansion
//! is pure: it knows nothing about courts or conflicts, and the same start
//! date and pattern always produce the same dates.

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainError, DomainResult};

/// Occurrence count used when a pattern has neither an end date nor a count.
pub const DEFAULT_OCCURRENCES: u32 = 12;

/// How often a series repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Frequency {
    Weekly,
    Monthly,
    /// Any frequency this engine cannot advance. Expansion stops after the
    /// first date.
    #[serde(other)]
    Unsupported,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
            Self::Unsupported => "UNSUPPORTED",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "WEEKLY" => Self::Weekly,
            "MONTHLY" => Self::Monthly,
            _ => Self::Unsupported,
        }
    }
}

/// The rule describing how a single requested class repeats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrencePattern {
    pub frequency: Frequency,
    /// Every N weeks or months.
    #[serde(default = "default_interval")]
    pub interval: u32,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub occurrences: Option<u32>,
}

const fn default_interval() -> u32 {
    1
}

impl RecurrencePattern {
    pub fn weekly(interval: u32) -> Self {
        Self {
            frequency: Frequency::Weekly,
            interval,
            end_date: None,
            occurrences: None,
        }
    }

    pub fn monthly(interval: u32) -> Self {
        Self {
            frequency: Frequency::Monthly,
            interval,
            end_date: None,
            occurrences: None,
        }
    }

    pub fn until(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn times(mut self, occurrences: u32) -> Self {
        self.occurrences = Some(occurrences);
        self
    }

    /// The count bound in effect: the explicit count, `default` when no
    /// bound at all is given, or `None` when only the end date bounds it.
    pub fn occurrence_limit(&self, default: u32) -> Option<u32> {
        match (self.occurrences, self.end_date) {
            (Some(n), _) => Some(n),
            (None, None) => Some(default),
            (None, Some(_)) => None,
        }
    }

    /// Reject patterns that would loop forever, emit duplicates, or need a
    /// frequency this engine cannot advance.
    pub fn validate(&self) -> DomainResult<()> {
        if self.interval == 0 {
            return Err(DomainError::ValidationFailed(
                "recurrence interval must be at least 1".to_string(),
            ));
        }
        if self.occurrences == Some(0) {
            return Err(DomainError::ValidationFailed(
                "recurrence occurrences must be at least 1".to_string(),
            ));
        }
        if self.frequency == Frequency::Unsupported && self.occurrences != Some(1) {
            return Err(DomainError::ValidationFailed(
                "unsupported recurrence frequency; use WEEKLY or MONTHLY".to_string(),
            ));
        }
        Ok(())
    }

    /// Lazily expand the pattern from `start`.
    pub fn expand(&self, start: NaiveDate) -> RecurrenceIter {
        self.expand_with_default(start, DEFAULT_OCCURRENCES)
    }

    /// Like [`expand`](Self::expand) with a caller-chosen default count.
    pub fn expand_with_default(&self, start: NaiveDate, default_occurrences: u32) -> RecurrenceIter {
        RecurrenceIter {
            start,
            frequency: self.frequency,
            interval: self.interval,
            end_date: self.end_date,
            limit: self.occurrence_limit(default_occurrences),
            emitted: 0,
            done: false,
        }
    }
}

/// Iterator over the dates of a recurring series.
///
/// Each date is computed from the series start rather than from the previous
/// date, so monthly series anchored on the 31st come back to the 31st after
/// passing through shorter months.
#[derive(Debug, Clone)]
pub struct RecurrenceIter {
    start: NaiveDate,
    frequency: Frequency,
    interval: u32,
    end_date: Option<NaiveDate>,
    limit: Option<u32>,
    emitted: u32,
    done: bool,
}

impl RecurrenceIter {
    fn nth_date(&self, n: u32) -> Option<NaiveDate> {
        if n == 0 {
            return Some(self.start);
        }
        let steps = n.checked_mul(self.interval)?;
        match self.frequency {
            Frequency::Weekly => self.start.checked_add_days(Days::new(u64::from(steps) * 7)),
            // chrono clamps to the last day of the target month
            Frequency::Monthly => self.start.checked_add_months(Months::new(steps)),
            Frequency::Unsupported => None,
        }
    }
}

impl Iterator for RecurrenceIter {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        if self.done {
            return None;
        }
        if self.limit.is_some_and(|limit| self.emitted >= limit) || self.interval == 0 {
            self.done = true;
            return None;
        }

        let Some(candidate) = self.nth_date(self.emitted) else {
            self.done = true;
            return None;
        };
        if self.end_date.is_some_and(|end| candidate > end) {
            self.done = true;
            return None;
        }

        self.emitted += 1;
        Some(candidate)
    }
}
