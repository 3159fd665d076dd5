//! Calendar and clock primitives used by the scheduling engine.
//!
//! Times of day are stored as minutes since midnight so every comparison is
//! numeric. Calendar dates are `NaiveDate`s built from explicit
//! year/month/day components and never carry a timezone.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::errors::{DomainError, DomainResult};

const MINUTES_PER_DAY: u16 = 24 * 60;

/// A wall-clock time within a day, at minute resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// Build from hour and minute components.
    pub fn from_hm(hour: u16, minute: u16) -> DomainResult<Self> {
        if hour >= 24 || minute >= 60 {
            return Err(DomainError::ValidationFailed(format!(
                "time out of range: {hour:02}:{minute:02}"
            )));
        }
        Ok(Self(hour * 60 + minute))
    }

    /// Build from minutes since midnight.
    pub fn from_minutes(minutes: u16) -> DomainResult<Self> {
        if minutes >= MINUTES_PER_DAY {
            return Err(DomainError::ValidationFailed(format!(
                "minute offset out of range: {minutes}"
            )));
        }
        Ok(Self(minutes))
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    pub fn minute(self) -> u16 {
        self.0 % 60
    }
}

impl FromStr for TimeOfDay {
    type Err = DomainError;

    /// Parses `H:MM` or `HH:MM`. Minutes must always be two digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::ValidationFailed(format!("invalid time '{s}', expected HH:MM"));

        let (hours, minutes) = s.trim().split_once(':').ok_or_else(invalid)?;
        if hours.is_empty()
            || hours.len() > 2
            || minutes.len() != 2
            || !hours.chars().all(|c| c.is_ascii_digit())
            || !minutes.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }

        let hour: u16 = hours.parse().map_err(|_| invalid())?;
        let minute: u16 = minutes.parse().map_err(|_| invalid())?;
        Self::from_hm(hour, minute).map_err(|_| invalid())
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A half-open `[start, end)` interval within a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTimeRange", into = "RawTimeRange")]
pub struct TimeRange {
    start: TimeOfDay,
    end: TimeOfDay,
}

impl TimeRange {
    /// Build a range; `end` must be strictly after `start`.
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> DomainResult<Self> {
        if end <= start {
            return Err(DomainError::ValidationFailed(format!(
                "end time {end} must be after start time {start}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Parse two `HH:MM` strings into a range.
    pub fn parse(start: &str, end: &str) -> DomainResult<Self> {
        Self::new(start.parse()?, end.parse()?)
    }

    pub fn start(&self) -> TimeOfDay {
        self.start
    }

    pub fn end(&self) -> TimeOfDay {
        self.end
    }

    pub fn duration_minutes(&self) -> u32 {
        u32::from(self.end.minutes() - self.start.minutes())
    }

    /// Half-open overlap: touching endpoints do not overlap.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && self.end > other.start
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTimeRange {
    start_time: TimeOfDay,
    end_time: TimeOfDay,
}

impl TryFrom<RawTimeRange> for TimeRange {
    type Error = DomainError;

    fn try_from(raw: RawTimeRange) -> Result<Self, Self::Error> {
        Self::new(raw.start_time, raw.end_time)
    }
}

impl From<TimeRange> for RawTimeRange {
    fn from(range: TimeRange) -> Self {
        Self {
            start_time: range.start,
            end_time: range.end,
        }
    }
}

/// Parse a `YYYY-MM-DD` string into a calendar date.
///
/// The components are split and validated individually so the resulting
/// date is exactly the one written, independent of any timezone.
pub fn parse_calendar_date(s: &str) -> DomainResult<NaiveDate> {
    let invalid = || DomainError::ValidationFailed(format!("invalid date '{s}', expected YYYY-MM-DD"));

    let mut parts = s.trim().splitn(3, '-');
    let (Some(year), Some(month), Some(day)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(invalid());
    };
    if year.len() != 4 || month.len() != 2 || day.len() != 2 {
        return Err(invalid());
    }

    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    let day: u32 = day.parse().map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// Format a calendar date as `YYYY-MM-DD`.
pub fn format_calendar_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    fn range(start: &str, end: &str) -> TimeRange {
        TimeRange::parse(start, end).unwrap()
    }

    #[test]
    fn test_parse_time_of_day() {
        assert_eq!(t("00:00").minutes(), 0);
        assert_eq!(t("09:30").minutes(), 570);
        assert_eq!(t("9:30").minutes(), 570);
        assert_eq!(t("23:59").minutes(), 1439);
        assert_eq!(t("7:05").to_string(), "07:05");
    }

    #[test]
    fn test_parse_time_rejects_garbage() {
        for bad in ["24:00", "12:60", "1230", "12:5", "ab:cd", "", "-1:00", "123:00"] {
            assert!(bad.parse::<TimeOfDay>().is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn test_numeric_ordering_without_padding() {
        // "9:00" > "10:00" as strings, but not as times
        assert!(t("9:00") < t("10:00"));
    }

    #[test]
    fn test_range_requires_positive_duration() {
        assert!(TimeRange::parse("10:00", "10:00").is_err());
        assert!(TimeRange::parse("11:00", "10:00").is_err());
        assert_eq!(range("10:00", "11:30").duration_minutes(), 90);
    }

    #[test]
    fn test_half_open_overlap() {
        let existing = range("10:00", "11:00");
        assert!(!range("11:00", "12:00").overlaps(&existing));
        assert!(!range("09:00", "10:00").overlaps(&existing));
        assert!(range("10:30", "10:45").overlaps(&existing));
        assert!(range("09:00", "10:30").overlaps(&existing));
        assert!(range("10:30", "11:30").overlaps(&existing));
        assert!(range("09:00", "12:00").overlaps(&existing));
        assert!(range("10:00", "11:00").overlaps(&existing));
    }

    #[test]
    fn test_parse_calendar_date_is_literal() {
        let date = parse_calendar_date("2025-03-01").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(format_calendar_date(date), "2025-03-01");
    }

    #[test]
    fn test_parse_calendar_date_rejects_invalid() {
        for bad in ["2025-02-30", "2025-13-01", "25-01-01", "2025/01/01", "2025-1-1", ""] {
            assert!(parse_calendar_date(bad).is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn test_time_range_serde_shape() {
        let r = range("18:00", "19:30");
        let json = serde_json::to_value(r).unwrap();
        assert_eq!(json["startTime"], "18:00");
        assert_eq!(json["endTime"], "19:30");

        let bad: Result<TimeRange, _> =
            serde_json::from_str(r#"{"startTime":"19:00","endTime":"18:00"}"#);
        assert!(bad.is_err());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn range_strategy() -> impl Strategy<Value = TimeRange> {
            (0u16..1439).prop_flat_map(|start| {
                (Just(start), (start + 1)..=1439).prop_map(|(start, end)| {
                    TimeRange::new(
                        TimeOfDay::from_minutes(start).unwrap(),
                        TimeOfDay::from_minutes(end).unwrap(),
                    )
                    .unwrap()
                })
            })
        }

        proptest! {
            #[test]
            fn proptest_overlap_is_symmetric(a in range_strategy(), b in range_strategy()) {
                prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
            }

            #[test]
            fn proptest_overlap_matches_minute_intersection(a in range_strategy(), b in range_strategy()) {
                let shared = (a.start().minutes()..a.end().minutes())
                    .any(|m| m >= b.start().minutes() && m < b.end().minutes());
                prop_assert_eq!(a.overlaps(&b), shared);
            }

            #[test]
            fn proptest_range_overlaps_itself(a in range_strategy()) {
                prop_assert!(a.overlaps(&a));
            }
        }
    }
}
