//! Anything already holding court time: reservations and classes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::time::TimeRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OccupantKind {
    Reservation,
    Class,
}

impl OccupantKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reservation => "reservation",
            Self::Class => "class",
        }
    }
}

/// An existing reservation or class on a court.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occupant {
    pub kind: OccupantKind,
    pub id: Uuid,
    pub court_id: Uuid,
    pub date: NaiveDate,
    pub time: TimeRange,
    pub cancelled: bool,
}

impl Occupant {
    /// Whether this occupant prevents booking `time` on `date`.
    pub fn blocks(&self, date: NaiveDate, time: &TimeRange) -> bool {
        !self.cancelled && self.date == date && self.time.overlaps(time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn occupant(cancelled: bool) -> Occupant {
        Occupant {
            kind: OccupantKind::Reservation,
            id: Uuid::new_v4(),
            court_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            time: TimeRange::parse("10:00", "11:00").unwrap(),
            cancelled,
        }
    }

    #[test]
    fn test_blocks_overlapping_on_same_date() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let occ = occupant(false);
        assert!(occ.blocks(date, &TimeRange::parse("10:30", "11:30").unwrap()));
        assert!(!occ.blocks(date, &TimeRange::parse("11:00", "12:00").unwrap()));
        assert!(!occ.blocks(date.succ_opt().unwrap(), &TimeRange::parse("10:00", "11:00").unwrap()));
    }

    #[test]
    fn test_cancelled_never_blocks() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        assert!(!occupant(true).blocks(date, &TimeRange::parse("10:00", "11:00").unwrap()));
    }
}
