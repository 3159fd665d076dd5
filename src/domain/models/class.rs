//! Class instances and the drafts they are materialized from.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::club::ClassType;
use super::money::Money;
use super::occupant::{Occupant, OccupantKind};
use super::time::TimeRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClassLevel {
    Beginner,
    Intermediate,
    Advanced,
    #[default]
    AllLevels,
}

impl ClassLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "BEGINNER",
            Self::Intermediate => "INTERMEDIATE",
            Self::Advanced => "ADVANCED",
            Self::AllLevels => "ALL_LEVELS",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().replace('-', "_").as_str() {
            "BEGINNER" => Some(Self::Beginner),
            "INTERMEDIATE" => Some(Self::Intermediate),
            "ADVANCED" => Some(Self::Advanced),
            "ALL_LEVELS" => Some(Self::AllLevels),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClassStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl ClassStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "SCHEDULED",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "SCHEDULED" => Some(Self::Scheduled),
            "COMPLETED" => Some(Self::Completed),
            "CANCELLED" | "CANCELED" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// A fully computed, not yet persisted class occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassInstanceDraft {
    pub date: NaiveDate,
    pub time: TimeRange,
    pub duration_minutes: u32,
    pub price: Money,
    pub court_cost: Money,
    pub instructor_cost: Money,
}

/// A persisted class occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassInstance {
    pub id: Uuid,
    pub club_id: Uuid,
    /// Shared by every instance created from one recurring request.
    pub series_id: Option<Uuid>,
    pub instructor_id: Uuid,
    pub court_id: Uuid,
    pub name: String,
    pub class_type: ClassType,
    pub level: ClassLevel,
    pub max_students: u32,
    pub current_students: u32,
    pub notes: Option<String>,
    pub status: ClassStatus,
    pub draft: ClassInstanceDraft,
    pub created_at: DateTime<Utc>,
}

impl ClassInstance {
    pub fn available_spots(&self) -> u32 {
        self.max_students.saturating_sub(self.current_students)
    }

    pub fn revenue(&self) -> Money {
        self.draft.price.times(self.current_students)
    }

    pub fn as_occupant(&self) -> Occupant {
        Occupant {
            kind: OccupantKind::Class,
            id: self.id,
            court_id: self.court_id,
            date: self.draft.date,
            time: self.draft.time,
            cancelled: self.status == ClassStatus::Cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance(max: u32, current: u32) -> ClassInstance {
        ClassInstance {
            id: Uuid::new_v4(),
            club_id: Uuid::new_v4(),
            series_id: None,
            instructor_id: Uuid::new_v4(),
            court_id: Uuid::new_v4(),
            name: "Morning drills".to_string(),
            class_type: ClassType::Group,
            level: ClassLevel::Beginner,
            max_students: max,
            current_students: current,
            notes: None,
            status: ClassStatus::Scheduled,
            draft: ClassInstanceDraft {
                date: NaiveDate::from_ymd_opt(2025, 4, 7).unwrap(),
                time: TimeRange::parse("08:00", "09:30").unwrap(),
                duration_minutes: 90,
                price: Money::from_minor(25_000),
                court_cost: Money::from_minor(45_000),
                instructor_cost: Money::ZERO,
            },
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_available_spots_and_revenue() {
        let class = instance(4, 3);
        assert_eq!(class.available_spots(), 1);
        assert_eq!(class.revenue().minor(), 75_000);
        assert_eq!(instance(2, 5).available_spots(), 0);
    }

    #[test]
    fn test_cancelled_class_occupant() {
        let mut class = instance(4, 0);
        assert!(!class.as_occupant().cancelled);
        class.status = ClassStatus::Cancelled;
        assert!(class.as_occupant().cancelled);
        assert_eq!(class.as_occupant().kind, OccupantKind::Class);
    }
}
