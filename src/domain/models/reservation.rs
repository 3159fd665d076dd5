//! Court reservations made by players.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::occupant::{Occupant, OccupantKind};
use super::time::TimeRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "PENDING" => Some(Self::Pending),
            "CONFIRMED" => Some(Self::Confirmed),
            "COMPLETED" => Some(Self::Completed),
            "CANCELLED" | "CANCELED" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: Uuid,
    pub club_id: Uuid,
    pub court_id: Uuid,
    pub date: NaiveDate,
    pub time: TimeRange,
    pub player_name: String,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    pub fn new(
        club_id: Uuid,
        court_id: Uuid,
        date: NaiveDate,
        time: TimeRange,
        player_name: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            club_id,
            court_id,
            date,
            time,
            player_name: player_name.into(),
            status: ReservationStatus::Confirmed,
            created_at: Utc::now(),
        }
    }

    pub fn with_status(mut self, status: ReservationStatus) -> Self {
        self.status = status;
        self
    }

    pub fn as_occupant(&self) -> Occupant {
        Occupant {
            kind: OccupantKind::Reservation,
            id: self.id,
            court_id: self.court_id,
            date: self.date,
            time: self.time,
            cancelled: self.status == ReservationStatus::Cancelled,
        }
    }
}
