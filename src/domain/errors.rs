//! Domain errors for the scheduling engine.

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use super::models::time::TimeRange;

/// Domain-level errors that can occur while scheduling.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Club not found: {0}")]
    ClubNotFound(Uuid),

    #[error("Court not found: {0}")]
    CourtNotFound(Uuid),

    #[error("Instructor not found: {0}")]
    InstructorNotFound(Uuid),

    #[error("Class not found: {0}")]
    ClassNotFound(Uuid),

    #[error("Reservation not found: {0}")]
    ReservationNotFound(Uuid),

    #[error("Court {court_id} is already booked on {date} at {time}")]
    SlotConflict {
        court_id: Uuid,
        date: NaiveDate,
        time: TimeRange,
    },

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Coarse classification used at the service boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadInput,
    NotFound,
    Conflict,
    Internal,
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ValidationFailed(_) => ErrorKind::BadInput,
            Self::ClubNotFound(_)
            | Self::CourtNotFound(_)
            | Self::InstructorNotFound(_)
            | Self::ClassNotFound(_)
            | Self::ReservationNotFound(_) => ErrorKind::NotFound,
            Self::SlotConflict { .. } => ErrorKind::Conflict,
            Self::DatabaseError(_) | Self::SerializationError(_) => ErrorKind::Internal,
        }
    }

    /// Stable machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ValidationFailed(_) => "VALIDATION_ERROR",
            Self::ClubNotFound(_) => "CLUB_NOT_FOUND",
            Self::CourtNotFound(_) => "COURT_NOT_FOUND",
            Self::InstructorNotFound(_) => "INSTRUCTOR_NOT_FOUND",
            Self::ClassNotFound(_) => "CLASS_NOT_FOUND",
            Self::ReservationNotFound(_) => "RESERVATION_NOT_FOUND",
            Self::SlotConflict { .. } => "SLOT_CONFLICT",
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::SerializationError(_) => "SERIALIZATION_ERROR",
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(DomainError::ValidationFailed("x".into()).kind(), ErrorKind::BadInput);
        assert_eq!(DomainError::CourtNotFound(Uuid::nil()).kind(), ErrorKind::NotFound);
        assert_eq!(DomainError::DatabaseError("x".into()).kind(), ErrorKind::Internal);

        let conflict = DomainError::SlotConflict {
            court_id: Uuid::nil(),
            date: NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
            time: TimeRange::parse("10:00", "11:00").unwrap(),
        };
        assert_eq!(conflict.kind(), ErrorKind::Conflict);
        assert_eq!(conflict.code(), "SLOT_CONFLICT");
        assert!(conflict.to_string().contains("2025-01-06 at 10:00-11:00"));
    }
}
