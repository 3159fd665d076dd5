//! Repository port for everything that occupies court time.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::{ClassInstance, ClassStatus, Occupant, Reservation, ReservationStatus};

/// Outcome of an atomic check-and-insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotClaim {
    /// The slot was free and the record was written.
    Claimed,
    /// Another occupant already holds overlapping time; nothing was written.
    Taken(Vec<Occupant>),
}

impl SlotClaim {
    pub fn is_claimed(&self) -> bool {
        matches!(self, Self::Claimed)
    }
}

/// Filter for listing classes.
#[derive(Debug, Default, Clone)]
pub struct ClassFilter {
    pub club_id: Option<Uuid>,
    pub court_id: Option<Uuid>,
    pub instructor_id: Option<Uuid>,
    pub series_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
    pub status: Option<ClassStatus>,
}

#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    /// Non-cancelled reservations and classes on a court for one date.
    async fn occupants_on(&self, court_id: Uuid, date: NaiveDate) -> DomainResult<Vec<Occupant>>;

    /// Insert a class only if no blocking occupant overlaps it.
    ///
    /// The overlap check and the write happen under one storage-level
    /// serialization point, so two concurrent claims for overlapping time on
    /// the same court can never both succeed.
    async fn claim_class_slot(&self, class: &ClassInstance) -> DomainResult<SlotClaim>;

    /// Insert a reservation only if no blocking occupant overlaps it.
    async fn claim_reservation_slot(&self, reservation: &Reservation) -> DomainResult<SlotClaim>;

    async fn get_class(&self, id: Uuid) -> DomainResult<Option<ClassInstance>>;

    /// List classes ordered by date then start time.
    async fn list_classes(&self, filter: ClassFilter) -> DomainResult<Vec<ClassInstance>>;

    async fn update_class_status(&self, id: Uuid, status: ClassStatus) -> DomainResult<()>;

    async fn get_reservation(&self, id: Uuid) -> DomainResult<Option<Reservation>>;

    async fn update_reservation_status(&self, id: Uuid, status: ReservationStatus) -> DomainResult<()>;
}
