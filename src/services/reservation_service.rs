//! Court reservations by players, guarded by the same overlap rule as classes.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Reservation, ReservationStatus, TimeRange};
use crate::domain::ports::{CourtRepository, ScheduleRepository, SlotClaim};

#[derive(Debug, Clone)]
pub struct NewReservation {
    pub club_id: Uuid,
    pub court_id: Uuid,
    pub date: NaiveDate,
    pub time: TimeRange,
    pub player_name: String,
}

#[derive(Clone)]
pub struct ReservationService {
    courts: Arc<dyn CourtRepository>,
    schedule: Arc<dyn ScheduleRepository>,
}

impl ReservationService {
    pub fn new(courts: Arc<dyn CourtRepository>, schedule: Arc<dyn ScheduleRepository>) -> Self {
        Self { courts, schedule }
    }

    /// Book a court. Fails with a conflict when any live occupant overlaps.
    #[instrument(skip_all, fields(court_id = %request.court_id, date = %request.date), err)]
    pub async fn create(&self, request: NewReservation) -> DomainResult<Reservation> {
        if request.player_name.trim().is_empty() {
            return Err(DomainError::ValidationFailed("playerName is required".to_string()));
        }
        let court = self
            .courts
            .get_court(request.club_id, request.court_id)
            .await?
            .ok_or(DomainError::CourtNotFound(request.court_id))?;
        if !court.active {
            return Err(DomainError::ValidationFailed(format!(
                "court {} is not active",
                court.name
            )));
        }

        let reservation = Reservation::new(
            request.club_id,
            request.court_id,
            request.date,
            request.time,
            request.player_name.trim(),
        );
        match self.schedule.claim_reservation_slot(&reservation).await? {
            SlotClaim::Claimed => {
                info!(reservation_id = %reservation.id, "Reservation created");
                Ok(reservation)
            }
            SlotClaim::Taken(_) => Err(DomainError::SlotConflict {
                court_id: request.court_id,
                date: request.date,
                time: request.time,
            }),
        }
    }

    pub async fn get(&self, club_id: Uuid, id: Uuid) -> DomainResult<Reservation> {
        self.schedule
            .get_reservation(id)
            .await?
            .filter(|r| r.club_id == club_id)
            .ok_or(DomainError::ReservationNotFound(id))
    }

    #[instrument(skip(self), err)]
    pub async fn cancel(&self, club_id: Uuid, id: Uuid) -> DomainResult<Reservation> {
        let reservation = self.get(club_id, id).await?;
        match reservation.status {
            ReservationStatus::Cancelled => Ok(reservation),
            ReservationStatus::Completed => Err(DomainError::ValidationFailed(
                "completed reservations cannot be cancelled".to_string(),
            )),
            ReservationStatus::Pending | ReservationStatus::Confirmed => {
                self.schedule
                    .update_reservation_status(id, ReservationStatus::Cancelled)
                    .await?;
                info!(reservation_id = %id, "Reservation cancelled");
                Ok(reservation.with_status(ReservationStatus::Cancelled))
            }
        }
    }
}
