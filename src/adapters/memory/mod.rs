//! In-memory implementation of every storage port.
//!
//! All state sits behind a single `RwLock`, so a slot claim holds the write
//! lock across its overlap check and its insert.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    ClassInstance, ClassStatus, ClubSettings, Court, Instructor, Occupant, Reservation,
    ReservationStatus,
};
use crate::domain::ports::{
    ClassFilter, ClubRepository, CourtRepository, InstructorRepository, Repositories,
    ScheduleRepository, SlotClaim,
};

#[derive(Debug, Default)]
struct State {
    settings: HashMap<Uuid, ClubSettings>,
    courts: HashMap<Uuid, Court>,
    instructors: HashMap<Uuid, Instructor>,
    classes: HashMap<Uuid, ClassInstance>,
    reservations: HashMap<Uuid, Reservation>,
}

impl State {
    fn occupants_on(&self, court_id: Uuid, date: NaiveDate) -> Vec<Occupant> {
        let reservations = self
            .reservations
            .values()
            .filter(|r| r.court_id == court_id && r.date == date)
            .map(Reservation::as_occupant);
        let classes = self
            .classes
            .values()
            .filter(|c| c.court_id == court_id && c.draft.date == date)
            .map(ClassInstance::as_occupant);

        let mut occupants: Vec<Occupant> = reservations
            .chain(classes)
            .filter(|o| !o.cancelled)
            .collect();
        occupants.sort_by_key(|o| o.time.start());
        occupants
    }

    fn blocking(&self, candidate: &Occupant) -> Vec<Occupant> {
        self.occupants_on(candidate.court_id, candidate.date)
            .into_iter()
            .filter(|o| o.blocks(candidate.date, &candidate.time))
            .collect()
    }
}

/// Process-local store, used by tests and the CLI preview paths.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every port backed by this one store.
    pub fn repositories(self: &Arc<Self>) -> Repositories {
        Repositories {
            clubs: self.clone(),
            courts: self.clone(),
            instructors: self.clone(),
            schedule: self.clone(),
        }
    }

    pub async fn insert_settings(&self, settings: ClubSettings) {
        self.state.write().await.settings.insert(settings.club_id, settings);
    }

    pub async fn insert_court(&self, court: Court) {
        self.state.write().await.courts.insert(court.id, court);
    }

    pub async fn insert_instructor(&self, instructor: Instructor) {
        self.state.write().await.instructors.insert(instructor.id, instructor);
    }

    /// Insert a reservation without any overlap check.
    pub async fn insert_reservation(&self, reservation: Reservation) {
        self.state.write().await.reservations.insert(reservation.id, reservation);
    }
}

#[async_trait]
impl ClubRepository for InMemoryStore {
    async fn get_settings(&self, club_id: Uuid) -> DomainResult<Option<ClubSettings>> {
        Ok(self.state.read().await.settings.get(&club_id).cloned())
    }

    async fn save_settings(&self, settings: &ClubSettings) -> DomainResult<()> {
        self.insert_settings(settings.clone()).await;
        Ok(())
    }
}

#[async_trait]
impl CourtRepository for InMemoryStore {
    async fn get_court(&self, club_id: Uuid, court_id: Uuid) -> DomainResult<Option<Court>> {
        let state = self.state.read().await;
        Ok(state.courts.get(&court_id).filter(|c| c.club_id == club_id).cloned())
    }

    async fn save_court(&self, court: &Court) -> DomainResult<()> {
        self.insert_court(court.clone()).await;
        Ok(())
    }

    async fn list_courts(&self, club_id: Uuid) -> DomainResult<Vec<Court>> {
        let state = self.state.read().await;
        let mut courts: Vec<Court> = state
            .courts
            .values()
            .filter(|c| c.club_id == club_id)
            .cloned()
            .collect();
        courts.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(courts)
    }
}

#[async_trait]
impl InstructorRepository for InMemoryStore {
    async fn get_instructor(&self, club_id: Uuid, instructor_id: Uuid) -> DomainResult<Option<Instructor>> {
        let state = self.state.read().await;
        Ok(state
            .instructors
            .get(&instructor_id)
            .filter(|i| i.club_id == club_id)
            .cloned())
    }

    async fn save_instructor(&self, instructor: &Instructor) -> DomainResult<()> {
        self.insert_instructor(instructor.clone()).await;
        Ok(())
    }
}

#[async_trait]
impl ScheduleRepository for InMemoryStore {
    async fn occupants_on(&self, court_id: Uuid, date: NaiveDate) -> DomainResult<Vec<Occupant>> {
        Ok(self.state.read().await.occupants_on(court_id, date))
    }

    async fn claim_class_slot(&self, class: &ClassInstance) -> DomainResult<SlotClaim> {
        let mut state = self.state.write().await;
        let taken = state.blocking(&class.as_occupant());
        if !taken.is_empty() {
            return Ok(SlotClaim::Taken(taken));
        }
        state.classes.insert(class.id, class.clone());
        Ok(SlotClaim::Claimed)
    }

    async fn claim_reservation_slot(&self, reservation: &Reservation) -> DomainResult<SlotClaim> {
        let mut state = self.state.write().await;
        let taken = state.blocking(&reservation.as_occupant());
        if !taken.is_empty() {
            return Ok(SlotClaim::Taken(taken));
        }
        state.reservations.insert(reservation.id, reservation.clone());
        Ok(SlotClaim::Claimed)
    }

    async fn get_class(&self, id: Uuid) -> DomainResult<Option<ClassInstance>> {
        Ok(self.state.read().await.classes.get(&id).cloned())
    }

    async fn list_classes(&self, filter: ClassFilter) -> DomainResult<Vec<ClassInstance>> {
        let state = self.state.read().await;
        let mut classes: Vec<ClassInstance> = state
            .classes
            .values()
            .filter(|c| filter.club_id.is_none_or(|id| c.club_id == id))
            .filter(|c| filter.court_id.is_none_or(|id| c.court_id == id))
            .filter(|c| filter.instructor_id.is_none_or(|id| c.instructor_id == id))
            .filter(|c| filter.series_id.is_none_or(|id| c.series_id == Some(id)))
            .filter(|c| filter.date.is_none_or(|d| c.draft.date == d))
            .filter(|c| filter.status.is_none_or(|s| c.status == s))
            .cloned()
            .collect();
        classes.sort_by_key(|c| (c.draft.date, c.draft.time.start()));
        Ok(classes)
    }

    async fn update_class_status(&self, id: Uuid, status: ClassStatus) -> DomainResult<()> {
        let mut state = self.state.write().await;
        let class = state.classes.get_mut(&id).ok_or(DomainError::ClassNotFound(id))?;
        class.status = status;
        Ok(())
    }

    async fn get_reservation(&self, id: Uuid) -> DomainResult<Option<Reservation>> {
        Ok(self.state.read().await.reservations.get(&id).cloned())
    }

    async fn update_reservation_status(&self, id: Uuid, status: ReservationStatus) -> DomainResult<()> {
        let mut state = self.state.write().await;
        let reservation = state
            .reservations
            .get_mut(&id)
            .ok_or(DomainError::ReservationNotFound(id))?;
        reservation.status = status;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::TimeRange;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 5).unwrap()
    }

    #[tokio::test]
    async fn test_concurrent_claims_admit_one() {
        let store = Arc::new(InMemoryStore::new());
        let court_id = Uuid::new_v4();
        let club_id = Uuid::new_v4();

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let reservation = Reservation::new(
                    club_id,
                    court_id,
                    date(),
                    TimeRange::parse("10:00", "11:30").unwrap(),
                    format!("player {i}"),
                );
                store.claim_reservation_slot(&reservation).await.unwrap()
            }));
        }

        let mut claimed = 0;
        for handle in handles {
            if handle.await.unwrap().is_claimed() {
                claimed += 1;
            }
        }
        assert_eq!(claimed, 1);
        assert_eq!(store.occupants_on(court_id, date()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_courts_are_club_scoped() {
        let store = InMemoryStore::new();
        let court = Court::new(Uuid::new_v4(), "B");
        store.save_court(&court).await.unwrap();

        assert!(store.get_court(court.club_id, court.id).await.unwrap().is_some());
        assert!(store.get_court(Uuid::new_v4(), court.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_missing_class_fails() {
        let store = InMemoryStore::new();
        let err = store
            .update_class_status(Uuid::new_v4(), ClassStatus::Cancelled)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ClassNotFound(_)));
    }
}
