//! Court availability checks.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::instrument;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Occupant, TimeRange};
use crate::domain::ports::ScheduleRepository;

/// Occupants that block `time` on `date`, in the order given.
pub fn find_conflicts<'a>(
    occupants: &'a [Occupant],
    date: NaiveDate,
    time: &TimeRange,
) -> Vec<&'a Occupant> {
    occupants.iter().filter(|o| o.blocks(date, time)).collect()
}

/// Answers whether a court is free for a time range on a date.
///
/// This is a read-only fast path. The authoritative check happens again at
/// write time inside [`ScheduleRepository::claim_class_slot`].
#[derive(Clone)]
pub struct AvailabilityChecker {
    schedule: Arc<dyn ScheduleRepository>,
}

impl AvailabilityChecker {
    pub fn new(schedule: Arc<dyn ScheduleRepository>) -> Self {
        Self { schedule }
    }

    /// Existing reservations and classes that overlap the requested slot.
    #[instrument(skip_all, fields(court_id = %court_id, date = %date, time = %time), err)]
    pub async fn conflicts(
        &self,
        date: NaiveDate,
        court_id: Uuid,
        time: &TimeRange,
    ) -> DomainResult<Vec<Occupant>> {
        let occupants = self.schedule.occupants_on(court_id, date).await?;
        Ok(find_conflicts(&occupants, date, time)
            .into_iter()
            .cloned()
            .collect())
    }

    pub async fn is_available(
        &self,
        date: NaiveDate,
        court_id: Uuid,
        time: &TimeRange,
    ) -> DomainResult<bool> {
        Ok(self.conflicts(date, court_id, time).await?.is_empty())
    }
}
