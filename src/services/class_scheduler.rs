//! Class creation: expands a request into dates, checks each date against the
//! court's schedule and persists every free occurrence.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    format_calendar_date, ClassInstance, ClassLevel, ClassStatus, ClassType, Court, Instructor,
    Money, RecurrencePattern, SchedulingConfig, TimeRange,
};
use crate::domain::ports::{ClassFilter, Repositories, SlotClaim};
use crate::services::availability::AvailabilityChecker;
use crate::services::cost_calculator::{ClassCosts, CostCalculator};

/// A validated request to create one class or a recurring series.
#[derive(Debug, Clone)]
pub struct NewClassRequest {
    pub club_id: Uuid,
    pub instructor_id: Uuid,
    pub court_id: Uuid,
    pub name: String,
    pub date: NaiveDate,
    pub time: TimeRange,
    pub price: Option<Money>,
    pub class_type: ClassType,
    pub level: ClassLevel,
    pub max_students: Option<u32>,
    pub notes: Option<String>,
    /// `None` creates a single class on `date`.
    pub recurrence: Option<RecurrencePattern>,
}

impl NewClassRequest {
    pub fn new(
        club_id: Uuid,
        instructor_id: Uuid,
        court_id: Uuid,
        name: impl Into<String>,
        date: NaiveDate,
        time: TimeRange,
    ) -> Self {
        Self {
            club_id,
            instructor_id,
            court_id,
            name: name.into(),
            date,
            time,
            price: None,
            class_type: ClassType::default(),
            level: ClassLevel::default(),
            max_students: None,
            notes: None,
            recurrence: None,
        }
    }

    pub fn with_recurrence(mut self, pattern: RecurrencePattern) -> Self {
        self.recurrence = Some(pattern);
        self
    }

    pub fn with_price(mut self, price: Money) -> Self {
        self.price = Some(price);
        self
    }

    pub fn is_recurring(&self) -> bool {
        self.recurrence.is_some()
    }
}

/// Outcome of a materialization. Skipped dates are not an error.
#[derive(Debug, Clone, Serialize)]
pub struct MaterializationResult {
    pub created: Vec<ClassInstance>,
    pub unavailable_dates: Vec<NaiveDate>,
    pub message: String,
}

impl MaterializationResult {
    fn summarize(created: Vec<ClassInstance>, unavailable_dates: Vec<NaiveDate>) -> Self {
        let mut message = match created.len() {
            1 => "Created 1 class".to_string(),
            n => format!("Created {n} classes"),
        };
        if !unavailable_dates.is_empty() {
            let skipped: Vec<String> = unavailable_dates
                .iter()
                .map(|d| format_calendar_date(*d))
                .collect();
            message.push_str(&format!(
                "; court unavailable on {}",
                skipped.join(", ")
            ));
        }
        Self {
            created,
            unavailable_dates,
            message,
        }
    }
}

/// Creates class instances and manages their lifecycle.
#[derive(Clone)]
pub struct ClassScheduler {
    repos: Repositories,
    availability: AvailabilityChecker,
    costs: CostCalculator,
    config: SchedulingConfig,
}

/// Validate `pattern` and expand it from `start`, applying the configured
/// default count and rejecting series longer than `max_series_length`.
pub fn expand_series(
    pattern: &RecurrencePattern,
    start: NaiveDate,
    config: &SchedulingConfig,
) -> DomainResult<Vec<NaiveDate>> {
    pattern.validate()?;

    let cap = config.max_series_length as usize;
    let dates: Vec<NaiveDate> = pattern
        .expand_with_default(start, config.default_occurrences)
        .take(cap + 1)
        .collect();
    if dates.len() > cap {
        return Err(DomainError::ValidationFailed(format!(
            "recurrence expands to more than {cap} classes"
        )));
    }
    Ok(dates)
}

impl ClassScheduler {
    pub fn new(repos: Repositories, config: SchedulingConfig) -> Self {
        Self {
            availability: AvailabilityChecker::new(Arc::clone(&repos.schedule)),
            costs: CostCalculator::new(config.fallback_court_cost_per_hour),
            repos,
            config,
        }
    }

    pub fn availability(&self) -> &AvailabilityChecker {
        &self.availability
    }

    /// Create one class, or every free occurrence of a recurring series.
    ///
    /// Invalid requests fail before anything is written. Occurrences are
    /// persisted one at a time in date order, so a storage error part way
    /// through leaves the earlier occurrences in place.
    #[instrument(skip_all, fields(club_id = %request.club_id, court_id = %request.court_id, recurring = request.is_recurring()), err)]
    pub async fn materialize(&self, request: NewClassRequest) -> DomainResult<MaterializationResult> {
        let dates = self.plan_dates(&request)?;
        let (court, instructor) = self.resolve_references(&request).await?;

        let settings = self.repos.clubs.get_settings(request.club_id).await?;
        let costs = self.costs.compute(
            &request.time,
            settings.as_ref(),
            request.class_type,
            &instructor.pay_model,
            request.price,
        );
        debug!(
            duration = costs.duration_minutes,
            price = %costs.price,
            court_cost = %costs.court_cost,
            instructor_cost = %costs.instructor_cost,
            "Computed class costs"
        );

        let series_id = request.is_recurring().then(Uuid::new_v4);
        let mut created = Vec::new();
        let mut unavailable_dates = Vec::new();

        for date in dates {
            if !self.availability.is_available(date, court.id, &request.time).await? {
                if !request.is_recurring() {
                    return Err(slot_conflict(&request, date));
                }
                debug!(%date, "Court unavailable, skipping date");
                unavailable_dates.push(date);
                continue;
            }

            let instance = self.build_instance(&request, series_id, &costs, date);
            match self.repos.schedule.claim_class_slot(&instance).await? {
                SlotClaim::Claimed => {
                    debug!(%date, class_id = %instance.id, "Class created");
                    created.push(instance);
                }
                SlotClaim::Taken(occupants) => {
                    if !request.is_recurring() {
                        return Err(slot_conflict(&request, date));
                    }
                    warn!(%date, holders = occupants.len(), "Slot taken between check and write");
                    unavailable_dates.push(date);
                }
            }
        }

        let result = MaterializationResult::summarize(created, unavailable_dates);
        info!(
            created = result.created.len(),
            unavailable = result.unavailable_dates.len(),
            series_id = ?series_id,
            "Class materialization finished"
        );
        Ok(result)
    }

    /// Classes for a club, ordered by date then start time.
    pub async fn list_classes(&self, filter: ClassFilter) -> DomainResult<Vec<ClassInstance>> {
        self.repos.schedule.list_classes(filter).await
    }

    pub async fn get_class(&self, club_id: Uuid, class_id: Uuid) -> DomainResult<ClassInstance> {
        self.repos
            .schedule
            .get_class(class_id)
            .await?
            .filter(|c| c.club_id == club_id)
            .ok_or(DomainError::ClassNotFound(class_id))
    }

    /// Cancel a class, freeing its court time.
    #[instrument(skip(self), err)]
    pub async fn cancel_class(&self, club_id: Uuid, class_id: Uuid) -> DomainResult<ClassInstance> {
        let mut class = self.get_class(club_id, class_id).await?;
        if class.status == ClassStatus::Completed {
            return Err(DomainError::ValidationFailed(
                "completed classes cannot be cancelled".to_string(),
            ));
        }
        if class.status != ClassStatus::Cancelled {
            self.repos
                .schedule
                .update_class_status(class_id, ClassStatus::Cancelled)
                .await?;
            class.status = ClassStatus::Cancelled;
            info!(%class_id, "Class cancelled");
        }
        Ok(class)
    }

    /// Validate the request shape and produce the candidate dates.
    fn plan_dates(&self, request: &NewClassRequest) -> DomainResult<Vec<NaiveDate>> {
        if request.name.trim().is_empty() {
            return Err(DomainError::ValidationFailed("class name is required".to_string()));
        }
        if request.max_students == Some(0) {
            return Err(DomainError::ValidationFailed(
                "maxStudents must be at least 1".to_string(),
            ));
        }

        let Some(pattern) = &request.recurrence else {
            return Ok(vec![request.date]);
        };
        expand_series(pattern, request.date, &self.config)
    }

    async fn resolve_references(&self, request: &NewClassRequest) -> DomainResult<(Court, Instructor)> {
        let court = self
            .repos
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

        let instructor = self
            .repos
            .instructors
            .get_instructor(request.club_id, request.instructor_id)
            .await?
            .ok_or(DomainError::InstructorNotFound(request.instructor_id))?;
        if !instructor.active {
            return Err(DomainError::ValidationFailed(format!(
                "instructor {} is not active",
                instructor.name
            )));
        }

        Ok((court, instructor))
    }

    fn build_instance(
        &self,
        request: &NewClassRequest,
        series_id: Option<Uuid>,
        costs: &ClassCosts,
        date: NaiveDate,
    ) -> ClassInstance {
        ClassInstance {
            id: Uuid::new_v4(),
            club_id: request.club_id,
            series_id,
            instructor_id: request.instructor_id,
            court_id: request.court_id,
            name: request.name.trim().to_string(),
            class_type: request.class_type,
            level: request.level,
            max_students: request
                .max_students
                .unwrap_or(self.config.default_max_students),
            current_students: 0,
            notes: request.notes.clone(),
            status: ClassStatus::Scheduled,
            draft: costs.draft_for(date, request.time),
            created_at: Utc::now(),
        }
    }
}

fn slot_conflict(request: &NewClassRequest, date: NaiveDate) -> DomainError {
    DomainError::SlotConflict {
        court_id: request.court_id,
        date,
        time: request.time,
    }
}
