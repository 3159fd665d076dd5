//! Repository ports for club reference data: settings, courts and instructors.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::{ClubSettings, Court, Instructor};

#[async_trait]
pub trait ClubRepository: Send + Sync {
    /// Pricing settings for a club, if the club has configured any.
    async fn get_settings(&self, club_id: Uuid) -> DomainResult<Option<ClubSettings>>;

    /// Insert or replace a club's settings.
    async fn save_settings(&self, settings: &ClubSettings) -> DomainResult<()>;
}

#[async_trait]
pub trait CourtRepository: Send + Sync {
    /// Get a court by ID, scoped to the owning club.
    async fn get_court(&self, club_id: Uuid, court_id: Uuid) -> DomainResult<Option<Court>>;

    /// Insert or replace a court.
    async fn save_court(&self, court: &Court) -> DomainResult<()>;

    /// List a club's courts ordered by name.
    async fn list_courts(&self, club_id: Uuid) -> DomainResult<Vec<Court>>;
}

#[async_trait]
pub trait InstructorRepository: Send + Sync {
    /// Get an instructor by ID, scoped to the owning club.
    async fn get_instructor(&self, club_id: Uuid, instructor_id: Uuid) -> DomainResult<Option<Instructor>>;

    /// Insert or replace an instructor.
    async fn save_instructor(&self, instructor: &Instructor) -> DomainResult<()>;
}
