//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines async trait interfaces that storage adapters must implement:
//! - ClubRepository / CourtRepository / InstructorRepository: club reference data
//! - ScheduleRepository: reservations and classes occupying court time
//!
//! The services depend only on these traits, so the same scheduling logic runs
//! against SQLite in production and the in-memory store in tests.

pub mod club_repository;
pub mod schedule_repository;

pub use club_repository::{ClubRepository, CourtRepository, InstructorRepository};
pub use schedule_repository::{ClassFilter, ScheduleRepository, SlotClaim};

use std::sync::Arc;

/// The full set of storage ports a service needs, as shared trait objects.
#[derive(Clone)]
pub struct Repositories {
    pub clubs: Arc<dyn ClubRepository>,
    pub courts: Arc<dyn CourtRepository>,
    pub instructors: Arc<dyn InstructorRepository>,
    pub schedule: Arc<dyn ScheduleRepository>,
}
