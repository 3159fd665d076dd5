//! Padel Scheduler - class scheduling engine for padel clubs
//!
//! Creates single and recurring classes on club courts. Every occurrence is
//! checked against the court's existing reservations and classes, costed from
//! the club's pricing and the instructor's pay model, and persisted only when
//! the slot is free.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Models, errors and storage ports
//! - **Service Layer** (`services`): Availability, costing and series materialization
//! - **Adapters** (`adapters`): SQLite and in-memory storage, HTTP API
//! - **Infrastructure Layer** (`infrastructure`): Configuration and logging
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use padel_scheduler::adapters::sqlite::{create_migrated_test_pool, sqlite_repositories};
//! use padel_scheduler::services::{ClassScheduler, NewClassRequest};
//!
//! let repos = sqlite_repositories(create_migrated_test_pool().await?);
//! let scheduler = ClassScheduler::new(repos, SchedulingConfig::default());
//! let result = scheduler.materialize(request).await?;
//! println!("{}", result.message);
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    ClassInstance, ClassStatus, ClassType, ClubSettings, Config, Court, Frequency, Instructor,
    InstructorPayModel, Money, RecurrencePattern, Reservation, SchedulingConfig, TimeRange,
};
pub use domain::ports::{Repositories, ScheduleRepository, SlotClaim};
pub use domain::{DomainError, DomainResult};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{ClassScheduler, MaterializationResult, NewClassRequest, ReservationService};
