//! SQLite database adapters for the scheduling engine.

pub mod club_repository;
pub mod connection;
pub mod migrations;
pub mod schedule_repository;

pub use club_repository::SqliteClubRepository;
pub use connection::{create_pool, create_test_pool, verify_connection, ConnectionError, PoolConfig};
pub use migrations::{all_embedded_migrations, Migration, MigrationError, Migrator};
pub use schedule_repository::SqliteScheduleRepository;

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{parse_calendar_date, Money, TimeOfDay, TimeRange};
use crate::domain::ports::Repositories;

/// Parse a UUID string from a SQLite row field.
pub fn parse_uuid(s: &str) -> DomainResult<Uuid> {
    Uuid::parse_str(s).map_err(|e| DomainError::SerializationError(e.to_string()))
}

/// Parse an optional UUID string from a SQLite row field.
pub fn parse_optional_uuid(s: Option<String>) -> DomainResult<Option<Uuid>> {
    s.map(|s| Uuid::parse_str(&s))
        .transpose()
        .map_err(|e| DomainError::SerializationError(e.to_string()))
}

/// Parse an RFC3339 datetime string from a SQLite row field.
pub fn parse_datetime(s: &str) -> DomainResult<DateTime<Utc>> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map_err(|e| DomainError::SerializationError(e.to_string()))
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse a stored `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> DomainResult<NaiveDate> {
    parse_calendar_date(s).map_err(|e| DomainError::SerializationError(e.to_string()))
}

/// Rebuild a time range from stored minute offsets.
pub fn parse_time_range(start_minute: i64, end_minute: i64) -> DomainResult<TimeRange> {
    let minute = |m: i64| {
        u16::try_from(m)
            .map_err(|_| DomainError::SerializationError(format!("invalid minute offset: {m}")))
            .and_then(TimeOfDay::from_minutes)
    };
    TimeRange::new(minute(start_minute)?, minute(end_minute)?)
        .map_err(|e| DomainError::SerializationError(e.to_string()))
}

/// Convert a stored count column, rejecting negatives.
pub fn parse_count(value: i64, column: &str) -> DomainResult<u32> {
    u32::try_from(value)
        .map_err(|_| DomainError::SerializationError(format!("invalid {column}: {value}")))
}

pub fn parse_optional_money(value: Option<i64>) -> Option<Money> {
    value.map(Money::from_minor)
}

#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),
    #[error("Migration error: {0}")]
    Migration(#[from] MigrationError),
    #[error("Query error: {0}")]
    Query(#[from] sqlx::Error),
}

pub async fn initialize_database(database_url: &str, config: Option<PoolConfig>) -> Result<SqlitePool, DatabaseError> {
    let pool = create_pool(database_url, config).await?;
    let migrator = Migrator::new(pool.clone());
    migrator.run_embedded_migrations(all_embedded_migrations()).await?;
    Ok(pool)
}

/// Create an in-memory test pool with all migrations applied.
pub async fn create_migrated_test_pool() -> Result<SqlitePool, DatabaseError> {
    let pool = create_test_pool().await?;
    let migrator = Migrator::new(pool.clone());
    migrator.run_embedded_migrations(all_embedded_migrations()).await?;
    Ok(pool)
}

/// Every port backed by one SQLite pool.
pub fn sqlite_repositories(pool: SqlitePool) -> Repositories {
    let clubs = Arc::new(SqliteClubRepository::new(pool.clone()));
    Repositories {
        clubs: clubs.clone(),
        courts: clubs.clone(),
        instructors: clubs,
        schedule: Arc::new(SqliteScheduleRepository::new(pool)),
    }
}
