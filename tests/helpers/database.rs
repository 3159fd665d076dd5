#![allow(dead_code)]

use std::path::Path;

use padel_scheduler::adapters::sqlite::{
    create_migrated_test_pool, initialize_database, sqlite_repositories, PoolConfig,
};
use padel_scheduler::domain::models::{
    ClubSettings, Court, Instructor, InstructorPayModel, Money,
};
use padel_scheduler::domain::ports::Repositories;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Create an in-memory SQLite database for testing
///
/// Each call creates an isolated database with migrations applied.
pub async fn setup_test_db() -> SqlitePool {
    create_migrated_test_pool()
        .await
        .expect("failed to create test database")
}

/// Create a file-backed database under `dir`.
///
/// Unlike the in-memory pool this one has several connections, so writers
/// genuinely contend for the database lock.
pub async fn setup_file_db(dir: &Path, max_connections: u32) -> SqlitePool {
    let url = format!("sqlite:{}", dir.join("padel-test.db").display());
    let config = PoolConfig {
        max_connections,
        ..PoolConfig::default()
    };
    initialize_database(&url, Some(config))
        .await
        .expect("failed to create file database")
}

/// Closes the connection pool.
pub async fn teardown_test_db(pool: SqlitePool) {
    pool.close().await;
}

/// IDs of a seeded club with one court and one hourly instructor.
#[derive(Debug, Clone, Copy)]
pub struct SeededClub {
    pub club_id: Uuid,
    pub court_id: Uuid,
    pub instructor_id: Uuid,
}

/// Seed a club priced at 300.00 per group class, 450.00 per court hour,
/// with an instructor paid 600.00 per hour.
pub async fn seed_club(repos: &Repositories) -> SeededClub {
    let club_id = Uuid::new_v4();

    let mut settings = ClubSettings::new(club_id);
    settings.default_group_price = Money::from_minor(30_000);
    settings.court_cost_per_hour = Some(Money::from_minor(45_000));
    repos.clubs.save_settings(&settings).await.expect("save settings");

    let court = Court::new(club_id, "Court 1");
    repos.courts.save_court(&court).await.expect("save court");

    let instructor = Instructor::new(
        club_id,
        "Ana",
        InstructorPayModel::hourly(Money::from_minor(60_000)),
    );
    repos
        .instructors
        .save_instructor(&instructor)
        .await
        .expect("save instructor");

    SeededClub {
        club_id,
        court_id: court.id,
        instructor_id: instructor.id,
    }
}

/// Repositories over a fresh in-memory database.
pub async fn setup_repositories() -> (SqlitePool, Repositories) {
    let pool = setup_test_db().await;
    let repos = sqlite_repositories(pool.clone());
    (pool, repos)
}
