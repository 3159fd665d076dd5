//! SQLite implementation of the club reference-data repositories.

use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{ClubSettings, Court, Instructor, InstructorPayModel, Money, PaymentType};
use crate::domain::ports::{ClubRepository, CourtRepository, InstructorRepository};

use super::{parse_count, parse_optional_money, parse_uuid};

/// Club settings, courts and instructors share one pool-backed repository.
#[derive(Clone)]
pub struct SqliteClubRepository {
    pool: SqlitePool,
}

impl SqliteClubRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClubRepository for SqliteClubRepository {
    async fn get_settings(&self, club_id: Uuid) -> DomainResult<Option<ClubSettings>> {
        let row: Option<SettingsRow> = sqlx::query_as("SELECT * FROM club_settings WHERE club_id = ?")
            .bind(club_id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.map(ClubSettings::try_from).transpose()
    }

    async fn save_settings(&self, settings: &ClubSettings) -> DomainResult<()> {
        sqlx::query(
            r#"INSERT INTO club_settings (club_id, default_group_price, default_private_price,
               default_semi_private_price, court_cost_per_hour)
               VALUES (?, ?, ?, ?, ?)
               ON CONFLICT(club_id) DO UPDATE SET
                   default_group_price = excluded.default_group_price,
                   default_private_price = excluded.default_private_price,
                   default_semi_private_price = excluded.default_semi_private_price,
                   court_cost_per_hour = excluded.court_cost_per_hour"#
        )
        .bind(settings.club_id.to_string())
        .bind(settings.default_group_price.minor())
        .bind(settings.default_private_price.minor())
        .bind(settings.default_semi_private_price.minor())
        .bind(settings.court_cost_per_hour.map(Money::minor))
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl CourtRepository for SqliteClubRepository {
    async fn get_court(&self, club_id: Uuid, court_id: Uuid) -> DomainResult<Option<Court>> {
        let row: Option<CourtRow> = sqlx::query_as("SELECT * FROM courts WHERE id = ? AND club_id = ?")
            .bind(court_id.to_string())
            .bind(club_id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.map(Court::try_from).transpose()
    }

    async fn save_court(&self, court: &Court) -> DomainResult<()> {
        sqlx::query(
            r#"INSERT INTO courts (id, club_id, name, active) VALUES (?, ?, ?, ?)
               ON CONFLICT(id) DO UPDATE SET
                   club_id = excluded.club_id, name = excluded.name, active = excluded.active"#
        )
        .bind(court.id.to_string())
        .bind(court.club_id.to_string())
        .bind(&court.name)
        .bind(court.active)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_courts(&self, club_id: Uuid) -> DomainResult<Vec<Court>> {
        let rows: Vec<CourtRow> = sqlx::query_as("SELECT * FROM courts WHERE club_id = ? ORDER BY name")
            .bind(club_id.to_string())
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Court::try_from).collect()
    }
}

#[async_trait]
impl InstructorRepository for SqliteClubRepository {
    async fn get_instructor(&self, club_id: Uuid, instructor_id: Uuid) -> DomainResult<Option<Instructor>> {
        let row: Option<InstructorRow> = sqlx::query_as("SELECT * FROM instructors WHERE id = ? AND club_id = ?")
            .bind(instructor_id.to_string())
            .bind(club_id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.map(Instructor::try_from).transpose()
    }

    async fn save_instructor(&self, instructor: &Instructor) -> DomainResult<()> {
        let pay = &instructor.pay_model;
        sqlx::query(
            r#"INSERT INTO instructors (id, club_id, name, payment_type, hourly_rate,
               commission_percent, monthly_salary, active)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?)
               ON CONFLICT(id) DO UPDATE SET
                   club_id = excluded.club_id,
                   name = excluded.name,
                   payment_type = excluded.payment_type,
                   hourly_rate = excluded.hourly_rate,
                   commission_percent = excluded.commission_percent,
                   monthly_salary = excluded.monthly_salary,
                   active = excluded.active"#
        )
        .bind(instructor.id.to_string())
        .bind(instructor.club_id.to_string())
        .bind(&instructor.name)
        .bind(pay.payment_type.as_str())
        .bind(pay.hourly_rate.minor())
        .bind(i64::from(pay.commission_percent))
        .bind(pay.monthly_salary.map(Money::minor))
        .bind(instructor.active)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct SettingsRow {
    club_id: String,
    default_group_price: i64,
    default_private_price: i64,
    default_semi_private_price: i64,
    court_cost_per_hour: Option<i64>,
}

impl TryFrom<SettingsRow> for ClubSettings {
    type Error = DomainError;

    fn try_from(row: SettingsRow) -> Result<Self, Self::Error> {
        Ok(Self {
            club_id: parse_uuid(&row.club_id)?,
            default_group_price: Money::from_minor(row.default_group_price),
            default_private_price: Money::from_minor(row.default_private_price),
            default_semi_private_price: Money::from_minor(row.default_semi_private_price),
            court_cost_per_hour: parse_optional_money(row.court_cost_per_hour),
        })
    }
}

#[derive(sqlx::FromRow)]
struct CourtRow {
    id: String,
    club_id: String,
    name: String,
    active: bool,
}

impl TryFrom<CourtRow> for Court {
    type Error = DomainError;

    fn try_from(row: CourtRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&row.id)?,
            club_id: parse_uuid(&row.club_id)?,
            name: row.name,
            active: row.active,
        })
    }
}

#[derive(sqlx::FromRow)]
struct InstructorRow {
    id: String,
    club_id: String,
    name: String,
    payment_type: String,
    hourly_rate: i64,
    commission_percent: i64,
    monthly_salary: Option<i64>,
    active: bool,
}

impl TryFrom<InstructorRow> for Instructor {
    type Error = DomainError;

    fn try_from(row: InstructorRow) -> Result<Self, Self::Error> {
        let payment_type = PaymentType::from_str(&row.payment_type)
            .ok_or_else(|| DomainError::SerializationError(format!("Invalid payment type: {}", row.payment_type)))?;

        Ok(Self {
            id: parse_uuid(&row.id)?,
            club_id: parse_uuid(&row.club_id)?,
            name: row.name,
            pay_model: InstructorPayModel {
                payment_type,
                hourly_rate: Money::from_minor(row.hourly_rate),
                commission_percent: parse_count(row.commission_percent, "commission_percent")?,
                monthly_salary: parse_optional_money(row.monthly_salary),
            },
            active: row.active,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::create_migrated_test_pool;

    async fn setup_test_repo() -> SqliteClubRepository {
        let pool = create_migrated_test_pool().await.unwrap();
        SqliteClubRepository::new(pool)
    }

    #[tokio::test]
    async fn test_settings_upsert() {
        let repo = setup_test_repo().await;
        let club_id = Uuid::new_v4();
        assert!(repo.get_settings(club_id).await.unwrap().is_none());

        let mut settings = ClubSettings::new(club_id);
        settings.default_group_price = Money::from_minor(30_000);
        repo.save_settings(&settings).await.unwrap();

        settings.court_cost_per_hour = Some(Money::from_minor(28_000));
        repo.save_settings(&settings).await.unwrap();

        let loaded = repo.get_settings(club_id).await.unwrap().unwrap();
        assert_eq!(loaded, settings);
    }

    #[tokio::test]
    async fn test_court_scoped_to_club() {
        let repo = setup_test_repo().await;
        let court = Court::new(Uuid::new_v4(), "Pista 2");
        repo.save_court(&court).await.unwrap();

        assert_eq!(repo.get_court(court.club_id, court.id).await.unwrap(), Some(court.clone()));
        assert!(repo.get_court(Uuid::new_v4(), court.id).await.unwrap().is_none());
        assert_eq!(repo.list_courts(court.club_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_instructor_pay_model_persists() {
        let repo = setup_test_repo().await;
        let instructor = Instructor::new(
            Uuid::new_v4(),
            "Pablo",
            InstructorPayModel::mixed(Money::from_minor(900_000), 35),
        );
        repo.save_instructor(&instructor).await.unwrap();

        let loaded = repo
            .get_instructor(instructor.club_id, instructor.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded, instructor);
    }
}
