//! SQLite implementation of the ScheduleRepository.
//!
//! Slot claims run in a `BEGIN IMMEDIATE` transaction, which takes SQLite's
//! write lock before the overlap query. A second claimant blocks on the lock
//! (up to the busy timeout) and then sees the first claimant's row.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    format_calendar_date, ClassInstance, ClassInstanceDraft, ClassLevel, ClassStatus, ClassType,
    Money, Occupant, OccupantKind, Reservation, ReservationStatus,
};
use crate::domain::ports::{ClassFilter, ScheduleRepository, SlotClaim};

use super::{parse_count, parse_date, parse_datetime, parse_optional_uuid, parse_time_range, parse_uuid};

const OCCUPANTS_SQL: &str = r#"
    SELECT 'reservation' AS kind, id, court_id, date, start_minute, end_minute
      FROM reservations
     WHERE court_id = ? AND date = ? AND status != 'CANCELLED'
    UNION ALL
    SELECT 'class' AS kind, id, court_id, date, start_minute, end_minute
      FROM classes
     WHERE court_id = ? AND date = ? AND status != 'CANCELLED'
    ORDER BY start_minute"#;

enum Claimant<'a> {
    Class(&'a ClassInstance),
    Reservation(&'a Reservation),
}

impl Claimant<'_> {
    fn occupant(&self) -> Occupant {
        match self {
            Self::Class(c) => c.as_occupant(),
            Self::Reservation(r) => r.as_occupant(),
        }
    }
}

#[derive(Clone)]
pub struct SqliteScheduleRepository {
    pool: SqlitePool,
}

impl SqliteScheduleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch_occupants(
        conn: &mut SqliteConnection,
        court_id: Uuid,
        date: NaiveDate,
    ) -> DomainResult<Vec<Occupant>> {
        let court = court_id.to_string();
        let day = format_calendar_date(date);
        let rows: Vec<OccupantRow> = sqlx::query_as(OCCUPANTS_SQL)
            .bind(&court)
            .bind(&day)
            .bind(&court)
            .bind(&day)
            .fetch_all(&mut *conn)
            .await?;
        rows.into_iter().map(Occupant::try_from).collect()
    }

    /// Serialized check-and-insert. The caller owns the transaction.
    async fn check_and_insert(conn: &mut SqliteConnection, claimant: &Claimant<'_>) -> DomainResult<SlotClaim> {
        let candidate = claimant.occupant();
        let taken: Vec<Occupant> = Self::fetch_occupants(conn, candidate.court_id, candidate.date)
            .await?
            .into_iter()
            .filter(|o| o.blocks(candidate.date, &candidate.time))
            .collect();
        if !taken.is_empty() {
            return Ok(SlotClaim::Taken(taken));
        }

        match claimant {
            Claimant::Class(class) => insert_class(conn, class).await?,
            Claimant::Reservation(reservation) => insert_reservation(conn, reservation).await?,
        }
        Ok(SlotClaim::Claimed)
    }

    async fn claim(&self, claimant: Claimant<'_>) -> DomainResult<SlotClaim> {
        // Dropping `tx` before commit (error or cancelled future) rolls back
        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;
        let claim = Self::check_and_insert(&mut *tx, &claimant).await?;

        match claim {
            SlotClaim::Claimed => tx.commit().await?,
            SlotClaim::Taken(_) => tx.rollback().await?,
        }
        Ok(claim)
    }
}

async fn insert_class(conn: &mut SqliteConnection, class: &ClassInstance) -> DomainResult<()> {
    let draft = &class.draft;
    sqlx::query(
        r#"INSERT INTO classes (id, club_id, series_id, instructor_id, court_id, name, class_type,
           level, max_students, current_students, notes, status, date, start_minute, end_minute,
           duration_minutes, price, court_cost, instructor_cost, created_at)
           VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#
    )
    .bind(class.id.to_string())
    .bind(class.club_id.to_string())
    .bind(class.series_id.map(|id| id.to_string()))
    .bind(class.instructor_id.to_string())
    .bind(class.court_id.to_string())
    .bind(&class.name)
    .bind(class.class_type.as_str())
    .bind(class.level.as_str())
    .bind(i64::from(class.max_students))
    .bind(i64::from(class.current_students))
    .bind(&class.notes)
    .bind(class.status.as_str())
    .bind(format_calendar_date(draft.date))
    .bind(i64::from(draft.time.start().minutes()))
    .bind(i64::from(draft.time.end().minutes()))
    .bind(i64::from(draft.duration_minutes))
    .bind(draft.price.minor())
    .bind(draft.court_cost.minor())
    .bind(draft.instructor_cost.minor())
    .bind(class.created_at.to_rfc3339())
    .execute(&mut *conn)
    .await?;
    Ok(())
}

async fn insert_reservation(conn: &mut SqliteConnection, reservation: &Reservation) -> DomainResult<()> {
    sqlx::query(
        r#"INSERT INTO reservations (id, club_id, court_id, date, start_minute, end_minute,
           player_name, status, created_at)
           VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"#
    )
    .bind(reservation.id.to_string())
    .bind(reservation.club_id.to_string())
    .bind(reservation.court_id.to_string())
    .bind(format_calendar_date(reservation.date))
    .bind(i64::from(reservation.time.start().minutes()))
    .bind(i64::from(reservation.time.end().minutes()))
    .bind(&reservation.player_name)
    .bind(reservation.status.as_str())
    .bind(reservation.created_at.to_rfc3339())
    .execute(&mut *conn)
    .await?;
    Ok(())
}

#[async_trait]
impl ScheduleRepository for SqliteScheduleRepository {
    async fn occupants_on(&self, court_id: Uuid, date: NaiveDate) -> DomainResult<Vec<Occupant>> {
        let mut conn = self.pool.acquire().await?;
        Self::fetch_occupants(&mut conn, court_id, date).await
    }

    async fn claim_class_slot(&self, class: &ClassInstance) -> DomainResult<SlotClaim> {
        self.claim(Claimant::Class(class)).await
    }

    async fn claim_reservation_slot(&self, reservation: &Reservation) -> DomainResult<SlotClaim> {
        self.claim(Claimant::Reservation(reservation)).await
    }

    async fn get_class(&self, id: Uuid) -> DomainResult<Option<ClassInstance>> {
        let row: Option<ClassRow> = sqlx::query_as("SELECT * FROM classes WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.map(ClassInstance::try_from).transpose()
    }

    async fn list_classes(&self, filter: ClassFilter) -> DomainResult<Vec<ClassInstance>> {
        let mut query = String::from("SELECT * FROM classes WHERE 1=1");
        let mut bindings: Vec<String> = Vec::new();

        if let Some(club_id) = filter.club_id {
            query.push_str(" AND club_id = ?");
            bindings.push(club_id.to_string());
        }
        if let Some(court_id) = filter.court_id {
            query.push_str(" AND court_id = ?");
            bindings.push(court_id.to_string());
        }
        if let Some(instructor_id) = filter.instructor_id {
            query.push_str(" AND instructor_id = ?");
            bindings.push(instructor_id.to_string());
        }
        if let Some(series_id) = filter.series_id {
            query.push_str(" AND series_id = ?");
            bindings.push(series_id.to_string());
        }
        if let Some(date) = filter.date {
            query.push_str(" AND date = ?");
            bindings.push(format_calendar_date(date));
        }
        if let Some(status) = filter.status {
            query.push_str(" AND status = ?");
            bindings.push(status.as_str().to_string());
        }

        query.push_str(" ORDER BY date, start_minute");

        let mut q = sqlx::query_as::<_, ClassRow>(&query);
        for binding in &bindings {
            q = q.bind(binding);
        }

        let rows: Vec<ClassRow> = q.fetch_all(&self.pool).await?;
        rows.into_iter().map(ClassInstance::try_from).collect()
    }

    async fn update_class_status(&self, id: Uuid, status: ClassStatus) -> DomainResult<()> {
        let result = sqlx::query("UPDATE classes SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DomainError::ClassNotFound(id));
        }
        Ok(())
    }

    async fn get_reservation(&self, id: Uuid) -> DomainResult<Option<Reservation>> {
        let row: Option<ReservationRow> = sqlx::query_as("SELECT * FROM reservations WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.map(Reservation::try_from).transpose()
    }

    async fn update_reservation_status(&self, id: Uuid, status: ReservationStatus) -> DomainResult<()> {
        let result = sqlx::query("UPDATE reservations SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DomainError::ReservationNotFound(id));
        }
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct OccupantRow {
    kind: String,
    id: String,
    court_id: String,
    date: String,
    start_minute: i64,
    end_minute: i64,
}

impl TryFrom<OccupantRow> for Occupant {
    type Error = DomainError;

    fn try_from(row: OccupantRow) -> Result<Self, Self::Error> {
        let kind = match row.kind.as_str() {
            "reservation" => OccupantKind::Reservation,
            "class" => OccupantKind::Class,
            other => return Err(DomainError::SerializationError(format!("Invalid occupant kind: {other}"))),
        };
        Ok(Self {
            kind,
            id: parse_uuid(&row.id)?,
            court_id: parse_uuid(&row.court_id)?,
            date: parse_date(&row.date)?,
            time: parse_time_range(row.start_minute, row.end_minute)?,
            // the query already excludes cancelled rows
            cancelled: false,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ClassRow {
    id: String,
    club_id: String,
    series_id: Option<String>,
    instructor_id: String,
    court_id: String,
    name: String,
    class_type: String,
    level: String,
    max_students: i64,
    current_students: i64,
    notes: Option<String>,
    status: String,
    date: String,
    start_minute: i64,
    end_minute: i64,
    duration_minutes: i64,
    price: i64,
    court_cost: i64,
    instructor_cost: i64,
    created_at: String,
}

impl TryFrom<ClassRow> for ClassInstance {
    type Error = DomainError;

    fn try_from(row: ClassRow) -> Result<Self, Self::Error> {
        let class_type = ClassType::from_str(&row.class_type)
            .ok_or_else(|| DomainError::SerializationError(format!("Invalid class type: {}", row.class_type)))?;
        let level = ClassLevel::from_str(&row.level)
            .ok_or_else(|| DomainError::SerializationError(format!("Invalid level: {}", row.level)))?;
        let status = ClassStatus::from_str(&row.status)
            .ok_or_else(|| DomainError::SerializationError(format!("Invalid status: {}", row.status)))?;

        Ok(Self {
            id: parse_uuid(&row.id)?,
            club_id: parse_uuid(&row.club_id)?,
            series_id: parse_optional_uuid(row.series_id)?,
            instructor_id: parse_uuid(&row.instructor_id)?,
            court_id: parse_uuid(&row.court_id)?,
            name: row.name,
            class_type,
            level,
            max_students: parse_count(row.max_students, "max_students")?,
            current_students: parse_count(row.current_students, "current_students")?,
            notes: row.notes,
            status,
            draft: ClassInstanceDraft {
                date: parse_date(&row.date)?,
                time: parse_time_range(row.start_minute, row.end_minute)?,
                duration_minutes: parse_count(row.duration_minutes, "duration_minutes")?,
                price: Money::from_minor(row.price),
                court_cost: Money::from_minor(row.court_cost),
                instructor_cost: Money::from_minor(row.instructor_cost),
            },
            created_at: parse_datetime(&row.created_at)?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ReservationRow {
    id: String,
    club_id: String,
    court_id: String,
    date: String,
    start_minute: i64,
    end_minute: i64,
    player_name: String,
    status: String,
    created_at: String,
}

impl TryFrom<ReservationRow> for Reservation {
    type Error = DomainError;

    fn try_from(row: ReservationRow) -> Result<Self, Self::Error> {
        let status = ReservationStatus::from_str(&row.status)
            .ok_or_else(|| DomainError::SerializationError(format!("Invalid status: {}", row.status)))?;

        Ok(Self {
            id: parse_uuid(&row.id)?,
            club_id: parse_uuid(&row.club_id)?,
            court_id: parse_uuid(&row.court_id)?,
            date: parse_date(&row.date)?,
            time: parse_time_range(row.start_minute, row.end_minute)?,
            player_name: row.player_name,
            status,
            created_at: parse_datetime(&row.created_at)?,
        })
    }
}
