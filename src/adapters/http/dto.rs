//! Wire types for the club scheduling API.
//!
//! Request fields the engine requires are still `Option` here so a missing
//! field is reported as a validation error rather than a body rejection.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    format_calendar_date, parse_calendar_date, ClassInstance, ClassLevel, ClassStatus, ClassType,
    Frequency, Money, Occupant, RecurrencePattern, Reservation, TimeRange,
};
use crate::domain::ports::ClassFilter;
use crate::services::{MaterializationResult, NewClassRequest, NewReservation};

fn required<T>(value: Option<T>, field: &str) -> DomainResult<T> {
    value.ok_or_else(|| DomainError::ValidationFailed(format!("{field} is required")))
}

pub(crate) fn parse_id(raw: &str, field: &str) -> DomainResult<Uuid> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| DomainError::ValidationFailed(format!("{field} must be a UUID")))
}

fn parse_optional_id(raw: Option<&str>, field: &str) -> DomainResult<Option<Uuid>> {
    raw.map(|r| parse_id(r, field)).transpose()
}

fn parse_time(start: Option<String>, end: Option<String>) -> DomainResult<TimeRange> {
    TimeRange::parse(&required(start, "startTime")?, &required(end, "endTime")?)
}

/// Price in major units, given either as a JSON number or a string.
fn parse_price(raw: Option<serde_json::Value>) -> DomainResult<Option<Money>> {
    match raw {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Number(n)) => Money::parse_major(&n.to_string()).map(Some),
        Some(serde_json::Value::String(s)) => Money::parse_major(&s).map(Some),
        Some(_) => Err(DomainError::ValidationFailed(
            "price must be a number".to_string(),
        )),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrencePatternDto {
    pub frequency: Option<String>,
    pub interval: Option<u32>,
    pub end_date: Option<String>,
    pub occurrences: Option<u32>,
}

impl TryFrom<RecurrencePatternDto> for RecurrencePattern {
    type Error = DomainError;

    fn try_from(dto: RecurrencePatternDto) -> Result<Self, Self::Error> {
        Ok(Self {
            frequency: Frequency::from_str(&required(dto.frequency, "recurrencePattern.frequency")?),
            interval: dto.interval.unwrap_or(1),
            end_date: dto.end_date.as_deref().map(parse_calendar_date).transpose()?,
            occurrences: dto.occurrences,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateClassRequest {
    pub instructor_id: Option<String>,
    pub name: Option<String>,
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub court_id: Option<String>,
    pub price: Option<serde_json::Value>,
    #[serde(rename = "type")]
    pub class_type: Option<String>,
    pub level: Option<String>,
    pub max_students: Option<u32>,
    pub notes: Option<String>,
    #[serde(default)]
    pub is_recurring: bool,
    pub recurrence_pattern: Option<RecurrencePatternDto>,
}

impl CreateClassRequest {
    pub fn into_request(self, club_id: Uuid) -> DomainResult<NewClassRequest> {
        let instructor_id = parse_id(&required(self.instructor_id, "instructorId")?, "instructorId")?;
        let court_id = parse_id(&required(self.court_id, "courtId")?, "courtId")?;
        let name = required(self.name, "name")?;
        let date = parse_calendar_date(&required(self.date, "date")?)?;
        let time = parse_time(self.start_time, self.end_time)?;

        let class_type = match self.class_type.as_deref() {
            None => ClassType::default(),
            Some(raw) => ClassType::from_str(raw)
                .ok_or_else(|| DomainError::ValidationFailed(format!("unknown class type '{raw}'")))?,
        };
        let level = match self.level.as_deref() {
            None => ClassLevel::default(),
            Some(raw) => ClassLevel::from_str(raw)
                .ok_or_else(|| DomainError::ValidationFailed(format!("unknown level '{raw}'")))?,
        };

        let recurrence = if self.is_recurring {
            let pattern = self.recurrence_pattern.ok_or_else(|| {
                DomainError::ValidationFailed(
                    "recurrencePattern is required when isRecurring is true".to_string(),
                )
            })?;
            Some(RecurrencePattern::try_from(pattern)?)
        } else {
            None
        };

        Ok(NewClassRequest {
            club_id,
            instructor_id,
            court_id,
            name,
            date,
            time,
            price: parse_price(self.price)?,
            class_type,
            level,
            max_students: self.max_students,
            notes: self.notes.filter(|n| !n.trim().is_empty()),
            recurrence,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassQueryParams {
    pub date: Option<String>,
    pub court_id: Option<String>,
    pub instructor_id: Option<String>,
    pub series_id: Option<String>,
    pub status: Option<String>,
}

impl ClassQueryParams {
    pub fn into_filter(self, club_id: Uuid) -> DomainResult<ClassFilter> {
        let status = match self.status.as_deref() {
            None => None,
            Some(raw) => Some(
                ClassStatus::from_str(raw)
                    .ok_or_else(|| DomainError::ValidationFailed(format!("unknown status '{raw}'")))?,
            ),
        };
        Ok(ClassFilter {
            club_id: Some(club_id),
            court_id: parse_optional_id(self.court_id.as_deref(), "courtId")?,
            instructor_id: parse_optional_id(self.instructor_id.as_deref(), "instructorId")?,
            series_id: parse_optional_id(self.series_id.as_deref(), "seriesId")?,
            date: self.date.as_deref().map(parse_calendar_date).transpose()?,
            status,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityParams {
    pub court_id: Option<String>,
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

impl AvailabilityParams {
    pub fn parse(self) -> DomainResult<(Uuid, chrono::NaiveDate, TimeRange)> {
        let court_id = parse_id(&required(self.court_id, "courtId")?, "courtId")?;
        let date = parse_calendar_date(&required(self.date, "date")?)?;
        Ok((court_id, date, parse_time(self.start_time, self.end_time)?))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    pub court_id: Option<String>,
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub player_name: Option<String>,
}

impl CreateReservationRequest {
    pub fn into_request(self, club_id: Uuid) -> DomainResult<NewReservation> {
        Ok(NewReservation {
            club_id,
            court_id: parse_id(&required(self.court_id, "courtId")?, "courtId")?,
            date: parse_calendar_date(&required(self.date, "date")?)?,
            time: parse_time(self.start_time, self.end_time)?,
            player_name: required(self.player_name, "playerName")?,
        })
    }
}

/// A class as returned by the API. Money fields are minor units.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassResponse {
    pub id: Uuid,
    pub series_id: Option<Uuid>,
    pub instructor_id: Uuid,
    pub court_id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub class_type: String,
    pub level: String,
    pub status: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub duration_minutes: u32,
    pub price: i64,
    pub court_cost: i64,
    pub instructor_cost: i64,
    pub max_students: u32,
    pub enrolled_students: u32,
    pub available_spots: u32,
    pub revenue: i64,
    pub notes: Option<String>,
}

impl From<ClassInstance> for ClassResponse {
    fn from(c: ClassInstance) -> Self {
        Self {
            available_spots: c.available_spots(),
            revenue: c.revenue().minor(),
            id: c.id,
            series_id: c.series_id,
            instructor_id: c.instructor_id,
            court_id: c.court_id,
            class_type: c.class_type.as_str().to_string(),
            level: c.level.as_str().to_string(),
            status: c.status.as_str().to_string(),
            date: format_calendar_date(c.draft.date),
            start_time: c.draft.time.start().to_string(),
            end_time: c.draft.time.end().to_string(),
            duration_minutes: c.draft.duration_minutes,
            price: c.draft.price.minor(),
            court_cost: c.draft.court_cost.minor(),
            instructor_cost: c.draft.instructor_cost.minor(),
            max_students: c.max_students,
            enrolled_students: c.current_students,
            notes: c.notes,
            name: c.name,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterializeResponse {
    pub success: bool,
    pub message: String,
    pub classes: Vec<ClassResponse>,
    pub unavailable_dates: Vec<String>,
}

impl From<MaterializationResult> for MaterializeResponse {
    fn from(result: MaterializationResult) -> Self {
        Self {
            success: true,
            message: result.message,
            classes: result.created.into_iter().map(ClassResponse::from).collect(),
            unavailable_dates: result
                .unavailable_dates
                .into_iter()
                .map(format_calendar_date)
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictResponse {
    pub kind: String,
    pub id: Uuid,
    pub start_time: String,
    pub end_time: String,
}

impl From<Occupant> for ConflictResponse {
    fn from(o: Occupant) -> Self {
        Self {
            kind: o.kind.as_str().to_string(),
            id: o.id,
            start_time: o.time.start().to_string(),
            end_time: o.time.end().to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub available: bool,
    pub conflicts: Vec<ConflictResponse>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResponse {
    pub id: Uuid,
    pub court_id: Uuid,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub player_name: String,
    pub status: String,
}

impl From<Reservation> for ReservationResponse {
    fn from(r: Reservation) -> Self {
        Self {
            id: r.id,
            court_id: r.court_id,
            date: format_calendar_date(r.date),
            start_time: r.time.start().to_string(),
            end_time: r.time.end().to_string(),
            player_name: r.player_name,
            status: r.status.as_str().to_string(),
        }
    }
}

/// Error body for every failed request.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub code: String,
}
