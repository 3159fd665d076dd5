//! HTTP API over the SQLite adapter.

mod helpers;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use helpers::database::{seed_club, setup_repositories, SeededClub};
use padel_scheduler::adapters::http::{ClassesHttpServer, CLUB_HEADER};
use padel_scheduler::domain::models::{SchedulingConfig, ServerConfig};
use padel_scheduler::services::{ClassScheduler, ReservationService};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    club: SeededClub,
    _pool: SqlitePool,
}

impl TestApp {
    async fn new() -> Self {
        let (pool, repos) = setup_repositories().await;
        let club = seed_club(&repos).await;

        let scheduler = ClassScheduler::new(repos.clone(), SchedulingConfig::default());
        let reservations = ReservationService::new(repos.courts.clone(), repos.schedule.clone());
        let router =
            ClassesHttpServer::new(scheduler, reservations, ServerConfig::default()).into_router();

        Self {
            router,
            club,
            _pool: pool,
        }
    }

    async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(CLUB_HEADER, self.club.club_id.to_string())
            .header("content-type", "application/json");
        let request = match body {
            Some(b) => builder.body(Body::from(b.to_string())).unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn class_body(&self) -> Value {
        json!({
            "instructorId": self.club.instructor_id.to_string(),
            "courtId": self.club.court_id.to_string(),
            "name": "Tuesday group",
            "date": "2025-04-01",
            "startTime": "19:00",
            "endTime": "20:00",
            "type": "GROUP",
            "level": "INTERMEDIATE",
            "maxStudents": 6
        })
    }
}

#[tokio::test]
async fn test_create_recurring_series_and_list() {
    let app = TestApp::new().await;

    let mut body = app.class_body();
    body["isRecurring"] = json!(true);
    body["recurrencePattern"] = json!({
        "frequency": "WEEKLY",
        "interval": 2,
        "endDate": "2025-05-13"
    });

    let (status, created) = app.send("POST", "/api/v1/classes", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["success"], true);
    assert_eq!(created["message"], "Created 4 classes");

    let classes = created["classes"].as_array().unwrap();
    let dates: Vec<&str> = classes.iter().map(|c| c["date"].as_str().unwrap()).collect();
    assert_eq!(dates, vec!["2025-04-01", "2025-04-15", "2025-04-29", "2025-05-13"]);

    let first = &classes[0];
    // Club default group price, court rate and hourly instructor, all in minor units
    assert_eq!(first["price"], 30_000);
    assert_eq!(first["courtCost"], 45_000);
    assert_eq!(first["instructorCost"], 60_000);
    assert_eq!(first["maxStudents"], 6);
    assert_eq!(first["availableSpots"], 6);
    assert_eq!(first["level"], "INTERMEDIATE");
    assert!(first["seriesId"].is_string());

    let (status, listed) = app.send("GET", "/api/v1/classes?date=2025-04-15", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["id"], classes[1]["id"]);

    let id = first["id"].as_str().unwrap();
    let (status, fetched) = app.send("GET", &format!("/api/v1/classes/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "Tuesday group");
}

#[tokio::test]
async fn test_availability_and_reservation_lifecycle() {
    let app = TestApp::new().await;
    let court = app.club.court_id;

    let availability_uri = format!(
        "/api/v1/availability?courtId={court}&date=2025-04-01&startTime=19:30&endTime=20:30"
    );
    let (status, before) = app.send("GET", &availability_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(before["available"], true);

    let (status, _) = app.send("POST", "/api/v1/classes", Some(app.class_body())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, after) = app.send("GET", &availability_uri, None).await;
    assert_eq!(after["available"], false);
    assert_eq!(after["conflicts"].as_array().unwrap().len(), 1);

    let reservation = json!({
        "courtId": court.to_string(),
        "date": "2025-04-01",
        "startTime": "20:00",
        "endTime": "21:00",
        "playerName": "Sofia"
    });
    let (status, booked) = app.send("POST", "/api/v1/reservations", Some(reservation.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(booked["status"], "CONFIRMED");

    let (status, conflict) = app.send("POST", "/api/v1/reservations", Some(reservation.clone())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(conflict["code"], "SLOT_CONFLICT");

    let id = booked["id"].as_str().unwrap();
    let (status, cancelled) = app
        .send("POST", &format!("/api/v1/reservations/{id}/cancel"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], "CANCELLED");

    let (status, _) = app.send("POST", "/api/v1/reservations", Some(reservation)).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_validation_and_not_found_responses() {
    let app = TestApp::new().await;

    let mut backwards = app.class_body();
    backwards["startTime"] = json!("20:00");
    backwards["endTime"] = json!("19:00");
    let (status, body) = app.send("POST", "/api/v1/classes", Some(backwards)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let mut no_pattern = app.class_body();
    no_pattern["isRecurring"] = json!(true);
    let (status, _) = app.send("POST", "/api/v1/classes", Some(no_pattern)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut wrong_court = app.class_body();
    wrong_court["courtId"] = json!(uuid::Uuid::new_v4().to_string());
    let (status, body) = app.send("POST", "/api/v1/classes", Some(wrong_court)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "COURT_NOT_FOUND");

    let missing = uuid::Uuid::new_v4();
    let (status, body) = app.send("GET", &format!("/api/v1/classes/{missing}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "CLASS_NOT_FOUND");
}
