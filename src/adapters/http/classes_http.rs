//! Club scheduling HTTP server.
//!
//! Exposes class creation (single or recurring), listing and cancellation,
//! court availability lookups and player reservations. Every route under
//! `/api/v1` is scoped to the club named in the `X-Club-Id` header.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use uuid::Uuid;

use super::dto::{
    parse_id, AvailabilityParams, AvailabilityResponse, ClassQueryParams, ClassResponse,
    ConflictResponse, CreateClassRequest, CreateReservationRequest, ErrorResponse,
    MaterializeResponse, ReservationResponse,
};
use crate::domain::errors::{DomainError, ErrorKind};
use crate::domain::models::ServerConfig;
use crate::services::{ClassScheduler, ReservationService};

/// Header carrying the tenant for every API call.
pub const CLUB_HEADER: &str = "x-club-id";

type ApiError = (StatusCode, Json<ErrorResponse>);
type ApiResult<T> = Result<T, ApiError>;

fn api_error(err: DomainError) -> ApiError {
    let status = match err.kind() {
        ErrorKind::BadInput => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Internal => {
            error!(error = %err, "Request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (
        status,
        Json(ErrorResponse {
            success: false,
            error: err.to_string(),
            code: err.code().to_string(),
        }),
    )
}

fn club_id(headers: &HeaderMap) -> ApiResult<Uuid> {
    let raw = headers
        .get(CLUB_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| api_error(DomainError::ValidationFailed("X-Club-Id header is required".to_string())))?;
    parse_id(raw, "X-Club-Id").map_err(api_error)
}

/// Shared state for the HTTP server.
struct AppState {
    scheduler: ClassScheduler,
    reservations: ReservationService,
}

/// Club scheduling HTTP server.
pub struct ClassesHttpServer {
    config: ServerConfig,
    scheduler: ClassScheduler,
    reservations: ReservationService,
}

impl ClassesHttpServer {
    pub fn new(scheduler: ClassScheduler, reservations: ReservationService, config: ServerConfig) -> Self {
        Self {
            config,
            scheduler,
            reservations,
        }
    }

    /// Build the router.
    pub fn into_router(self) -> Router {
        let state = Arc::new(AppState {
            scheduler: self.scheduler,
            reservations: self.reservations,
        });

        let app = Router::new()
            // Classes
            .route("/api/v1/classes", get(list_classes).post(create_classes))
            .route("/api/v1/classes/{id}", get(get_class))
            .route("/api/v1/classes/{id}/cancel", post(cancel_class))
            // Court time
            .route("/api/v1/availability", get(check_availability))
            .route("/api/v1/reservations", post(create_reservation))
            .route("/api/v1/reservations/{id}", get(get_reservation))
            .route("/api/v1/reservations/{id}/cancel", post(cancel_reservation))
            // Health check
            .route("/health", get(health_check))
            .with_state(state);

        if self.config.enable_cors {
            app.layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
                .layer(TraceLayer::new_for_http())
        } else {
            app.layer(TraceLayer::new_for_http())
        }
    }

    fn addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.config.host, self.config.port).parse()
    }

    /// Start the server.
    pub async fn serve(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.serve_with_shutdown(std::future::pending()).await
    }

    /// Start the server with a shutdown signal.
    pub async fn serve_with_shutdown<F>(
        self,
        shutdown: F,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let addr = self.addr()?;
        let router = self.into_router();

        info!("Scheduling HTTP server listening on {}", addr);

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }
}

// Handler functions

async fn health_check() -> &'static str {
    "OK"
}

async fn create_classes(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CreateClassRequest>,
) -> ApiResult<(StatusCode, Json<MaterializeResponse>)> {
    let club_id = club_id(&headers)?;
    let request = req.into_request(club_id).map_err(api_error)?;
    let result = state.scheduler.materialize(request).await.map_err(api_error)?;

    let status = if result.created.is_empty() { StatusCode::OK } else { StatusCode::CREATED };
    Ok((status, Json(MaterializeResponse::from(result))))
}

async fn list_classes(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<ClassQueryParams>,
) -> ApiResult<Json<Vec<ClassResponse>>> {
    let filter = params.into_filter(club_id(&headers)?).map_err(api_error)?;
    let classes = state.scheduler.list_classes(filter).await.map_err(api_error)?;
    Ok(Json(classes.into_iter().map(ClassResponse::from).collect()))
}

async fn get_class(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ClassResponse>> {
    let class = state
        .scheduler
        .get_class(club_id(&headers)?, id)
        .await
        .map_err(api_error)?;
    Ok(Json(ClassResponse::from(class)))
}

async fn cancel_class(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ClassResponse>> {
    let class = state
        .scheduler
        .cancel_class(club_id(&headers)?, id)
        .await
        .map_err(api_error)?;
    Ok(Json(ClassResponse::from(class)))
}

async fn check_availability(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<AvailabilityParams>,
) -> ApiResult<Json<AvailabilityResponse>> {
    club_id(&headers)?;
    let (court_id, date, time) = params.parse().map_err(api_error)?;
    let conflicts = state
        .scheduler
        .availability()
        .conflicts(date, court_id, &time)
        .await
        .map_err(api_error)?;

    Ok(Json(AvailabilityResponse {
        available: conflicts.is_empty(),
        conflicts: conflicts.into_iter().map(ConflictResponse::from).collect(),
    }))
}

async fn create_reservation(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CreateReservationRequest>,
) -> ApiResult<(StatusCode, Json<ReservationResponse>)> {
    let request = req.into_request(club_id(&headers)?).map_err(api_error)?;
    let reservation = state.reservations.create(request).await.map_err(api_error)?;
    Ok((StatusCode::CREATED, Json(ReservationResponse::from(reservation))))
}

async fn get_reservation(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ReservationResponse>> {
    let reservation = state
        .reservations
        .get(club_id(&headers)?, id)
        .await
        .map_err(api_error)?;
    Ok(Json(ReservationResponse::from(reservation)))
}

async fn cancel_reservation(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ReservationResponse>> {
    let reservation = state
        .reservations
        .cancel(club_id(&headers)?, id)
        .await
        .map_err(api_error)?;
    Ok(Json(ReservationResponse::from(reservation)))
}
