//! REST API layer.
//!
//! A thin axum surface over the core operations. Every response uses the
//! uniform envelope `{"success": true, "data": ...}` /
//! `{"success": false, "error": ...}`; the error variant's HTTP status
//! reflects its category (400 validation, 404 not-found, 409 conflict,
//! 500 upstream/unexpected).

/// Agency registry endpoints
pub mod agencies;
/// Allocation, release, balance, and report endpoints
pub mod funds;
/// Proposal workflow endpoints
pub mod proposals;
/// Utilization certificate endpoints
pub mod uc;

use crate::config::settings::AppConfig;
use crate::errors::Error;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, patch, post, put};
use axum::Router;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: DatabaseConnection,
    /// Runtime configuration
    pub config: Arc<AppConfig>,
}

/// Uniform success envelope.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    /// Always `true` on this shape
    pub success: bool,
    /// The payload
    pub data: T,
}

/// Wraps a payload in the success envelope.
pub fn success<T: Serialize>(data: T) -> Json<Envelope<T>> {
    Json(Envelope {
        success: true,
        data,
    })
}

/// Handler result: enveloped payload or a mapped API error.
pub type ApiResult<T> = std::result::Result<Json<Envelope<T>>, ApiError>;

/// Newtype carrying a core error across the axum boundary.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(value: Error) -> Self {
        Self(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::StateNotFound { .. }
            | Error::DistrictNotFound { .. }
            | Error::AgencyNotFound { .. }
            | Error::ProposalNotFound { .. }
            | Error::CertificateNotFound { .. } => StatusCode::NOT_FOUND,
            Error::InvalidAmount { .. }
            | Error::InsufficientBalance { .. }
            | Error::InvalidTransition { .. }
            | Error::Validation { .. } => StatusCode::BAD_REQUEST,
            Error::DuplicateAgencyEmail { .. } => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self.0, "request failed");
        }

        let mut body = json!({
            "success": false,
            "error": self.0.to_string(),
        });
        if let Error::InsufficientBalance { available, .. } = &self.0 {
            body["available"] = json!(available);
        }

        (status, Json(body)).into_response()
    }
}

/// Builds the service router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/funds/allocate", post(funds::allocate))
        .route("/api/funds/release", post(funds::release))
        .route("/api/funds/state/:id/balance", get(funds::state_balance))
        .route(
            "/api/funds/district/:id/position",
            get(funds::district_position),
        )
        .route("/api/reports/state/:id", get(funds::state_report))
        .route("/api/proposals/create", post(proposals::create))
        .route("/api/proposals/:id", get(proposals::get_by_id))
        .route("/api/proposals/:id/status", patch(proposals::update_status))
        .route(
            "/api/proposals/:id/assign-agency",
            post(proposals::assign_agency),
        )
        .route("/api/uc/submit", post(uc::submit))
        .route("/api/uc/verify/:id", put(uc::verify))
        .route("/api/uc/district/:id", get(uc::for_district))
        .route("/api/agencies/register", post(agencies::register))
        .route("/api/agencies/:id/activate", post(agencies::activate))
        .route("/api/agencies/district/:id", get(agencies::for_district))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
