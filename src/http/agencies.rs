//! Agency registry endpoints.

use crate::core::agency::{self, AgencyRegistration};
use crate::entities::agency::{AgencyKind, Model as AgencyModel};
use crate::http::{ApiResult, AppState, success};
use axum::extract::{Path, State};
use axum::response::Json;
use serde::Deserialize;

/// Body of `POST /api/agencies/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterAgencyRequest {
    /// State the agency operates in
    pub state_id: i64,
    /// District scope, when district-assigned
    pub district_id: Option<i64>,
    /// Agency name
    pub name: String,
    /// Implementing or executing
    pub kind: AgencyKind,
    /// Contact person name
    pub contact_person: String,
    /// Contact phone
    pub contact_phone: String,
    /// Contact email, unique across agencies
    pub contact_email: String,
}

/// Registers a new agency (pending approval).
pub async fn register(
    State(app): State<AppState>,
    Json(req): Json<RegisterAgencyRequest>,
) -> ApiResult<AgencyModel> {
    let created = agency::register(
        &app.db,
        AgencyRegistration {
            state_id: req.state_id,
            district_id: req.district_id,
            name: req.name,
            kind: req.kind,
            contact_person: req.contact_person,
            contact_phone: req.contact_phone,
            contact_email: req.contact_email,
        },
    )
    .await?;

    Ok(success(created))
}

/// Activates an agency.
pub async fn activate(
    State(app): State<AppState>,
    Path(agency_id): Path<i64>,
) -> ApiResult<AgencyModel> {
    let activated = agency::activate(&app.db, agency_id).await?;
    Ok(success(activated))
}

/// Lists agencies scoped to a district.
pub async fn for_district(
    State(app): State<AppState>,
    Path(district_id): Path<i64>,
) -> ApiResult<Vec<AgencyModel>> {
    let agencies = agency::get_agencies_for_district(&app.db, district_id).await?;
    Ok(success(agencies))
}
