//! Proposal workflow endpoints.

use crate::core::proposal;
use crate::entities::proposal::{DocumentMeta, Model as ProposalModel, ProposalStatus};
use crate::entities::proposal_history::Model as HistoryModel;
use crate::errors::Error;
use crate::http::{ApiResult, AppState, success};
use axum::extract::{Path, State};
use axum::response::Json;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/proposals/create`.
#[derive(Debug, Deserialize)]
pub struct CreateProposalRequest {
    /// Submitting district
    pub district_id: i64,
    /// Project name
    pub project_name: String,
    /// Scheme component
    pub component: String,
    /// Estimated cost in paise
    pub estimated_cost: i64,
    /// Supporting documents, already uploaded to blob storage
    #[serde(default)]
    pub documents: Vec<DocumentMeta>,
}

/// Submits a proposal.
pub async fn create(
    State(app): State<AppState>,
    Json(req): Json<CreateProposalRequest>,
) -> ApiResult<ProposalModel> {
    let created = proposal::submit(
        &app.db,
        req.district_id,
        req.project_name,
        req.component,
        req.estimated_cost,
        req.documents,
    )
    .await?;

    Ok(success(created))
}

/// Body of `PATCH /api/proposals/:id/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    /// Status to move to
    pub status: ProposalStatus,
    /// Actor making the decision
    pub actor: String,
    /// Rejection reason or decision remarks
    pub reason: Option<String>,
    /// Allocation ceiling fixed on ministry approval, in paise
    pub allocated_amount: Option<i64>,
}

/// Moves a proposal through its workflow.
pub async fn update_status(
    State(app): State<AppState>,
    Path(proposal_id): Path<i64>,
    Json(req): Json<UpdateStatusRequest>,
) -> ApiResult<ProposalModel> {
    let updated = proposal::transition(
        &app.db,
        proposal_id,
        req.status,
        req.actor,
        req.reason,
        req.allocated_amount,
        &app.config.ministry_phone,
    )
    .await?;

    Ok(success(updated))
}

/// Body of `POST /api/proposals/:id/assign-agency`.
#[derive(Debug, Deserialize)]
pub struct AssignAgencyRequest {
    /// Agency to assign
    pub agency_id: i64,
}

/// Assigns an implementing agency to an approved proposal.
pub async fn assign_agency(
    State(app): State<AppState>,
    Path(proposal_id): Path<i64>,
    Json(req): Json<AssignAgencyRequest>,
) -> ApiResult<ProposalModel> {
    let updated = proposal::assign_agency(&app.db, proposal_id, req.agency_id).await?;
    Ok(success(updated))
}

/// A proposal with its audit trail.
#[derive(Debug, Serialize)]
pub struct ProposalDetail {
    /// The proposal
    pub proposal: ProposalModel,
    /// Status transitions, oldest first
    pub history: Vec<HistoryModel>,
}

/// Returns a proposal with its audit trail.
pub async fn get_by_id(
    State(app): State<AppState>,
    Path(proposal_id): Path<i64>,
) -> ApiResult<ProposalDetail> {
    let found = proposal::get_proposal(&app.db, proposal_id)
        .await?
        .ok_or(Error::ProposalNotFound { id: proposal_id })?;
    let history = proposal::get_history(&app.db, proposal_id).await?;

    Ok(success(ProposalDetail {
        proposal: found,
        history,
    }))
}
