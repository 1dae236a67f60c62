//! Allocation, release, balance, and report endpoints.

use crate::core::allocation::{self, OfficerMeta, StateBalance};
use crate::core::release::{
    self, DistrictFundPosition, ReleaseMeta, StateReleaseKind,
};
use crate::core::report::{self, StateFundReport};
use crate::entities::{allocation::Model as AllocationModel, release::Model as ReleaseModel};
use crate::http::{ApiResult, AppState, success};
use axum::extract::{Path, State};
use axum::response::Json;
use chrono::NaiveDate;
use serde::Deserialize;

/// Body of `POST /api/funds/allocate`.
#[derive(Debug, Deserialize)]
pub struct AllocateRequest {
    /// Target state
    pub state_id: i64,
    /// Amount in paise
    pub amount: i64,
    /// Scheme components covered
    pub components: Vec<String>,
    /// Allocation order date; today when omitted
    pub date: Option<NaiveDate>,
    /// Allocating officer id
    pub officer_id: String,
    /// Allocating officer name
    pub officer_name: String,
    /// Allocating officer role
    pub officer_role: String,
    /// Allocating officer phone
    pub officer_phone: String,
}

/// Records a new allocation tranche.
pub async fn allocate(
    State(app): State<AppState>,
    Json(req): Json<AllocateRequest>,
) -> ApiResult<AllocationModel> {
    let officer = OfficerMeta {
        id: req.officer_id,
        name: req.officer_name,
        role: req.officer_role,
        phone: req.officer_phone,
    };
    let date = req.date.unwrap_or_else(|| chrono::Utc::now().date_naive());

    let tranche =
        allocation::allocate(&app.db, req.state_id, req.amount, req.components, officer, date)
            .await?;

    Ok(success(tranche))
}

/// What a ministry-to-state release draws against, as submitted.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReleaseKindRequest {
    /// Draws on the state programme ceiling
    #[default]
    Programme,
    /// Draws on an approved proposal's allocation; requires `proposal_id`
    Project,
}

/// Body of `POST /api/funds/release`, tagged by hop.
#[derive(Debug, Deserialize)]
#[serde(tag = "hop", rename_all = "kebab-case")]
pub enum ReleaseRequest {
    /// Ministry releases to a state, resolved by exact name
    MinistryToState {
        /// Target state name
        state_name: String,
        /// Amount in paise
        amount: i64,
        /// Programme or project-linked
        #[serde(default)]
        kind: ReleaseKindRequest,
        /// The funded proposal, required when `kind` is `project`
        proposal_id: Option<i64>,
        /// Sanction/order reference
        sanction_ref: String,
        /// Free-text remarks
        remarks: Option<String>,
        /// Releasing officer id
        released_by: String,
        /// Release order date; today when omitted
        released_on: Option<NaiveDate>,
    },
    /// State releases to one of its districts
    StateToDistrict {
        /// Target district
        district_id: i64,
        /// Amount in paise
        amount: i64,
        /// Sanction/order reference
        sanction_ref: String,
        /// Free-text remarks
        remarks: Option<String>,
        /// Releasing officer id
        released_by: String,
        /// Release order date; today when omitted
        released_on: Option<NaiveDate>,
    },
    /// District releases to an agency
    DistrictToAgency {
        /// Source district
        district_id: i64,
        /// Target agency
        agency_id: i64,
        /// Amount in paise
        amount: i64,
        /// Links the release to an approved proposal
        proposal_id: Option<i64>,
        /// Sanction/order reference
        sanction_ref: String,
        /// Free-text remarks
        remarks: Option<String>,
        /// Releasing officer id
        released_by: String,
        /// Release order date; today when omitted
        released_on: Option<NaiveDate>,
    },
    /// District releases to a village
    DistrictToVillage {
        /// Source district
        district_id: i64,
        /// Target village code
        village_code: String,
        /// Amount in paise
        amount: i64,
        /// Sanction/order reference
        sanction_ref: String,
        /// Free-text remarks
        remarks: Option<String>,
        /// Releasing officer id
        released_by: String,
        /// Release order date; today when omitted
        released_on: Option<NaiveDate>,
    },
}

fn meta(
    sanction_ref: String,
    remarks: Option<String>,
    released_by: String,
    released_on: Option<NaiveDate>,
) -> ReleaseMeta {
    ReleaseMeta {
        sanction_ref,
        remarks,
        released_by,
        released_on: released_on.unwrap_or_else(|| chrono::Utc::now().date_naive()),
    }
}

/// Records a fund release at any hop.
pub async fn release(
    State(app): State<AppState>,
    Json(req): Json<ReleaseRequest>,
) -> ApiResult<ReleaseModel> {
    let released = match req {
        ReleaseRequest::MinistryToState {
            state_name,
            amount,
            kind,
            proposal_id,
            sanction_ref,
            remarks,
            released_by,
            released_on,
        } => {
            let kind = match kind {
                ReleaseKindRequest::Programme => StateReleaseKind::Programme,
                ReleaseKindRequest::Project => {
                    let proposal_id =
                        proposal_id.ok_or_else(|| crate::errors::Error::Validation {
                            message: "project releases require a proposal_id".to_string(),
                        })?;
                    StateReleaseKind::Project { proposal_id }
                }
            };
            release::release_to_state(
                &app.db,
                &state_name,
                amount,
                kind,
                meta(sanction_ref, remarks, released_by, released_on),
            )
            .await?
        }
        ReleaseRequest::StateToDistrict {
            district_id,
            amount,
            sanction_ref,
            remarks,
            released_by,
            released_on,
        } => {
            release::release_to_district(
                &app.db,
                district_id,
                amount,
                meta(sanction_ref, remarks, released_by, released_on),
            )
            .await?
        }
        ReleaseRequest::DistrictToAgency {
            district_id,
            agency_id,
            amount,
            proposal_id,
            sanction_ref,
            remarks,
            released_by,
            released_on,
        } => {
            release::release_to_agency(
                &app.db,
                district_id,
                agency_id,
                amount,
                proposal_id,
                meta(sanction_ref, remarks, released_by, released_on),
            )
            .await?
        }
        ReleaseRequest::DistrictToVillage {
            district_id,
            village_code,
            amount,
            sanction_ref,
            remarks,
            released_by,
            released_on,
        } => {
            release::release_to_village(
                &app.db,
                district_id,
                &village_code,
                amount,
                meta(sanction_ref, remarks, released_by, released_on),
            )
            .await?
        }
    };

    Ok(success(released))
}

/// Returns a state's aggregate fund position.
pub async fn state_balance(
    State(app): State<AppState>,
    Path(state_id): Path<i64>,
) -> ApiResult<StateBalance> {
    let balance = allocation::get_state_balance(&app.db, state_id).await?;
    Ok(success(balance))
}

/// Returns a district's computed fund position.
pub async fn district_position(
    State(app): State<AppState>,
    Path(district_id): Path<i64>,
) -> ApiResult<DistrictFundPosition> {
    let position = release::district_fund_position(&app.db, district_id).await?;
    Ok(success(position))
}

/// Returns the full fund report for a state.
pub async fn state_report(
    State(app): State<AppState>,
    Path(state_id): Path<i64>,
) -> ApiResult<StateFundReport> {
    let report = report::state_fund_report(&app.db, state_id).await?;
    Ok(success(report))
}
