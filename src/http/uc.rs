//! Utilization certificate endpoints.

use crate::core::uc::{self, Verdict};
use crate::entities::utilization_certificate::Model as CertificateModel;
use crate::errors::Error;
use crate::http::{ApiResult, AppState, success};
use axum::extract::{Path, State};
use axum::response::Json;
use serde::Deserialize;

/// Body of `POST /api/uc/submit`.
#[derive(Debug, Deserialize)]
pub struct SubmitUcRequest {
    /// Filing district
    pub district_id: i64,
    /// Financial year covered (e.g., "2025-26")
    pub financial_year: String,
    /// Funds released in the period, in paise
    pub fund_released: i64,
    /// Funds utilized in the period, in paise
    pub fund_utilized: i64,
    /// Public URL of the supporting document
    pub document_url: String,
}

/// Files a utilization certificate.
pub async fn submit(
    State(app): State<AppState>,
    Json(req): Json<SubmitUcRequest>,
) -> ApiResult<CertificateModel> {
    let certificate = uc::submit_certificate(
        &app.db,
        req.district_id,
        req.financial_year,
        req.fund_released,
        req.fund_utilized,
        req.document_url,
    )
    .await?;

    Ok(success(certificate))
}

/// Body of `PUT /api/uc/verify/:id`.
#[derive(Debug, Deserialize)]
pub struct VerifyUcRequest {
    /// `"Verified"` or `"Rejected"`
    pub status: String,
    /// Verifier remarks
    pub remarks: Option<String>,
    /// Verifier identity
    pub verifier: String,
}

/// Records a verdict on a pending certificate.
pub async fn verify(
    State(app): State<AppState>,
    Path(certificate_id): Path<i64>,
    Json(req): Json<VerifyUcRequest>,
) -> ApiResult<CertificateModel> {
    let verdict = match req.status.as_str() {
        "Verified" => Verdict::Verified,
        "Rejected" => Verdict::Rejected,
        other => {
            return Err(Error::Validation {
                message: format!("invalid verification status: {other}"),
            }
            .into());
        }
    };

    let updated =
        uc::verify_certificate(&app.db, certificate_id, verdict, req.remarks, req.verifier).await?;

    Ok(success(updated))
}

/// Lists a district's certificates, newest first.
pub async fn for_district(
    State(app): State<AppState>,
    Path(district_id): Path<i64>,
) -> ApiResult<Vec<CertificateModel>> {
    let certificates = uc::get_certificates_for_district(&app.db, district_id).await?;
    Ok(success(certificates))
}
