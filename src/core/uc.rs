//! Utilization certificate business logic.
//!
//! Districts file one certificate per financial year reporting how released
//! funds were spent; the state verifies or rejects it. Verification is
//! one-shot: a certificate that has left `Pending Verification` admits no
//! further transitions.

use crate::entities::{
    District, State, UtilizationCertificate,
    notification::Channel,
    utilization_certificate,
    utilization_certificate::CertificateStatus,
};
use crate::errors::{Error, Result};
use crate::notify::{outbox, templates};
use sea_orm::{ActiveEnum, DatabaseConnection, QueryOrder, Set, TransactionTrait, prelude::*};

/// Verdict a state can record on a pending certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Accept the certificate
    Verified,
    /// Reject the certificate
    Rejected,
}

impl Verdict {
    const fn status(self) -> CertificateStatus {
        match self {
            Self::Verified => CertificateStatus::Verified,
            Self::Rejected => CertificateStatus::Rejected,
        }
    }
}

/// Files a certificate for a district and financial year, notifying the
/// owning state with the computed utilization percentage.
pub async fn submit_certificate(
    db: &DatabaseConnection,
    district_id: i64,
    financial_year: String,
    fund_released: i64,
    fund_utilized: i64,
    document_url: String,
) -> Result<utilization_certificate::Model> {
    if fund_released <= 0 {
        return Err(Error::InvalidAmount {
            amount: fund_released,
        });
    }
    if fund_utilized < 0 {
        return Err(Error::InvalidAmount {
            amount: fund_utilized,
        });
    }
    if financial_year.trim().is_empty() {
        return Err(Error::Validation {
            message: "financial year is required".to_string(),
        });
    }

    let txn = db.begin().await?;

    let district = District::find_by_id(district_id)
        .one(&txn)
        .await?
        .ok_or(Error::DistrictNotFound { id: district_id })?;
    let state = State::find_by_id(district.state_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::StateNotFound {
            name: district.state_id.to_string(),
        })?;

    let certificate = utilization_certificate::ActiveModel {
        district_id: Set(district_id),
        financial_year: Set(financial_year.trim().to_string()),
        fund_released: Set(fund_released),
        fund_utilized: Set(fund_utilized),
        document_url: Set(document_url),
        status: Set(CertificateStatus::PendingVerification),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    outbox::enqueue(
        &txn,
        Channel::Whatsapp,
        &state.admin_phone,
        &templates::certificate_submitted(
            &district.name,
            &certificate.financial_year,
            fund_released,
            fund_utilized,
        ),
    )
    .await?;

    txn.commit().await?;

    Ok(certificate)
}

/// Records a verdict on a pending certificate. Terminal: verifying or
/// rejecting an already-decided certificate is an illegal transition.
pub async fn verify_certificate(
    db: &DatabaseConnection,
    certificate_id: i64,
    verdict: Verdict,
    remarks: Option<String>,
    verifier: String,
) -> Result<utilization_certificate::Model> {
    let txn = db.begin().await?;

    let current = UtilizationCertificate::find_by_id(certificate_id)
        .one(&txn)
        .await?
        .ok_or(Error::CertificateNotFound { id: certificate_id })?;

    if current.status != CertificateStatus::PendingVerification {
        return Err(Error::InvalidTransition {
            from: current.status.to_value(),
            to: verdict.status().to_value(),
        });
    }

    let district = District::find_by_id(current.district_id)
        .one(&txn)
        .await?
        .ok_or(Error::DistrictNotFound {
            id: current.district_id,
        })?;

    let financial_year = current.financial_year.clone();
    let mut active: utilization_certificate::ActiveModel = current.into();
    active.status = Set(verdict.status());
    active.verified_by = Set(Some(verifier));
    active.verified_at = Set(Some(chrono::Utc::now()));
    active.remarks = Set(remarks.clone());
    let updated = active.update(&txn).await?;

    outbox::enqueue(
        &txn,
        Channel::Whatsapp,
        &district.admin_phone,
        &templates::certificate_decided(&financial_year, verdict, remarks.as_deref()),
    )
    .await?;

    txn.commit().await?;

    Ok(updated)
}

/// Lists a district's certificates, newest first.
pub async fn get_certificates_for_district(
    db: &DatabaseConnection,
    district_id: i64,
) -> Result<Vec<utilization_certificate::Model>> {
    UtilizationCertificate::find()
        .filter(utilization_certificate::Column::DistrictId.eq(district_id))
        .order_by_desc(utilization_certificate::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Share of released funds reported as utilized, as a percentage.
///
/// Zero released funds yield zero rather than dividing by zero; utilization
/// above the released amount simply exceeds 100.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn utilization_percent(fund_released: i64, fund_utilized: i64) -> f64 {
    if fund_released <= 0 {
        return 0.0;
    }

    (fund_utilized as f64 / fund_released as f64) * 100.0
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_utilization_percent() {
        assert_eq!(utilization_percent(1_000_000, 800_000), 80.0);
        assert_eq!(utilization_percent(1_000_000, 0), 0.0);
        assert_eq!(utilization_percent(1_000_000, 1_000_000), 100.0);
        // Over-utilization exceeds 100 rather than erroring
        assert_eq!(utilization_percent(1_000_000, 1_500_000), 150.0);
        // Degenerate denominator
        assert_eq!(utilization_percent(0, 500), 0.0);
    }

    #[tokio::test]
    async fn test_submit_certificate_validation() -> Result<()> {
        let (db, _state, district) = setup_with_district().await?;

        let result = submit_certificate(
            &db,
            district.id,
            "2025-26".to_string(),
            0,
            0,
            "https://docs.example/uc.pdf".to_string(),
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { .. }));

        let result = submit_certificate(
            &db,
            district.id,
            "   ".to_string(),
            lakhs(10),
            lakhs(8),
            "https://docs.example/uc.pdf".to_string(),
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_submit_certificate_pending_with_percentage_notification() -> Result<()> {
        let (db, state, district) = setup_with_district().await?;

        let certificate = submit_certificate(
            &db,
            district.id,
            "2025-26".to_string(),
            1_000_000,
            800_000,
            "https://docs.example/uc.pdf".to_string(),
        )
        .await?;

        assert_eq!(certificate.status, CertificateStatus::PendingVerification);

        let pending = pending_notifications(&db).await?;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].recipient, state.admin_phone);
        assert!(pending[0].body.contains("80.0%"));

        Ok(())
    }

    #[tokio::test]
    async fn test_verify_certificate_is_terminal() -> Result<()> {
        let (db, _state, district) = setup_with_district().await?;
        let certificate = create_test_certificate(&db, district.id).await?;

        let updated = verify_certificate(
            &db,
            certificate.id,
            Verdict::Rejected,
            Some("document illegible".to_string()),
            "state-verifier".to_string(),
        )
        .await?;
        assert_eq!(updated.status, CertificateStatus::Rejected);
        assert_eq!(updated.verified_by.as_deref(), Some("state-verifier"));
        assert!(updated.verified_at.is_some());

        // No further transitions accepted
        let result = verify_certificate(
            &db,
            certificate.id,
            Verdict::Verified,
            None,
            "state-verifier".to_string(),
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidTransition { from, .. } if from == "Rejected"
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_verify_unknown_certificate() -> Result<()> {
        let db = setup_test_db().await?;

        let result =
            verify_certificate(&db, 999, Verdict::Verified, None, "verifier".to_string()).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::CertificateNotFound { id: 999 }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_certificates_for_district() -> Result<()> {
        let (db, _state, district) = setup_with_district().await?;
        create_test_certificate(&db, district.id).await?;
        create_test_certificate(&db, district.id).await?;

        let certificates = get_certificates_for_district(&db, district.id).await?;
        assert_eq!(certificates.len(), 2);
        assert!(certificates[0].id > certificates[1].id);

        Ok(())
    }
}
