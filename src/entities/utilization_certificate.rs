//! Utilization certificate entity - District spending reports per financial year.
//!
//! Districts file one certificate per financial year against released funds;
//! the state verifies or rejects it. Verification is one-shot: once a
//! certificate leaves `Pending Verification` it never transitions again.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Verification status of a utilization certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(24))")]
pub enum CertificateStatus {
    /// Filed by the district, awaiting state verification
    #[sea_orm(string_value = "Pending Verification")]
    #[serde(rename = "Pending Verification")]
    PendingVerification,
    /// Accepted by the state (terminal)
    #[sea_orm(string_value = "Verified")]
    Verified,
    /// Rejected by the state (terminal)
    #[sea_orm(string_value = "Rejected")]
    Rejected,
}

/// Utilization certificate database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "uc_submissions")]
pub struct Model {
    /// Unique identifier for the certificate
    #[sea_orm(primary_key)]
    pub id: i64,
    /// District that filed the certificate
    pub district_id: i64,
    /// Financial year the certificate covers (e.g., "2025-26")
    pub financial_year: String,
    /// Funds released to the district in the period, in paise
    pub fund_released: i64,
    /// Funds utilized in the period, in paise
    pub fund_utilized: i64,
    /// Public URL of the supporting document
    pub document_url: String,
    /// Verification status
    pub status: CertificateStatus,
    /// State verifier identity, once a verdict is recorded
    pub verified_by: Option<String>,
    /// When the verdict was recorded
    pub verified_at: Option<DateTimeUtc>,
    /// Verifier remarks
    pub remarks: Option<String>,
    /// When the certificate was filed
    pub created_at: DateTimeUtc,
}

/// Defines relationships between certificates and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each certificate belongs to one district
    #[sea_orm(
        belongs_to = "super::district::Entity",
        from = "Column::DistrictId",
        to = "super::district::Column::Id"
    )]
    District,
}

impl Related<super::district::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::District.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
