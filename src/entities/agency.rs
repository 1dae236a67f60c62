//! Agency entity - Registry of implementing and executing agencies.
//!
//! Agencies are the final registered hop of the fund-flow hierarchy. They are
//! created by admin action or self-registration (pending approval) and must be
//! activated before funds can be released to them. Activation is one-way.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Whether an agency implements works or executes them on the ground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgencyKind {
    /// Plans and oversees scheme works
    #[sea_orm(string_value = "IMPLEMENTING")]
    Implementing,
    /// Carries out sanctioned works
    #[sea_orm(string_value = "EXECUTING")]
    Executing,
}

/// Lifecycle status of an agency registration. One-way: pending -> active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgencyStatus {
    /// Self-registered, awaiting approval
    #[sea_orm(string_value = "PENDING_APPROVAL")]
    PendingApproval,
    /// Approved and eligible to receive fund releases
    #[sea_orm(string_value = "ACTIVE")]
    Active,
}

/// Agency database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "agencies")]
pub struct Model {
    /// Unique identifier for the agency
    #[sea_orm(primary_key)]
    pub id: i64,
    /// State the agency operates in
    pub state_id: i64,
    /// District scope, when the agency is district-assigned
    pub district_id: Option<i64>,
    /// Agency name
    pub name: String,
    /// Implementing or executing
    pub kind: AgencyKind,
    /// Contact person name
    pub contact_person: String,
    /// Phone number notifications for this agency are sent to
    pub contact_phone: String,
    /// Contact email, unique across agencies (duplicate registration is a conflict)
    pub contact_email: String,
    /// Push token of the linked user account, when one exists
    pub push_token: Option<String>,
    /// Registration status
    pub status: AgencyStatus,
    /// When the agency was registered
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Agency and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each agency belongs to one state
    #[sea_orm(
        belongs_to = "super::state::Entity",
        from = "Column::StateId",
        to = "super::state::Column::Id"
    )]
    State,
}

impl Related<super::state::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::State.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
