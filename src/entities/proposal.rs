//! Proposal entity - District-submitted project requests.
//!
//! A proposal moves through a closed approval workflow before it can receive
//! funds. The status enum carries the legal transition table; illegal
//! transitions are rejected at the boundary rather than written through.

use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Approval workflow status of a proposal.
///
/// ```text
/// Submitted          -> ApprovedByState | RejectedByState
/// ApprovedByState    -> ApprovedByMinistry | RejectedByMinistry
/// ApprovedByMinistry -> Completed
/// ```
///
/// `RejectedByState`, `RejectedByMinistry`, and `Completed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(24))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProposalStatus {
    /// Submitted by the district, awaiting state review
    #[sea_orm(string_value = "SUBMITTED")]
    Submitted,
    /// Approved by the state, awaiting ministry review
    #[sea_orm(string_value = "APPROVED_BY_STATE")]
    ApprovedByState,
    /// Rejected by the state (terminal)
    #[sea_orm(string_value = "REJECTED_BY_STATE")]
    RejectedByState,
    /// Approved by the ministry; fund assignment unlocked
    #[sea_orm(string_value = "APPROVED_BY_MINISTRY")]
    ApprovedByMinistry,
    /// Rejected by the ministry (terminal)
    #[sea_orm(string_value = "REJECTED_BY_MINISTRY")]
    RejectedByMinistry,
    /// Works completed (terminal)
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
}

impl ProposalStatus {
    /// Whether moving from `self` to `next` is a legal workflow step.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Submitted, Self::ApprovedByState | Self::RejectedByState)
                | (
                    Self::ApprovedByState,
                    Self::ApprovedByMinistry | Self::RejectedByMinistry
                )
                | (Self::ApprovedByMinistry, Self::Completed)
        )
    }

    /// Terminal statuses admit no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::RejectedByState | Self::RejectedByMinistry | Self::Completed
        )
    }

    /// Whether an implementing agency may be assigned at this status.
    #[must_use]
    pub const fn is_assignment_eligible(self) -> bool {
        matches!(self, Self::ApprovedByState | Self::ApprovedByMinistry)
    }

    /// Whether the status is a state- or ministry-level rejection.
    #[must_use]
    pub const fn is_rejection(self) -> bool {
        matches!(self, Self::RejectedByState | Self::RejectedByMinistry)
    }
}

/// Metadata for one uploaded supporting document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMeta {
    /// Original file name
    pub name: String,
    /// Public URL in blob storage
    pub url: String,
    /// MIME type
    pub content_type: String,
    /// File size in bytes
    pub size: i64,
}

/// Supporting documents attached to a proposal, stored as a JSON array.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct DocumentList(pub Vec<DocumentMeta>);

/// Proposal database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "district_proposals")]
pub struct Model {
    /// Unique identifier for the proposal
    #[sea_orm(primary_key)]
    pub id: i64,
    /// District that submitted the proposal
    pub district_id: i64,
    /// Project name
    pub project_name: String,
    /// Scheme component the project falls under
    pub component: String,
    /// Estimated cost in paise, as submitted
    pub estimated_cost: i64,
    /// Allocated amount in paise, fixed at ministry approval (0 before)
    pub allocated_amount: i64,
    /// Running total of project-linked releases in paise;
    /// never exceeds `allocated_amount`
    pub released_amount: i64,
    /// Current workflow status
    pub status: ProposalStatus,
    /// Assigned implementing agency, once one is chosen
    pub agency_id: Option<i64>,
    /// Actor who made the most recent approval/rejection decision
    pub decided_by: Option<String>,
    /// When the most recent decision was made
    pub decided_at: Option<DateTimeUtc>,
    /// Reason given on rejection
    pub rejection_reason: Option<String>,
    /// Supporting documents
    #[sea_orm(column_type = "Json")]
    pub documents: DocumentList,
    /// When the proposal was submitted
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Proposal and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each proposal belongs to one district
    #[sea_orm(
        belongs_to = "super::district::Entity",
        from = "Column::DistrictId",
        to = "super::district::Column::Id"
    )]
    District,
    /// One proposal has many audit rows
    #[sea_orm(has_many = "super::proposal_history::Entity")]
    History,
    /// One proposal has many project-linked releases
    #[sea_orm(has_many = "super::release::Entity")]
    Releases,
}

impl Related<super::district::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::District.def()
    }
}

impl Related<super::proposal_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::History.def()
    }
}

impl Related<super::release::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Releases.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
