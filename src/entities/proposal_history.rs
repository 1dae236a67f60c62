//! Proposal history entity - Append-only audit log of status transitions.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::proposal::ProposalStatus;

/// Proposal history database model - one row per status transition
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "proposal_history")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Proposal the transition belongs to
    pub proposal_id: i64,
    /// Status before the transition
    pub from_status: ProposalStatus,
    /// Status after the transition
    pub to_status: ProposalStatus,
    /// Actor who performed the transition
    pub actor: String,
    /// Remarks or rejection reason recorded with the transition
    pub remarks: Option<String>,
    /// When the transition happened
    pub created_at: DateTimeUtc,
}

/// Defines relationships between proposal history and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each audit row belongs to one proposal
    #[sea_orm(
        belongs_to = "super::proposal::Entity",
        from = "Column::ProposalId",
        to = "super::proposal::Column::Id"
    )]
    Proposal,
}

impl Related<super::proposal::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Proposal.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
