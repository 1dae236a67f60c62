//! District entity - Registry of districts under each state.
//!
//! Districts submit proposals and utilization certificates, receive
//! state-level releases, and disburse onward to agencies and villages.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// District database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "districts")]
pub struct Model {
    /// Unique identifier for the district
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the state this district belongs to
    pub state_id: i64,
    /// District name
    pub name: String,
    /// Phone number notifications for this district are sent to
    pub admin_phone: String,
    /// When the district was registered
    pub created_at: DateTimeUtc,
}

/// Defines relationships between District and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each district belongs to one state
    #[sea_orm(
        belongs_to = "super::state::Entity",
        from = "Column::StateId",
        to = "super::state::Column::Id"
    )]
    State,
    /// One district has many proposals
    #[sea_orm(has_many = "super::proposal::Entity")]
    Proposals,
}

impl Related<super::state::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::State.def()
    }
}

impl Related<super::proposal::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Proposals.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
