//! Allocation entity - Ministry-approved funding tranches for states.
//!
//! One row per (state, allocation event). Rows are append-only: the state's
//! ceiling and released-to-date are always computed by aggregating over all
//! tranches and their releases, never stored as a running total.

use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Scheme components an allocation is earmarked for, stored as a JSON array.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct ComponentList(pub Vec<String>);

/// Allocation database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "fund_allocations")]
pub struct Model {
    /// Unique identifier for the allocation tranche
    #[sea_orm(primary_key)]
    pub id: i64,
    /// State the tranche is allocated to
    pub state_id: i64,
    /// Allocated amount in paise
    pub amount: i64,
    /// Scheme components covered by this tranche
    #[sea_orm(column_type = "Json")]
    pub components: ComponentList,
    /// Date of the allocation order
    pub allocated_on: Date,
    /// Identifier of the allocating officer
    pub officer_id: String,
    /// Allocating officer name
    pub officer_name: String,
    /// Allocating officer role
    pub officer_role: String,
    /// Allocating officer phone
    pub officer_phone: String,
    /// When the row was recorded
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Allocation and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each allocation tranche belongs to one state
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
