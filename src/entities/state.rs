//! State entity - Registry of states participating in the scheme.
//!
//! States are the first hop of the fund-flow hierarchy. Each state carries the
//! administrator contact used as the notification recipient for allocations
//! and ministry-level releases. Release targeting resolves states by exact
//! name match, so `name` is unique.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// State database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "states")]
pub struct Model {
    /// Unique identifier for the state
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Official state name, unique, used for exact-match release targeting
    #[sea_orm(unique)]
    pub name: String,
    /// Short state code (e.g., "MH", "UP")
    pub code: String,
    /// Name of the state nodal administrator
    pub admin_name: String,
    /// Phone number notifications for this state are sent to
    pub admin_phone: String,
    /// When the state was registered
    pub created_at: DateTimeUtc,
}

/// Defines relationships between State and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One state has many districts
    #[sea_orm(has_many = "super::district::Entity")]
    Districts,
    /// One state has many allocation tranches
    #[sea_orm(has_many = "super::allocation::Entity")]
    Allocations,
}

impl Related<super::district::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Districts.def()
    }
}

impl Related<super::allocation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Allocations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
