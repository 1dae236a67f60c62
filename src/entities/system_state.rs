//! System state entity - Stores key-value pairs for background-job bookkeeping.
//! Used for per-proposal reminder counts and other state that must survive
//! process restarts.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// System state database model - stores key-value pairs
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "system_state")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Bookkeeping key (e.g., `"proposal_reminders:42"`)
    pub key: String,
    /// Value stored as string
    pub value: String,
    /// When this entry was last modified
    pub updated_at: DateTimeUtc,
}

/// `SystemState` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
