//! Release entity - One immutable row per fund transfer at a hop.
//!
//! Releases are never updated or deleted; corrections happen by inserting
//! compensating entries. The hop and kind discriminators are closed enums: a
//! project-linked release carries its proposal id as a first-class column
//! rather than encoding it into the sanction reference.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Directed edge of the fund-flow hierarchy a release travels along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(24))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReleaseHop {
    /// Ministry releases to a state
    #[sea_orm(string_value = "MINISTRY_TO_STATE")]
    MinistryToState,
    /// State releases to one of its districts
    #[sea_orm(string_value = "STATE_TO_DISTRICT")]
    StateToDistrict,
    /// District releases to an agency
    #[sea_orm(string_value = "DISTRICT_TO_AGENCY")]
    DistrictToAgency,
    /// District releases to a village
    #[sea_orm(string_value = "DISTRICT_TO_VILLAGE")]
    DistrictToVillage,
}

/// What a release draws against: the state programme ceiling, or a specific
/// approved proposal's allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReleaseKind {
    /// Validated against the target's programme balance
    #[sea_orm(string_value = "PROGRAMME")]
    Programme,
    /// Validated against the linked proposal's allocated amount
    #[sea_orm(string_value = "PROJECT_LINKED")]
    ProjectLinked,
}

/// Release database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "fund_releases")]
pub struct Model {
    /// Unique identifier for the release
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Hop this release travels along
    pub hop: ReleaseHop,
    /// Programme or project-linked
    pub kind: ReleaseKind,
    /// Target/source state, set for ministry-to-state and state-to-district hops
    pub state_id: Option<i64>,
    /// Target/source district, set for all hops below ministry-to-state
    pub district_id: Option<i64>,
    /// Target agency, set for district-to-agency hops
    pub agency_id: Option<i64>,
    /// Target village code, set for district-to-village hops
    pub village_code: Option<String>,
    /// Linked proposal, set exactly when `kind` is `ProjectLinked`
    pub proposal_id: Option<i64>,
    /// Transferred amount in paise
    pub amount: i64,
    /// Date of the release order
    pub released_on: Date,
    /// Sanction/order reference
    pub sanction_ref: String,
    /// Free-text remarks
    pub remarks: Option<String>,
    /// Identifier of the releasing officer
    pub released_by: String,
    /// When the row was recorded
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Release and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A project-linked release references one proposal
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
