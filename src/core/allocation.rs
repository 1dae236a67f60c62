//! Allocation ledger business logic.
//!
//! The ministry allocates funds to states in tranches: one append-only row
//! per allocation event. A state's ceiling and released-to-date are always
//! aggregates over every tranche and every programme release recorded against
//! the state, so reads and ceiling checks can never disagree about which row
//! is authoritative.

use crate::entities::{
    Allocation, Release, State, allocation,
    allocation::ComponentList,
    notification::Channel,
    release,
    release::{ReleaseHop, ReleaseKind},
};
use crate::errors::{Error, Result};
use crate::notify::{outbox, templates};
use sea_orm::{
    Condition, DatabaseConnection, FromQueryResult, QuerySelect, Set, TransactionTrait, prelude::*,
};

/// Identity of the officer recording an allocation.
#[derive(Debug, Clone)]
pub struct OfficerMeta {
    /// Officer identifier
    pub id: String,
    /// Officer name
    pub name: String,
    /// Officer role
    pub role: String,
    /// Officer phone
    pub phone: String,
}

/// Aggregate fund position of a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct StateBalance {
    /// Total allocated across all tranches, in paise
    pub allocated: i64,
    /// Total released through programme releases, in paise
    pub released: i64,
    /// `allocated - released`, in paise
    pub remaining: i64,
}

#[derive(FromQueryResult)]
struct AmountSum {
    total: Option<i64>,
}

/// Records a new allocation tranche for a state and notifies its admin.
///
/// The tranche insert and the notification enqueue share one transaction.
pub async fn allocate(
    db: &DatabaseConnection,
    state_id: i64,
    amount: i64,
    components: Vec<String>,
    officer: OfficerMeta,
    allocated_on: Date,
) -> Result<allocation::Model> {
    if amount <= 0 {
        return Err(Error::InvalidAmount { amount });
    }
    if components.is_empty() {
        return Err(Error::Validation {
            message: "at least one scheme component is required".to_string(),
        });
    }

    let txn = db.begin().await?;

    let state = State::find_by_id(state_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::StateNotFound {
            name: state_id.to_string(),
        })?;

    let tranche = allocation::ActiveModel {
        state_id: Set(state_id),
        amount: Set(amount),
        components: Set(ComponentList(components.clone())),
        allocated_on: Set(allocated_on),
        officer_id: Set(officer.id),
        officer_name: Set(officer.name),
        officer_role: Set(officer.role),
        officer_phone: Set(officer.phone),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    outbox::enqueue(
        &txn,
        Channel::Whatsapp,
        &state.admin_phone,
        &templates::allocation_received(&state.name, amount, &components),
    )
    .await?;

    txn.commit().await?;

    Ok(tranche)
}

/// Computes a state's aggregate fund position.
///
/// Allocated sums every tranche; released sums every ministry-to-state
/// programme release. Project-linked releases draw on proposal allocations
/// and do not count against the state programme ceiling.
pub async fn get_state_balance<C>(db: &C, state_id: i64) -> Result<StateBalance>
where
    C: ConnectionTrait,
{
    let allocated = sum_allocations(db, state_id).await?;
    let released = sum_programme_releases(db, state_id).await?;

    Ok(StateBalance {
        allocated,
        released,
        remaining: allocated - released,
    })
}

/// Sums all allocation tranches recorded for a state.
pub async fn sum_allocations<C>(db: &C, state_id: i64) -> Result<i64>
where
    C: ConnectionTrait,
{
    let row = Allocation::find()
        .select_only()
        .column_as(allocation::Column::Amount.sum(), "total")
        .filter(allocation::Column::StateId.eq(state_id))
        .into_model::<AmountSum>()
        .one(db)
        .await?;

    Ok(row.and_then(|r| r.total).unwrap_or(0))
}

/// Sums ministry-to-state programme releases received by a state.
pub async fn sum_programme_releases<C>(db: &C, state_id: i64) -> Result<i64>
where
    C: ConnectionTrait,
{
    sum_releases(
        db,
        Condition::all()
            .add(release::Column::Hop.eq(ReleaseHop::MinistryToState))
            .add(release::Column::Kind.eq(ReleaseKind::Programme))
            .add(release::Column::StateId.eq(state_id)),
    )
    .await
}

/// Sums release amounts matching a condition. Empty result sets sum to zero.
pub(crate) async fn sum_releases<C>(db: &C, condition: Condition) -> Result<i64>
where
    C: ConnectionTrait,
{
    let row = Release::find()
        .select_only()
        .column_as(release::Column::Amount.sum(), "total")
        .filter(condition)
        .into_model::<AmountSum>()
        .one(db)
        .await?;

    Ok(row.and_then(|r| r.total).unwrap_or(0))
}
