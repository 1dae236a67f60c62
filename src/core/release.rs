//! Release coordinator business logic.
//!
//! Validates and records a fund transfer at any hop of the
//! Ministry -> State -> District -> Agency/Village hierarchy. Every hop
//! follows the same shape: resolve the target, recompute the spendable
//! balance, reject anything that would overshoot it, insert the immutable
//! release row, and enqueue the downstream notification - all inside one
//! database transaction so the check and the write observe the same snapshot.
//!
//! Programme releases draw on the source's programme balance. Project-linked
//! releases draw on a ministry-approved proposal's allocation instead and are
//! guarded by a conditional update on the proposal row.

use crate::core::allocation::{get_state_balance, sum_releases};
use crate::entities::{
    Agency, District, Proposal, State,
    agency::AgencyStatus,
    notification::Channel,
    proposal,
    proposal::ProposalStatus,
    release,
    release::{ReleaseHop, ReleaseKind},
    state,
};
use crate::errors::{Error, Result};
use crate::notify::{outbox, templates};
use sea_orm::sea_query::{Expr, ExprTrait};
use sea_orm::{Condition, DatabaseConnection, DatabaseTransaction, Set, TransactionTrait, prelude::*};

/// Order metadata common to every release.
#[derive(Debug, Clone)]
pub struct ReleaseMeta {
    /// Sanction/order reference
    pub sanction_ref: String,
    /// Free-text remarks
    pub remarks: Option<String>,
    /// Identifier of the releasing officer
    pub released_by: String,
    /// Date of the release order
    pub released_on: Date,
}

/// What a ministry-to-state release draws against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateReleaseKind {
    /// Draws on the state's programme ceiling
    Programme,
    /// Draws on an approved proposal's allocation; bypasses the state ceiling
    Project {
        /// The ministry-approved proposal being funded
        proposal_id: i64,
    },
}

/// Computed fund position of a district.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct DistrictFundPosition {
    /// Total received from the state, in paise
    pub received: i64,
    /// Total sent onward to agencies and villages, in paise
    pub disbursed: i64,
    /// `received - disbursed`, in paise
    pub remaining: i64,
}

/// Records a ministry-to-state release.
///
/// The target state is resolved by exact name match. Programme releases are
/// validated against the state's aggregate remaining balance; project
/// releases against the linked proposal's allocation.
pub async fn release_to_state(
    db: &DatabaseConnection,
    state_name: &str,
    amount: i64,
    kind: StateReleaseKind,
    meta: ReleaseMeta,
) -> Result<release::Model> {
    validate_order(amount, &meta)?;

    let txn = db.begin().await?;

    let target = State::find()
        .filter(state::Column::Name.eq(state_name))
        .one(&txn)
        .await?
        .ok_or_else(|| Error::StateNotFound {
            name: state_name.to_string(),
        })?;

    let (stored_kind, proposal_id) = match kind {
        StateReleaseKind::Programme => {
            let balance = get_state_balance(&txn, target.id).await?;
            if amount > balance.remaining {
                return Err(Error::InsufficientBalance {
                    available: balance.remaining,
                    requested: amount,
                });
            }
            (ReleaseKind::Programme, None)
        }
        StateReleaseKind::Project { proposal_id } => {
            apply_proposal_release(&txn, proposal_id, amount).await?;
            (ReleaseKind::ProjectLinked, Some(proposal_id))
        }
    };

    let released = release::ActiveModel {
        hop: Set(ReleaseHop::MinistryToState),
        kind: Set(stored_kind),
        state_id: Set(Some(target.id)),
        proposal_id: Set(proposal_id),
        amount: Set(amount),
        released_on: Set(meta.released_on),
        sanction_ref: Set(meta.sanction_ref.clone()),
        remarks: Set(meta.remarks),
        released_by: Set(meta.released_by),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    outbox::enqueue(
        &txn,
        Channel::Whatsapp,
        &target.admin_phone,
        &templates::release_received(&target.name, amount, &meta.sanction_ref),
    )
    .await?;

    txn.commit().await?;

    Ok(released)
}

/// Records a state-to-district release.
///
/// The source state is the district's own state; its spendable balance is
/// what it has received from the ministry minus what it has already sent to
/// districts.
pub async fn release_to_district(
    db: &DatabaseConnection,
    district_id: i64,
    amount: i64,
    meta: ReleaseMeta,
) -> Result<release::Model> {
    validate_order(amount, &meta)?;

    let txn = db.begin().await?;

    let target = District::find_by_id(district_id)
        .one(&txn)
        .await?
        .ok_or(Error::DistrictNotFound { id: district_id })?;

    let spendable = state_spendable(&txn, target.state_id).await?;
    if amount > spendable {
        return Err(Error::InsufficientBalance {
            available: spendable,
            requested: amount,
        });
    }

    let released = release::ActiveModel {
        hop: Set(ReleaseHop::StateToDistrict),
        kind: Set(ReleaseKind::Programme),
        state_id: Set(Some(target.state_id)),
        district_id: Set(Some(target.id)),
        amount: Set(amount),
        released_on: Set(meta.released_on),
        sanction_ref: Set(meta.sanction_ref.clone()),
        remarks: Set(meta.remarks),
        released_by: Set(meta.released_by),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    outbox::enqueue(
        &txn,
        Channel::Whatsapp,
        &target.admin_phone,
        &templates::release_received(&target.name, amount, &meta.sanction_ref),
    )
    .await?;

    txn.commit().await?;

    Ok(released)
}

/// Records a district-to-agency release.
///
/// The district's spendable balance is recomputed per call: everything it has
/// received minus everything it has already sent onward. The agency must be
/// active and within the district's scope. An optional proposal linkage makes
/// this a project-linked release, additionally guarded by the proposal's
/// allocation ceiling.
pub async fn release_to_agency(
    db: &DatabaseConnection,
    district_id: i64,
    agency_id: i64,
    amount: i64,
    proposal_id: Option<i64>,
    meta: ReleaseMeta,
) -> Result<release::Model> {
    validate_order(amount, &meta)?;

    let txn = db.begin().await?;

    let source = District::find_by_id(district_id)
        .one(&txn)
        .await?
        .ok_or(Error::DistrictNotFound { id: district_id })?;

    let agency = Agency::find_by_id(agency_id)
        .one(&txn)
        .await?
        .ok_or(Error::AgencyNotFound { id: agency_id })?;

    if agency.status != AgencyStatus::Active {
        return Err(Error::Validation {
            message: format!("agency {} is not active", agency.name),
        });
    }
    let in_scope = match agency.district_id {
        Some(scope) => scope == district_id,
        None => agency.state_id == source.state_id,
    };
    if !in_scope {
        return Err(Error::Validation {
            message: format!("agency {} is outside the district's scope", agency.name),
        });
    }

    check_district_spendable(&txn, district_id, amount).await?;

    let kind = if let Some(proposal_id) = proposal_id {
        apply_proposal_release(&txn, proposal_id, amount).await?;
        ReleaseKind::ProjectLinked
    } else {
        ReleaseKind::Programme
    };

    let released = release::ActiveModel {
        hop: Set(ReleaseHop::DistrictToAgency),
        kind: Set(kind),
        district_id: Set(Some(district_id)),
        agency_id: Set(Some(agency.id)),
        proposal_id: Set(proposal_id),
        amount: Set(amount),
        released_on: Set(meta.released_on),
        sanction_ref: Set(meta.sanction_ref.clone()),
        remarks: Set(meta.remarks),
        released_by: Set(meta.released_by),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let body = templates::release_received(&agency.name, amount, &meta.sanction_ref);
    outbox::enqueue(&txn, Channel::Whatsapp, &agency.contact_phone, &body).await?;
    if let Some(token) = &agency.push_token {
        outbox::enqueue(&txn, Channel::Push, token, &body).await?;
    }

    txn.commit().await?;

    Ok(released)
}

/// Records a district-to-village release.
///
/// Villages carry no registry entry, so the district admin is the notified
/// party.
pub async fn release_to_village(
    db: &DatabaseConnection,
    district_id: i64,
    village_code: &str,
    amount: i64,
    meta: ReleaseMeta,
) -> Result<release::Model> {
    validate_order(amount, &meta)?;
    if village_code.trim().is_empty() {
        return Err(Error::Validation {
            message: "village code is required".to_string(),
        });
    }

    let txn = db.begin().await?;

    let source = District::find_by_id(district_id)
        .one(&txn)
        .await?
        .ok_or(Error::DistrictNotFound { id: district_id })?;

    check_district_spendable(&txn, district_id, amount).await?;

    let released = release::ActiveModel {
        hop: Set(ReleaseHop::DistrictToVillage),
        kind: Set(ReleaseKind::Programme),
        district_id: Set(Some(district_id)),
        village_code: Set(Some(village_code.trim().to_string())),
        amount: Set(amount),
        released_on: Set(meta.released_on),
        sanction_ref: Set(meta.sanction_ref.clone()),
        remarks: Set(meta.remarks),
        released_by: Set(meta.released_by),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    outbox::enqueue(
        &txn,
        Channel::Whatsapp,
        &source.admin_phone,
        &templates::village_release_recorded(village_code, amount, &meta.sanction_ref),
    )
    .await?;

    txn.commit().await?;

    Ok(released)
}

/// Computes a district's fund position: received from the state, sent onward
/// to agencies and villages, and the difference.
pub async fn district_fund_position<C>(db: &C, district_id: i64) -> Result<DistrictFundPosition>
where
    C: ConnectionTrait,
{
    District::find_by_id(district_id)
        .one(db)
        .await?
        .ok_or(Error::DistrictNotFound { id: district_id })?;

    let received = sum_releases(
        db,
        Condition::all()
            .add(release::Column::Hop.eq(ReleaseHop::StateToDistrict))
            .add(release::Column::DistrictId.eq(district_id)),
    )
    .await?;

    let disbursed = sum_releases(
        db,
        Condition::all()
            .add(
                release::Column::Hop
                    .is_in([ReleaseHop::DistrictToAgency, ReleaseHop::DistrictToVillage]),
            )
            .add(release::Column::DistrictId.eq(district_id)),
    )
    .await?;

    Ok(DistrictFundPosition {
        received,
        disbursed,
        remaining: received - disbursed,
    })
}

fn validate_order(amount: i64, meta: &ReleaseMeta) -> Result<()> {
    if amount <= 0 {
        return Err(Error::InvalidAmount { amount });
    }
    if meta.sanction_ref.trim().is_empty() {
        return Err(Error::Validation {
            message: "sanction reference is required".to_string(),
        });
    }
    Ok(())
}

/// What a state may still send to its districts: ministry programme money
/// received, minus district releases already made.
async fn state_spendable(txn: &DatabaseTransaction, state_id: i64) -> Result<i64> {
    let received = sum_releases(
        txn,
        Condition::all()
            .add(release::Column::Hop.eq(ReleaseHop::MinistryToState))
            .add(release::Column::Kind.eq(ReleaseKind::Programme))
            .add(release::Column::StateId.eq(state_id)),
    )
    .await?;

    let sent = sum_releases(
        txn,
        Condition::all()
            .add(release::Column::Hop.eq(ReleaseHop::StateToDistrict))
            .add(release::Column::StateId.eq(state_id)),
    )
    .await?;

    Ok(received - sent)
}

async fn check_district_spendable(
    txn: &DatabaseTransaction,
    district_id: i64,
    amount: i64,
) -> Result<()> {
    let position = district_fund_position(txn, district_id).await?;
    if amount > position.remaining {
        return Err(Error::InsufficientBalance {
            available: position.remaining,
            requested: amount,
        });
    }
    Ok(())
}

/// Applies a project-linked release to its proposal.
///
/// The proposal must be ministry-approved. The running total moves through a
/// conditional update - `released_amount = released_amount + amount` only
/// where the new total stays within `allocated_amount` - so the ceiling holds
/// even under concurrent releases.
async fn apply_proposal_release(
    txn: &DatabaseTransaction,
    proposal_id: i64,
    amount: i64,
) -> Result<()> {
    let prop = Proposal::find_by_id(proposal_id)
        .one(txn)
        .await?
        .ok_or(Error::ProposalNotFound { id: proposal_id })?;

    if prop.status != ProposalStatus::ApprovedByMinistry {
        return Err(Error::Validation {
            message: format!("proposal {proposal_id} is not approved by ministry for fund release"),
        });
    }

    let updated = Proposal::update_many()
        .col_expr(
            proposal::Column::ReleasedAmount,
            Expr::col(proposal::Column::ReleasedAmount).add(amount),
        )
        .filter(proposal::Column::Id.eq(proposal_id))
        .filter(
            Expr::col(proposal::Column::ReleasedAmount)
                .add(amount)
                .lte(Expr::col(proposal::Column::AllocatedAmount)),
        )
        .exec(txn)
        .await?;

    if updated.rows_affected == 0 {
        return Err(Error::InsufficientBalance {
            available: prop.allocated_amount - prop.released_amount,
            requested: amount,
        });
    }

    Ok(())
}
