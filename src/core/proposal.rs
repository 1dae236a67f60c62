//! Proposal lifecycle business logic.
//!
//! Districts submit project proposals; states and then the ministry approve
//! or reject them. The workflow is a closed state machine - the transition
//! table lives on [`ProposalStatus`] and illegal moves are rejected before
//! anything is written. Every transition appends an audit row and enqueues
//! the notifications the hop calls for, all in one transaction.

use crate::entities::{
    Agency, District, Proposal, State, ProposalHistory,
    agency::AgencyStatus,
    notification::Channel,
    proposal,
    proposal::{DocumentList, DocumentMeta, ProposalStatus},
    proposal_history,
};
use crate::errors::{Error, Result};
use crate::notify::{outbox, templates};
use sea_orm::{
    ActiveEnum, DatabaseConnection, QueryOrder, Set, TransactionTrait, prelude::*,
};

/// Proposals accept at most this many supporting documents.
pub const MAX_DOCUMENTS: usize = 5;

/// Creates a proposal in `Submitted` and notifies the owning state.
pub async fn submit(
    db: &DatabaseConnection,
    district_id: i64,
    project_name: String,
    component: String,
    estimated_cost: i64,
    documents: Vec<DocumentMeta>,
) -> Result<proposal::Model> {
    if project_name.trim().is_empty() {
        return Err(Error::Validation {
            message: "project name cannot be empty".to_string(),
        });
    }
    if estimated_cost <= 0 {
        return Err(Error::InvalidAmount {
            amount: estimated_cost,
        });
    }
    if documents.len() > MAX_DOCUMENTS {
        return Err(Error::Validation {
            message: format!("at most {MAX_DOCUMENTS} supporting documents are accepted"),
        });
    }

    let txn = db.begin().await?;

    let district = District::find_by_id(district_id)
        .one(&txn)
        .await?
        .ok_or(Error::DistrictNotFound { id: district_id })?;
    let state = State::find_by_id(district.state_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::StateNotFound {
            name: district.state_id.to_string(),
        })?;

    let created = proposal::ActiveModel {
        district_id: Set(district_id),
        project_name: Set(project_name.trim().to_string()),
        component: Set(component),
        estimated_cost: Set(estimated_cost),
        allocated_amount: Set(0),
        released_amount: Set(0),
        status: Set(ProposalStatus::Submitted),
        documents: Set(DocumentList(documents)),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    outbox::enqueue(
        &txn,
        Channel::Whatsapp,
        &state.admin_phone,
        &templates::proposal_submitted(&district.name, &created.project_name, estimated_cost),
    )
    .await?;

    txn.commit().await?;

    Ok(created)
}

/// Moves a proposal to a new status.
///
/// Rejects moves the transition table does not allow. Ministry approval fixes
/// the allocated amount (the explicit value, or the estimated cost when none
/// is given). The district is notified of every decision; the ministry is
/// notified only of state-level approvals.
pub async fn transition(
    db: &DatabaseConnection,
    proposal_id: i64,
    new_status: ProposalStatus,
    actor: String,
    reason: Option<String>,
    allocated_amount: Option<i64>,
    ministry_phone: &str,
) -> Result<proposal::Model> {
    let txn = db.begin().await?;

    let current = Proposal::find_by_id(proposal_id)
        .one(&txn)
        .await?
        .ok_or(Error::ProposalNotFound { id: proposal_id })?;

    if !current.status.can_transition_to(new_status) {
        return Err(Error::InvalidTransition {
            from: current.status.to_value(),
            to: new_status.to_value(),
        });
    }

    let district = District::find_by_id(current.district_id)
        .one(&txn)
        .await?
        .ok_or(Error::DistrictNotFound {
            id: current.district_id,
        })?;

    let now = chrono::Utc::now();
    let previous_status = current.status;
    let project_name = current.project_name.clone();
    let estimated_cost = current.estimated_cost;

    let mut active: proposal::ActiveModel = current.into();
    active.status = Set(new_status);
    active.decided_by = Set(Some(actor.clone()));
    active.decided_at = Set(Some(now));
    if new_status.is_rejection() {
        active.rejection_reason = Set(reason.clone());
    }
    if new_status == ProposalStatus::ApprovedByMinistry {
        let ceiling = allocated_amount.unwrap_or(estimated_cost);
        if ceiling <= 0 {
            return Err(Error::InvalidAmount { amount: ceiling });
        }
        active.allocated_amount = Set(ceiling);
    }
    let updated = active.update(&txn).await?;

    proposal_history::ActiveModel {
        proposal_id: Set(proposal_id),
        from_status: Set(previous_status),
        to_status: Set(new_status),
        actor: Set(actor),
        remarks: Set(reason.clone()),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    outbox::enqueue(
        &txn,
        Channel::Whatsapp,
        &district.admin_phone,
        &templates::proposal_decision(&project_name, new_status, reason.as_deref()),
    )
    .await?;

    if new_status == ProposalStatus::ApprovedByState {
        outbox::enqueue(
            &txn,
            Channel::Whatsapp,
            ministry_phone,
            &templates::ministry_review_requested(&project_name, &district.name),
        )
        .await?;
    }

    txn.commit().await?;

    Ok(updated)
}

/// Assigns an implementing agency to an approved proposal and notifies it.
pub async fn assign_agency(
    db: &DatabaseConnection,
    proposal_id: i64,
    agency_id: i64,
) -> Result<proposal::Model> {
    let txn = db.begin().await?;

    let current = Proposal::find_by_id(proposal_id)
        .one(&txn)
        .await?
        .ok_or(Error::ProposalNotFound { id: proposal_id })?;

    if !current.status.is_assignment_eligible() {
        return Err(Error::Validation {
            message: format!(
                "proposal must be approved before an agency can be assigned (currently {})",
                current.status.to_value()
            ),
        });
    }

    let agency = Agency::find_by_id(agency_id)
        .one(&txn)
        .await?
        .ok_or(Error::AgencyNotFound { id: agency_id })?;
    if agency.status != AgencyStatus::Active {
        return Err(Error::Validation {
            message: format!("agency {} is not active", agency.name),
        });
    }

    let project_name = current.project_name.clone();
    let mut active: proposal::ActiveModel = current.into();
    active.agency_id = Set(Some(agency_id));
    let updated = active.update(&txn).await?;

    let body = templates::agency_assigned(&agency.name, &project_name);
    outbox::enqueue(&txn, Channel::Whatsapp, &agency.contact_phone, &body).await?;
    if let Some(token) = &agency.push_token {
        outbox::enqueue(&txn, Channel::Push, token, &body).await?;
    }

    txn.commit().await?;

    Ok(updated)
}

/// Finds a proposal by id.
pub async fn get_proposal(
    db: &DatabaseConnection,
    proposal_id: i64,
) -> Result<Option<proposal::Model>> {
    Proposal::find_by_id(proposal_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Returns the audit trail of a proposal, oldest first.
pub async fn get_history(
    db: &DatabaseConnection,
    proposal_id: i64,
) -> Result<Vec<proposal_history::Model>> {
    ProposalHistory::find()
        .filter(proposal_history::Column::ProposalId.eq(proposal_id))
        .order_by_asc(proposal_history::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists proposals currently sitting in `Submitted`.
pub async fn find_submitted(db: &DatabaseConnection) -> Result<Vec<proposal::Model>> {
    Proposal::find()
        .filter(proposal::Column::Status.eq(ProposalStatus::Submitted))
        .order_by_asc(proposal::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_transition_table() {
        use ProposalStatus as S;

        assert!(S::Submitted.can_transition_to(S::ApprovedByState));
        assert!(S::Submitted.can_transition_to(S::RejectedByState));
        assert!(S::ApprovedByState.can_transition_to(S::ApprovedByMinistry));
        assert!(S::ApprovedByState.can_transition_to(S::RejectedByMinistry));
        assert!(S::ApprovedByMinistry.can_transition_to(S::Completed));

        // Skipping the state hop is illegal
        assert!(!S::Submitted.can_transition_to(S::ApprovedByMinistry));
        assert!(!S::Submitted.can_transition_to(S::Completed));
        // Terminal states admit nothing
        assert!(!S::RejectedByState.can_transition_to(S::ApprovedByState));
        assert!(!S::RejectedByMinistry.can_transition_to(S::Completed));
        assert!(!S::Completed.can_transition_to(S::Submitted));
        // No self-loops
        assert!(!S::Submitted.can_transition_to(S::Submitted));
    }

    #[tokio::test]
    async fn test_submit_validation() -> Result<()> {
        let (db, _state, district) = setup_with_district().await?;

        let result = submit(
            &db,
            district.id,
            "  ".to_string(),
            "Adarsh Gram".to_string(),
            lakhs(5),
            vec![],
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        let result = submit(
            &db,
            district.id,
            "Community Hall".to_string(),
            "Adarsh Gram".to_string(),
            0,
            vec![],
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { .. }));

        let too_many = (0..6).map(|i| test_document(&format!("doc{i}.pdf"))).collect();
        let result = submit(
            &db,
            district.id,
            "Community Hall".to_string(),
            "Adarsh Gram".to_string(),
            lakhs(5),
            too_many,
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_submit_creates_submitted_and_notifies_state() -> Result<()> {
        let (db, state, district) = setup_with_district().await?;

        let created = submit(
            &db,
            district.id,
            "Community Hall".to_string(),
            "Adarsh Gram".to_string(),
            500_000_00,
            vec![test_document("estimate.pdf")],
        )
        .await?;

        assert_eq!(created.status, ProposalStatus::Submitted);
        assert_eq!(created.estimated_cost, 500_000_00);
        assert_eq!(created.allocated_amount, 0);
        assert_eq!(created.released_amount, 0);
        assert_eq!(created.documents.0.len(), 1);

        let pending = pending_notifications(&db).await?;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].recipient, state.admin_phone);
        assert!(pending[0].body.contains("Community Hall"));

        Ok(())
    }

    #[tokio::test]
    async fn test_illegal_transition_rejected_without_writes() -> Result<()> {
        let (db, _state, district) = setup_with_district().await?;
        let prop = create_test_proposal(&db, district.id).await?;

        let result = transition(
            &db,
            prop.id,
            ProposalStatus::Completed,
            "ministry-admin".to_string(),
            None,
            None,
            MINISTRY_PHONE,
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidTransition { from, to } if from == "SUBMITTED" && to == "COMPLETED"
        ));

        let unchanged = get_proposal(&db, prop.id).await?.unwrap();
        assert_eq!(unchanged.status, ProposalStatus::Submitted);
        assert!(get_history(&db, prop.id).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_state_approval_notifies_district_and_ministry() -> Result<()> {
        let (db, _state, district) = setup_with_district().await?;
        let prop = create_test_proposal(&db, district.id).await?;
        drain_notifications(&db).await?;

        let updated = transition(
            &db,
            prop.id,
            ProposalStatus::ApprovedByState,
            "state-admin".to_string(),
            None,
            None,
            MINISTRY_PHONE,
        )
        .await?;
        assert_eq!(updated.status, ProposalStatus::ApprovedByState);

        let pending = pending_notifications(&db).await?;
        assert_eq!(pending.len(), 2);
        assert!(pending.iter().any(|n| n.recipient == district.admin_phone));
        assert!(pending.iter().any(|n| n.recipient == MINISTRY_PHONE));

        Ok(())
    }

    #[tokio::test]
    async fn test_ministry_rejection_notifies_only_district_with_reason() -> Result<()> {
        let (db, _state, district) = setup_with_district().await?;
        let prop = create_test_proposal(&db, district.id).await?;
        transition(
            &db,
            prop.id,
            ProposalStatus::ApprovedByState,
            "state-admin".to_string(),
            None,
            None,
            MINISTRY_PHONE,
        )
        .await?;
        drain_notifications(&db).await?;

        let updated = transition(
            &db,
            prop.id,
            ProposalStatus::RejectedByMinistry,
            "ministry-admin".to_string(),
            Some("cost estimate not justified".to_string()),
            None,
            MINISTRY_PHONE,
        )
        .await?;
        assert_eq!(updated.status, ProposalStatus::RejectedByMinistry);
        assert_eq!(
            updated.rejection_reason.as_deref(),
            Some("cost estimate not justified")
        );

        let pending = pending_notifications(&db).await?;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].recipient, district.admin_phone);
        assert!(pending[0].body.contains("cost estimate not justified"));

        Ok(())
    }

    #[tokio::test]
    async fn test_ministry_approval_fixes_allocated_amount() -> Result<()> {
        let (db, _state, district) = setup_with_district().await?;
        let prop = create_test_proposal(&db, district.id).await?;
        transition(
            &db,
            prop.id,
            ProposalStatus::ApprovedByState,
            "state-admin".to_string(),
            None,
            None,
            MINISTRY_PHONE,
        )
        .await?;

        let updated = transition(
            &db,
            prop.id,
            ProposalStatus::ApprovedByMinistry,
            "ministry-admin".to_string(),
            None,
            Some(lakhs(4)),
            MINISTRY_PHONE,
        )
        .await?;
        assert_eq!(updated.allocated_amount, lakhs(4));

        Ok(())
    }

    #[tokio::test]
    async fn test_ministry_approval_defaults_to_estimated_cost() -> Result<()> {
        let (db, _state, district) = setup_with_district().await?;
        let prop = create_test_proposal(&db, district.id).await?;
        transition(
            &db,
            prop.id,
            ProposalStatus::ApprovedByState,
            "state-admin".to_string(),
            None,
            None,
            MINISTRY_PHONE,
        )
        .await?;

        let updated = transition(
            &db,
            prop.id,
            ProposalStatus::ApprovedByMinistry,
            "ministry-admin".to_string(),
            None,
            None,
            MINISTRY_PHONE,
        )
        .await?;
        assert_eq!(updated.allocated_amount, updated.estimated_cost);

        Ok(())
    }

    #[tokio::test]
    async fn test_history_records_every_transition() -> Result<()> {
        let (db, _state, district) = setup_with_district().await?;
        let prop = create_test_proposal(&db, district.id).await?;

        transition(
            &db,
            prop.id,
            ProposalStatus::ApprovedByState,
            "state-admin".to_string(),
            None,
            None,
            MINISTRY_PHONE,
        )
        .await?;
        transition(
            &db,
            prop.id,
            ProposalStatus::ApprovedByMinistry,
            "ministry-admin".to_string(),
            None,
            None,
            MINISTRY_PHONE,
        )
        .await?;

        let history = get_history(&db, prop.id).await?;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].from_status, ProposalStatus::Submitted);
        assert_eq!(history[0].to_status, ProposalStatus::ApprovedByState);
        assert_eq!(history[0].actor, "state-admin");
        assert_eq!(history[1].from_status, ProposalStatus::ApprovedByState);
        assert_eq!(history[1].to_status, ProposalStatus::ApprovedByMinistry);

        Ok(())
    }

    #[tokio::test]
    async fn test_assignment_requires_approval_and_active_agency() -> Result<()> {
        let (db, state, district) = setup_with_district().await?;
        let prop = create_test_proposal(&db, district.id).await?;
        let active = create_active_agency(&db, state.id, Some(district.id)).await?;
        let pending = create_pending_agency(&db, state.id, Some(district.id)).await?;

        // Submitted proposals are not assignment-eligible
        let result = assign_agency(&db, prop.id, active.id).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        transition(
            &db,
            prop.id,
            ProposalStatus::ApprovedByState,
            "state-admin".to_string(),
            None,
            None,
            MINISTRY_PHONE,
        )
        .await?;

        let result = assign_agency(&db, prop.id, pending.id).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        let updated = assign_agency(&db, prop.id, active.id).await?;
        assert_eq!(updated.agency_id, Some(active.id));

        Ok(())
    }

    #[tokio::test]
    async fn test_find_submitted() -> Result<()> {
        let (db, _state, district) = setup_with_district().await?;
        let first = create_test_proposal(&db, district.id).await?;
        let second = create_test_proposal(&db, district.id).await?;
        transition(
            &db,
            second.id,
            ProposalStatus::ApprovedByState,
            "state-admin".to_string(),
            None,
            None,
            MINISTRY_PHONE,
        )
        .await?;

        let submitted = find_submitted(&db).await?;
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].id, first.id);

        Ok(())
    }
}
