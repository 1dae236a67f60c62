//! Message body rendering for every notification the service sends.
//!
//! Bodies are rendered at enqueue time so the outbox row is self-contained;
//! the worker only moves bytes. Amounts are formatted with Indian digit
//! grouping via [`format_inr`].

use crate::core::report::format_inr;
use crate::core::uc::{Verdict, utilization_percent};
use crate::entities::proposal::ProposalStatus;

/// Body for the state admin when a new allocation tranche is recorded.
#[must_use]
pub fn allocation_received(state_name: &str, amount: i64, components: &[String]) -> String {
    format!(
        "Allocation of {} recorded for {state_name} under {}.",
        format_inr(amount),
        components.join(", ")
    )
}

/// Body for the downstream recipient of a fund release.
#[must_use]
pub fn release_received(target_name: &str, amount: i64, sanction_ref: &str) -> String {
    format!(
        "{} released to {target_name} (sanction {sanction_ref}).",
        format_inr(amount)
    )
}

/// Body for the district admin when a village release is recorded.
#[must_use]
pub fn village_release_recorded(village_code: &str, amount: i64, sanction_ref: &str) -> String {
    format!(
        "{} released to village {village_code} (sanction {sanction_ref}).",
        format_inr(amount)
    )
}

/// Body for the state admin when a district submits a proposal.
#[must_use]
pub fn proposal_submitted(district_name: &str, project_name: &str, estimated_cost: i64) -> String {
    format!(
        "New proposal from {district_name}: {project_name}, estimated {}. Review pending.",
        format_inr(estimated_cost)
    )
}

/// Body for the district admin when a decision lands on its proposal.
#[must_use]
pub fn proposal_decision(
    project_name: &str,
    status: ProposalStatus,
    reason: Option<&str>,
) -> String {
    let verdict = match status {
        ProposalStatus::ApprovedByState => "approved by the state",
        ProposalStatus::RejectedByState => "rejected by the state",
        ProposalStatus::ApprovedByMinistry => "approved by the ministry",
        ProposalStatus::RejectedByMinistry => "rejected by the ministry",
        ProposalStatus::Completed => "marked completed",
        ProposalStatus::Submitted => "recorded",
    };

    reason.map_or_else(
        || format!("Proposal {project_name} has been {verdict}."),
        |reason| format!("Proposal {project_name} has been {verdict}. Reason: {reason}"),
    )
}

/// Body for the ministry when a state forwards an approved proposal.
#[must_use]
pub fn ministry_review_requested(project_name: &str, district_name: &str) -> String {
    format!("Proposal {project_name} from {district_name} is state-approved and awaits ministry review.")
}

/// Body for an agency newly assigned to a project.
#[must_use]
pub fn agency_assigned(agency_name: &str, project_name: &str) -> String {
    format!("{agency_name} has been assigned to project {project_name}.")
}

/// Body for the state admin when a district files a utilization certificate.
#[must_use]
pub fn certificate_submitted(
    district_name: &str,
    financial_year: &str,
    fund_released: i64,
    fund_utilized: i64,
) -> String {
    let percent = utilization_percent(fund_released, fund_utilized);
    format!(
        "UC for {financial_year} from {district_name}: released {}, utilized {} ({percent:.1}% utilisation). Verification pending.",
        format_inr(fund_released),
        format_inr(fund_utilized)
    )
}

/// Body for the district admin when the state decides on its certificate.
#[must_use]
pub fn certificate_decided(
    financial_year: &str,
    verdict: Verdict,
    remarks: Option<&str>,
) -> String {
    let decided = match verdict {
        Verdict::Verified => "verified",
        Verdict::Rejected => "rejected",
    };

    remarks.map_or_else(
        || format!("Your UC for {financial_year} has been {decided}."),
        |remarks| format!("Your UC for {financial_year} has been {decided}. Remarks: {remarks}"),
    )
}

/// Reminder body for a proposal still awaiting state review.
#[must_use]
pub fn proposal_reminder(project_name: &str, district_name: &str) -> String {
    format!("Reminder: proposal {project_name} from {district_name} is still awaiting review.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocation_body_lists_components() {
        let body = allocation_received(
            "Maharashtra",
            1_000_000_000_00,
            &["Adarsh Gram".to_string(), "Hostel".to_string()],
        );
        assert_eq!(
            body,
            "Allocation of ₹10,00,00,000.00 recorded for Maharashtra under Adarsh Gram, Hostel."
        );
    }

    #[test]
    fn test_decision_body_with_reason() {
        let body = proposal_decision(
            "Community Hall",
            ProposalStatus::RejectedByMinistry,
            Some("cost estimate not justified"),
        );
        assert!(body.contains("rejected by the ministry"));
        assert!(body.contains("Reason: cost estimate not justified"));
    }

    #[test]
    fn test_decision_body_without_reason() {
        let body = proposal_decision("Community Hall", ProposalStatus::ApprovedByState, None);
        assert_eq!(body, "Proposal Community Hall has been approved by the state.");
    }

    #[test]
    fn test_certificate_body_carries_percentage() {
        let body = certificate_submitted("Pune", "2025-26", 1_000_000, 800_000);
        assert!(body.contains("80.0% utilisation"));
        assert!(body.contains("₹10,000.00"));
    }
}
