//! Fund position reporting and currency formatting.
//!
//! Structured report data for the API layer, plus the rupee formatting used
//! by notification bodies. Reports are read-only aggregations; nothing here
//! writes.

use crate::core::allocation::{get_state_balance, sum_releases};
use crate::entities::{
    District, State, district,
    release,
    release::ReleaseHop,
};
use crate::errors::{Error, Result};
use sea_orm::{Condition, DatabaseConnection, QueryOrder, prelude::*};
use serde::Serialize;

/// Funds received by one district of the reported state.
#[derive(Debug, Clone, Serialize)]
pub struct DistrictBreakdown {
    /// The district
    pub district: district::Model,
    /// Total received from the state, in paise
    pub received: i64,
}

/// Aggregate fund position of a state with a per-district breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct StateFundReport {
    /// State name
    pub state_name: String,
    /// Total allocated across all tranches, in paise
    pub allocated: i64,
    /// Total released through programme releases, in paise
    pub released: i64,
    /// Remaining programme balance, in paise
    pub remaining: i64,
    /// Per-district received totals
    pub districts: Vec<DistrictBreakdown>,
}

/// Builds the fund position report for a state.
pub async fn state_fund_report(
    db: &DatabaseConnection,
    state_id: i64,
) -> Result<StateFundReport> {
    let state = State::find_by_id(state_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::StateNotFound {
            name: state_id.to_string(),
        })?;

    let balance = get_state_balance(db, state_id).await?;

    let districts = District::find()
        .filter(district::Column::StateId.eq(state_id))
        .order_by_asc(district::Column::Name)
        .all(db)
        .await?;

    let mut breakdown = Vec::with_capacity(districts.len());
    for district in districts {
        let received = sum_releases(
            db,
            Condition::all()
                .add(release::Column::Hop.eq(ReleaseHop::StateToDistrict))
                .add(release::Column::DistrictId.eq(district.id)),
        )
        .await?;
        breakdown.push(DistrictBreakdown { district, received });
    }

    Ok(StateFundReport {
        state_name: state.name,
        allocated: balance.allocated,
        released: balance.released,
        remaining: balance.remaining,
        districts: breakdown,
    })
}

/// Formats paise as rupees with Indian digit grouping, e.g.
/// `₹10,00,00,000.00` for ten crore rupees.
#[must_use]
pub fn format_inr(paise: i64) -> String {
    let sign = if paise < 0 { "-" } else { "" };
    let abs = paise.unsigned_abs();
    let rupees = abs / 100;
    let fraction = abs % 100;

    let digits = rupees.to_string();
    let grouped = if digits.len() > 3 {
        let (head, tail) = digits.split_at(digits.len() - 3);
        let mut parts: Vec<&str> = Vec::new();
        let mut idx = head.len();
        while idx > 2 {
            parts.push(&head[idx - 2..idx]);
            idx -= 2;
        }
        parts.push(&head[..idx]);
        parts.reverse();
        format!("{},{tail}", parts.join(","))
    } else {
        digits
    };

    format!("{sign}\u{20b9}{grouped}.{fraction:02}")
}
