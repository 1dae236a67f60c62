//! Shared test utilities for `FundFlow`.
//!
//! Common helpers for setting up in-memory test databases and creating test
//! entities with sensible defaults. Registry rows (states, districts,
//! agencies, allocations) are inserted directly so fixtures do not enqueue
//! notifications; workflow fixtures (proposals, certificates) go through the
//! core operations so their side effects stay realistic.

use crate::config::database::create_tables;
use crate::core::allocation::OfficerMeta;
use crate::core::proposal;
use crate::core::release::{ReleaseMeta, StateReleaseKind, release_to_district, release_to_state};
use crate::core::uc;
use crate::entities::{
    Notification, agency,
    agency::{AgencyKind, AgencyStatus},
    allocation,
    allocation::ComponentList,
    district, notification,
    notification::DeliveryStatus,
    proposal::{DocumentMeta, ProposalStatus},
    state, utilization_certificate,
};
use crate::errors::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::atomic::{AtomicU64, Ordering};

/// Ministry contact used across tests.
pub const MINISTRY_PHONE: &str = "+911100000000";

static EMAIL_SEQ: AtomicU64 = AtomicU64::new(0);

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    create_tables(&db).await?;
    Ok(db)
}

/// Today's date, for order dates.
pub fn today() -> chrono::NaiveDate {
    chrono::Utc::now().date_naive()
}

/// `n` crore rupees in paise.
pub const fn crores(n: i64) -> i64 {
    n * 10_000_000 * 100
}

/// `n` lakh rupees in paise.
pub const fn lakhs(n: i64) -> i64 {
    n * 100_000 * 100
}

/// Officer metadata with test defaults.
pub fn test_officer() -> OfficerMeta {
    OfficerMeta {
        id: "OFF-001".to_string(),
        name: "R. Sharma".to_string(),
        role: "Under Secretary".to_string(),
        phone: "+911100000099".to_string(),
    }
}

/// Release order metadata with test defaults.
pub fn test_meta() -> ReleaseMeta {
    ReleaseMeta {
        sanction_ref: "SNC-2026-001".to_string(),
        remarks: None,
        released_by: "ministry-desk".to_string(),
        released_on: today(),
    }
}

/// Document metadata with test defaults.
pub fn test_document(name: &str) -> DocumentMeta {
    DocumentMeta {
        name: name.to_string(),
        url: format!("https://docs.example/{name}"),
        content_type: "application/pdf".to_string(),
        size: 1024,
    }
}

/// Creates a test state with the given name.
pub async fn create_test_state(db: &DatabaseConnection, name: &str) -> Result<state::Model> {
    state::ActiveModel {
        name: Set(name.to_string()),
        code: Set("TS".to_string()),
        admin_name: Set("T. Admin".to_string()),
        admin_phone: Set("+919800000001".to_string()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Creates a test district under a state.
pub async fn create_test_district(
    db: &DatabaseConnection,
    state_id: i64,
    name: &str,
) -> Result<district::Model> {
    district::ActiveModel {
        state_id: Set(state_id),
        name: Set(name.to_string()),
        admin_phone: Set("+919800000002".to_string()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Sets up a database with one state named "Test State".
pub async fn setup_with_state() -> Result<(DatabaseConnection, state::Model)> {
    let db = setup_test_db().await?;
    let state = create_test_state(&db, "Test State").await?;
    Ok((db, state))
}

/// Sets up a database with "Test State" and "Test District".
pub async fn setup_with_district()
-> Result<(DatabaseConnection, state::Model, district::Model)> {
    let db = setup_test_db().await?;
    let state = create_test_state(&db, "Test State").await?;
    let district = create_test_district(&db, state.id, "Test District").await?;
    Ok((db, state, district))
}

/// Inserts an allocation tranche directly, without the notification side
/// effect.
pub async fn create_test_allocation(
    db: &DatabaseConnection,
    state_id: i64,
    amount: i64,
) -> Result<allocation::Model> {
    allocation::ActiveModel {
        state_id: Set(state_id),
        amount: Set(amount),
        components: Set(ComponentList(vec!["Adarsh Gram".to_string()])),
        allocated_on: Set(today()),
        officer_id: Set("OFF-001".to_string()),
        officer_name: Set("R. Sharma".to_string()),
        officer_role: Set("Under Secretary".to_string()),
        officer_phone: Set("+911100000099".to_string()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Moves `amount` down to a district: allocate to the state, release
/// ministry-to-state, then state-to-district.
pub async fn fund_district(
    db: &DatabaseConnection,
    state: &state::Model,
    district_id: i64,
    amount: i64,
) -> Result<()> {
    create_test_allocation(db, state.id, amount).await?;
    release_to_state(
        db,
        &state.name,
        amount,
        StateReleaseKind::Programme,
        test_meta(),
    )
    .await?;
    release_to_district(db, district_id, amount, test_meta()).await?;
    Ok(())
}

/// Submits a proposal with test defaults (estimated cost of five lakh).
pub async fn create_test_proposal(
    db: &DatabaseConnection,
    district_id: i64,
) -> Result<crate::entities::proposal::Model> {
    proposal::submit(
        db,
        district_id,
        "Test Project".to_string(),
        "Adarsh Gram".to_string(),
        lakhs(5),
        vec![],
    )
    .await
}

/// Submits a proposal and walks it to ministry approval with the given
/// allocation ceiling.
pub async fn create_approved_proposal(
    db: &DatabaseConnection,
    district_id: i64,
    allocated_amount: i64,
) -> Result<crate::entities::proposal::Model> {
    let created = create_test_proposal(db, district_id).await?;
    proposal::transition(
        db,
        created.id,
        ProposalStatus::ApprovedByState,
        "state-admin".to_string(),
        None,
        None,
        MINISTRY_PHONE,
    )
    .await?;
    proposal::transition(
        db,
        created.id,
        ProposalStatus::ApprovedByMinistry,
        "ministry-admin".to_string(),
        None,
        Some(allocated_amount),
        MINISTRY_PHONE,
    )
    .await
}

fn next_email() -> String {
    format!("agency{}@example.test", EMAIL_SEQ.fetch_add(1, Ordering::Relaxed))
}

async fn insert_agency(
    db: &DatabaseConnection,
    state_id: i64,
    district_id: Option<i64>,
    status: AgencyStatus,
    push_token: Option<String>,
) -> Result<agency::Model> {
    agency::ActiveModel {
        state_id: Set(state_id),
        district_id: Set(district_id),
        name: Set("Test Works Agency".to_string()),
        kind: Set(AgencyKind::Implementing),
        contact_person: Set("A. Verma".to_string()),
        contact_phone: Set("+919800000050".to_string()),
        contact_email: Set(next_email()),
        push_token: Set(push_token),
        status: Set(status),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Inserts an active agency.
pub async fn create_active_agency(
    db: &DatabaseConnection,
    state_id: i64,
    district_id: Option<i64>,
) -> Result<agency::Model> {
    insert_agency(db, state_id, district_id, AgencyStatus::Active, None).await
}

/// Inserts an agency still pending approval.
pub async fn create_pending_agency(
    db: &DatabaseConnection,
    state_id: i64,
    district_id: Option<i64>,
) -> Result<agency::Model> {
    insert_agency(db, state_id, district_id, AgencyStatus::PendingApproval, None).await
}

/// Inserts an active agency with a linked push token.
pub async fn create_active_agency_with_token(
    db: &DatabaseConnection,
    state_id: i64,
    district_id: Option<i64>,
) -> Result<agency::Model> {
    insert_agency(
        db,
        state_id,
        district_id,
        AgencyStatus::Active,
        Some("ExponentPushToken[test]".to_string()),
    )
    .await
}

/// Files a certificate with test defaults (ten lakh released, eight utilized).
pub async fn create_test_certificate(
    db: &DatabaseConnection,
    district_id: i64,
) -> Result<utilization_certificate::Model> {
    uc::submit_certificate(
        db,
        district_id,
        "2025-26".to_string(),
        lakhs(10),
        lakhs(8),
        "https://docs.example/uc.pdf".to_string(),
    )
    .await
}

/// Lists Pending outbox rows, oldest first.
pub async fn pending_notifications(
    db: &DatabaseConnection,
) -> Result<Vec<notification::Model>> {
    Notification::find()
        .filter(notification::Column::Status.eq(DeliveryStatus::Pending))
        .order_by_asc(notification::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Clears the outbox so a test can assert on notifications it causes itself.
pub async fn drain_notifications(db: &DatabaseConnection) -> Result<()> {
    Notification::delete_many().exec(db).await?;
    Ok(())
}
