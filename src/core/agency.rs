//! Agency registry business logic.
//!
//! Implementing and executing agencies register (or are registered by an
//! admin), then get activated. Activation is one-way; there is no
//! deactivation. Contact emails are unique across the registry.

use crate::entities::{
    Agency, State, agency,
    agency::{AgencyKind, AgencyStatus},
};
use crate::errors::{Error, Result};
use sea_orm::{DatabaseConnection, QueryOrder, Set, prelude::*};

/// Registration details for a new agency.
#[derive(Debug, Clone)]
pub struct AgencyRegistration {
    /// State the agency operates in
    pub state_id: i64,
    /// District scope, when district-assigned
    pub district_id: Option<i64>,
    /// Agency name
    pub name: String,
    /// Implementing or executing
    pub kind: AgencyKind,
    /// Contact person name
    pub contact_person: String,
    /// Contact phone
    pub contact_phone: String,
    /// Contact email, unique across agencies
    pub contact_email: String,
}

/// Registers a new agency in `PendingApproval`.
///
/// A duplicate contact email is a conflict.
pub async fn register(
    db: &DatabaseConnection,
    registration: AgencyRegistration,
) -> Result<agency::Model> {
    if registration.name.trim().is_empty() {
        return Err(Error::Validation {
            message: "agency name cannot be empty".to_string(),
        });
    }
    let email = registration.contact_email.trim().to_lowercase();
    if !email.contains('@') {
        return Err(Error::Validation {
            message: format!("malformed contact email: {email}"),
        });
    }

    State::find_by_id(registration.state_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::StateNotFound {
            name: registration.state_id.to_string(),
        })?;

    let duplicate = Agency::find()
        .filter(agency::Column::ContactEmail.eq(email.as_str()))
        .one(db)
        .await?;
    if duplicate.is_some() {
        return Err(Error::DuplicateAgencyEmail { email });
    }

    agency::ActiveModel {
        state_id: Set(registration.state_id),
        district_id: Set(registration.district_id),
        name: Set(registration.name.trim().to_string()),
        kind: Set(registration.kind),
        contact_person: Set(registration.contact_person),
        contact_phone: Set(registration.contact_phone),
        contact_email: Set(email),
        status: Set(AgencyStatus::PendingApproval),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Activates an agency. One-way: an already-active agency stays active.
pub async fn activate(db: &DatabaseConnection, agency_id: i64) -> Result<agency::Model> {
    let current = Agency::find_by_id(agency_id)
        .one(db)
        .await?
        .ok_or(Error::AgencyNotFound { id: agency_id })?;

    if current.status == AgencyStatus::Active {
        return Ok(current);
    }

    let mut active: agency::ActiveModel = current.into();
    active.status = Set(AgencyStatus::Active);
    active.update(db).await.map_err(Into::into)
}

/// Finds an agency by id.
pub async fn get_agency(db: &DatabaseConnection, agency_id: i64) -> Result<Option<agency::Model>> {
    Agency::find_by_id(agency_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists agencies scoped to a district, ordered alphabetically by name.
pub async fn get_agencies_for_district(
    db: &DatabaseConnection,
    district_id: i64,
) -> Result<Vec<agency::Model>> {
    Agency::find()
        .filter(agency::Column::DistrictId.eq(district_id))
        .order_by_asc(agency::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    fn registration(state_id: i64, email: &str) -> AgencyRegistration {
        AgencyRegistration {
            state_id,
            district_id: None,
            name: "Rural Works Agency".to_string(),
            kind: AgencyKind::Implementing,
            contact_person: "A. Verma".to_string(),
            contact_phone: "+919800000050".to_string(),
            contact_email: email.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_starts_pending() -> Result<()> {
        let (db, state) = setup_with_state().await?;

        let agency = register(&db, registration(state.id, "works@example.org")).await?;
        assert_eq!(agency.status, AgencyStatus::PendingApproval);
        assert_eq!(agency.contact_email, "works@example.org");

        Ok(())
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflicts() -> Result<()> {
        let (db, state) = setup_with_state().await?;
        register(&db, registration(state.id, "works@example.org")).await?;

        // Email comparison is case-insensitive
        let result = register(&db, registration(state.id, "Works@Example.org")).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::DuplicateAgencyEmail { email } if email == "works@example.org"
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_register_validation() -> Result<()> {
        let (db, state) = setup_with_state().await?;

        let mut bad_name = registration(state.id, "works@example.org");
        bad_name.name = "  ".to_string();
        assert!(matches!(
            register(&db, bad_name).await.unwrap_err(),
            Error::Validation { .. }
        ));

        let bad_email = registration(state.id, "not-an-email");
        assert!(matches!(
            register(&db, bad_email).await.unwrap_err(),
            Error::Validation { .. }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_activate_is_one_way_and_idempotent() -> Result<()> {
        let (db, state) = setup_with_state().await?;
        let agency = register(&db, registration(state.id, "works@example.org")).await?;

        let activated = activate(&db, agency.id).await?;
        assert_eq!(activated.status, AgencyStatus::Active);

        let again = activate(&db, agency.id).await?;
        assert_eq!(again.status, AgencyStatus::Active);

        Ok(())
    }

    #[tokio::test]
    async fn test_activate_unknown_agency() -> Result<()> {
        let db = setup_test_db().await?;

        let result = activate(&db, 999).await;
        assert!(matches!(result.unwrap_err(), Error::AgencyNotFound { id: 999 }));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_agencies_for_district_ordered() -> Result<()> {
        let (db, state, district) = setup_with_district().await?;

        let mut zulu = registration(state.id, "zulu@example.org");
        zulu.name = "Zulu Constructions".to_string();
        zulu.district_id = Some(district.id);
        register(&db, zulu).await?;

        let mut alpha = registration(state.id, "alpha@example.org");
        alpha.name = "Alpha Builders".to_string();
        alpha.district_id = Some(district.id);
        register(&db, alpha).await?;

        let agencies = get_agencies_for_district(&db, district.id).await?;
        assert_eq!(agencies.len(), 2);
        assert_eq!(agencies[0].name, "Alpha Builders");
        assert_eq!(agencies[1].name, "Zulu Constructions");

        Ok(())
    }
}
