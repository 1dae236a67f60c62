//! Registry seeding from config.toml.
//!
//! The state and district registry is reference data the service needs before
//! any fund can move. It is seeded from a TOML file on startup; states and
//! districts already present are left untouched, so seeding is idempotent.

use crate::entities::{District, State, district, state};
use crate::errors::{Error, Result};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Configuration structure representing the entire seed file
#[derive(Debug, Deserialize)]
pub struct SeedConfig {
    /// List of states (with their districts) to seed
    pub states: Vec<StateSeed>,
}

/// Seed definition for a single state
#[derive(Debug, Deserialize, Clone)]
pub struct StateSeed {
    /// Official state name
    pub name: String,
    /// Short state code
    pub code: String,
    /// State nodal administrator name
    pub admin_name: String,
    /// State administrator phone
    pub admin_phone: String,
    /// Districts under this state
    #[serde(default)]
    pub districts: Vec<DistrictSeed>,
}

/// Seed definition for a single district
#[derive(Debug, Deserialize, Clone)]
pub struct DistrictSeed {
    /// District name
    pub name: String,
    /// District administrator phone
    pub admin_phone: String,
}

/// Loads the registry seed from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_seed<P: AsRef<Path>>(path: P) -> Result<SeedConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read seed file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse seed file: {e}"),
    })
}

/// Seeds states and districts that are not already present.
pub async fn seed_registry(db: &DatabaseConnection, config: &SeedConfig) -> Result<()> {
    for state_seed in &config.states {
        let existing = State::find()
            .filter(state::Column::Name.eq(state_seed.name.as_str()))
            .one(db)
            .await?;

        let state_model = match existing {
            Some(model) => model,
            None => {
                let inserted = state::ActiveModel {
                    name: Set(state_seed.name.clone()),
                    code: Set(state_seed.code.clone()),
                    admin_name: Set(state_seed.admin_name.clone()),
                    admin_phone: Set(state_seed.admin_phone.clone()),
                    created_at: Set(chrono::Utc::now()),
                    ..Default::default()
                }
                .insert(db)
                .await?;
                info!(state = %inserted.name, "seeded state");
                inserted
            }
        };

        for district_seed in &state_seed.districts {
            let present = District::find()
                .filter(district::Column::StateId.eq(state_model.id))
                .filter(district::Column::Name.eq(district_seed.name.as_str()))
                .one(db)
                .await?;

            if present.is_none() {
                let inserted = district::ActiveModel {
                    state_id: Set(state_model.id),
                    name: Set(district_seed.name.clone()),
                    admin_phone: Set(district_seed.admin_phone.clone()),
                    created_at: Set(chrono::Utc::now()),
                    ..Default::default()
                }
                .insert(db)
                .await?;
                info!(district = %inserted.name, state = %state_model.name, "seeded district");
            }
        }
    }

    Ok(())
}
