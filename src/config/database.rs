//! Database configuration module.
//!
//! Handles database connection and table creation using `SeaORM`. Tables are
//! generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust structs without hand-written SQL.

use crate::entities::{
    Agency, Allocation, District, Notification, Proposal, ProposalHistory, Release, State,
    SystemState, UtilizationCertificate,
};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Establishes a connection to the database.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates all necessary database tables from the entity definitions.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let statements = [
        schema.create_table_from_entity(State),
        schema.create_table_from_entity(District),
        schema.create_table_from_entity(Agency),
        schema.create_table_from_entity(Allocation),
        schema.create_table_from_entity(Release),
        schema.create_table_from_entity(Proposal),
        schema.create_table_from_entity(ProposalHistory),
        schema.create_table_from_entity(UtilizationCertificate),
        schema.create_table_from_entity(Notification),
        schema.create_table_from_entity(SystemState),
    ];

    for mut statement in statements {
        db.execute(builder.build(statement.if_not_exists())).await?;
    }

    Ok(())
}
