//! Unified error types and result handling for the fund-flow service.
//!
//! Every fallible operation in the crate returns [`Result`]. Variants map onto
//! the API error taxonomy: not-found lookups, validation failures (including
//! balance-ceiling rejections), registration conflicts, and upstream database
//! or I/O failures.

use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("State not found: {name}")]
    StateNotFound { name: String },

    #[error("District not found: {id}")]
    DistrictNotFound { id: i64 },

    #[error("Agency not found: {id}")]
    AgencyNotFound { id: i64 },

    #[error("Proposal not found: {id}")]
    ProposalNotFound { id: i64 },

    #[error("Utilization certificate not found: {id}")]
    CertificateNotFound { id: i64 },

    #[error("Invalid amount: {amount}")]
    InvalidAmount { amount: i64 },

    #[error("Insufficient balance: requested {requested} paise, available {available} paise")]
    InsufficientBalance { available: i64, requested: i64 },

    #[error("Illegal status transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("An agency is already registered with email {email}")]
    DuplicateAgencyEmail { email: String },

    #[error("Notification delivery failed: {message}")]
    Delivery { message: String },
}

/// Convenience `Result` type.
pub type Result<T> = std::result::Result<T, Error>;
