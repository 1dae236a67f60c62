/// Database configuration and connection management
pub mod database;

/// Registry seeding (states and districts) from config.toml
pub mod seed;

/// Runtime settings loaded from environment variables
pub mod settings;
