//! Runtime settings loaded from environment variables.
//!
//! Everything has a development-friendly default so the service starts with no
//! environment at all; production deployments override through the
//! environment (a `.env` file is loaded in `main` before this runs).

use std::env;
use std::time::Duration;

fn env_string(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_u32(name: &str, default: u32) -> u32 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(default)
}

fn env_duration_secs(name: &str, default_secs: u64) -> Duration {
    let secs = env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default_secs);
    Duration::from_secs(secs)
}

/// Application configuration assembled from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Database connection URL
    pub database_url: String,
    /// Address the HTTP server binds to
    pub bind_addr: String,
    /// Path to the registry seed file
    pub seed_path: String,
    /// Phone number ministry-directed notifications are sent to
    pub ministry_phone: String,
    /// Base URL of the templated-WhatsApp-message API
    pub whatsapp_api_url: String,
    /// Bearer token for the WhatsApp API, when required
    pub whatsapp_token: Option<String>,
    /// Endpoint of the push delivery service
    pub push_api_url: String,
    /// How often the outbox worker polls for pending notifications
    pub outbox_interval: Duration,
    /// Delivery attempts before an outbox row is marked failed
    pub outbox_max_attempts: u32,
    /// How often the reminder job polls for stuck proposals
    pub reminder_interval: Duration,
    /// Reminders sent per proposal before giving up
    pub reminder_max_per_proposal: u32,
}

impl AppConfig {
    /// Builds the configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            database_url: env_string("DATABASE_URL", "sqlite://data/fundflow.sqlite?mode=rwc"),
            bind_addr: env_string("FUNDFLOW_BIND", "0.0.0.0:8080"),
            seed_path: env_string("FUNDFLOW_SEED", "config.toml"),
            ministry_phone: env_string("MINISTRY_PHONE", "+911100000000"),
            whatsapp_api_url: env_string(
                "WHATSAPP_API_URL",
                "https://graph.facebook.com/v19.0/messages",
            ),
            whatsapp_token: env::var("WHATSAPP_TOKEN").ok(),
            push_api_url: env_string("PUSH_API_URL", "https://exp.host/--/api/v2/push/send"),
            outbox_interval: env_duration_secs("OUTBOX_INTERVAL_SECS", 5),
            outbox_max_attempts: env_u32("OUTBOX_MAX_ATTEMPTS", 3),
            reminder_interval: env_duration_secs("REMINDER_INTERVAL_SECS", 3600),
            reminder_max_per_proposal: env_u32("REMINDER_MAX_PER_PROPOSAL", 5),
        }
    }
}
