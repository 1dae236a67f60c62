//! Service entry point: configuration, database, background workers, and the
//! HTTP server.

use fundflow::config::settings::AppConfig;
use fundflow::config::{database, seed};
use fundflow::errors::Result;
use fundflow::http::{AppState, build_router};
use fundflow::jobs::reminder;
use fundflow::notify::{DeliveryClients, outbox};
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenvy::dotenv().ok();

    let config = Arc::new(AppConfig::from_env());

    // 3. Initialize database
    let db = database::create_connection(&config.database_url)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;
    database::create_tables(&db).await?;

    // 4. Seed the state/district registry when a seed file is present
    if Path::new(&config.seed_path).exists() {
        let registry = seed::load_seed(&config.seed_path)?;
        seed::seed_registry(&db, &registry)
            .await
            .inspect(|_| info!("Registry seeded successfully."))
            .inspect_err(|e| error!("Failed to seed registry: {}", e))?;
    }

    // 5. Start the background workers
    let sender = DeliveryClients::from_config(&config);
    tokio::spawn(outbox::run_outbox_worker(
        db.clone(),
        sender,
        config.outbox_interval,
        config.outbox_max_attempts,
    ));
    tokio::spawn(reminder::run_reminder_job(
        db.clone(),
        config.reminder_interval,
        config.reminder_max_per_proposal,
    ));

    // 6. Serve the API
    let app = build_router(AppState {
        db,
        config: Arc::clone(&config),
    });
    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}
