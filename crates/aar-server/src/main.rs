//! Mission API server binary.
//!
//! # Startup Sequence
//!
//! 1. Load configuration (`aar-config.yaml` + environment overrides)
//! 2. Initialize structured logging (tracing)
//! 3. Connect the `PostgreSQL` pool
//! 4. Serve the mission API until `Ctrl-C`
//! 5. Close the pool

use std::sync::Arc;

use aar_db::PostgresPool;
use aar_server::{AppState, LogFormat, LoggingConfig, ServiceConfig, start_server};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, the database connection, or the
/// server fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config = ServiceConfig::load()?;

    // 2. Initialize structured logging.
    init_logging(&config.logging);
    info!("aar-server starting");
    info!(
        host = config.server.host,
        port = config.server.port,
        max_connections = config.database.max_connections,
        "Configuration loaded"
    );

    // 3. Connect to PostgreSQL.
    let pool = PostgresPool::connect(&config.database.to_postgres_config()).await?;

    // 4. Serve until shutdown.
    let state = Arc::new(AppState::new(Arc::new(pool.missions())));
    let served = start_server(&config.server, state).await;

    // 5. Release connections whether or not serving succeeded.
    pool.close().await;
    served?;

    info!("aar-server shutdown complete");
    Ok(())
}

/// `RUST_LOG` wins over the configured level when set.
fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format {
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
    }
}
