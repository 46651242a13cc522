//! # pasar backend
//!
//! Loads configuration, starts tracing, opens the database and keeps the
//! services alive until Ctrl-C or SIGTERM.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  config/pasar.toml + PASAR_* ──► AppConfig                              │
//! │                                     │                                   │
//! │                                     ▼                                   │
//! │                 SQLite (migrated) + cipher + verifier ──► AppState      │
//! │                                     │                                   │
//! │                                     ▼                                   │
//! │                       wait for shutdown ──► close pool                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::{info, warn};

use pasar_backend::{bootstrap, init_tracing, AppConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    init_tracing(config.app_env)?;

    info!("Starting pasar backend...");
    info!(
        env = ?config.app_env,
        database = %config.database_path,
        max_connections = config.db_max_connections,
        "Configuration loaded"
    );

    let state = bootstrap(&config).await?;

    shutdown_signal().await;

    state.shutdown().await;
    info!("Shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
