//! Students API server binary.
//!
//! # Usage
//!
//! ```bash
//! # With config file
//! students-api --config config.yaml
//!
//! # With the CONFIG_PATH environment variable
//! CONFIG_PATH=config.yaml students-api
//! ```

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info, Level};

use students_api::config::AppConfig;
use students_api::http::{create_router, AppState};
use students_api::logging::{init_logging, LoggingConfig};
use students_storage::{MemoryStudentStore, SqliteConfig, SqliteStudentStore, StudentStore};

/// How long in-flight requests get to finish after a shutdown signal.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// CRUD HTTP service for student records.
#[derive(Parser, Debug)]
#[command(name = "students-api")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (YAML); CONFIG_PATH takes precedence
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Resolve the config path: environment variable first, then flag.
    // Without either the process must not start.
    let config_path = std::env::var("CONFIG_PATH")
        .ok()
        .or(args.config)
        .ok_or_else(|| anyhow::anyhow!("config path is not set: use CONFIG_PATH or --config"))?;

    let config = AppConfig::load(&config_path)?;

    init_logging(&LoggingConfig {
        json_format: config.logging.json,
        default_level: parse_log_level(&config.logging.level),
    });

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting students API server"
    );

    // Create the storage backend based on configuration. Pool setup and
    // schema bootstrap both happen before serving; a failure here aborts
    // startup.
    match config.storage.backend.as_str() {
        "sqlite" => {
            let path = config
                .storage
                .path
                .clone()
                .ok_or_else(|| anyhow::anyhow!("storage.path is required for sqlite backend"))?;

            info!(path = %path, "Opening SQLite database");
            let sqlite_config = SqliteConfig {
                path: path.into(),
                max_connections: config.storage.pool_size,
                ..Default::default()
            };

            let storage = SqliteStudentStore::from_config(&sqlite_config).await?;
            storage.run_migrations().await?;
            info!("Storage initialized");

            run_server(Arc::new(storage), &config).await
        }
        "memory" => {
            info!("Using in-memory storage backend");
            run_server(MemoryStudentStore::new_shared(), &config).await
        }
        other => {
            error!("Unknown storage backend: {}", other);
            anyhow::bail!("Unknown storage backend: {}", other);
        }
    }
}

/// Runs the HTTP server until a termination signal arrives, then drains
/// in-flight requests bounded by the grace period.
async fn run_server<S: StudentStore>(storage: Arc<S>, config: &AppConfig) -> anyhow::Result<()> {
    let state = AppState::new(storage);
    let router = create_router(state);

    let addr = config.listen_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "HTTP server listening");

    let (shutdown_tx, mut shutdown_rx) = broadcast::channel::<()>(1);
    let server = tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
                info!("HTTP server received shutdown signal");
            })
            .await
    });

    shutdown_signal().await;
    let _ = shutdown_tx.send(());

    match tokio::time::timeout(SHUTDOWN_GRACE, server).await {
        Ok(joined) => joined??,
        Err(_) => error!(
            "graceful shutdown timed out after {:?}, abandoning in-flight requests",
            SHUTDOWN_GRACE
        ),
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

/// Parse log level from string.
fn parse_log_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("trace"), Level::TRACE);
        assert_eq!(parse_log_level("DEBUG"), Level::DEBUG);
        assert_eq!(parse_log_level("Info"), Level::INFO);
        assert_eq!(parse_log_level("warn"), Level::WARN);
        assert_eq!(parse_log_level("error"), Level::ERROR);
        assert_eq!(parse_log_level("bogus"), Level::INFO);
    }
}
