use std::net::SocketAddr;

use dotenv::dotenv;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crew_health_api::api::create_application;
use crew_health_api::config::AppConfig;
use crew_health_data::database::{get_connection_info, initialize_database_pool};

/// Entry point for the CrewHealth API server
///
/// Loads `.env`, sets up tracing, prepares the SQLite file under `DATA_DIR`
/// and serves until Ctrl+C or SIGTERM.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if dotenv().is_err() {
        eprintln!("Warning: .env file not found or couldn't be read. Using environment variables.");
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_span_events(FmtSpan::CLOSE)
                .with_target(false)
                .with_ansi(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stdout),
        )
        .with(env_filter)
        .init();

    let config = AppConfig::from_env()?;
    info!("Starting CrewHealth API server ({})", config.environment);

    if !config.data_dir.exists() {
        info!("Creating data directory: {}", config.data_dir.display());
        std::fs::create_dir_all(&config.data_dir)?;
    }

    if std::env::var("DB_SQLITE_PATH").is_err() {
        let db_path = config.database_path();
        std::env::set_var("DB_SQLITE_PATH", db_path.to_string_lossy().to_string());
        info!("Set DB_SQLITE_PATH to {}", db_path.display());
    }

    // Records and drafts fall back to memory when the pool is missing.
    match initialize_database_pool() {
        Ok(()) => info!(
            "Database pool initialized: {}",
            get_connection_info().unwrap_or_else(|| "unknown".to_string())
        ),
        Err(e) => {
            error!("Failed to initialize database pool: {}", e);
            warn!("Continuing with in-memory storage; data will not survive a restart");
        }
    }

    let app = create_application(&config).await;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on Unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
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

    info!("Shutting down server...");
}
