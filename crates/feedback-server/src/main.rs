//! Voice feedback server binary.
//!
//! Loads configuration, opens the store, builds the session provisioner and
//! serves the API until SIGTERM/SIGINT, then drains in-flight requests.

use feedback_server::config::{self, ConfigError};
use feedback_server::{app, AppState};
use feedback_session::{SessionError, SessionProvisioner};
use std::net::SocketAddr;
use std::process::ExitCode;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// Anything that stops the server from coming up or serving.
#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Pool(#[from] feedback_db::PoolError),
    #[error("failed to get database connection for migrations: {0}")]
    Connection(#[from] r2d2::Error),
    #[error(transparent)]
    Migration(#[from] feedback_db::MigrationError),
    #[error("failed to build session provisioner: {0}")]
    Session(#[from] SessionError),
    #[error("server i/o error: {0}")]
    Io(#[from] std::io::Error),
}

fn resolve_config_path() -> (Option<String>, &'static str) {
    if let Some(path) = std::env::args()
        .nth(1)
        .filter(|value| !value.trim().is_empty())
    {
        return (Some(path), "cli-arg");
    }

    if let Ok(path) = std::env::var("FEEDBACK_CONFIG_PATH") {
        if !path.trim().is_empty() {
            return (Some(path), "env-var");
        }
    }

    (None, "default")
}

fn init_tracing(logging: &config::LoggingConfig) {
    let filter = EnvFilter::try_new(&logging.level).unwrap_or_else(|_| EnvFilter::new("info"));

    if logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn run() -> Result<(), StartupError> {
    let dotenv_path = dotenvy::dotenv().ok();

    let (resolved_config_path, config_source) = resolve_config_path();
    let selected_config_path = resolved_config_path.as_deref().or(Some("config.toml"));
    let config::LoadedConfig { config, from_file } = config::load_config(selected_config_path)?;

    init_tracing(&config.logging);

    tracing::info!(
        source = config_source,
        path = selected_config_path.unwrap_or("<none>"),
        file_found = from_file,
        dotenv = dotenv_path.is_some(),
        "resolved startup configuration"
    );
    if !from_file {
        tracing::info!("config file not found, using defaults");
    }

    config.validate()?;

    let pool = feedback_db::create_pool(&config.database.path, config.database.runtime_settings())?;
    {
        let conn = pool.get()?;
        let applied = feedback_db::run_migrations(&conn)?;
        if applied > 0 {
            tracing::info!(count = applied, "applied database migrations");
        }
    }

    let provisioner = SessionProvisioner::new(config.provider.clone())?;
    tracing::info!(provider = ?provisioner.config(), "session provider configured");

    let app = app(AppState::new(pool, provisioner));
    let addr = SocketAddr::new(config.server.host, config.server.port);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server is running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shut down");
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "server exited with error");
            eprintln!("feedback-server: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Waits for a SIGINT (Ctrl+C) or SIGTERM signal for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { tracing::info!("received SIGINT, initiating graceful shutdown"); }
        () = terminate => { tracing::info!("received SIGTERM, initiating graceful shutdown"); }
    }
}
