//! exemption-desk server binary.

use std::process::ExitCode;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{error, info};

use exemption_desk::adapters::{app_router, InMemoryDocumentStore, PostgresDocumentStore};
use exemption_desk::application::IntentRouter;
use exemption_desk::config::{AppConfig, ConfigError, StoreBackend, StoreConfig, ValidationError};
use exemption_desk::ports::{DocumentStore, StoreError};
use exemption_desk::telemetry;

#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid bind address: {0}")]
    BindAddress(#[from] ValidationError),

    #[error("Document store setup failed: {0}")]
    Store(#[from] StoreError),

    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            // No subscriber yet
            eprintln!("exemption-desk: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Held until exit so buffered log lines are flushed
    let _log_guard = match telemetry::init(&config.server) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("exemption-desk: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Server terminated");
            ExitCode::FAILURE
        }
    }
}

fn load_config() -> Result<AppConfig, ConfigError> {
    let config = AppConfig::load()?;
    config.validate()?;
    Ok(config)
}

async fn run(config: AppConfig) -> Result<(), StartupError> {
    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = ?config.server.environment,
        backend = ?config.store.backend,
        "Starting exemption-desk"
    );

    let store = build_store(&config.store).await?;
    let router = Arc::new(IntentRouter::new(store, config.webhook.reply_settings()));
    let app = app_router(router, &config.server, &config.webhook);

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn build_store(config: &StoreConfig) -> Result<Arc<dyn DocumentStore>, StoreError> {
    match config.backend {
        StoreBackend::Memory => Ok(Arc::new(InMemoryDocumentStore::new())),
        StoreBackend::Postgres => {
            let store = PostgresDocumentStore::connect(config).await?;
            if config.run_migrations {
                store.migrate().await?;
                info!("Database migrations applied");
            }
            Ok(Arc::new(store))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Cannot listen for Ctrl-C; running until killed");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
