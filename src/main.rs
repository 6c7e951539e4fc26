use anyhow::Result;
use tokio::net::TcpListener;
use tokio::signal;

use onelog_notification_service::config::Settings;
use onelog_notification_service::postgres::PostgresPool;
use onelog_notification_service::server::{create_app, AppState};
use onelog_notification_service::telemetry::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let settings = Settings::new()?;

    // Initialize tracing
    init_tracing(&settings.logging)?;
    tracing::info!(
        templates = %settings.templates.base_path.display(),
        fallback_language = %settings.templates.fallback_language,
        "Configuration loaded"
    );

    // PostgreSQL is only needed by the postgres preference/audit backends
    let postgres_pool = match settings.database {
        Some(ref database) => match PostgresPool::new(database).await {
            Ok(pool) => Some(pool),
            Err(e) => {
                tracing::warn!(error = %e, "PostgreSQL unavailable, continuing without it");
                None
            }
        },
        None => None,
    };

    // Create application state
    let state = AppState::new(settings.clone(), postgres_pool.clone());
    tracing::info!("Application state initialized");

    // Create Axum app
    let app = create_app(state);

    // Start server
    let addr = settings.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal_handler())
        .await?;

    if let Some(pool) = postgres_pool {
        pool.close().await;
    }

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal_handler() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}
