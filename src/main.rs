// src/main.rs
use boilerplate_api::auth::{AuthConfig, AuthEngine, AuthHandler};
use boilerplate_api::common::AppState;
use boilerplate_api::config::AppConfig;
use boilerplate_api::{app, db};
use dotenv::dotenv;
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

// ============================================================================
// MAIN APPLICATION ENTRY POINT
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // ========================================================================
    // ENVIRONMENT CONFIGURATION
    // ========================================================================

    let config = AppConfig::from_env()?;
    info!(environment = config.environment.as_str(), "Configuration loaded");

    // ========================================================================
    // DATABASE SETUP
    // ========================================================================

    let pool = db::connect(&config.database).await?;
    db::schema::ensure_schema(&pool).await?;

    // ========================================================================
    // AUTH HANDLER
    // ========================================================================

    let auth: Arc<dyn AuthHandler> = Arc::new(AuthEngine::new(
        AuthConfig::from_app_config(&config),
        pool.clone(),
    ));

    // ========================================================================
    // APPLICATION STATE AND ROUTER
    // ========================================================================

    let port = config.api_port;
    let environment = config.environment;
    let state = AppState {
        config,
        auth,
    };
    let app = app::app(state);

    // ========================================================================
    // SERVER STARTUP
    // ========================================================================

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!(
        "🚀 API listening on port {}, NODE_ENV={}",
        port,
        environment.as_str()
    );

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    info!("👋 Server stopped, database pool closed");

    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
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

    info!("🛑 Shutdown signal received");
}
