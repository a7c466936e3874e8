// src/main.rs
use boilerplate_web::auth_client::AuthClient;
use boilerplate_web::config::WebConfig;
use boilerplate_web::health::HealthClient;
use boilerplate_web::server::{web_routes, WebState};
use boilerplate_web::shutdown::shutdown_signal;
use dotenv::dotenv;
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = WebConfig::from_env()?;
    info!(
        health_url = %config.health_url(),
        auth_url = %config.auth_url(),
        "Configuration loaded"
    );

    let state = Arc::new(WebState {
        health: HealthClient::new(config.health_url())?,
        auth: AuthClient::new(config.auth_url()),
    });
    let app = web_routes(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    info!("🌐 Web listening on port {}", config.port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
