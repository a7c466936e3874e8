// src/seed.rs
use boilerplate_api::config::{DatabaseConfig, Environment};
use boilerplate_api::db::{self, seed::SeedUser};
use dotenv::dotenv;
use std::env;
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

    let lookup = |key: &str| env::var(key).ok();
    let environment = Environment::from_node_env(lookup("NODE_ENV").as_deref());
    let database = DatabaseConfig::require_from_lookup(&lookup, environment)?;
    let user = SeedUser::from_lookup(&lookup);

    let pool = db::connect(&database).await?;
    db::schema::ensure_schema(&pool).await?;

    info!("🌱 Seeding database...");
    let inserted = db::seed::insert_demo_user(&pool, &user).await;
    pool.close().await;

    if inserted? {
        info!(email = %user.email, "✅ Demo user created");
    } else {
        info!(email = %user.email, "ℹ️ Demo user already exists, nothing to do");
    }

    Ok(())
}
