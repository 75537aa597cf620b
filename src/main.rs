use anyhow::Context;
use tracing::{Level, error, info};
use tracing_subscriber::{EnvFilter, fmt};

use crate::db::Database;
use crate::secrets::SECRET_MANAGER;
mod controllers;
mod db;
mod drivers;
mod models;
mod routers;
mod secrets;
mod seed;

async fn run() -> anyhow::Result<()> {
    let database_url = SECRET_MANAGER
        .database_url()
        .context("Missing database server configuration")?;
    let max_connections = SECRET_MANAGER.max_connections()?;
    let port = SECRET_MANAGER.port()?;

    // Any failure here, authentication included, stops startup.
    let database = Database::connect(&database_url, max_connections)
        .await
        .context("Failed to connect to database")?;
    info!("📊 Connected to {} database", database.driver_name());

    database
        .migrate()
        .await
        .context("Database migrations failed")?;
    info!("📊 Database migrations completed");

    if let Some(seed_file) = SECRET_MANAGER.seed_file() {
        seed::seed_from_file(&database, &seed_file).await?;
    }

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;

    let app = routers::app(database);

    info!("🎧 Songs API listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::DEBUG.into()))
        .with_target(false)
        .init();

    if let Err(e) = run().await {
        error!("❌ {:#}", e);
        std::process::exit(1);
    }
}
