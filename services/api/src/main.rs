use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod catalog;
mod contact;
mod dashboard;
mod error;
mod models;
mod repositories;
mod revalidation;
mod reviews;
mod routes;
mod state;

use common::{
    cache::{RedisConfig, RedisPool},
    config::ServerConfig,
    database::{self, DatabaseConfig, init_pool},
    session::{RedisRevocationList, SessionConfig, SessionManager},
};

use crate::{
    contact::LogNotifier, repositories::Stores, revalidation::RevalidationBus, state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting API service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    database::run_migrations(&pool).await?;

    let redis_pool = RedisPool::new(&RedisConfig::from_env())?;
    let sessions = SessionManager::new(
        SessionConfig::from_env()?,
        Arc::new(RedisRevocationList::new(redis_pool)),
    );

    let app_state = AppState::new(
        sessions,
        Stores::postgres(pool),
        RevalidationBus::new(),
        Arc::new(LogNotifier),
    );

    info!("API service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state);

    let server_config = ServerConfig::load(3001)?;
    let listener = tokio::net::TcpListener::bind(server_config.bind_address()).await?;
    info!("API service listening on {}", server_config.bind_address());

    axum::serve(listener, app).await?;

    Ok(())
}
