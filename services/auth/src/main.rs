use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod accounts;
mod error;
mod models;
mod password;
mod repositories;
mod routes;
mod throttle;

use axum::extract::FromRef;
use common::{
    cache::{RedisConfig, RedisPool},
    config::ServerConfig,
    database,
    session::{RedisRevocationList, SessionConfig, SessionManager},
};

use crate::{
    accounts::AccountService,
    repositories::PgSellerStore,
    throttle::{LoginThrottle, ThrottleConfig},
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionManager,
    pub accounts: AccountService,
}

impl FromRef<AppState> for SessionManager {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting authentication service");

    // Initialize database connection pool
    let db_config = database::DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;

    // Check database connectivity
    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    database::run_migrations(&pool).await?;

    // Sessions are revoked through Redis so logout holds across both services
    let redis_pool = RedisPool::new(&RedisConfig::from_env())?;
    let sessions = SessionManager::new(
        SessionConfig::from_env()?,
        Arc::new(RedisRevocationList::new(redis_pool)),
    );

    let accounts = AccountService::new(
        Arc::new(PgSellerStore::new(pool)),
        LoginThrottle::new(ThrottleConfig::from_env()),
    );

    let app_state = AppState { sessions, accounts };

    // Start the web server
    let app = routes::create_router(app_state);

    let server_config = ServerConfig::load(3000)?;
    let listener = tokio::net::TcpListener::bind(server_config.bind_address()).await?;
    info!(
        "Authentication service listening on {}",
        server_config.bind_address()
    );

    axum::serve(listener, app).await?;

    Ok(())
}
