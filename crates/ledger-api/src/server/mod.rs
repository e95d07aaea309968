//! Server setup and initialization
//!
//! Provides the main application builder, the server runner, and the
//! background sweeper that reclaims expired sessions and messages.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use chrono::Utc;
use tokio::net::TcpListener;
use tracing::{error, info};

use ledger_common::{AppConfig, AppError};
use ledger_db::{
    create_pool, run_migrations, PgAccountRepository, PgLedgerRepository, PgMessageRepository,
    PgSessionRepository, PgUserRepository,
};
use ledger_service::{MessageService, ServiceContext, SessionService};

use crate::middleware::apply_middleware;
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let router = create_router();
    let router = apply_middleware(
        router,
        &state.config().cors,
        state.config().app.env.is_production(),
    );
    router.merge(health_routes()).with_state(state)
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let db_config = ledger_db::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        min_connections: config.database.min_connections,
        ..Default::default()
    };
    let pool = create_pool(&db_config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    run_migrations(&pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("Database migrations applied");

    let user_repo = Arc::new(PgUserRepository::new(pool.clone()));
    let account_repo = Arc::new(PgAccountRepository::new(pool.clone()));
    let ledger_repo = Arc::new(PgLedgerRepository::new(pool.clone()));
    let session_repo = Arc::new(PgSessionRepository::new(pool.clone()));
    let message_repo = Arc::new(PgMessageRepository::new(pool));

    let service_context = ServiceContext::builder()
        .users(user_repo)
        .accounts(account_repo)
        .ledger(ledger_repo)
        .sessions(session_repo)
        .messages(message_repo)
        .master_key(config.master_key.clone())
        .lookup_precedence(config.lookup_precedence)
        .session_ttl_secs(config.session.ttl_secs)
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config))
}

/// Periodically reclaim expired sessions and messages. Expired rows are
/// already invisible to queries; the sweep keeps the tables from growing
/// without bound.
pub fn spawn_expiry_sweeper(state: &AppState) {
    let interval_secs = state.config().session.sweep_interval_secs;
    let sessions = SessionService::new(state.service_context().clone());
    let messages = MessageService::new(state.service_context().clone());

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
        // The first tick fires immediately; skip it so startup stays quiet.
        interval.tick().await;

        loop {
            interval.tick().await;
            let now = Utc::now();

            match sessions.purge_expired(now).await {
                Ok(removed) if removed > 0 => info!(removed, "expired sessions removed"),
                Ok(_) => {}
                Err(e) => error!(error = %e, "session sweep failed"),
            }
            match messages.purge_expired(now).await {
                Ok(removed) if removed > 0 => info!(removed, "expired messages removed"),
                Ok(_) => {}
                Err(e) => error!(error = %e, "message sweep failed"),
            }
        }
    });
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .api
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid server address: {e}")))?;

    let state = create_app_state(config).await?;

    spawn_expiry_sweeper(&state);

    let app = create_app(state);

    run_server(app, addr).await
}
