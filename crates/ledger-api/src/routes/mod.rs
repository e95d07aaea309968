//! Route definitions
//!
//! All API routes organized by domain and mounted under /api/v1.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{accounts, auth, health, messages, transfers, users};
use crate::state::AppState;

/// Create the main API router with all routes (excluding health, which is
/// mounted separately so probes bypass the heavier middleware)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(account_routes())
        .merge(user_routes())
}

/// Login and password routes
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/users/update-password", post(auth::update_password))
}

/// Balance, grade, transfer, and message routes
fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/users/balance", post(accounts::view_own_balance))
        .route("/users/update-balance", post(accounts::update_balance))
        .route("/users/view-balance", post(accounts::view_balance))
        .route("/users/update-grade", post(accounts::update_grade))
        .route("/users/transfer-balance", post(transfers::transfer))
        .route("/users/messages", post(messages::list_messages))
}

/// Registration, profile, and administrative credential routes
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(auth::register).get(users::list_users))
        .route("/user-data", post(users::get_profile))
        .route(
            "/users/admin/update-password",
            post(users::admin_update_password),
        )
        .route(
            "/users/admin/update-username",
            post(users::admin_update_username),
        )
        .route(
            "/users/admin/update-display-name",
            post(users::admin_update_display_name),
        )
        .route("/users/admin/update-phone", post(users::admin_update_phone))
}
