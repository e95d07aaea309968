//! Authentication handlers
//!
//! Endpoints for user registration, login, and password changes.

use axum::{extract::State, Json};

use ledger_service::{
    AuthService, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, StatusResponse,
    UpdatePasswordRequest,
};

use crate::extractors::ValidatedJson;
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Register a new user with a zero-balance account
///
/// POST /users
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<Created<Json<RegisterResponse>>> {
    let service = AuthService::new(state.service_context().clone());
    let response = service.register(request).await?;
    Ok(Created(Json(response)))
}

/// Login with username or phone number plus password
///
/// POST /login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let service = AuthService::new(state.service_context().clone());
    let response = service.login(request).await?;
    Ok(Json(response))
}

/// Change the caller's password, re-checked against the current one
///
/// POST /users/update-password
pub async fn update_password(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<UpdatePasswordRequest>,
) -> ApiResult<Json<StatusResponse>> {
    let service = AuthService::new(state.service_context().clone());
    service.update_password(request).await?;
    Ok(Json(StatusResponse::new("Password updated.")))
}
