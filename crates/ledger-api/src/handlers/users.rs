//! User profile and administrative credential handlers

use axum::{extract::State, Json};

use ledger_service::{
    AdminUpdateDisplayNameRequest, AdminUpdatePasswordRequest, AdminUpdatePhoneRequest,
    AdminUpdateUsernameRequest, SessionRequest, StatusResponse, UserResponse, UserService,
};

use crate::extractors::ValidatedJson;
use crate::response::ApiResult;
use crate::state::AppState;

/// Directory of registered users
///
/// GET /users
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<UserResponse>>> {
    let service = UserService::new(state.service_context().clone());
    let response = service.list().await?;
    Ok(Json(response))
}

/// The caller's own profile
///
/// POST /user-data
pub async fn get_profile(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SessionRequest>,
) -> ApiResult<Json<UserResponse>> {
    let service = UserService::new(state.service_context().clone());
    let response = service.profile(&request.key).await?;
    Ok(Json(response))
}

/// Reset a user's password, gated by the master key
///
/// POST /users/admin/update-password
pub async fn admin_update_password(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<AdminUpdatePasswordRequest>,
) -> ApiResult<Json<StatusResponse>> {
    let service = UserService::new(state.service_context().clone());
    service.admin_update_password(request).await?;
    Ok(Json(StatusResponse::new("Password updated.")))
}

/// Rename a user, gated by the master key
///
/// POST /users/admin/update-username
pub async fn admin_update_username(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<AdminUpdateUsernameRequest>,
) -> ApiResult<Json<UserResponse>> {
    let service = UserService::new(state.service_context().clone());
    let response = service.admin_update_username(request).await?;
    Ok(Json(response))
}

/// Change a user's display name, gated by the master key
///
/// POST /users/admin/update-display-name
pub async fn admin_update_display_name(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<AdminUpdateDisplayNameRequest>,
) -> ApiResult<Json<UserResponse>> {
    let service = UserService::new(state.service_context().clone());
    let response = service.admin_update_display_name(request).await?;
    Ok(Json(response))
}

/// Change a user's phone number, gated by the master key
///
/// POST /users/admin/update-phone
pub async fn admin_update_phone(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<AdminUpdatePhoneRequest>,
) -> ApiResult<Json<UserResponse>> {
    let service = UserService::new(state.service_context().clone());
    let response = service.admin_update_phone(request).await?;
    Ok(Json(response))
}
