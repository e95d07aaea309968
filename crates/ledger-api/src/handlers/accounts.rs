//! Balance and grade handlers

use axum::{extract::State, Json};

use ledger_service::{
    AccountResponse, AdjustBalanceRequest, AdjustBalanceResponse, BalanceResponse, LedgerService,
    SessionRequest, SetGradeRequest, ViewBalanceRequest,
};

use crate::extractors::ValidatedJson;
use crate::response::ApiResult;
use crate::state::AppState;

/// The caller's own balance and grade
///
/// POST /users/balance
pub async fn view_own_balance(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SessionRequest>,
) -> ApiResult<Json<BalanceResponse>> {
    let service = LedgerService::new(state.service_context().clone());
    let response = service.view_balance_self(&request.key).await?;
    Ok(Json(response))
}

/// Credit or debit any account, gated by the master key
///
/// POST /users/update-balance
pub async fn update_balance(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<AdjustBalanceRequest>,
) -> ApiResult<Json<AdjustBalanceResponse>> {
    let service = LedgerService::new(state.service_context().clone());
    let response = service.adjust_balance(request).await?;
    Ok(Json(response))
}

/// Inspect any account's balance, gated by the master key
///
/// POST /users/view-balance
pub async fn view_balance(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ViewBalanceRequest>,
) -> ApiResult<Json<BalanceResponse>> {
    let service = LedgerService::new(state.service_context().clone());
    let response = service.view_balance_admin(request).await?;
    Ok(Json(response))
}

/// Assign a grade to an account, gated by the master key
///
/// POST /users/update-grade
pub async fn update_grade(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SetGradeRequest>,
) -> ApiResult<Json<AccountResponse>> {
    let service = LedgerService::new(state.service_context().clone());
    let response = service.set_grade(request).await?;
    Ok(Json(response))
}
