//! Transfer handler

use axum::{extract::State, Json};

use ledger_service::{LedgerService, TransferRequest, TransferResponse};

use crate::extractors::ValidatedJson;
use crate::response::ApiResult;
use crate::state::AppState;

/// Move funds from the caller's account to another
///
/// POST /users/transfer-balance
pub async fn transfer(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<TransferRequest>,
) -> ApiResult<Json<TransferResponse>> {
    let service = LedgerService::new(state.service_context().clone());
    let response = service.transfer(request).await?;
    Ok(Json(response))
}
