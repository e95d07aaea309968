//! Audit message handler

use axum::{extract::State, Json};

use ledger_service::{MessageService, MessagesResponse, SessionRequest};

use crate::extractors::ValidatedJson;
use crate::response::ApiResult;
use crate::state::AppState;

/// The caller's most recent messages, newest first
///
/// POST /users/messages
pub async fn list_messages(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SessionRequest>,
) -> ApiResult<Json<MessagesResponse>> {
    let service = MessageService::new(state.service_context().clone());
    let response = service.list_for_session(&request.key).await?;
    Ok(Json(response))
}
