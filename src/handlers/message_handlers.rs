use axum::{
    debug_handler, extract::rejection::JsonRejection, http::StatusCode, Extension, Json,
};
use tracing::debug;
use validator::Validate;

use crate::{
    app_state::AppState,
    handlers::error::ApiError,
    models::message::{CreateMessageResponse, GetMessageRequest, MessageResponse},
};

/// POST /api/v1/messages/create
#[debug_handler]
pub async fn create_message(
    Extension(state): Extension<AppState>,
) -> Result<(StatusCode, Json<CreateMessageResponse>), ApiError> {
    let id = state.messages.create_message(&state.request_context()).await?;
    debug!("Message created: id = {}", id);

    Ok((StatusCode::CREATED, Json(CreateMessageResponse { id })))
}

/// GET /api/v1/messages/ with `{"id": n}` in the body
#[debug_handler]
pub async fn get_message(
    Extension(state): Extension<AppState>,
    payload: Result<Json<GetMessageRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(payload) = payload.map_err(|e| {
        debug!("Rejected message request body: {}", e);
        ApiError::InvalidRequest
    })?;

    if let Err(errors) = payload.validate() {
        debug!("Invalid message request: {}", errors);
        return Err(ApiError::InvalidRequest);
    }

    let message = state
        .messages
        .get_message_by_id(&state.request_context(), payload.id)
        .await?;

    Ok(Json(MessageResponse::from(message)))
}
