use axum::{Json, extract::State, extract::rejection::JsonRejection};
use lovenest_store::MessageStore;
use lovenest_types::api::AddMessageRequest;
use lovenest_types::models::Message;
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/messages — every message, oldest first.
pub async fn get_messages(State(state): State<AppState>) -> Result<Json<Vec<Message>>, ApiError> {
    let db = state.clone();
    let messages = tokio::task::spawn_blocking(move || db.messages.list()).await??;
    Ok(Json(messages))
}

/// POST /api/messages — append `{text?, type?}` and return the stored message.
pub async fn add_message(
    State(state): State<AppState>,
    payload: Result<Json<AddMessageRequest>, JsonRejection>,
) -> Result<Json<Message>, ApiError> {
    let Json(req) = payload?;

    // The store does blocking file I/O under its writer lock.
    let db = state.clone();
    let message = tokio::task::spawn_blocking(move || db.messages.append(req)).await??;

    info!("Message {} added (type: {})", message.id, message.kind);
    Ok(Json(message))
}
