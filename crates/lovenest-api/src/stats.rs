use axum::{Json, extract::State};
use chrono::Local;
use lovenest_store::{MessageStore, stats};
use lovenest_types::models::Stats;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/stats
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<Stats>, ApiError> {
    let db = state.clone();
    let messages_sent = tokio::task::spawn_blocking(move || db.messages.count()).await??;
    let photos_shared = state.photos.count().await?;

    Ok(Json(stats::compute(
        state.start_date,
        Local::now().naive_local(),
        messages_sent as u64,
        photos_shared as u64,
    )))
}
