pub mod error;
pub mod messages;
pub mod photos;
pub mod state;
pub mod stats;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

pub use error::ApiError;
pub use state::{AppState, AppStateInner};

#[cfg(test)]
mod tests;

/// JSON API routes. Static files, CORS and tracing are layered on by the server.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/upload-photo", post(photos::upload_photo))
        .route(
            "/api/messages",
            get(messages::get_messages).post(messages::add_message),
        )
        .route("/api/photos", get(photos::get_photos))
        .route("/api/stats", get(stats::get_stats))
        .route("/health", get(health))
        // Uploads are only bounded by the filesystem.
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
