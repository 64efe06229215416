use axum::{
    Json,
    extract::multipart::MultipartError,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use lovenest_store::StoreError;
use lovenest_types::api::ErrorResponse;
use thiserror::Error;
use tokio::task::JoinError;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No photo provided")]
    NoFileProvided,
    #[error("invalid multipart body: {0}")]
    Multipart(#[from] MultipartError),
    #[error("invalid JSON body: {0}")]
    Json(#[from] JsonRejection),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("blocking task failed: {0}")]
    Join(#[from] JoinError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            e @ Self::NoFileProvided => (StatusCode::BAD_REQUEST, e.to_string()),
            Self::Multipart(e) => (e.status(), e.body_text()),
            Self::Json(e) => (e.status(), e.body_text()),
            Self::Store(StoreError::EmptyFilename) => {
                (StatusCode::BAD_REQUEST, "No file selected".into())
            }
            Self::Store(e @ StoreError::PhotoExists(_)) => (StatusCode::CONFLICT, e.to_string()),
            Self::Store(e @ StoreError::UploadInterrupted(_)) => {
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            e => {
                error!("received internal error for user request: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong".into(),
                )
            }
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}
