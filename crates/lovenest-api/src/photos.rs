use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
};
use lovenest_types::api::UploadPhotoResponse;
use lovenest_types::models::Photo;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;

/// Multipart field carrying the uploaded file.
pub const PHOTO_FIELD: &str = "photo";

/// POST /api/upload-photo — multipart upload, file in the `photo` field.
pub async fn upload_photo(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadPhotoResponse>, ApiError> {
    let mut multipart = multipart.map_err(|e| {
        debug!("Upload is not a multipart request: {}", e);
        ApiError::NoFileProvided
    })?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(PHOTO_FIELD) {
            continue;
        }
        // A part without a filename is a plain form value, not a file.
        let Some(original) = field.file_name().map(str::to_owned) else {
            continue;
        };

        let photo = state.photos.store(&original, field).await?;
        info!("Photo uploaded: {}", photo.filename);
        return Ok(Json(UploadPhotoResponse {
            success: true,
            filename: photo.filename,
            url: photo.url,
        }));
    }

    Err(ApiError::NoFileProvided)
}

/// GET /api/photos — image files in the upload directory.
pub async fn get_photos(State(state): State<AppState>) -> Result<Json<Vec<Photo>>, ApiError> {
    Ok(Json(state.photos.list().await?))
}
