use serde::{Deserialize, Serialize};

pub use crate::models::NewMessage as AddMessageRequest;

// -- Photos --

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadPhotoResponse {
    pub success: bool,
    pub filename: String,
    pub url: String,
}

// -- Errors --

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
