use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;

pub mod auth_dtos;
pub mod comment_dtos;
pub mod feed_dtos;
pub mod like_dtos;
pub mod post_dtos;
pub mod profile_dtos;
pub mod profile_picture_dtos;

/// The envelope every endpoint answers with, success or error:
/// `{status, message, data}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub status: String,
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        ApiResponse {
            status: "success".to_string(),
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ApiResponse {
            status: "error".to_string(),
            message: message.into(),
            data: None,
        }
    }
}

/// Decodes a base64 upload, tolerating a `data:<type>;base64,` prefix in
/// front of the payload.
pub fn decode_base64_payload(data: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let payload = match data.split_once(',') {
        Some((head, tail)) if head.starts_with("data:") => tail,
        _ => data,
    };
    STANDARD.decode(payload.trim())
}
