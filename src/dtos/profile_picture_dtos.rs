use serde::{Deserialize, Serialize};

use crate::dtos::decode_base64_payload;

#[derive(Deserialize)]
pub struct UploadProfilePictureRequest {
    /// Base64 encoded image, with or without a `data:` prefix.
    pub image_data: String,
    pub file_name: String,
    pub content_type: String,
}

impl UploadProfilePictureRequest {
    pub fn bytes(&self) -> Result<Vec<u8>, base64::DecodeError> {
        decode_base64_payload(&self.image_data)
    }
}

#[derive(Serialize)]
pub struct ProfilePictureResponse {
    pub profile_picture_url: String,
}
