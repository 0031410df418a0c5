use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dtos::decode_base64_payload;
use crate::models::post::Post;

#[derive(Debug, Deserialize)]
pub struct CreatePostIn {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Optional attachment, sent inline as base64.
    pub file: Option<FileUploadIn>,
}

#[derive(Debug, Deserialize)]
pub struct FileUploadIn {
    pub file_name: String,
    pub content_type: String,
    /// Base64 payload, with or without a `data:` prefix.
    pub data: String,
}

impl FileUploadIn {
    pub fn bytes(&self) -> Result<Vec<u8>, base64::DecodeError> {
        decode_base64_payload(&self.data)
    }
}

#[derive(Debug, Serialize)]
pub struct PostOut {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub user_id: Option<Uuid>,
    pub file_url: Option<String>,
    pub file_type: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<Post> for PostOut {
    fn from(post: Post) -> Self {
        PostOut {
            id: post.id,
            title: post.title,
            description: post.description,
            user_id: post.user_id,
            file_url: post.file_url,
            file_type: post.file_type,
            created_at: post.created_at,
        }
    }
}
