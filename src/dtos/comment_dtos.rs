use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::comment::Comment;

#[derive(Deserialize)]
pub struct CommentIn {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct CommentOut {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<&Comment> for CommentOut {
    fn from(comment: &Comment) -> Self {
        CommentOut {
            id: comment.id,
            post_id: comment.post_id,
            user_id: comment.user_id,
            text: comment.text.clone(),
            created_at: comment.created_at,
        }
    }
}
