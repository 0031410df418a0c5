use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

/// Row shape of the `comments` table. One row per comment, append-only;
/// there is no edit or per-comment delete in the product.
#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Insert payload for a new comment.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub text: String,
}
