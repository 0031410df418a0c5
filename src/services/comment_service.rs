use std::sync::Arc;

use uuid::Uuid;

use crate::error::ApiError;
use crate::models::comment::{Comment, NewComment};
use crate::repositories::CommentStore;

/// Append-only comment threads. Ordering is the store's creation order,
/// oldest first; there is no edit or per-comment delete.
pub struct CommentService {
    comments: Arc<dyn CommentStore>,
}

impl CommentService {
    pub fn new(comments: Arc<dyn CommentStore>) -> Self {
        CommentService { comments }
    }

    pub async fn list_for(&self, post_id: Uuid) -> Result<Vec<Comment>, ApiError> {
        Ok(self.comments.list_for_post(post_id).await?)
    }

    pub async fn append(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        text: &str,
    ) -> Result<Comment, ApiError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ApiError::Validation(
                "comment text must not be empty".to_string(),
            ));
        }
        let comment = self
            .comments
            .insert(&NewComment {
                post_id,
                user_id: author_id,
                text: trimmed.to_string(),
            })
            .await?;
        Ok(comment)
    }
}
