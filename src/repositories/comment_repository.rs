use async_trait::async_trait;
use serde_json::json;
use uuid::Uuid;

use crate::models::comment::{Comment, NewComment};
use crate::repositories::{CommentStore, StoreError, StoreResult, Supabase};

const TABLE: &str = "comments";

#[derive(Clone)]
pub struct CommentRepository {
    supabase: Supabase,
}

impl CommentRepository {
    pub fn new(supabase: Supabase) -> Self {
        CommentRepository { supabase }
    }
}

#[async_trait]
impl CommentStore for CommentRepository {
    async fn list_for_post(&self, post_id: Uuid) -> StoreResult<Vec<Comment>> {
        let url = format!(
            "{}?post_id=eq.{}&select=*&order=created_at.asc",
            self.supabase.rest_url(TABLE),
            urlencoding::encode(&post_id.to_string())
        );
        let resp = self
            .supabase
            .client()
            .get(&url)
            .headers(self.supabase.headers())
            .send()
            .await?;
        let body = Supabase::expect_success(resp).await?;
        let comments: Vec<Comment> = serde_json::from_str(&body)?;
        Ok(comments)
    }

    async fn insert(&self, new_comment: &NewComment) -> StoreResult<Comment> {
        let payload = json!({
            "post_id": new_comment.post_id,
            "user_id": new_comment.user_id,
            "text": new_comment.text,
        });
        let resp = self
            .supabase
            .client()
            .post(&self.supabase.rest_url(TABLE))
            .headers(self.supabase.headers())
            .header("Prefer", "return=representation")
            .json(&payload)
            .send()
            .await?;
        let body = Supabase::expect_success(resp).await?;
        let comments: Vec<Comment> = serde_json::from_str(&body)?;
        comments
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Other("empty response from insert".to_string()))
    }

    async fn delete_for_user(&self, user_id: Uuid) -> StoreResult<()> {
        let url = format!(
            "{}?user_id=eq.{}",
            self.supabase.rest_url(TABLE),
            urlencoding::encode(&user_id.to_string())
        );
        let resp = self
            .supabase
            .client()
            .delete(&url)
            .headers(self.supabase.headers())
            .send()
            .await?;
        Supabase::expect_success(resp).await?;
        Ok(())
    }
}
