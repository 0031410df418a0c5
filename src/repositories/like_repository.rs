use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::json;
use uuid::Uuid;

use crate::models::like::Like;
use crate::repositories::{LikeStore, StoreError, StoreResult, Supabase};

const TABLE: &str = "likes";

#[derive(Clone)]
pub struct LikeRepository {
    supabase: Supabase,
}

impl LikeRepository {
    pub fn new(supabase: Supabase) -> Self {
        LikeRepository { supabase }
    }

    fn pair_url(&self, post_id: Uuid, user_id: Uuid) -> String {
        format!(
            "{}?post_id=eq.{}&user_id=eq.{}",
            self.supabase.rest_url(TABLE),
            urlencoding::encode(&post_id.to_string()),
            urlencoding::encode(&user_id.to_string())
        )
    }
}

#[async_trait]
impl LikeStore for LikeRepository {
    async fn list_for_post(&self, post_id: Uuid) -> StoreResult<Vec<Like>> {
        let url = format!(
            "{}?post_id=eq.{}&select=*",
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
        let likes: Vec<Like> = serde_json::from_str(&body)?;
        Ok(likes)
    }

    async fn find(&self, post_id: Uuid, user_id: Uuid) -> StoreResult<Option<Like>> {
        let url = format!("{}&select=*", self.pair_url(post_id, user_id));
        let resp = self
            .supabase
            .client()
            .get(&url)
            .headers(self.supabase.headers())
            .send()
            .await?;
        let body = Supabase::expect_success(resp).await?;
        let mut likes: Vec<Like> = serde_json::from_str(&body)?;
        if likes.is_empty() {
            Ok(None)
        } else {
            Ok(Some(likes.remove(0)))
        }
    }

    async fn insert(&self, post_id: Uuid, user_id: Uuid) -> StoreResult<bool> {
        let payload = json!({ "post_id": post_id, "user_id": user_id });
        let resp = self
            .supabase
            .client()
            .post(&self.supabase.rest_url(TABLE))
            .headers(self.supabase.headers())
            .header("Prefer", "return=representation")
            .json(&payload)
            .send()
            .await?;
        // 23505 is the unique violation on (post_id, user_id): another
        // session recorded the like first, which is not an error here.
        if resp.status() == StatusCode::CONFLICT {
            let body = resp.text().await?;
            if body.contains("23505") {
                return Ok(false);
            }
            return Err(StoreError::Rejected(format!("409 -> {}", body)));
        }
        Supabase::expect_success(resp).await?;
        Ok(true)
    }

    async fn delete(&self, post_id: Uuid, user_id: Uuid) -> StoreResult<bool> {
        let resp = self
            .supabase
            .client()
            .delete(&self.pair_url(post_id, user_id))
            .headers(self.supabase.headers())
            .header("Prefer", "return=representation")
            .send()
            .await?;
        let body = Supabase::expect_success(resp).await?;
        let deleted: Vec<Like> = serde_json::from_str(&body)?;
        Ok(!deleted.is_empty())
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
