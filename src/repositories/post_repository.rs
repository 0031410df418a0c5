use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::models::post::{NewPost, Post};
use crate::repositories::{PostStore, StoreError, StoreResult, Supabase};

const TABLE: &str = "posts";

#[derive(Clone)]
pub struct PostRepository {
    supabase: Supabase,
}

impl PostRepository {
    pub fn new(supabase: Supabase) -> Self {
        PostRepository { supabase }
    }
}

#[derive(Serialize)]
struct InsertPayload<'a> {
    title: &'a str,
    description: &'a str,
    user_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    file_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    file_type: Option<&'a str>,
}

#[async_trait]
impl PostStore for PostRepository {
    async fn list_all(&self) -> StoreResult<Vec<Post>> {
        let url = format!("{}?select=*", self.supabase.rest_url(TABLE));
        let resp = self
            .supabase
            .client()
            .get(&url)
            .headers(self.supabase.headers())
            .send()
            .await?;
        let body = Supabase::expect_success(resp).await?;
        let posts: Vec<Post> = serde_json::from_str(&body)?;
        Ok(posts)
    }

    async fn get(&self, post_id: Uuid) -> StoreResult<Option<Post>> {
        let url = format!(
            "{}?id=eq.{}&select=*",
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
        let mut posts: Vec<Post> = serde_json::from_str(&body)?;
        if posts.is_empty() {
            Ok(None)
        } else {
            Ok(Some(posts.remove(0)))
        }
    }

    async fn insert(&self, new_post: &NewPost) -> StoreResult<Post> {
        let payload = InsertPayload {
            title: &new_post.title,
            description: &new_post.description,
            user_id: new_post.user_id,
            file_url: new_post.file_url.as_deref(),
            file_type: new_post.file_type.as_deref(),
        };
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
        let posts: Vec<Post> = serde_json::from_str(&body)?;
        posts
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Other("empty response from insert".to_string()))
    }

    async fn delete(&self, post_id: Uuid) -> StoreResult<()> {
        let url = format!(
            "{}?id=eq.{}",
            self.supabase.rest_url(TABLE),
            urlencoding::encode(&post_id.to_string())
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

    async fn list_for_owner(&self, owner_id: Uuid) -> StoreResult<Vec<Post>> {
        let url = format!(
            "{}?user_id=eq.{}&select=*",
            self.supabase.rest_url(TABLE),
            urlencoding::encode(&owner_id.to_string())
        );
        let resp = self
            .supabase
            .client()
            .get(&url)
            .headers(self.supabase.headers())
            .send()
            .await?;
        let body = Supabase::expect_success(resp).await?;
        let posts: Vec<Post> = serde_json::from_str(&body)?;
        Ok(posts)
    }

    async fn delete_for_owner(&self, owner_id: Uuid) -> StoreResult<()> {
        let url = format!(
            "{}?user_id=eq.{}",
            self.supabase.rest_url(TABLE),
            urlencoding::encode(&owner_id.to_string())
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
