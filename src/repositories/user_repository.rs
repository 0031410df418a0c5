use async_trait::async_trait;
use serde_json::json;
use uuid::Uuid;

use crate::models::user::{NewUser, ProfileUpdate, User};
use crate::repositories::{StoreResult, Supabase, UserStore};

const TABLE: &str = "users";

#[derive(Clone)]
pub struct UserRepository {
    supabase: Supabase,
}

impl UserRepository {
    pub fn new(supabase: Supabase) -> Self {
        UserRepository { supabase }
    }

    fn row_url(&self, user_id: Uuid) -> String {
        format!(
            "{}?id=eq.{}",
            self.supabase.rest_url(TABLE),
            urlencoding::encode(&user_id.to_string())
        )
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn get(&self, user_id: Uuid) -> StoreResult<Option<User>> {
        let url = format!("{}&select=*", self.row_url(user_id));
        let resp = self
            .supabase
            .client()
            .get(&url)
            .headers(self.supabase.headers())
            .send()
            .await?;
        let body = Supabase::expect_success(resp).await?;
        let mut users: Vec<User> = serde_json::from_str(&body)?;
        if users.is_empty() {
            Ok(None)
        } else {
            Ok(Some(users.remove(0)))
        }
    }

    async fn upsert(&self, new_user: &NewUser) -> StoreResult<()> {
        let resp = self
            .supabase
            .client()
            .post(&self.supabase.rest_url(TABLE))
            .headers(self.supabase.headers())
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(new_user)
            .send()
            .await?;
        Supabase::expect_success(resp).await?;
        Ok(())
    }

    async fn update(&self, user_id: Uuid, changes: &ProfileUpdate) -> StoreResult<()> {
        let resp = self
            .supabase
            .client()
            .patch(&self.row_url(user_id))
            .headers(self.supabase.headers())
            .header("Prefer", "return=minimal")
            .json(changes)
            .send()
            .await?;
        Supabase::expect_success(resp).await?;
        Ok(())
    }

    async fn set_profile_pic(&self, user_id: Uuid, url: Option<String>) -> StoreResult<()> {
        // null clears the column, which is how "skip picture" is stored.
        let payload = json!({ "profile_pic": url });
        let resp = self
            .supabase
            .client()
            .patch(&self.row_url(user_id))
            .headers(self.supabase.headers())
            .header("Prefer", "return=minimal")
            .json(&payload)
            .send()
            .await?;
        Supabase::expect_success(resp).await?;
        Ok(())
    }

    async fn delete(&self, user_id: Uuid) -> StoreResult<()> {
        let resp = self
            .supabase
            .client()
            .delete(&self.row_url(user_id))
            .headers(self.supabase.headers())
            .send()
            .await?;
        Supabase::expect_success(resp).await?;
        Ok(())
    }
}
