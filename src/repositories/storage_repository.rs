use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;

use crate::repositories::{BlobStore, StoreError, StoreResult, Supabase};

/// Supabase Storage access for one bucket. Objects are uploaded private-key
/// side but read through the bucket's public URL, which is what gets stored
/// on the post row.
#[derive(Clone)]
pub struct StorageRepository {
    supabase: Supabase,
    bucket: String,
}

impl StorageRepository {
    pub fn new(supabase: Supabase, bucket: impl Into<String>) -> Self {
        StorageRepository {
            supabase,
            bucket: bucket.into(),
        }
    }

    fn headers(&self, content_type: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(content_type) {
            headers.insert(CONTENT_TYPE, value);
        }
        if let Ok(value) = HeaderValue::from_str(self.supabase.service_role_key()) {
            headers.insert("apikey", value);
        }
        if let Ok(value) =
            HeaderValue::from_str(&format!("Bearer {}", self.supabase.service_role_key()))
        {
            headers.insert(AUTHORIZATION, value);
        }
        headers
    }
}

#[async_trait]
impl BlobStore for StorageRepository {
    async fn upload(&self, key: &str, content_type: &str, bytes: Vec<u8>) -> StoreResult<String> {
        let url = self.supabase.storage_object_url(&self.bucket, key);
        let resp = self
            .supabase
            .client()
            .post(&url)
            .headers(self.headers(content_type))
            .body(bytes)
            .send()
            .await?;
        Supabase::expect_success(resp).await?;
        Ok(self.supabase.storage_public_url(&self.bucket, key))
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        let url = self.supabase.storage_object_url(&self.bucket, key);
        let resp = self
            .supabase
            .client()
            .delete(&url)
            .headers(self.headers("application/json"))
            .send()
            .await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound);
        }
        Supabase::expect_success(resp).await?;
        Ok(())
    }
}
