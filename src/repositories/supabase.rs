use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Response};

use crate::repositories::{StoreError, StoreResult};

/// Shared Supabase REST access: base URL, keys and the reqwest client that
/// every per-table repository reuses. Cloning is cheap, the client is
/// already an `Arc` internally.
#[derive(Clone)]
pub struct Supabase {
    client: Client,
    base_url: String,
    anon_key: String,
    service_role_key: String,
}

impl Supabase {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        anon_key: impl Into<String>,
        service_role_key: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Supabase {
            client,
            base_url,
            anon_key: anon_key.into(),
            service_role_key: service_role_key.into(),
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn service_role_key(&self) -> &str {
        &self.service_role_key
    }

    pub fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    pub fn storage_object_url(&self, bucket: &str, key: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url,
            bucket,
            urlencoding::encode(key)
        )
    }

    pub fn storage_public_url(&self, bucket: &str, key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url,
            bucket,
            urlencoding::encode(key)
        )
    }

    /// Standard PostgREST headers: anon key as `apikey`, service role as the
    /// bearer so row level security never blocks server-side operations.
    pub fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Ok(value) = HeaderValue::from_str(&self.anon_key) {
            headers.insert("apikey", value);
        }
        if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", self.service_role_key)) {
            headers.insert(AUTHORIZATION, value);
        }
        headers
    }

    /// Reads the body and turns a non-success status into
    /// `StoreError::Rejected` with the status and body attached.
    pub async fn expect_success(resp: Response) -> StoreResult<String> {
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(StoreError::Rejected(format!(
                "{} -> {}",
                status.as_u16(),
                body
            )));
        }
        Ok(body)
    }
}
