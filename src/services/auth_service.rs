use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::dtos::auth_dtos::SessionOut;
use crate::error::ApiError;
use crate::repositories::StoreError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("auth provider error: {0}")]
    Provider(String),
    #[error("parse uuid error")]
    UuidError(#[from] uuid::Error),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => {
                ApiError::Unauthorized("invalid email or password".to_string())
            }
            other => ApiError::Store(StoreError::Unavailable(other.to_string())),
        }
    }
}

/// Credential operations against the auth provider (GoTrue). Profile rows
/// live elsewhere; this service only ever touches the credential side.
#[derive(Clone)]
pub struct AuthService {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
    service_role_key: String,
}

impl AuthService {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        anon_key: impl Into<String>,
        service_role_key: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        AuthService {
            client,
            base_url,
            anon_key: anon_key.into(),
            service_role_key: service_role_key.into(),
        }
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    pub async fn signup(&self, email: &str, password: &str) -> Result<Uuid, AuthError> {
        #[derive(Serialize)]
        struct Body<'a> {
            email: &'a str,
            password: &'a str,
        }

        let resp = self
            .client
            .post(&self.auth_url("signup"))
            .header("apikey", &self.anon_key)
            .header("Content-Type", "application/json")
            .json(&Body {
                email: email.trim(),
                password,
            })
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();

        if !status.is_success() {
            if let Ok(error_json) = serde_json::from_str::<serde_json::Value>(&text) {
                if let Some(msg) = error_json.get("msg").or_else(|| error_json.get("message")) {
                    return Err(AuthError::Provider(
                        msg.as_str().unwrap_or("signup failed").to_string(),
                    ));
                }
            }
            return Err(AuthError::Provider(format!(
                "signup failed: {} {}",
                status, text
            )));
        }

        let json_val: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| AuthError::Provider(format!("invalid json: {}", e)))?;

        let user_id_str = json_val
            .get("user")
            .and_then(|u| u.get("id"))
            .or_else(|| json_val.get("id"))
            .and_then(|v| v.as_str())
            .ok_or_else(|| AuthError::Provider("signup returned no user id".to_string()))?;

        Ok(Uuid::parse_str(user_id_str)?)
    }

    /// Password grant. Returns the session and the user id taken straight
    /// from the token response.
    pub async fn login(&self, email: &str, password: &str) -> Result<(SessionOut, Uuid), AuthError> {
        #[derive(Serialize)]
        struct Body<'a> {
            email: &'a str,
            password: &'a str,
        }

        #[derive(Deserialize)]
        struct TokenResp {
            access_token: String,
            refresh_token: Option<String>,
            expires_in: Option<i64>,
            token_type: Option<String>,
            user: Option<UserInfo>,
        }

        #[derive(Deserialize)]
        struct UserInfo {
            id: String,
        }

        let resp = self
            .client
            .post(&self.auth_url("token?grant_type=password"))
            .header("apikey", &self.anon_key)
            .header("Content-Type", "application/json")
            .json(&Body {
                email: email.trim(),
                password,
            })
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();

        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
            return Err(AuthError::InvalidCredentials);
        }
        if status != StatusCode::OK {
            return Err(AuthError::Provider(format!(
                "login failed: {} {}",
                status, text
            )));
        }

        let tr: TokenResp = serde_json::from_str(&text)
            .map_err(|e| AuthError::Provider(format!("invalid json in login response: {}", e)))?;

        let user_id = match tr.user {
            Some(user) => Uuid::parse_str(&user.id)?,
            None => return Err(AuthError::Provider("no user info in login response".to_string())),
        };

        let session = SessionOut {
            access_token: tr.access_token,
            refresh_token: tr.refresh_token,
            expires_in: tr.expires_in,
            token_type: tr.token_type,
        };
        Ok((session, user_id))
    }

    /// Admin-side password update. Callers re-verify the current password
    /// with `login` before getting here.
    pub async fn set_password(&self, user_id: Uuid, new_password: &str) -> Result<(), AuthError> {
        let payload = serde_json::json!({ "password": new_password });
        let resp = self
            .client
            .put(&self.auth_url(&format!("admin/users/{}", user_id)))
            .header("apikey", &self.service_role_key)
            .header(
                "Authorization",
                format!("Bearer {}", &self.service_role_key),
            )
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(AuthError::Provider(format!(
                "password update failed: {} {}",
                status, text
            )));
        }
        Ok(())
    }

    /// Admin-side credential removal, the last step of account deletion.
    pub async fn delete_user(&self, user_id: Uuid) -> Result<(), AuthError> {
        let resp = self
            .client
            .delete(&self.auth_url(&format!("admin/users/{}", user_id)))
            .header("apikey", &self.service_role_key)
            .header(
                "Authorization",
                format!("Bearer {}", &self.service_role_key),
            )
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() && status != StatusCode::NOT_FOUND {
            let text = resp.text().await.unwrap_or_default();
            return Err(AuthError::Provider(format!(
                "user delete failed: {} {}",
                status, text
            )));
        }
        Ok(())
    }
}
