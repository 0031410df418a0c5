use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Branch codes offered in signup and feed filters. Stored as-is, matched
/// case-sensitively.
pub const KNOWN_BRANCHES: &[&str] = &["CSE", "ECE", "EEE", "CSM", "CSD", "MECH", "CIVIL"];

/// Study years offered in signup and feed filters.
pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 4;

/// Row shape of the `users` table. Passwords never land here, the auth
/// provider owns them; this is only the display profile keyed by the auth
/// user id.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: Uuid,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub profile_pic: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Upsert payload for the `users` row created at signup. `id` is the auth
/// user id so the profile row and the credential share a key.
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub branch: String,
    pub year: i32,
}

impl NewUser {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name must not be empty".to_string());
        }
        if self.branch.trim().is_empty() {
            return Err("branch must not be empty".to_string());
        }
        if self.year < MIN_YEAR || self.year > MAX_YEAR {
            return Err(format!(
                "year must be between {} and {}",
                MIN_YEAR, MAX_YEAR
            ));
        }
        Ok(())
    }
}

/// PATCH payload for a profile edit. The picture is managed by its own
/// endpoints and is deliberately not part of this struct.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileUpdate {
    pub name: String,
    pub branch: String,
    pub year: i32,
}

impl ProfileUpdate {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name must not be empty".to_string());
        }
        if self.branch.trim().is_empty() {
            return Err("branch must not be empty".to_string());
        }
        if self.year < MIN_YEAR || self.year > MAX_YEAR {
            return Err(format!(
                "year must be between {} and {}",
                MIN_YEAR, MAX_YEAR
            ));
        }
        Ok(())
    }
}

/// Claims carried by the auth provider's access tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    /// subject / user id
    pub sub: String,
    pub aud: Option<String>,
    pub exp: Option<u64>,
    pub iat: Option<u64>,
    pub role: Option<String>,
    pub email: Option<String>,
}
