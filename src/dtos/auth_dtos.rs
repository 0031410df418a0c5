use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dtos::profile_dtos::ProfileOut;

#[derive(Deserialize)]
pub struct SignupIn {
    pub email: String,
    pub password: String,
    pub name: String,
    pub branch: String,
    pub year: i32,
}

#[derive(Deserialize)]
pub struct LoginIn {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct ChangePasswordIn {
    pub current_password: String,
    pub new_password: String,
}

/// Account deletion asks for the password again before anything is removed.
#[derive(Deserialize)]
pub struct ConfirmPasswordIn {
    pub password: String,
}

#[derive(Serialize)]
pub struct SessionOut {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<i64>,
    pub token_type: Option<String>,
}

#[derive(Serialize)]
pub struct SignupOut {
    pub user_id: Uuid,
}

#[derive(Serialize)]
pub struct LoginOut {
    pub session: SessionOut,
    /// `None` when the auth user exists but the profile row is missing.
    pub profile: Option<ProfileOut>,
}
