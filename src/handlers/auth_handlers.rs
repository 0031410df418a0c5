use actix_web::{delete, post, put, web, HttpResponse};
use log::{info, warn};
use regex::Regex;

use crate::config::AppConfig;
use crate::dtos::auth_dtos::{
    ChangePasswordIn, ConfirmPasswordIn, LoginIn, LoginOut, SignupIn, SignupOut,
};
use crate::dtos::profile_dtos::ProfileOut;
use crate::dtos::ApiResponse;
use crate::error::ApiError;
use crate::middleware::auth_extractor::AuthenticatedUser;
use crate::models::user::NewUser;
use crate::services::auth_service::AuthService;
use crate::AppState;

fn looks_like_email(email: &str) -> bool {
    let re = Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$").unwrap();
    re.is_match(email)
}

/// POST /auth/signup
/// Creates the credential, then the profile row keyed by the same id. No
/// session is returned; the client logs in next.
#[post("/signup")]
pub async fn signup(
    state: web::Data<AppState>,
    svc: web::Data<AuthService>,
    config: web::Data<AppConfig>,
    body: web::Json<SignupIn>,
) -> Result<HttpResponse, ApiError> {
    let email = body.email.trim().to_lowercase();

    if !looks_like_email(&email) {
        return Err(ApiError::Validation("Invalid email format".to_string()));
    }
    if let Some(pattern) = &config.campus_email_pattern {
        if !pattern.is_match(&email) {
            return Err(ApiError::Validation(
                "Please use your campus email address".to_string(),
            ));
        }
    }
    if body.password.len() < 6 {
        return Err(ApiError::Validation(
            "Password must be at least 6 characters long".to_string(),
        ));
    }

    let user_id = svc.signup(&email, &body.password).await.map_err(|e| {
        warn!("signup rejected for {}: {}", email, e);
        if e.to_string().contains("already registered") {
            ApiError::Validation("Email already exists. Please login instead.".to_string())
        } else {
            ApiError::from(e)
        }
    })?;

    let new_user = NewUser {
        id: user_id,
        email: email.clone(),
        name: body.name.trim().to_string(),
        branch: body.branch.trim().to_string(),
        year: body.year,
    };
    new_user.validate().map_err(ApiError::Validation)?;
    state.profile.create_record(&new_user).await?;

    info!("account created for {}", email);
    Ok(HttpResponse::Created().json(ApiResponse::ok(
        "Account created",
        SignupOut { user_id },
    )))
}

/// POST /auth/login
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    svc: web::Data<AuthService>,
    body: web::Json<LoginIn>,
) -> Result<HttpResponse, ApiError> {
    let (session, user_id) = svc.login(&body.email, &body.password).await?;

    // A missing profile row is not a login failure; the client gets the
    // session and a null profile.
    let profile = match state.profile.get(user_id).await {
        Ok(user) => Some(ProfileOut::from(user)),
        Err(ApiError::NotFound(_)) => None,
        Err(err) => {
            warn!("profile lookup failed for {}: {}", user_id, err);
            None
        }
    };

    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "Login successful",
        LoginOut { session, profile },
    )))
}

/// PUT /auth/password
/// Re-verifies the current password before setting the new one.
#[put("/password")]
pub async fn change_password(
    user: AuthenticatedUser,
    svc: web::Data<AuthService>,
    body: web::Json<ChangePasswordIn>,
) -> Result<HttpResponse, ApiError> {
    if body.new_password.len() < 6 {
        return Err(ApiError::Validation(
            "Password must be at least 6 characters long".to_string(),
        ));
    }
    let email = user
        .email
        .as_deref()
        .ok_or_else(|| ApiError::Unauthorized("token carries no email".to_string()))?;

    svc.login(email, &body.current_password)
        .await
        .map_err(|_| ApiError::Unauthorized("current password is wrong".to_string()))?;
    svc.set_password(user.user_id, &body.new_password).await?;

    info!("password changed for {}", user.user_id);
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Password updated", serde_json::json!({}))))
}

/// DELETE /auth/account
/// Password-confirmed. Removes the account's rows and blobs first, the
/// credential last, so a half-done cascade can be retried by logging in
/// again.
#[delete("/account")]
pub async fn delete_account(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    svc: web::Data<AuthService>,
    body: web::Json<ConfirmPasswordIn>,
) -> Result<HttpResponse, ApiError> {
    let email = user
        .email
        .as_deref()
        .ok_or_else(|| ApiError::Unauthorized("token carries no email".to_string()))?;
    svc.login(email, &body.password)
        .await
        .map_err(|_| ApiError::Unauthorized("password confirmation failed".to_string()))?;

    state.profile.delete_account(user.user_id).await?;
    svc.delete_user(user.user_id).await?;

    info!("account {} deleted", user.user_id);
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Account deleted", serde_json::json!({}))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plausible_addresses_pass() {
        assert!(looks_like_email("227g1a0512@srit.ac.in"));
        assert!(looks_like_email("someone@example.com"));
    }

    #[test]
    fn junk_is_rejected() {
        assert!(!looks_like_email("not-an-email"));
        assert!(!looks_like_email("missing@tld"));
        assert!(!looks_like_email("@srit.ac.in"));
    }
}
