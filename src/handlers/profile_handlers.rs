use actix_web::{get, put, web, HttpResponse};

use crate::dtos::profile_dtos::{ProfileOut, UpdateProfileIn};
use crate::dtos::ApiResponse;
use crate::error::ApiError;
use crate::middleware::auth_extractor::AuthenticatedUser;
use crate::models::user::ProfileUpdate;
use crate::AppState;

/// GET /api/profile
#[get("/profile")]
pub async fn get_profile(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let profile = state.profile.get(user.user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "Profile retrieved",
        ProfileOut::from(profile),
    )))
}

/// PUT /api/profile
/// Name, branch and year only; the picture has its own endpoints.
#[put("/profile")]
pub async fn update_profile(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    body: web::Json<UpdateProfileIn>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    let updated = state
        .profile
        .update(
            user.user_id,
            ProfileUpdate {
                name: body.name.trim().to_string(),
                branch: body.branch.trim().to_string(),
                year: body.year,
            },
        )
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "Profile updated",
        ProfileOut::from(updated),
    )))
}
