use actix_web::{post, web, HttpResponse};

use crate::dtos::profile_picture_dtos::{ProfilePictureResponse, UploadProfilePictureRequest};
use crate::dtos::ApiResponse;
use crate::error::ApiError;
use crate::middleware::auth_extractor::AuthenticatedUser;
use crate::AppState;

/// POST /api/profile-picture/upload
/// Pushes the image to the CDN and stores the returned URL on the profile.
#[post("/upload")]
pub async fn upload_profile_picture(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    body: web::Json<UploadProfilePictureRequest>,
) -> Result<HttpResponse, ApiError> {
    let url = state.profile.upload_picture(user.user_id, &body).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "Profile picture uploaded",
        ProfilePictureResponse {
            profile_picture_url: url,
        },
    )))
}

/// POST /api/profile-picture/skip
/// Clears the stored picture URL.
#[post("/skip")]
pub async fn skip_profile_picture(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    state.profile.skip_picture(user.user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "Profile picture skipped",
        serde_json::json!({}),
    )))
}
