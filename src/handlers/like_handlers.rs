use actix_web::{post, web, HttpResponse};
use uuid::Uuid;

use crate::dtos::ApiResponse;
use crate::error::ApiError;
use crate::middleware::auth_extractor::AuthenticatedUser;
use crate::AppState;

/// POST /api/posts/{id}/like
/// Toggles the caller's like and folds the confirmed result into the
/// cached feed.
#[post("/posts/{id}/like")]
pub async fn toggle_like(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let post_id = path.into_inner();
    let outcome = state.likes.toggle(post_id, user.user_id).await?;
    state
        .feed
        .apply_like(post_id, user.user_id, outcome.liked)
        .await;

    let message = if outcome.liked {
        "Post liked"
    } else {
        "Like removed"
    };
    Ok(HttpResponse::Ok().json(ApiResponse::ok(message, outcome)))
}
