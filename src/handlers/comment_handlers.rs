use actix_web::{get, post, web, HttpResponse};
use uuid::Uuid;

use crate::dtos::comment_dtos::{CommentIn, CommentOut};
use crate::dtos::ApiResponse;
use crate::error::ApiError;
use crate::middleware::auth_extractor::AuthenticatedUser;
use crate::AppState;

/// GET /api/posts/{id}/comments
/// The post's thread, oldest first.
#[get("/posts/{id}/comments")]
pub async fn list_comments(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let comments = state.comments.list_for(path.into_inner()).await?;
    let out: Vec<CommentOut> = comments.iter().map(CommentOut::from).collect();
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Comments retrieved", out)))
}

/// POST /api/posts/{id}/comments
#[post("/posts/{id}/comments")]
pub async fn add_comment(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    body: web::Json<CommentIn>,
) -> Result<HttpResponse, ApiError> {
    let comment = state
        .comments
        .append(path.into_inner(), user.user_id, &body.text)
        .await?;
    state.feed.apply_comment(&comment).await;
    Ok(HttpResponse::Created().json(ApiResponse::ok("Comment added", CommentOut::from(&comment))))
}
