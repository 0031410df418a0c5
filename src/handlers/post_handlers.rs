use actix_web::{delete, get, post, web, HttpResponse};
use uuid::Uuid;

use crate::dtos::feed_dtos::{FeedEntryOut, FeedOut, FeedQuery, FilterOptionsOut};
use crate::dtos::post_dtos::{CreatePostIn, PostOut};
use crate::dtos::ApiResponse;
use crate::error::ApiError;
use crate::middleware::auth_extractor::AuthenticatedUser;
use crate::models::feed::{filter_entries, FILTER_ALL};
use crate::models::user::{KNOWN_BRANCHES, MAX_YEAR, MIN_YEAR};
use crate::AppState;

/// GET /api/posts
/// The assembled feed, newest first, filtered by the query axes. Anonymous
/// callers get the same entries with `viewer_has_liked` false everywhere.
#[get("/posts")]
pub async fn get_feed(
    state: web::Data<AppState>,
    viewer: Option<AuthenticatedUser>,
    query: web::Query<FeedQuery>,
) -> Result<HttpResponse, ApiError> {
    let view = state.feed.current().await?;
    let filter = query.into_inner().into_filter();
    let entries = filter_entries(&view.entries, &filter);

    let viewer_id = viewer.map(|v| v.user_id);
    let out = FeedOut {
        entries: entries
            .iter()
            .map(|entry| FeedEntryOut::from_entry(entry, viewer_id))
            .collect(),
        refreshed_at: view.refreshed_at,
        stale: view.stale,
        stale_reason: view.stale_reason,
    };
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Feed retrieved", out)))
}

/// POST /api/posts
#[post("/posts")]
pub async fn create_post(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    body: web::Json<CreatePostIn>,
) -> Result<HttpResponse, ApiError> {
    let post = state.posts.create(user.user_id, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok("Post created", PostOut::from(post))))
}

/// DELETE /api/posts/{id}
/// Owner-only. The cached feed drops the entry only after the store
/// confirmed the removal.
#[delete("/posts/{id}")]
pub async fn delete_post(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let post_id = path.into_inner();
    state.posts.delete(post_id, user.user_id).await?;
    state.feed.apply_removal(post_id).await;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "Post deleted",
        serde_json::json!({ "id": post_id }),
    )))
}

/// GET /api/filters
/// Option lists for the feed filter dropdowns.
#[get("/filters")]
pub async fn get_filter_options() -> Result<HttpResponse, ApiError> {
    let mut branches = vec![FILTER_ALL.to_string()];
    branches.extend(KNOWN_BRANCHES.iter().map(|b| b.to_string()));
    let mut years = vec![FILTER_ALL.to_string()];
    years.extend((MIN_YEAR..=MAX_YEAR).map(|y| y.to_string()));
    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "Filter options",
        FilterOptionsOut { branches, years },
    )))
}
