pub mod config;
pub mod dtos;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod services;

use std::sync::Arc;

use reqwest::Client;

use crate::services::{CommentService, FeedService, LikeService, PostService, ProfileService};

/// Everything the handlers share. Cheap to clone per worker: the services
/// are behind `Arc` and the client is one internally.
#[derive(Clone)]
pub struct AppState {
    pub feed: Arc<FeedService>,
    pub likes: Arc<LikeService>,
    pub comments: Arc<CommentService>,
    pub posts: Arc<PostService>,
    pub profile: Arc<ProfileService>,
    pub http_client: Client,
    pub supabase_url: String,
    pub supabase_anon_key: String,
}
