use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::comment::{Comment, NewComment};
use crate::models::like::Like;
use crate::models::post::{NewPost, Post};
use crate::models::user::{NewUser, ProfileUpdate, User};

pub mod comment_repository;
pub mod like_repository;
pub mod post_repository;
pub mod storage_repository;
pub mod supabase;
pub mod user_repository;

pub use comment_repository::CommentRepository;
pub use like_repository::LikeRepository;
pub use post_repository::PostRepository;
pub use storage_repository::StorageRepository;
pub use supabase::Supabase;
pub use user_repository::UserRepository;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),

    /// The store answered with a non-success status.
    #[error("store rejected request: {0}")]
    Rejected(String),

    #[error("not found")]
    NotFound,

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("{0}")]
    Other(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Contract of the `posts` table.
#[async_trait]
pub trait PostStore: Send + Sync {
    async fn list_all(&self) -> StoreResult<Vec<Post>>;
    async fn get(&self, post_id: Uuid) -> StoreResult<Option<Post>>;
    async fn insert(&self, new_post: &NewPost) -> StoreResult<Post>;
    /// Removing an already-absent row is not an error.
    async fn delete(&self, post_id: Uuid) -> StoreResult<()>;
    async fn list_for_owner(&self, owner_id: Uuid) -> StoreResult<Vec<Post>>;
    async fn delete_for_owner(&self, owner_id: Uuid) -> StoreResult<()>;
}

/// Contract of the `users` table.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get(&self, user_id: Uuid) -> StoreResult<Option<User>>;
    async fn upsert(&self, new_user: &NewUser) -> StoreResult<()>;
    async fn update(&self, user_id: Uuid, changes: &ProfileUpdate) -> StoreResult<()>;
    /// `None` clears the picture.
    async fn set_profile_pic(&self, user_id: Uuid, url: Option<String>) -> StoreResult<()>;
    async fn delete(&self, user_id: Uuid) -> StoreResult<()>;
}

/// Contract of the `likes` table, the canonical like ledger.
#[async_trait]
pub trait LikeStore: Send + Sync {
    async fn list_for_post(&self, post_id: Uuid) -> StoreResult<Vec<Like>>;
    async fn find(&self, post_id: Uuid, user_id: Uuid) -> StoreResult<Option<Like>>;
    /// `Ok(false)` when the pair already existed and the store's uniqueness
    /// constraint won the race.
    async fn insert(&self, post_id: Uuid, user_id: Uuid) -> StoreResult<bool>;
    /// `Ok(false)` when there was nothing to delete.
    async fn delete(&self, post_id: Uuid, user_id: Uuid) -> StoreResult<bool>;
    async fn delete_for_user(&self, user_id: Uuid) -> StoreResult<()>;
}

/// Contract of the `comments` table.
#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Comments for a post in creation order, oldest first.
    async fn list_for_post(&self, post_id: Uuid) -> StoreResult<Vec<Comment>>;
    async fn insert(&self, new_comment: &NewComment) -> StoreResult<Comment>;
    async fn delete_for_user(&self, user_id: Uuid) -> StoreResult<()>;
}

/// Contract of the file store behind post attachments.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Uploads the object and returns its public URL.
    async fn upload(&self, key: &str, content_type: &str, bytes: Vec<u8>) -> StoreResult<String>;
    /// Deleting a missing object reports `StoreError::NotFound`.
    async fn delete(&self, key: &str) -> StoreResult<()>;
}
