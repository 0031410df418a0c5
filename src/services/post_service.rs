use std::sync::Arc;

use chrono::Utc;
use log::{info, warn};
use mime::Mime;
use uuid::Uuid;

use crate::dtos::post_dtos::CreatePostIn;
use crate::error::ApiError;
use crate::models::post::{blob_key, blob_key_from_url, NewPost, Post};
use crate::repositories::{BlobStore, PostStore};

/// Post creation and deletion, including the attached file's lifecycle in
/// the blob store.
pub struct PostService {
    posts: Arc<dyn PostStore>,
    blobs: Arc<dyn BlobStore>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostStore>, blobs: Arc<dyn BlobStore>) -> Self {
        PostService { posts, blobs }
    }

    pub async fn create(&self, owner_id: Uuid, input: CreatePostIn) -> Result<Post, ApiError> {
        let title = input.title.trim();
        if title.is_empty() {
            return Err(ApiError::Validation("title must not be empty".to_string()));
        }

        let mut file_url = None;
        let mut file_type = None;
        if let Some(upload) = &input.file {
            let media_type: Mime = upload
                .content_type
                .parse()
                .map_err(|_| ApiError::Validation("unreadable content type".to_string()))?;
            if !upload_type_allowed(&media_type) {
                return Err(ApiError::Validation(format!(
                    "unsupported file type: {}",
                    media_type
                )));
            }
            let bytes = upload
                .bytes()
                .map_err(|_| ApiError::Validation("invalid base64 file data".to_string()))?;
            let key = blob_key(owner_id, Utc::now(), &upload.file_name);
            let url = self
                .blobs
                .upload(&key, media_type.essence_str(), bytes)
                .await?;
            info!("stored attachment {} for user {}", key, owner_id);
            file_url = Some(url);
            file_type = Some(media_type.essence_str().to_string());
        }

        let post = self
            .posts
            .insert(&NewPost {
                title: title.to_string(),
                description: input.description.trim().to_string(),
                user_id: owner_id,
                file_url,
                file_type,
            })
            .await?;
        Ok(post)
    }

    /// Removes a post the caller owns: the blob first, then the metadata
    /// row. A failed blob delete is logged and tolerated — worst case is an
    /// orphaned file. A failed metadata delete is reported and the post
    /// stays visible.
    pub async fn delete(&self, post_id: Uuid, requester_id: Uuid) -> Result<(), ApiError> {
        let post = self
            .posts
            .get(post_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("post {} not found", post_id)))?;

        if post.user_id != Some(requester_id) {
            return Err(ApiError::Forbidden(
                "only the post owner can delete it".to_string(),
            ));
        }

        if let Some(file_url) = post.file_url.as_deref() {
            match blob_key_from_url(file_url) {
                Some(key) => {
                    if let Err(err) = self.blobs.delete(&key).await {
                        warn!(
                            "blob delete failed for post {} (key {}): {}; removing metadata anyway",
                            post_id, key, err
                        );
                    }
                }
                None => warn!("no blob key in file url {} of post {}", file_url, post_id),
            }
        }

        self.posts
            .delete(post_id)
            .await
            .map_err(|err| ApiError::DeletionFailed(err.to_string()))?;
        info!("post {} deleted by {}", post_id, requester_id);
        Ok(())
    }
}

/// Upload allowlist: any image or video, pdf, plain text and the common
/// office formats.
fn upload_type_allowed(media_type: &Mime) -> bool {
    match media_type.type_() {
        mime::IMAGE | mime::VIDEO => true,
        mime::TEXT => media_type.subtype() == mime::PLAIN,
        mime::APPLICATION => {
            let sub = media_type.subtype().as_str();
            sub == "pdf"
                || sub == "msword"
                || sub == "vnd.ms-powerpoint"
                || sub == "vnd.ms-excel"
                || sub.starts_with("vnd.openxmlformats-officedocument")
        }
        _ => false,
    }
}
