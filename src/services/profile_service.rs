use std::sync::Arc;

use log::{info, warn};
use reqwest::multipart;
use serde::Deserialize;
use uuid::Uuid;

use crate::config::CloudinaryConfig;
use crate::dtos::profile_picture_dtos::UploadProfilePictureRequest;
use crate::error::ApiError;
use crate::models::post::blob_key_from_url;
use crate::models::user::{NewUser, ProfileUpdate, User};
use crate::repositories::{BlobStore, CommentStore, LikeStore, PostStore, StoreError, UserStore};

const PICTURE_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

/// Profile rows plus everything hanging off an account: the picture hosted
/// at Cloudinary and the full cross-table cascade when the account goes.
pub struct ProfileService {
    users: Arc<dyn UserStore>,
    posts: Arc<dyn PostStore>,
    likes: Arc<dyn LikeStore>,
    comments: Arc<dyn CommentStore>,
    blobs: Arc<dyn BlobStore>,
    client: reqwest::Client,
    cloudinary: Option<CloudinaryConfig>,
}

impl ProfileService {
    pub fn new(
        users: Arc<dyn UserStore>,
        posts: Arc<dyn PostStore>,
        likes: Arc<dyn LikeStore>,
        comments: Arc<dyn CommentStore>,
        blobs: Arc<dyn BlobStore>,
        client: reqwest::Client,
        cloudinary: Option<CloudinaryConfig>,
    ) -> Self {
        ProfileService {
            users,
            posts,
            likes,
            comments,
            blobs,
            client,
            cloudinary,
        }
    }

    pub async fn create_record(&self, new_user: &NewUser) -> Result<(), ApiError> {
        Ok(self.users.upsert(new_user).await?)
    }

    pub async fn get(&self, user_id: Uuid) -> Result<User, ApiError> {
        self.users
            .get(user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("profile {} not found", user_id)))
    }

    pub async fn update(&self, user_id: Uuid, changes: ProfileUpdate) -> Result<User, ApiError> {
        changes.validate().map_err(ApiError::Validation)?;
        self.users.update(user_id, &changes).await?;
        self.get(user_id).await
    }

    /// Pushes the image to Cloudinary's unsigned upload endpoint and stores
    /// the returned CDN URL on the profile row.
    pub async fn upload_picture(
        &self,
        user_id: Uuid,
        input: &UploadProfilePictureRequest,
    ) -> Result<String, ApiError> {
        if !PICTURE_TYPES.contains(&input.content_type.as_str()) {
            return Err(ApiError::Validation(format!(
                "unsupported image type: {}",
                input.content_type
            )));
        }
        let bytes = input
            .bytes()
            .map_err(|_| ApiError::Validation("invalid base64 image data".to_string()))?;

        let cloudinary = self.cloudinary.as_ref().ok_or_else(|| {
            ApiError::Store(StoreError::Unavailable(
                "image hosting is not configured".to_string(),
            ))
        })?;

        #[derive(Deserialize)]
        struct CloudinaryOut {
            secure_url: String,
        }

        let part = multipart::Part::bytes(bytes)
            .file_name(input.file_name.clone())
            .mime_str(&input.content_type)
            .map_err(|_| ApiError::Validation("unreadable content type".to_string()))?;
        let form = multipart::Form::new()
            .part("file", part)
            .text("upload_preset", cloudinary.upload_preset.clone());
        let url = format!(
            "https://api.cloudinary.com/v1_1/{}/image/upload",
            cloudinary.cloud_name
        );

        let resp = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::Store(StoreError::Http(e)))?;
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| ApiError::Store(StoreError::Http(e)))?;
        if !status.is_success() {
            return Err(ApiError::Store(StoreError::Rejected(format!(
                "cloudinary: {} -> {}",
                status.as_u16(),
                body
            ))));
        }
        let out: CloudinaryOut =
            serde_json::from_str(&body).map_err(|e| ApiError::Store(StoreError::Serde(e)))?;

        self.users
            .set_profile_pic(user_id, Some(out.secure_url.clone()))
            .await?;
        info!("profile picture updated for {}", user_id);
        Ok(out.secure_url)
    }

    pub async fn skip_picture(&self, user_id: Uuid) -> Result<(), ApiError> {
        Ok(self.users.set_profile_pic(user_id, None).await?)
    }

    /// Removes everything an account owns, in dependency order: attachment
    /// blobs, then posts, likes and comments, then the profile row itself.
    /// The auth credential is the caller's last step once this succeeds.
    pub async fn delete_account(&self, user_id: Uuid) -> Result<(), ApiError> {
        let owned = self.posts.list_for_owner(user_id).await?;
        for post in &owned {
            if let Some(file_url) = post.file_url.as_deref() {
                if let Some(key) = blob_key_from_url(file_url) {
                    if let Err(err) = self.blobs.delete(&key).await {
                        warn!("blob delete failed for post {} ({}): {}", post.id, key, err);
                    }
                }
            }
        }
        self.posts.delete_for_owner(user_id).await?;
        self.likes.delete_for_user(user_id).await?;
        self.comments.delete_for_user(user_id).await?;
        self.users.delete(user_id).await?;
        info!("account data removed for {}", user_id);
        Ok(())
    }
}
