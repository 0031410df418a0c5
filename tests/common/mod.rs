#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use qhive_be::models::comment::{Comment, NewComment};
use qhive_be::models::like::Like;
use qhive_be::models::post::{NewPost, Post};
use qhive_be::models::user::{NewUser, ProfileUpdate, User};
use qhive_be::repositories::{
    BlobStore, CommentStore, LikeStore, PostStore, StoreError, StoreResult, UserStore,
};
use qhive_be::services::{CommentService, FeedService, LikeService, PostService, ProfileService};

/// In-memory rendition of the four tables with the semantics the REST
/// repositories have: pair uniqueness on likes, creation-ordered comments,
/// store-assigned monotonic timestamps. The `fail_*` switches simulate an
/// outage of one table; the like counters record races the pair gate is
/// supposed to prevent.
pub struct MemoryStore {
    posts: Mutex<Vec<Post>>,
    users: Mutex<HashMap<Uuid, User>>,
    likes: Mutex<Vec<Like>>,
    comments: Mutex<Vec<Comment>>,
    clock: AtomicUsize,
    pub fail_posts: AtomicBool,
    /// Fails only the delete calls, so a test can read a post and still
    /// watch its removal fail.
    pub fail_post_delete: AtomicBool,
    pub fail_users: AtomicBool,
    pub fail_likes: AtomicBool,
    pub fail_comments: AtomicBool,
    pub duplicate_like_inserts: AtomicUsize,
    pub unmatched_like_deletes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(MemoryStore {
            posts: Mutex::new(Vec::new()),
            users: Mutex::new(HashMap::new()),
            likes: Mutex::new(Vec::new()),
            comments: Mutex::new(Vec::new()),
            clock: AtomicUsize::new(0),
            fail_posts: AtomicBool::new(false),
            fail_post_delete: AtomicBool::new(false),
            fail_users: AtomicBool::new(false),
            fail_likes: AtomicBool::new(false),
            fail_comments: AtomicBool::new(false),
            duplicate_like_inserts: AtomicUsize::new(0),
            unmatched_like_deletes: AtomicUsize::new(0),
        })
    }

    fn tick(&self) -> DateTime<Utc> {
        let n = self.clock.fetch_add(1, Ordering::SeqCst) as i64;
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap() + Duration::seconds(n)
    }

    fn check(flag: &AtomicBool, what: &str) -> StoreResult<()> {
        if flag.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable(format!("{} table offline", what)))
        } else {
            Ok(())
        }
    }

    pub async fn seed_post(&self, post: Post) -> Uuid {
        let id = post.id;
        self.posts.lock().await.push(post);
        id
    }

    pub async fn seed_user(&self, user: User) {
        self.users.lock().await.insert(user.id, user);
    }

    pub async fn seed_like(&self, post_id: Uuid, user_id: Uuid) {
        self.likes.lock().await.push(Like {
            id: Uuid::new_v4(),
            post_id,
            user_id,
            created_at: Some(self.tick()),
        });
    }

    pub async fn like_rows(&self) -> usize {
        self.likes.lock().await.len()
    }

    pub async fn post_count(&self) -> usize {
        self.posts.lock().await.len()
    }

    pub async fn user_exists(&self, user_id: Uuid) -> bool {
        self.users.lock().await.contains_key(&user_id)
    }

    pub async fn comment_count(&self) -> usize {
        self.comments.lock().await.len()
    }
}

/// Bare post row, timestamp left unset; adjust fields as the test needs.
pub fn make_post(title: &str, owner: Option<Uuid>) -> Post {
    Post {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: String::new(),
        user_id: owner,
        file_url: None,
        file_type: None,
        likes: Vec::new(),
        created_at: None,
    }
}

pub fn make_user(name: &str, branch: &str, year: i32) -> User {
    User {
        id: Uuid::new_v4(),
        email: format!("{}@srit.ac.in", name.to_lowercase()),
        name: name.to_string(),
        branch: Some(branch.to_string()),
        year: Some(year),
        profile_pic: None,
        created_at: None,
    }
}

pub fn at_hour(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap()
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn list_all(&self) -> StoreResult<Vec<Post>> {
        Self::check(&self.fail_posts, "posts")?;
        Ok(self.posts.lock().await.clone())
    }

    async fn get(&self, post_id: Uuid) -> StoreResult<Option<Post>> {
        Self::check(&self.fail_posts, "posts")?;
        Ok(self
            .posts
            .lock()
            .await
            .iter()
            .find(|p| p.id == post_id)
            .cloned())
    }

    async fn insert(&self, new_post: &NewPost) -> StoreResult<Post> {
        Self::check(&self.fail_posts, "posts")?;
        let post = Post {
            id: Uuid::new_v4(),
            title: new_post.title.clone(),
            description: new_post.description.clone(),
            user_id: Some(new_post.user_id),
            file_url: new_post.file_url.clone(),
            file_type: new_post.file_type.clone(),
            likes: Vec::new(),
            created_at: Some(self.tick()),
        };
        self.posts.lock().await.push(post.clone());
        Ok(post)
    }

    async fn delete(&self, post_id: Uuid) -> StoreResult<()> {
        Self::check(&self.fail_posts, "posts")?;
        Self::check(&self.fail_post_delete, "posts")?;
        self.posts.lock().await.retain(|p| p.id != post_id);
        Ok(())
    }

    async fn list_for_owner(&self, owner_id: Uuid) -> StoreResult<Vec<Post>> {
        Self::check(&self.fail_posts, "posts")?;
        Ok(self
            .posts
            .lock()
            .await
            .iter()
            .filter(|p| p.user_id == Some(owner_id))
            .cloned()
            .collect())
    }

    async fn delete_for_owner(&self, owner_id: Uuid) -> StoreResult<()> {
        Self::check(&self.fail_posts, "posts")?;
        self.posts
            .lock()
            .await
            .retain(|p| p.user_id != Some(owner_id));
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get(&self, user_id: Uuid) -> StoreResult<Option<User>> {
        Self::check(&self.fail_users, "users")?;
        Ok(self.users.lock().await.get(&user_id).cloned())
    }

    async fn upsert(&self, new_user: &NewUser) -> StoreResult<()> {
        Self::check(&self.fail_users, "users")?;
        let user = User {
            id: new_user.id,
            email: new_user.email.clone(),
            name: new_user.name.clone(),
            branch: Some(new_user.branch.clone()),
            year: Some(new_user.year),
            profile_pic: None,
            created_at: Some(self.tick()),
        };
        self.users.lock().await.insert(user.id, user);
        Ok(())
    }

    async fn update(&self, user_id: Uuid, changes: &ProfileUpdate) -> StoreResult<()> {
        Self::check(&self.fail_users, "users")?;
        if let Some(user) = self.users.lock().await.get_mut(&user_id) {
            user.name = changes.name.clone();
            user.branch = Some(changes.branch.clone());
            user.year = Some(changes.year);
        }
        Ok(())
    }

    async fn set_profile_pic(&self, user_id: Uuid, url: Option<String>) -> StoreResult<()> {
        Self::check(&self.fail_users, "users")?;
        if let Some(user) = self.users.lock().await.get_mut(&user_id) {
            user.profile_pic = url;
        }
        Ok(())
    }

    async fn delete(&self, user_id: Uuid) -> StoreResult<()> {
        Self::check(&self.fail_users, "users")?;
        self.users.lock().await.remove(&user_id);
        Ok(())
    }
}

#[async_trait]
impl LikeStore for MemoryStore {
    async fn list_for_post(&self, post_id: Uuid) -> StoreResult<Vec<Like>> {
        Self::check(&self.fail_likes, "likes")?;
        Ok(self
            .likes
            .lock()
            .await
            .iter()
            .filter(|l| l.post_id == post_id)
            .cloned()
            .collect())
    }

    async fn find(&self, post_id: Uuid, user_id: Uuid) -> StoreResult<Option<Like>> {
        Self::check(&self.fail_likes, "likes")?;
        // Await point between the caller's check and act, so unserialized
        // toggles really can interleave here.
        tokio::task::yield_now().await;
        Ok(self
            .likes
            .lock()
            .await
            .iter()
            .find(|l| l.post_id == post_id && l.user_id == user_id)
            .cloned())
    }

    async fn insert(&self, post_id: Uuid, user_id: Uuid) -> StoreResult<bool> {
        Self::check(&self.fail_likes, "likes")?;
        tokio::task::yield_now().await;
        let mut likes = self.likes.lock().await;
        if likes
            .iter()
            .any(|l| l.post_id == post_id && l.user_id == user_id)
        {
            self.duplicate_like_inserts.fetch_add(1, Ordering::SeqCst);
            return Ok(false);
        }
        likes.push(Like {
            id: Uuid::new_v4(),
            post_id,
            user_id,
            created_at: Some(self.tick()),
        });
        Ok(true)
    }

    async fn delete(&self, post_id: Uuid, user_id: Uuid) -> StoreResult<bool> {
        Self::check(&self.fail_likes, "likes")?;
        tokio::task::yield_now().await;
        let mut likes = self.likes.lock().await;
        let before = likes.len();
        likes.retain(|l| !(l.post_id == post_id && l.user_id == user_id));
        if likes.len() == before {
            self.unmatched_like_deletes.fetch_add(1, Ordering::SeqCst);
            return Ok(false);
        }
        Ok(true)
    }

    async fn delete_for_user(&self, user_id: Uuid) -> StoreResult<()> {
        Self::check(&self.fail_likes, "likes")?;
        self.likes.lock().await.retain(|l| l.user_id != user_id);
        Ok(())
    }
}

#[async_trait]
impl CommentStore for MemoryStore {
    async fn list_for_post(&self, post_id: Uuid) -> StoreResult<Vec<Comment>> {
        Self::check(&self.fail_comments, "comments")?;
        Ok(self
            .comments
            .lock()
            .await
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, new_comment: &NewComment) -> StoreResult<Comment> {
        Self::check(&self.fail_comments, "comments")?;
        let comment = Comment {
            id: Uuid::new_v4(),
            post_id: new_comment.post_id,
            user_id: new_comment.user_id,
            text: new_comment.text.clone(),
            created_at: Some(self.tick()),
        };
        self.comments.lock().await.push(comment.clone());
        Ok(comment)
    }

    async fn delete_for_user(&self, user_id: Uuid) -> StoreResult<()> {
        Self::check(&self.fail_comments, "comments")?;
        self.comments.lock().await.retain(|c| c.user_id != user_id);
        Ok(())
    }
}

/// Blob store double that records every call instead of talking to a
/// bucket. Public URLs keep the key as the last path segment, same as the
/// real store.
pub struct MemoryBlobStore {
    pub uploaded: Mutex<Vec<String>>,
    pub deleted: Mutex<Vec<String>>,
    pub delete_calls: AtomicUsize,
    pub fail_upload: AtomicBool,
    pub fail_delete: AtomicBool,
}

impl MemoryBlobStore {
    pub fn new() -> Arc<Self> {
        Arc::new(MemoryBlobStore {
            uploaded: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
            delete_calls: AtomicUsize::new(0),
            fail_upload: AtomicBool::new(false),
            fail_delete: AtomicBool::new(false),
        })
    }

    pub fn public_url(key: &str) -> String {
        format!(
            "https://blobs.test/storage/v1/object/public/documents/{}",
            key
        )
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn upload(&self, key: &str, _content_type: &str, _bytes: Vec<u8>) -> StoreResult<String> {
        if self.fail_upload.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("blob store offline".to_string()));
        }
        self.uploaded.lock().await.push(key.to_string());
        Ok(Self::public_url(key))
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("blob store offline".to_string()));
        }
        self.deleted.lock().await.push(key.to_string());
        Ok(())
    }
}

pub fn feed_service(store: &Arc<MemoryStore>) -> FeedService {
    let posts: Arc<dyn PostStore> = store.clone();
    let users: Arc<dyn UserStore> = store.clone();
    let likes: Arc<dyn LikeStore> = store.clone();
    let comments: Arc<dyn CommentStore> = store.clone();
    FeedService::new(posts, users, likes, comments)
}

pub fn like_service(store: &Arc<MemoryStore>) -> LikeService {
    let likes: Arc<dyn LikeStore> = store.clone();
    LikeService::new(likes)
}

pub fn comment_service(store: &Arc<MemoryStore>) -> CommentService {
    let comments: Arc<dyn CommentStore> = store.clone();
    CommentService::new(comments)
}

pub fn post_service(store: &Arc<MemoryStore>, blobs: &Arc<MemoryBlobStore>) -> PostService {
    let posts: Arc<dyn PostStore> = store.clone();
    let blob_store: Arc<dyn BlobStore> = blobs.clone();
    PostService::new(posts, blob_store)
}

pub fn profile_service(store: &Arc<MemoryStore>, blobs: &Arc<MemoryBlobStore>) -> ProfileService {
    let users: Arc<dyn UserStore> = store.clone();
    let posts: Arc<dyn PostStore> = store.clone();
    let likes: Arc<dyn LikeStore> = store.clone();
    let comments: Arc<dyn CommentStore> = store.clone();
    let blob_store: Arc<dyn BlobStore> = blobs.clone();
    ProfileService::new(
        users,
        posts,
        likes,
        comments,
        blob_store,
        reqwest::Client::new(),
        None,
    )
}
