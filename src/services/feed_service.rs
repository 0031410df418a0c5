use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use log::warn;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::comment::Comment;
use crate::models::feed::{sort_newest_first, FeedEntry, OwnerBadge};
use crate::models::post::Post;
use crate::repositories::{CommentStore, LikeStore, PostStore, UserStore};

/// Assembles the feed out of four independent tables and keeps the last
/// good result around.
///
/// One pass reads every post, then joins each post with its owner badge,
/// canonical liker list and comment thread. Per-post lookups degrade on
/// failure (sentinel badge, legacy likes, empty thread) so one bad row
/// never takes the feed down; only the base post read is fatal. A fatal
/// read falls back to the previous snapshot, flagged stale, until a later
/// pass succeeds.
pub struct FeedService {
    posts: Arc<dyn PostStore>,
    users: Arc<dyn UserStore>,
    likes: Arc<dyn LikeStore>,
    comments: Arc<dyn CommentStore>,
    snapshot: RwLock<Option<FeedSnapshot>>,
}

#[derive(Debug, Clone)]
struct FeedSnapshot {
    entries: Vec<FeedEntry>,
    refreshed_at: DateTime<Utc>,
}

/// What a feed read hands back: the entries plus whether they came from a
/// live pass or the stale fallback.
#[derive(Debug, Clone)]
pub struct FeedView {
    pub entries: Vec<FeedEntry>,
    pub refreshed_at: DateTime<Utc>,
    pub stale: bool,
    pub stale_reason: Option<String>,
}

impl FeedService {
    pub fn new(
        posts: Arc<dyn PostStore>,
        users: Arc<dyn UserStore>,
        likes: Arc<dyn LikeStore>,
        comments: Arc<dyn CommentStore>,
    ) -> Self {
        FeedService {
            posts,
            users,
            likes,
            comments,
            snapshot: RwLock::new(None),
        }
    }

    /// Serves the freshest feed available: runs a full assembly pass and on
    /// failure falls back to the last snapshot instead of dropping it. With
    /// no snapshot to fall back on, the error goes out.
    pub async fn current(&self) -> Result<FeedView, ApiError> {
        match self.refresh().await {
            Ok(entries) => {
                let snap = FeedSnapshot {
                    entries,
                    refreshed_at: Utc::now(),
                };
                *self.snapshot.write().await = Some(snap.clone());
                Ok(FeedView {
                    entries: snap.entries,
                    refreshed_at: snap.refreshed_at,
                    stale: false,
                    stale_reason: None,
                })
            }
            Err(err) => {
                warn!("feed assembly failed: {}", err);
                match self.snapshot.read().await.clone() {
                    Some(snap) => Ok(FeedView {
                        entries: snap.entries,
                        refreshed_at: snap.refreshed_at,
                        stale: true,
                        stale_reason: Some(err.to_string()),
                    }),
                    None => Err(err),
                }
            }
        }
    }

    /// One full assembly pass, newest first. Read-only against the stores.
    async fn refresh(&self) -> Result<Vec<FeedEntry>, ApiError> {
        let posts = self.posts.list_all().await?;
        let resolver = OwnerResolver::new(self.users.clone());
        let jobs = posts
            .into_iter()
            .map(|post| self.assemble_entry(post, &resolver));
        let mut entries = join_all(jobs).await;
        sort_newest_first(&mut entries);
        Ok(entries)
    }

    async fn assemble_entry(&self, post: Post, resolver: &OwnerResolver) -> FeedEntry {
        let owner = match post.user_id {
            Some(owner_id) => resolver.resolve(owner_id).await,
            None => OwnerBadge::unknown(),
        };

        // The likes table is canonical; the embedded array on the post row
        // only counts for rows the ledger has never seen.
        let liked_by: Vec<Uuid> = match self.likes.list_for_post(post.id).await {
            Ok(records) if !records.is_empty() => {
                records.into_iter().map(|like| like.user_id).collect()
            }
            Ok(_) => post.likes.clone(),
            Err(err) => {
                warn!("likes lookup failed for post {}: {}", post.id, err);
                post.likes.clone()
            }
        };

        let comments: Vec<Comment> = match self.comments.list_for_post(post.id).await {
            Ok(list) => list,
            Err(err) => {
                warn!("comment lookup failed for post {}: {}", post.id, err);
                Vec::new()
            }
        };

        FeedEntry {
            post,
            owner,
            liked_by,
            comments,
        }
    }

    /// Folds a confirmed toggle into the cached snapshot so reads between
    /// polls already see it.
    pub async fn apply_like(&self, post_id: Uuid, user_id: Uuid, liked: bool) {
        let mut guard = self.snapshot.write().await;
        if let Some(snap) = guard.as_mut() {
            if let Some(entry) = snap.entries.iter_mut().find(|e| e.post.id == post_id) {
                if liked {
                    if !entry.liked_by.contains(&user_id) {
                        entry.liked_by.push(user_id);
                    }
                } else {
                    entry.liked_by.retain(|id| *id != user_id);
                }
            }
        }
    }

    /// Folds a stored comment into the cached snapshot.
    pub async fn apply_comment(&self, comment: &Comment) {
        let mut guard = self.snapshot.write().await;
        if let Some(snap) = guard.as_mut() {
            if let Some(entry) = snap
                .entries
                .iter_mut()
                .find(|e| e.post.id == comment.post_id)
            {
                entry.comments.push(comment.clone());
            }
        }
    }

    /// Drops a deleted post from the cached snapshot. Only called after the
    /// store confirmed the removal.
    pub async fn apply_removal(&self, post_id: Uuid) {
        let mut guard = self.snapshot.write().await;
        if let Some(snap) = guard.as_mut() {
            snap.entries.retain(|entry| entry.post.id != post_id);
        }
    }
}

/// Owner lookups memoized for one assembly pass, so every post by the same
/// owner shows one consistent badge and the user table is hit once per
/// owner. Misses and failed lookups resolve to the sentinel badge.
struct OwnerResolver {
    users: Arc<dyn UserStore>,
    seen: Mutex<HashMap<Uuid, OwnerBadge>>,
}

impl OwnerResolver {
    fn new(users: Arc<dyn UserStore>) -> Self {
        OwnerResolver {
            users,
            seen: Mutex::new(HashMap::new()),
        }
    }

    async fn resolve(&self, owner_id: Uuid) -> OwnerBadge {
        if let Some(badge) = self.seen.lock().await.get(&owner_id) {
            return badge.clone();
        }
        let badge = match self.users.get(owner_id).await {
            Ok(Some(user)) => OwnerBadge::from_user(&user),
            Ok(None) => OwnerBadge::unknown(),
            Err(err) => {
                warn!("owner lookup failed for {}: {}", owner_id, err);
                OwnerBadge::unknown()
            }
        };
        self.seen.lock().await.insert(owner_id, badge.clone());
        badge
    }
}
