use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dtos::comment_dtos::CommentOut;
use crate::models::feed::{FeedEntry, FeedFilter};

/// Query string of `GET /api/posts`. Absent axes pass everything.
#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    pub branch: Option<String>,
    pub year: Option<String>,
    pub q: Option<String>,
}

impl FeedQuery {
    pub fn into_filter(self) -> FeedFilter {
        FeedFilter::new(self.branch, self.year, self.q)
    }
}

/// One feed row as the client sees it, with the viewer-specific like flag
/// already computed.
#[derive(Debug, Serialize)]
pub struct FeedEntryOut {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub user_id: Option<Uuid>,
    pub owner_branch: String,
    pub owner_year: String,
    pub file_url: Option<String>,
    pub file_type: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub like_count: usize,
    pub viewer_has_liked: bool,
    pub comments: Vec<CommentOut>,
}

impl FeedEntryOut {
    pub fn from_entry(entry: &FeedEntry, viewer_id: Option<Uuid>) -> Self {
        FeedEntryOut {
            id: entry.post.id,
            title: entry.post.title.clone(),
            description: entry.post.description.clone(),
            user_id: entry.post.user_id,
            owner_branch: entry.owner.branch.clone(),
            owner_year: entry.owner.year.clone(),
            file_url: entry.post.file_url.clone(),
            file_type: entry.post.file_type.clone(),
            created_at: entry.post.created_at,
            like_count: entry.like_count(),
            viewer_has_liked: viewer_id.map(|id| entry.is_liked_by(id)).unwrap_or(false),
            comments: entry.comments.iter().map(CommentOut::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FeedOut {
    pub entries: Vec<FeedEntryOut>,
    pub refreshed_at: DateTime<Utc>,
    /// Set when the entries came from the last good snapshot because the
    /// latest assembly pass failed.
    pub stale: bool,
    pub stale_reason: Option<String>,
}

/// Option lists the client renders into its filter dropdowns.
#[derive(Debug, Serialize)]
pub struct FilterOptionsOut {
    pub branches: Vec<String>,
    pub years: Vec<String>,
}
