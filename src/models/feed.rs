use uuid::Uuid;

use crate::models::comment::Comment;
use crate::models::post::Post;
use crate::models::user::User;

/// Sentinel shown when an owner attribute is missing or the owner row is
/// gone. Feed rendering never fails on an absent profile.
pub const UNKNOWN_ATTR: &str = "N/A";

/// Filter value meaning "do not filter on this axis".
pub const FILTER_ALL: &str = "All";

/// Display attributes of a post's owner as the feed shows them. Both fields
/// are already stringified: year filters compare against the rendered text,
/// not the stored integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerBadge {
    pub branch: String,
    pub year: String,
}

impl OwnerBadge {
    pub fn unknown() -> Self {
        OwnerBadge {
            branch: UNKNOWN_ATTR.to_string(),
            year: UNKNOWN_ATTR.to_string(),
        }
    }

    pub fn from_user(user: &User) -> Self {
        let branch = match user.branch.as_deref() {
            Some(b) if !b.is_empty() => b.to_string(),
            _ => UNKNOWN_ATTR.to_string(),
        };
        let year = match user.year {
            Some(y) => y.to_string(),
            None => UNKNOWN_ATTR.to_string(),
        };
        OwnerBadge { branch, year }
    }
}

/// One fully assembled feed row: the post joined with its owner badge, the
/// canonical liker list and the comment thread. Viewer-agnostic so one
/// assembly serves every caller; per-viewer flags are computed at render.
#[derive(Debug, Clone)]
pub struct FeedEntry {
    pub post: Post,
    pub owner: OwnerBadge,
    pub liked_by: Vec<Uuid>,
    pub comments: Vec<Comment>,
}

impl FeedEntry {
    pub fn like_count(&self) -> usize {
        self.liked_by.len()
    }

    pub fn is_liked_by(&self, viewer_id: Uuid) -> bool {
        self.liked_by.contains(&viewer_id)
    }
}

/// Feed filter criteria. Branch and year match the owner badge exactly
/// (case-sensitive, `All` passes everything); the text needle matches
/// title or description case-insensitively, empty passes everything.
#[derive(Debug, Clone)]
pub struct FeedFilter {
    pub branch: String,
    pub year: String,
    pub text: String,
}

impl Default for FeedFilter {
    fn default() -> Self {
        FeedFilter {
            branch: FILTER_ALL.to_string(),
            year: FILTER_ALL.to_string(),
            text: String::new(),
        }
    }
}

impl FeedFilter {
    pub fn new(branch: Option<String>, year: Option<String>, text: Option<String>) -> Self {
        FeedFilter {
            branch: branch.unwrap_or_else(|| FILTER_ALL.to_string()),
            year: year.unwrap_or_else(|| FILTER_ALL.to_string()),
            text: text.unwrap_or_default(),
        }
    }

    pub fn matches(&self, entry: &FeedEntry) -> bool {
        if self.branch != FILTER_ALL && entry.owner.branch != self.branch {
            return false;
        }
        if self.year != FILTER_ALL && entry.owner.year != self.year {
            return false;
        }
        if !self.text.is_empty() {
            let needle = self.text.to_lowercase();
            if !entry.post.title.to_lowercase().contains(&needle)
                && !entry.post.description.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        true
    }
}

/// Applies the filter without touching the input order. Pure, so it can be
/// re-run on every criteria change against the same assembled feed.
pub fn filter_entries(entries: &[FeedEntry], filter: &FeedFilter) -> Vec<FeedEntry> {
    entries
        .iter()
        .filter(|entry| filter.matches(entry))
        .cloned()
        .collect()
}

/// Newest first. Rows without a timestamp sort as epoch zero and land at
/// the tail; ties keep their incoming order.
pub fn sort_newest_first(entries: &mut [FeedEntry]) {
    entries.sort_by_key(|entry| {
        std::cmp::Reverse(
            entry
                .post
                .created_at
                .map(|t| t.timestamp_millis())
                .unwrap_or(0),
        )
    });
}
