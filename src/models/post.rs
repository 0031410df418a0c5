use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

/// Row shape of the `posts` table.
///
/// Rows written by older app versions may miss columns or carry the retired
/// embedded `likes` array, so everything past the id is optional or
/// defaulted and a row must deserialize no matter what is in it.
#[derive(Debug, Clone, Deserialize)]
pub struct Post {
    pub id: Uuid,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub file_type: Option<String>,
    /// Retired embedded liker list. Read-only: feed assembly falls back to
    /// it for rows that predate the `likes` table, nothing ever writes it.
    #[serde(default, deserialize_with = "lenient_id_list")]
    pub likes: Vec<Uuid>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Insert payload for a new post. The embedded `likes` column is absent on
/// purpose, new rows start with no legacy data.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub description: String,
    pub user_id: Uuid,
    pub file_url: Option<String>,
    pub file_type: Option<String>,
}

/// Accepts the legacy `likes` column in whatever state it is in: a JSON
/// array keeps its parseable uuid entries, anything else (null, object,
/// number, string) reads as empty.
fn lenient_id_list<'de, D>(deserializer: D) -> Result<Vec<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(match raw {
        serde_json::Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str())
            .filter_map(|s| Uuid::parse_str(s).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// Builds the storage object key for an uploaded file:
/// `{owner}_{millis}_{sanitized original name}`. The key stays the last
/// path segment of the public URL, which is what `blob_key_from_url` relies
/// on when a post is deleted.
pub fn blob_key(owner_id: Uuid, uploaded_at: DateTime<Utc>, original_name: &str) -> String {
    let unsafe_chars = Regex::new(r"[^a-zA-Z0-9._-]").unwrap();
    let safe_name = unsafe_chars.replace_all(original_name, "_");
    format!(
        "{}_{}_{}",
        owner_id,
        uploaded_at.timestamp_millis(),
        safe_name
    )
}

/// Recovers the storage object key from a stored public URL by taking the
/// last path segment and undoing percent-encoding. Returns `None` for URLs
/// with nothing after the final slash.
pub fn blob_key_from_url(file_url: &str) -> Option<String> {
    let tail = file_url.rsplit('/').next()?;
    if tail.is_empty() {
        return None;
    }
    match urlencoding::decode(tail) {
        Ok(decoded) => Some(decoded.into_owned()),
        Err(_) => Some(tail.to_string()),
    }
}
