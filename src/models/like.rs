use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

/// Row shape of the `likes` table: one row per (post, user) pair. The table
/// carries a unique constraint on that pair, so a duplicate insert is
/// rejected by the store rather than silently doubled.
#[derive(Debug, Clone, Deserialize)]
pub struct Like {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
