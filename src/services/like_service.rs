use std::collections::HashMap;
use std::sync::Arc;

use log::debug;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::dtos::like_dtos::LikeOut;
use crate::error::ApiError;
use crate::repositories::LikeStore;

/// Like toggling over the canonical `likes` table.
///
/// A toggle is check-then-act against the store, so two toggles for the
/// same (post, user) pair must not interleave: the service keeps one async
/// gate per in-flight pair and the second caller waits instead of racing
/// the existence check. Different pairs never wait on each other.
pub struct LikeService {
    likes: Arc<dyn LikeStore>,
    pending: Mutex<HashMap<(Uuid, Uuid), Arc<Mutex<()>>>>,
}

impl LikeService {
    pub fn new(likes: Arc<dyn LikeStore>) -> Self {
        LikeService {
            likes,
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Flips the caller's like on a post and reports the new state plus the
    /// fresh count read back from the store.
    pub async fn toggle(&self, post_id: Uuid, user_id: Uuid) -> Result<LikeOut, ApiError> {
        let gate = self.gate(post_id, user_id).await;
        let guard = gate.lock().await;

        let outcome = self.toggle_locked(post_id, user_id).await;

        // The gate itself opens when `guard` drops, success or failure; this
        // only prunes the registry entry once no other caller holds it.
        drop(guard);
        self.prune(post_id, user_id, &gate).await;
        outcome
    }

    pub async fn count(&self, post_id: Uuid) -> Result<usize, ApiError> {
        Ok(self.likes.list_for_post(post_id).await?.len())
    }

    pub async fn has_liked(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, ApiError> {
        Ok(self.likes.find(post_id, user_id).await?.is_some())
    }

    async fn toggle_locked(&self, post_id: Uuid, user_id: Uuid) -> Result<LikeOut, ApiError> {
        let existing = self.likes.find(post_id, user_id).await?;
        let liked = if existing.is_some() {
            let removed = self.likes.delete(post_id, user_id).await?;
            if !removed {
                debug!("like {}/{} was already gone", post_id, user_id);
            }
            false
        } else {
            let inserted = self.likes.insert(post_id, user_id).await?;
            if !inserted {
                debug!("like {}/{} already recorded elsewhere", post_id, user_id);
            }
            true
        };
        let like_count = self.likes.list_for_post(post_id).await?.len();
        Ok(LikeOut { liked, like_count })
    }

    async fn gate(&self, post_id: Uuid, user_id: Uuid) -> Arc<Mutex<()>> {
        let mut pending = self.pending.lock().await;
        pending.entry((post_id, user_id)).or_default().clone()
    }

    async fn prune(&self, post_id: Uuid, user_id: Uuid, gate: &Arc<Mutex<()>>) {
        let mut pending = self.pending.lock().await;
        // Two strong refs mean the registry and this caller only; anything
        // more and someone is still waiting on the gate.
        if Arc::strong_count(gate) <= 2 {
            pending.remove(&(post_id, user_id));
        }
    }
}
