use serde::Serialize;

/// Answer to a like toggle: where the caller's like ended up and the count
/// as the store now has it.
#[derive(Debug, Clone, Serialize)]
pub struct LikeOut {
    pub liked: bool,
    pub like_count: usize,
}
