pub mod auth_service;
pub mod comment_service;
pub mod feed_service;
pub mod like_service;
pub mod post_service;
pub mod profile_service;

pub use auth_service::{AuthError, AuthService};
pub use comment_service::CommentService;
pub use feed_service::{FeedService, FeedView};
pub use like_service::LikeService;
pub use post_service::PostService;
pub use profile_service::ProfileService;
