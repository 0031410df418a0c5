pub mod auth_handlers;
pub mod comment_handlers;
pub mod health_handlers;
pub mod like_handlers;
pub mod post_handlers;
pub mod profile_handlers;
pub mod profile_picture_handlers;
