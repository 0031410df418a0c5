pub mod comment;
pub mod feed;
pub mod like;
pub mod post;
pub mod user;
