pub mod api_posts;
pub mod auth;
pub mod responses;
pub mod storage;
pub mod system;
pub mod web_posts;
