pub mod post;
pub mod sqlx_repo;
pub mod token;
pub mod user;
