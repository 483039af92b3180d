pub mod post;
pub mod token;
pub mod upload;
pub mod user;
