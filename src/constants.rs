use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// Storage directory every post image is written under.
pub const IMAGES_DIR: &str = "/images";

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";
pub const FLASH_COOKIE: &str = "flash";

pub const LOGIN_PATH: &str = "/login";
pub const POSTS_PATH: &str = "/posts";

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
