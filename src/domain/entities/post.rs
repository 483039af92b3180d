use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::Serialize;
use validator::{Validate, ValidationError};

use crate::entities::upload::{ImageInput, UploadedFile};

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostInsert {
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

// ───── API Response Models ──────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostResource {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
}

impl From<Post> for PostResource {
    fn from(post: Post) -> Self {
        PostResource {
            id: post.id,
            title: post.title,
            description: post.description,
            image_url: post.image_url,
        }
    }
}

// ───── Input & Validation Requests ──────────────────────────────────

#[derive(Debug, Validate)]
pub struct StorePostRequest {
    #[validate(length(min = 1, message = "The title field is required."))]
    pub title: String,

    #[validate(length(min = 1, message = "The description field is required."))]
    pub description: String,

    #[validate(custom(function = "validate_image"))]
    pub image: Option<ImageInput>,
}

#[derive(Debug, Default, Validate)]
pub struct UpdatePostRequest {
    #[validate(length(min = 1, message = "The title field is required."))]
    pub title: Option<String>,

    #[validate(length(min = 1, message = "The description field is required."))]
    pub description: Option<String>,

    #[validate(custom(function = "validate_image"))]
    pub image: Option<ImageInput>,
}

// ───── Validation Helpers ───────────────────────────────────────────

pub fn validate_image(image: &ImageInput) -> Result<(), ValidationError> {
    match image {
        ImageInput::NotAFile => Err(new_validation_error(
            "file",
            Cow::Borrowed("The image field must be a file."),
        )),
        ImageInput::File(file) if file.exceeds_limit() => Err(new_validation_error(
            "max",
            Cow::Owned(format!(
                "The image field must not be greater than {} kilobytes.",
                file.limit / 1024
            )),
        )),
        ImageInput::File(_) => Ok(()),
    }
}

fn new_validation_error(code: &'static str, msg: Cow<'static, str>) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(msg);
    err
}

// ───── Conversions ──────────────────────────────────────────────────

impl StorePostRequest {
    /// Splits the validated request into the row to insert and the upload to store.
    pub fn into_parts(self) -> (PostInsert, Option<UploadedFile>) {
        let insert = PostInsert {
            title: self.title,
            description: self.description,
            image_url: None,
        };
        (insert, uploaded_file(self.image))
    }
}

impl UpdatePostRequest {
    pub fn into_parts(self) -> (PostUpdate, Option<UploadedFile>) {
        let update = PostUpdate {
            title: self.title,
            description: self.description,
            image_url: None,
        };
        (update, uploaded_file(self.image))
    }
}

fn uploaded_file(image: Option<ImageInput>) -> Option<UploadedFile> {
    match image {
        Some(ImageInput::File(file)) => Some(file),
        _ => None,
    }
}
