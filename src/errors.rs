use std::collections::BTreeMap;
use std::fmt;

use actix_web::{
    error::ResponseError,
    http::{header::{self, ContentType}, StatusCode},
    HttpResponse
};
use derive_more::Display;
use jsonwebtoken::errors::{ErrorKind, Error as JwtError};
use validator::ValidationErrors;

use crate::constants::LOGIN_PATH;

/// Field name → human readable messages, in field order.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug)]
pub enum AppError {
    ValidationFailed(FieldErrors),
    NotFound(String),
    BadRequest(String),
    Storage(String),
    InternalError(String),
}

impl AppError {
    pub fn post_not_found(id: i64) -> Self {
        AppError::NotFound(format!("Post {} not found", id))
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            AppError::ValidationFailed(errors) => Some(errors),
            _ => None,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ValidationFailed(errors) => {
                let messages = errors.iter()
                    .map(|(field, messages)| format!("{}: {}", field, messages.join(" ")))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "validation error: {}", messages)
            }
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal server error: {}", msg)
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::ValidationFailed(errors) => {
                serde_json::json!({
                    "message": summary_message(errors),
                    "errors": errors
                })
            }
            // Infrastructure details stay in the logs.
            AppError::Storage(_) | AppError::InternalError(_) => {
                serde_json::json!({"error": "Internal server error"})
            }
            _ => {
                serde_json::json!({"error": self.to_string()})
            }
        };
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// "The title field is required. (and 1 more error)"
fn summary_message(errors: &FieldErrors) -> String {
    let mut messages = errors.values().flatten();
    let first = messages
        .next()
        .cloned()
        .unwrap_or_else(|| "The given data was invalid.".to_string());

    match messages.count() {
        0 => first,
        1 => format!("{} (and 1 more error)", first),
        n => format!("{} (and {} more errors)", first, n),
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut field_errors = FieldErrors::new();

        for (field, failures) in errors.field_errors() {
            let messages = failures
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| format!("The {} field is invalid.", field))
                })
                .collect();
            field_errors.insert(field.to_string(), messages);
        }

        AppError::ValidationFailed(field_errors)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => {
                tracing::error!("Database error: {}", err);
                AppError::InternalError(format!("Database error: {}", err))
            }
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(path) => AppError::NotFound(format!("File {} not found", path)),
            StorageError::InvalidPath(path) => AppError::BadRequest(format!("Invalid storage path: {}", path)),
            StorageError::Io(e) => {
                tracing::error!("Storage write failed: {}", e);
                AppError::Storage(e.to_string())
            }
        }
    }
}

impl From<actix_multipart::MultipartError> for AppError {
    fn from(err: actix_multipart::MultipartError) -> Self {
        AppError::BadRequest(format!("Malformed multipart body: {}", err))
    }
}

#[derive(Debug, Display)]
pub enum StorageError {
    #[display("I/O failure: {_0}")]
    Io(std::io::Error),

    #[display("Invalid path: {_0}")]
    InvalidPath(String),

    #[display("File not found: {_0}")]
    NotFound(String),
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err)
    }
}

#[derive(Debug, Display)]
pub enum AuthError {
    #[display("Invalid token")]
    InvalidToken,

    #[display("Wrong credentials")]
    WrongCredentials,

    #[display("Token creation error")]
    TokenCreation,

    #[display("Token expired")]
    TokenExpired,

    #[display("Missing credentials")]
    MissingCredentials,

    #[display("Login required")]
    LoginRequired,
}

impl ResponseError for AuthError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AuthError::LoginRequired => HttpResponse::SeeOther()
                .insert_header((header::LOCATION, LOGIN_PATH))
                .finish(),
            AuthError::TokenExpired => HttpResponse::build(self.status_code())
                .json(serde_json::json!({"error": "Token has expired"})),
            _ => HttpResponse::build(self.status_code())
                .json(serde_json::json!({"error": self.to_string()})),
        }
    }

    fn status_code(&self) -> StatusCode {
        match *self {
            AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::WrongCredentials => StatusCode::UNAUTHORIZED,
            AuthError::TokenCreation => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::TokenExpired => StatusCode::UNAUTHORIZED,
            AuthError::MissingCredentials => StatusCode::BAD_REQUEST,
            AuthError::LoginRequired => StatusCode::SEE_OTHER,
        }
    }
}

impl From<JwtError> for AuthError {
    fn from(e: JwtError) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        }
    }
}

impl From<ValidationErrors> for AuthError {
    fn from(_: ValidationErrors) -> Self {
        AuthError::MissingCredentials
    }
}

#[derive(Debug, Display)]
pub enum PasswordError {
    #[display("Invalid password parameters: {_0}")]
    InvalidParameters(String),

    #[display("Password hashing failed: {_0}")]
    HashingError(String),

    #[display("Invalid password hash format: {_0}")]
    InvalidHashFormat(String),

    #[display("Password verification failed: {_0}")]
    VerificationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_rt::test]
    async fn validation_failure_renders_422_with_field_map() {
        let mut errors = FieldErrors::new();
        errors.insert("image".into(), vec!["The image field must be a file.".into()]);
        let error = AppError::ValidationFailed(errors);

        let response = error.error_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["errors"]["image"][0], "The image field must be a file.");
        assert_eq!(json["message"], "The image field must be a file.");
    }

    #[test]
    fn summary_counts_remaining_errors() {
        let mut errors = FieldErrors::new();
        errors.insert("description".into(), vec!["The description field is required.".into()]);
        errors.insert("title".into(), vec!["The title field is required.".into()]);

        assert_eq!(
            summary_message(&errors),
            "The description field is required. (and 1 more error)"
        );
    }

    #[test]
    fn storage_io_failure_is_internal() {
        let err: AppError = StorageError::Io(std::io::Error::other("disk full")).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn login_required_redirects_to_login() {
        let response = AuthError::LoginRequired.error_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), LOGIN_PATH);
    }
}
