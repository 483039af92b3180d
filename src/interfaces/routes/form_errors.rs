use actix_web::{
    error::{JsonPayloadError, UrlencodedError},
    web,
};

use crate::errors::AppError;

/// Malformed JSON or urlencoded bodies answer with the same error shape as other bad requests.
pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::from(err).into()
    }));
    cfg.app_data(web::FormConfig::default().error_handler(|err, _req| {
        AppError::from(err).into()
    }));
}

impl From<JsonPayloadError> for AppError {
    fn from(err: JsonPayloadError) -> Self {
        AppError::BadRequest(format!("JSON payload error: {}", err))
    }
}

impl From<UrlencodedError> for AppError {
    fn from(err: UrlencodedError) -> Self {
        AppError::BadRequest(format!("Form payload error: {}", err))
    }
}
