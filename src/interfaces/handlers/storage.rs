use actix_web::{http::header::{self, CacheDirective}, web, HttpResponse, Responder};

use crate::{
    errors::AppError,
    handlers::responses::handle_web_error,
    storage::ImageStorage,
    AppState,
};

/// Streams a stored file back with a content type sniffed from its bytes.
pub async fn serve_file(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    match state.post_handler.storage.read(&path).await {
        Ok(bytes) => {
            let content_type = infer::get(&bytes)
                .map(|kind| kind.mime_type())
                .unwrap_or("application/octet-stream");

            HttpResponse::Ok()
                .insert_header((header::CONTENT_TYPE, content_type))
                .insert_header(header::CacheControl(vec![CacheDirective::Public, CacheDirective::MaxAge(86_400)]))
                .body(bytes)
        }
        Err(e) => handle_web_error(AppError::from(e)),
    }
}
