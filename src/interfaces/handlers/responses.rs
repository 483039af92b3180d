use actix_web::{
    cookie::Cookie,
    http::{header::{self, ContentType}, StatusCode},
    HttpRequest, HttpResponse,
};

use crate::{errors::AppError, web::{flash::Flash, views}};

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Redirects with the given cookie attached.
pub fn redirect_with(location: &str, cookie: Cookie<'static>) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .cookie(cookie)
        .finish()
}

pub fn html(status: StatusCode, body: String) -> HttpResponse {
    HttpResponse::build(status)
        .insert_header(ContentType::html())
        .body(body)
}

/// Renders a page, consuming any flash cookie the request carried.
pub fn page(req: &HttpRequest, body: String) -> HttpResponse {
    let mut response = html(StatusCode::OK, body);
    if req.cookie(crate::constants::FLASH_COOKIE).is_some() {
        if let Err(e) = response.add_cookie(&Flash::removal_cookie()) {
            tracing::warn!("Failed to clear flash cookie: {}", e);
        }
    }
    response
}

/// Sends the browser back to the form with the failure flashed.
pub fn redirect_back(req: &HttpRequest, fallback: &str, flash: Flash) -> HttpResponse {
    let location = req
        .headers()
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .unwrap_or(fallback)
        .to_string();

    redirect_with(&location, flash.to_cookie())
}

pub fn handle_web_error(error: AppError) -> HttpResponse {
    match &error {
        AppError::NotFound(msg) => {
            html(StatusCode::NOT_FOUND, views::error_page("Not Found", msg))
        }
        AppError::BadRequest(msg) => {
            tracing::warn!("Rejected request: {}", msg);
            html(StatusCode::BAD_REQUEST, views::error_page("Bad Request", msg))
        }
        AppError::ValidationFailed(_) => {
            html(StatusCode::UNPROCESSABLE_ENTITY, views::error_page("Invalid input", &error.to_string()))
        }
        AppError::Storage(_) | AppError::InternalError(_) => {
            tracing::error!("Request failed: {}", error);
            html(
                StatusCode::INTERNAL_SERVER_ERROR,
                views::error_page("Server Error", "Something went wrong."),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn redirect_back_prefers_referer() {
        let req = TestRequest::default()
            .insert_header((header::REFERER, "http://localhost/posts/create"))
            .to_http_request();

        let response = redirect_back(&req, "/posts", Flash::default());

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "http://localhost/posts/create"
        );
    }

    #[test]
    fn redirect_back_falls_back_without_referer() {
        let req = TestRequest::default().to_http_request();
        let response = redirect_back(&req, "/posts/create", Flash::default());

        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/posts/create");
        assert!(response.cookies().any(|c| c.name() == crate::constants::FLASH_COOKIE));
    }

    #[test]
    fn missing_post_renders_404_page() {
        let response = handle_web_error(AppError::post_not_found(4));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
