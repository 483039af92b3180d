use std::collections::BTreeMap;

use actix_web::{web, HttpRequest, HttpResponse, Responder, ResponseError};
use tracing::instrument;

use crate::{
    constants::POSTS_PATH,
    errors::{AppError, AuthError},
    handlers::responses::{handle_web_error, page, redirect, redirect_back},
    use_cases::extractors::SessionUser,
    web::{flash::Flash, form::PostForm, views},
    AppState,
};

#[instrument(skip(req, state))]
pub async fn index(req: HttpRequest, state: web::Data<AppState>) -> impl Responder {
    match state.post_handler.list_posts().await {
        Ok(posts) => page(&req, views::index(&posts)),
        Err(e) => handle_web_error(e),
    }
}

pub async fn create(req: HttpRequest) -> impl Responder {
    let flash = Flash::from_request(&req);
    page(&req, views::post_form(None, flash.as_ref()))
}

#[instrument(skip(req, state, form))]
pub async fn store(
    req: HttpRequest,
    state: web::Data<AppState>,
    form: Result<PostForm, AppError>,
) -> impl Responder {
    let fallback = format!("{}/create", POSTS_PATH);
    let form = match form {
        Ok(form) => form,
        Err(e) => return flash_errors(&req, &fallback, e, BTreeMap::new()),
    };
    let old = form.old_input();

    match state.post_handler.store_post(form.into_store_request()).await {
        Ok(post) => redirect(&format!("{}/{}", POSTS_PATH, post.id)),
        Err(e) => flash_errors(&req, &fallback, e, old),
    }
}

#[instrument(skip(req, state))]
pub async fn show(req: HttpRequest, state: web::Data<AppState>, post_id: web::Path<i64>) -> impl Responder {
    match state.post_handler.find_post(post_id.into_inner()).await {
        Ok(post) => page(&req, views::show(&post)),
        Err(e) => handle_web_error(e),
    }
}

#[instrument(skip(req, state))]
pub async fn edit(req: HttpRequest, state: web::Data<AppState>, post_id: web::Path<i64>) -> impl Responder {
    match state.post_handler.find_post(post_id.into_inner()).await {
        Ok(post) => {
            let flash = Flash::from_request(&req);
            page(&req, views::post_form(Some(&post), flash.as_ref()))
        }
        Err(e) => handle_web_error(e),
    }
}

#[instrument(skip(req, state, form))]
pub async fn update(
    req: HttpRequest,
    state: web::Data<AppState>,
    post_id: web::Path<i64>,
    form: Result<PostForm, AppError>,
) -> impl Responder {
    update_post(&req, &state, post_id.into_inner(), form).await
}

#[instrument(skip(_user, state))]
pub async fn destroy(
    _user: SessionUser,
    state: web::Data<AppState>,
    post_id: web::Path<i64>,
) -> impl Responder {
    delete_post(&state, post_id.into_inner()).await
}

/// HTML forms can only POST; `_method` selects the verb.
#[instrument(skip(req, user, state, form))]
pub async fn method_override(
    req: HttpRequest,
    user: Option<SessionUser>,
    state: web::Data<AppState>,
    post_id: web::Path<i64>,
    form: Result<PostForm, AppError>,
) -> impl Responder {
    let id = post_id.into_inner();
    let form = match form {
        Ok(form) => form,
        Err(e) => return flash_errors(&req, &edit_path(id), e, BTreeMap::new()),
    };

    match form.method_override().as_deref() {
        Some("PATCH") | Some("PUT") => update_post(&req, &state, id, Ok(form)).await,
        Some("DELETE") => match user {
            Some(_) => delete_post(&state, id).await,
            None => {
                tracing::warn!(post_id = id, "Unauthenticated delete attempt");
                AuthError::LoginRequired.error_response()
            }
        },
        _ => handle_web_error(AppError::BadRequest("Unsupported form method".to_string())),
    }
}

fn edit_path(id: i64) -> String {
    format!("{}/{}/edit", POSTS_PATH, id)
}

async fn update_post(
    req: &HttpRequest,
    state: &AppState,
    id: i64,
    form: Result<PostForm, AppError>,
) -> HttpResponse {
    let fallback = edit_path(id);
    let form = match form {
        Ok(form) => form,
        Err(e) => return flash_errors(req, &fallback, e, BTreeMap::new()),
    };
    let old = form.old_input();

    match state.post_handler.update_post(id, form.into_update_request()).await {
        Ok(post) => redirect(&format!("{}/{}", POSTS_PATH, post.id)),
        Err(e) => flash_errors(req, &fallback, e, old),
    }
}

async fn delete_post(state: &AppState, id: i64) -> HttpResponse {
    match state.post_handler.delete_post(id).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({"message": "Post deleted"})),
        Err(e) => handle_web_error(e),
    }
}

fn flash_errors(
    req: &HttpRequest,
    fallback: &str,
    error: AppError,
    old: BTreeMap<String, String>,
) -> HttpResponse {
    match error {
        AppError::ValidationFailed(errors) => {
            tracing::warn!(fields = ?errors.keys().collect::<Vec<_>>(), "Form rejected");
            redirect_back(req, fallback, Flash::new(errors, old))
        }
        other => handle_web_error(other),
    }
}
