use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::post::PostResource,
    errors::AppError,
    web::form::PostForm,
    AppState,
};

#[instrument(skip(state, form))]
pub async fn store_post(
    state: web::Data<AppState>,
    form: PostForm,
) -> Result<impl Responder, AppError> {
    let post = state.post_handler
        .store_post(form.into_store_request())
        .await?;

    Ok(HttpResponse::Created().json(PostResource::from(post)))
}

#[instrument(skip(state, form))]
pub async fn update_post(
    post_id: web::Path<i64>,
    state: web::Data<AppState>,
    form: PostForm,
) -> Result<impl Responder, AppError> {
    let post = state.post_handler
        .update_post(post_id.into_inner(), form.into_update_request())
        .await?;

    Ok(HttpResponse::Ok().json(PostResource::from(post)))
}

#[instrument(skip(state))]
pub async fn get_post(
    post_id: web::Path<i64>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let post = state.post_handler.find_post(post_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(PostResource::from(post)))
}

#[instrument(skip(state))]
pub async fn get_all_posts(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let posts = state.post_handler
        .list_posts()
        .await?
        .into_iter()
        .map(PostResource::from)
        .collect::<Vec<_>>();

    Ok(HttpResponse::Ok().json(posts))
}
