use std::collections::BTreeMap;

use actix_web::{cookie::{time::Duration, Cookie}, web, HttpRequest, Responder};
use tracing::instrument;

use crate::{
    constants::{ACCESS_TOKEN_COOKIE, LOGIN_PATH, POSTS_PATH},
    entities::user::LoginUser,
    errors::{AuthError, FieldErrors},
    handlers::responses::{page, redirect_back, redirect_with},
    web::{flash::Flash, views},
    AppState,
};

const FAILED_LOGIN_MESSAGE: &str = "These credentials do not match our records.";

pub async fn login_form(req: HttpRequest) -> impl Responder {
    let flash = Flash::from_request(&req);
    page(&req, views::login(flash.as_ref()))
}

#[instrument(skip(req, state, form))]
pub async fn login(
    req: HttpRequest,
    state: web::Data<AppState>,
    form: web::Form<LoginUser>,
) -> impl Responder {
    let credentials = form.into_inner();
    let email = credentials.email.clone();

    match state.auth_handler.login(credentials).await {
        Ok(auth) => {
            let cookie = Cookie::build(ACCESS_TOKEN_COOKIE, auth.access_token)
                .path("/")
                .http_only(true)
                .max_age(Duration::seconds(auth.expires_in))
                .finish();
            redirect_with(POSTS_PATH, cookie)
        }
        Err(e) => {
            if let AuthError::TokenCreation = e {
                tracing::error!("Login failed: {}", e);
            }

            let mut errors = FieldErrors::new();
            errors.insert("email".to_string(), vec![FAILED_LOGIN_MESSAGE.to_string()]);
            let mut old = BTreeMap::new();
            old.insert("email".to_string(), email);

            redirect_back(&req, LOGIN_PATH, Flash::new(errors, old))
        }
    }
}

pub async fn logout() -> impl Responder {
    let removal = Cookie::build(ACCESS_TOKEN_COOKIE, "")
        .path("/")
        .max_age(Duration::ZERO)
        .finish();

    redirect_with(LOGIN_PATH, removal)
}
