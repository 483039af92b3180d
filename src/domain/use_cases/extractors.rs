use actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::{entities::token::Claims, errors::AuthError};

/// The signed-in user, as placed in request extensions by `SessionMiddleware`.
/// Rejects with a redirect to the login page when nobody is signed in.
#[derive(Debug, Clone)]
pub struct SessionUser(pub Claims);

impl FromRequest for SessionUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<Claims>() {
            Some(claims) => ready(Ok(SessionUser(claims.clone()))),
            None => ready(Err(AuthError::LoginRequired.into())),
        }
    }
}
