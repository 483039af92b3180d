use actix_web::web;

use crate::handlers::auth;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/login")
            .route(web::get().to(auth::login_form))
            .route(web::post().to(auth::login))
    );
    cfg.service(
        web::resource("/logout")
            .route(web::post().to(auth::logout))
    );
}
