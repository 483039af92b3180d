use actix_web::web;

use crate::constants::POSTS_PATH;
use crate::handlers::{responses::redirect, storage::serve_file, system::health_check};

mod api;
mod auth;
mod posts;
mod form_errors;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(|| async { redirect(POSTS_PATH) }));
    cfg.service(health_check);
    cfg.route("/storage/{path:.*}", web::get().to(serve_file));

    cfg.configure(form_errors::config_routes);
    cfg.configure(auth::config_routes);
    cfg.configure(posts::config_routes);
    cfg.service(
        web::scope("/api")
            .configure(api::config_routes)
    );
}
