use actix_web::web;

use crate::handlers::web_posts;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/posts")
            .service(
                web::resource("")
                    .route(web::get().to(web_posts::index))
                    .route(web::post().to(web_posts::store))
            )
            .service(
                web::resource("/create")
                    .route(web::get().to(web_posts::create))
            )
            .service(
                web::resource("/{post_id}")
                    .route(web::get().to(web_posts::show))
                    .route(web::post().to(web_posts::method_override))
                    .route(web::patch().to(web_posts::update))
                    .route(web::put().to(web_posts::update))
                    .route(web::delete().to(web_posts::destroy))
            )
            .service(
                web::resource("/{post_id}/edit")
                    .route(web::get().to(web_posts::edit))
            )
    );
}
