use actix_web::web;

use crate::handlers::api_posts;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/posts")
            .service(
                web::resource("")
                    .route(web::post().to(api_posts::store_post))
                    .route(web::get().to(api_posts::get_all_posts))
            )
            .service(
                web::resource("/{post_id}")
                    .route(web::get().to(api_posts::get_post))
                    .route(web::patch().to(api_posts::update_post))
                    .route(web::put().to(api_posts::update_post))
            )
    );
}
