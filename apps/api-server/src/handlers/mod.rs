//! HTTP handlers and route configuration.

mod blog;
mod health;

use actix_web::{HttpRequest, error, web};

pub use blog::multipart_config;

use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(path_config())
            .app_data(query_config())
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/blogs")
                    // Fixed segments first so they never match as a blog id
                    .route("/public", web::get().to(blog::list_public))
                    .route("/search", web::get().to(blog::search_blogs))
                    .route("/slug/{slug}", web::get().to(blog::get_by_slug))
                    .route(
                        "/related/{category}/{slug}",
                        web::get().to(blog::related_blogs),
                    )
                    .route("/category/{category}", web::get().to(blog::by_category))
                    .service(
                        web::resource("")
                            .route(web::post().to(blog::create_blog))
                            .route(web::get().to(blog::list_blogs)),
                    )
                    .route("/{blogid}/edit", web::get().to(blog::edit_blog))
                    .service(
                        web::resource("/{blogid}")
                            .route(web::put().to(blog::update_blog))
                            .route(web::delete().to(blog::delete_blog)),
                    ),
            ),
    );
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err: error::PathError, _req: &HttpRequest| {
        AppError::BadRequest(err.to_string()).into()
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err: error::QueryPayloadError, _req: &HttpRequest| {
        AppError::BadRequest(err.to_string()).into()
    })
}
