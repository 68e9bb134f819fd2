//! HTTP handlers and route configuration.

mod admin;
mod auth;
mod categories;
mod comments;
mod health;
mod posts;
mod profile;
mod views;

#[cfg(test)]
mod tests;

use actix_web::error::{JsonPayloadError, PathError};
use actix_web::{HttpRequest, web};
use uuid::Uuid;

use crate::middleware::error::AppError;

/// Where a post's detail page lives; non-authors are redirected here.
pub fn post_detail_path(post_id: Uuid) -> String {
    format!("/api/posts/{post_id}")
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::PathConfig::default().error_handler(path_error));

    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            )
            // Posts and their comments
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::index))
                    .route("", web::post().to(posts::create))
                    .route("/{post_id}", web::get().to(posts::detail))
                    .route("/{post_id}", web::put().to(posts::update))
                    .route("/{post_id}", web::delete().to(posts::delete))
                    .route("/{post_id}/comments", web::post().to(comments::add))
                    .route(
                        "/{post_id}/comments/{comment_id}",
                        web::put().to(comments::update),
                    )
                    .route(
                        "/{post_id}/comments/{comment_id}",
                        web::delete().to(comments::delete),
                    ),
            )
            // Profiles
            .route("/profile", web::put().to(profile::update))
            .route("/profile/{username}", web::get().to(profile::show))
            // Catalog
            .route("/categories", web::get().to(categories::list))
            .route("/categories/{slug}", web::get().to(categories::posts))
            .route("/locations", web::get().to(categories::locations))
            // Staff
            .service(
                web::scope("/admin")
                    .route("/categories", web::post().to(admin::create_category))
                    .route("/locations", web::post().to(admin::create_location))
                    .route(
                        "/posts/{post_id}/publication",
                        web::put().to(admin::post_publication),
                    )
                    .route(
                        "/categories/{slug}/publication",
                        web::put().to(admin::category_publication),
                    )
                    .route(
                        "/locations/{location_id}/publication",
                        web::put().to(admin::location_publication),
                    ),
            ),
    );
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(err.to_string()).into()
}

/// Malformed IDs in the path address nothing.
fn path_error(err: PathError, req: &HttpRequest) -> actix_web::Error {
    tracing::debug!(path = %req.path(), "Unparseable path: {}", err);
    AppError::NotFound(format!("No resource at {}", req.path())).into()
}
