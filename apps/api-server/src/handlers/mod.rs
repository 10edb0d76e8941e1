//! HTTP handlers and route configuration.

mod health;
mod live;
mod posts;


use actix_web::{error::JsonPayloadError, web};

use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/posts")
                    // Agency side
                    .route("", web::post().to(posts::submit))
                    .route("", web::get().to(posts::list))
                    // Registered before "/{id}" so it is not taken for an id.
                    .route("/live", web::get().to(live::live))
                    // Client side
                    .route("/{id}", web::get().to(posts::get))
                    .route("/{id}/approve", web::post().to(posts::approve))
                    .route("/{id}/feedback", web::post().to(posts::feedback)),
            ),
    );
}

/// JSON extractor settings; submissions carry the image inline.
pub fn json_config(limit_bytes: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit_bytes)
        .error_handler(|err, _req| {
            let detail = match &err {
                JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
                    "Request body is too large. Try a smaller image.".to_string()
                }
                other => other.to_string(),
            };
            AppError::BadRequest(detail).into()
        })
}
