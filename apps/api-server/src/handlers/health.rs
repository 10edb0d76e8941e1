//! Health check endpoint.

use actix_web::{HttpResponse, web};
use serde::Serialize;
use uuid::Uuid;

use approval_core::ports::PostStore;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub store: &'static str,
    pub version: &'static str,
    pub timestamp: String,
}

/// GET /api/health
///
/// Probes the post store with a primary-key lookup that never matches.
/// Answers 503 while the store is unreachable.
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let store_ok = match state.store.get_by_id(Uuid::nil()).await {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Health probe failed");
            false
        }
    };

    let response = HealthResponse {
        status: if store_ok { "ok" } else { "degraded" },
        store: if store_ok { "up" } else { "down" },
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    if store_ok {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}
