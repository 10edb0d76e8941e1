//! # Approval API Server
//!
//! Agencies submit posts, clients approve them or leave feedback through a
//! share link, and the agency dashboard follows every change live.

use actix_web::{App, HttpServer, middleware::from_fn, web};
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod state;
mod telemetry;

use config::AppConfig;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry_from_env();

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Approval API Server on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::new(&config).await?;
    let json_limit = config.json_limit_bytes;

    HttpServer::new(move || {
        App::new()
            .wrap(from_fn(middleware::request_id::request_id))
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .app_data(handlers::json_config(json_limit))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn init_telemetry_from_env() {
    let telemetry = TelemetryConfig::from_env();
    telemetry::init_telemetry(&telemetry);
}
