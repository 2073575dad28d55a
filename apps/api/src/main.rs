//! Dressrosa API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod api_services;
mod auth;
mod dto;
mod error;
mod handlers;
mod middleware;
mod seed;
mod state;

#[cfg(test)]
mod test_support;

use dressrosa_core::AppError;
use tracing::info;

use crate::api_config::{ApiConfig, RunMode, init_tracing};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = ApiConfig::load()?;
    init_tracing();

    let pool = api_services::connect_and_migrate(&config).await?;

    match config.run_mode {
        RunMode::Migrate => {
            info!("database migrations applied successfully");
            Ok(())
        }
        RunMode::Seed => {
            let app_state = api_services::build_app_state(pool.clone(), &config);
            let catalog_seeder = api_services::build_catalog_seeder(pool);
            seed::run(&app_state, &catalog_seeder, &config.bootstrap_admin).await?;
            info!("seed completed");
            Ok(())
        }
        RunMode::Serve => serve(pool, &config).await,
    }
}

async fn serve(pool: sqlx::PgPool, config: &ApiConfig) -> Result<(), AppError> {
    let session_layer = api_services::build_session_layer(pool.clone(), config).await?;
    let app_state = api_services::build_app_state(pool, config);
    let app = api_router::build_router(app_state, &config.api_v1_prefix).layer(session_layer);

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind {address}: {error}")))?;

    info!(%address, environment = %config.environment, "dressrosa api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("server failed: {error}")))
}
