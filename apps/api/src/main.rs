//! Flavorgate API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod api_services;
mod dev_seed;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use std::sync::Arc;

use flavorgate_core::AppError;
use flavorgate_infrastructure::{InMemoryFlavorRepository, PostgresFlavorRepository};
use tracing::info;

use crate::api_config::{ApiConfig, FlavorStoreConfig, init_tracing};
use crate::api_services::{FlavorStore, build_app_state, connect_and_migrate};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;

    let store = match &config.flavor_store {
        FlavorStoreConfig::Memory => {
            FlavorStore::Memory(Arc::new(InMemoryFlavorRepository::new()))
        }
        FlavorStoreConfig::Postgres(postgres) => {
            let pool = connect_and_migrate(postgres).await?;
            if config.migrate_only {
                info!("database migrations applied successfully");
                return Ok(());
            }
            FlavorStore::Postgres(Arc::new(PostgresFlavorRepository::new(pool)))
        }
    };

    if config.dev_seed_flavors {
        dev_seed::run(&store).await?;
    }

    let app = api_router::build_router(build_app_state(&store));

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "flavorgate-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
