use std::sync::Arc;

use axum::response::Response;
use flavorgate_core::{CallerContext, TenantId};
use flavorgate_infrastructure::InMemoryFlavorRepository;
use serde::de::DeserializeOwned;

use crate::api_services::{FlavorStore, build_app_state};
use crate::dev_seed;
use crate::state::AppState;

/// State over an in-memory store holding the development seed.
pub(crate) async fn seeded_state() -> AppState {
    let store = FlavorStore::Memory(Arc::new(InMemoryFlavorRepository::new()));
    if let Err(error) = dev_seed::run(&store).await {
        panic!("failed to seed in-memory flavor store: {error}");
    }

    build_app_state(&store)
}

pub(crate) fn admin() -> CallerContext {
    CallerContext::admin(TenantId::new("admin").unwrap_or_else(|_| unreachable!()))
}

pub(crate) fn member(tenant_id: &str) -> CallerContext {
    CallerContext::tenant(TenantId::new(tenant_id).unwrap_or_else(|_| unreachable!()))
}

pub(crate) async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap_or_else(|_| unreachable!())
        .to_vec()
}

pub(crate) async fn body_json<T: DeserializeOwned>(response: Response) -> T {
    let bytes = body_bytes(response).await;
    match serde_json::from_slice(bytes.as_slice()) {
        Ok(value) => value,
        Err(error) => panic!("response body is not the expected JSON: {error}"),
    }
}
