use std::sync::Arc;

use flavorgate_application::{FlavorAccessService, FlavorCatalogService, FlavorRepository};
use flavorgate_core::AppResult;
use flavorgate_domain::Flavor;
use flavorgate_infrastructure::{InMemoryFlavorRepository, PostgresFlavorRepository};

use crate::state::AppState;

/// Concrete flavor store selected at start-up.
#[derive(Clone)]
pub enum FlavorStore {
    Memory(Arc<InMemoryFlavorRepository>),
    Postgres(Arc<PostgresFlavorRepository>),
}

impl FlavorStore {
    pub fn repository(&self) -> Arc<dyn FlavorRepository> {
        match self {
            Self::Memory(repository) => repository.clone(),
            Self::Postgres(repository) => repository.clone(),
        }
    }

    /// Writes a flavor record; flavors are owned outside the access core.
    pub async fn save_flavor(&self, flavor: Flavor) -> AppResult<()> {
        match self {
            Self::Memory(repository) => {
                repository.save_flavor(flavor).await;
                Ok(())
            }
            Self::Postgres(repository) => repository.save_flavor(&flavor).await,
        }
    }
}

pub fn build_app_state(store: &FlavorStore) -> AppState {
    let repository = store.repository();

    AppState {
        flavor_catalog_service: FlavorCatalogService::new(repository.clone()),
        flavor_access_service: FlavorAccessService::new(repository),
    }
}
