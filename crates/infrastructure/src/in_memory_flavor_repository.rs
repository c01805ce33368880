use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use flavorgate_application::{FlavorCatalogQuery, FlavorCatalogSnapshot, FlavorRepository};
use flavorgate_core::{AppError, AppResult, TenantId};
use flavorgate_domain::{AccessGrant, Flavor, FlavorId};
use tokio::sync::RwLock;


/// In-memory flavor store implementation.
///
/// Flavors and grants share one lock so that every read observes a
/// committed state and every grant mutation checks and writes atomically.
#[derive(Debug, Default)]
pub struct InMemoryFlavorRepository {
    state: RwLock<FlavorStoreState>,
}

#[derive(Debug, Default)]
struct FlavorStoreState {
    flavors: HashMap<FlavorId, Flavor>,
    grants: BTreeSet<(FlavorId, TenantId)>,
}

impl FlavorStoreState {
    fn grants_for(&self, flavor_id: &FlavorId) -> Vec<AccessGrant> {
        self.grants
            .iter()
            .filter(|(stored_flavor_id, _)| stored_flavor_id == flavor_id)
            .map(|(stored_flavor_id, tenant_id)| {
                AccessGrant::new(stored_flavor_id.clone(), tenant_id.clone())
            })
            .collect()
    }
}

impl InMemoryFlavorRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a flavor record.
    ///
    /// Used for seeding; the access core never writes flavors.
    pub async fn save_flavor(&self, flavor: Flavor) {
        self.state
            .write()
            .await
            .flavors
            .insert(flavor.flavor_id().clone(), flavor);
    }
}

#[async_trait]
impl FlavorRepository for InMemoryFlavorRepository {
    async fn find_flavor(&self, flavor_id: &FlavorId) -> AppResult<Option<Flavor>> {
        Ok(self.state.read().await.flavors.get(flavor_id).cloned())
    }

    async fn load_catalog(&self, query: FlavorCatalogQuery) -> AppResult<FlavorCatalogSnapshot> {
        let state = self.state.read().await;

        let flavors: Vec<Flavor> = state
            .flavors
            .values()
            .filter(|flavor| {
                query
                    .is_public
                    .is_none_or(|is_public| is_public == flavor.is_public())
            })
            .cloned()
            .collect();

        let grants = flavors
            .iter()
            .filter(|flavor| !flavor.is_public())
            .filter(|flavor| {
                state
                    .grants
                    .contains(&(flavor.flavor_id().clone(), query.tenant_id.clone()))
            })
            .map(|flavor| AccessGrant::new(flavor.flavor_id().clone(), query.tenant_id.clone()))
            .collect();

        Ok(FlavorCatalogSnapshot { flavors, grants })
    }

    async fn list_grants_for_flavor(&self, flavor_id: &FlavorId) -> AppResult<Vec<AccessGrant>> {
        Ok(self.state.read().await.grants_for(flavor_id))
    }

    async fn insert_grant(&self, grant: &AccessGrant) -> AppResult<Vec<AccessGrant>> {
        let mut state = self.state.write().await;

        if !state.flavors.contains_key(grant.flavor_id()) {
            return Err(AppError::NotFound(format!(
                "flavor '{}' not found",
                grant.flavor_id()
            )));
        }

        let key = (grant.flavor_id().clone(), grant.tenant_id().clone());
        if !state.grants.insert(key) {
            return Err(AppError::Conflict(format!(
                "tenant '{}' already has access to flavor '{}'",
                grant.tenant_id(),
                grant.flavor_id()
            )));
        }

        Ok(state.grants_for(grant.flavor_id()))
    }

    async fn delete_grant(&self, grant: &AccessGrant) -> AppResult<Vec<AccessGrant>> {
        let mut state = self.state.write().await;

        let key = (grant.flavor_id().clone(), grant.tenant_id().clone());
        if !state.grants.remove(&key) {
            return Err(AppError::NotFound(format!(
                "tenant '{}' has no access to flavor '{}'",
                grant.tenant_id(),
                grant.flavor_id()
            )));
        }

        Ok(state.grants_for(grant.flavor_id()))
    }
}
