use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use flavorgate_core::{AppError, AppResult, TenantId};
use flavorgate_domain::{AccessGrant, Flavor, FlavorId, FlavorSpec};
use tokio::sync::Mutex;

use crate::{FlavorCatalogQuery, FlavorCatalogSnapshot, FlavorRepository};

pub(crate) fn tenant(value: &str) -> TenantId {
    TenantId::new(value).unwrap_or_else(|_| unreachable!())
}

pub(crate) fn flavor_id(id: i64) -> FlavorId {
    FlavorId::new(id.to_string()).unwrap_or_else(|_| unreachable!())
}

pub(crate) fn flavor(id: i64, is_public: bool) -> Flavor {
    Flavor::new(
        id,
        flavor_id(id),
        is_public,
        FlavorSpec {
            name: "test".to_owned(),
            memory_mb: 512,
            vcpus: 1,
            root_gb: 1,
            ephemeral_gb: 1,
            swap_mb: 512,
            rxtx_factor: 1.0,
        },
    )
    .unwrap_or_else(|_| unreachable!())
}

pub(crate) fn grant(id: i64, tenant_id: &str) -> AccessGrant {
    AccessGrant::new(flavor_id(id), tenant(tenant_id))
}

/// Flavors `0..=3` (two public, two private) with grants
/// `(2, proj2)`, `(2, proj3)` and `(3, proj3)`.
pub(crate) fn reference_repository() -> FakeFlavorRepository {
    FakeFlavorRepository {
        flavors: Mutex::new(vec![
            flavor(3, false),
            flavor(1, true),
            flavor(0, true),
            flavor(2, false),
        ]),
        grants: Mutex::new(vec![
            grant(2, "proj3"),
            grant(3, "proj3"),
            grant(2, "proj2"),
        ]),
        fail_reads: AtomicBool::new(false),
    }
}

#[derive(Default)]
pub(crate) struct FakeFlavorRepository {
    flavors: Mutex<Vec<Flavor>>,
    grants: Mutex<Vec<AccessGrant>>,
    fail_reads: AtomicBool,
}

impl FakeFlavorRepository {
    pub(crate) async fn add_flavor(&self, flavor: Flavor) {
        self.flavors.lock().await.push(flavor);
    }

    pub(crate) async fn add_grant(&self, id: i64, tenant_id: &str) {
        let value = grant(id, tenant_id);
        let mut grants = self.grants.lock().await;
        if !grants.contains(&value) {
            grants.push(value);
        }
    }

    pub(crate) async fn grant_count(&self) -> usize {
        self.grants.lock().await.len()
    }

    pub(crate) fn fail_reads(&self) {
        self.fail_reads.store(true, Ordering::SeqCst);
    }

    fn check_reads(&self) -> AppResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AppError::Internal("flavor store unavailable".to_owned()));
        }
        Ok(())
    }

    fn grants_for(grants: &[AccessGrant], flavor_id: &FlavorId) -> Vec<AccessGrant> {
        grants
            .iter()
            .filter(|grant| grant.flavor_id() == flavor_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl FlavorRepository for FakeFlavorRepository {
    async fn find_flavor(&self, flavor_id: &FlavorId) -> AppResult<Option<Flavor>> {
        self.check_reads()?;
        Ok(self
            .flavors
            .lock()
            .await
            .iter()
            .find(|flavor| flavor.flavor_id() == flavor_id)
            .cloned())
    }

    async fn load_catalog(&self, query: FlavorCatalogQuery) -> AppResult<FlavorCatalogSnapshot> {
        self.check_reads()?;
        let flavors: Vec<Flavor> = self
            .flavors
            .lock()
            .await
            .iter()
            .filter(|flavor| query.is_public.is_none_or(|value| value == flavor.is_public()))
            .cloned()
            .collect();
        let grants = self
            .grants
            .lock()
            .await
            .iter()
            .filter(|grant| grant.tenant_id() == &query.tenant_id)
            .cloned()
            .collect();

        Ok(FlavorCatalogSnapshot { flavors, grants })
    }

    async fn list_grants_for_flavor(&self, flavor_id: &FlavorId) -> AppResult<Vec<AccessGrant>> {
        self.check_reads()?;
        Ok(Self::grants_for(&self.grants.lock().await, flavor_id))
    }

    async fn insert_grant(&self, grant: &AccessGrant) -> AppResult<Vec<AccessGrant>> {
        let flavors = self.flavors.lock().await;
        if !flavors
            .iter()
            .any(|flavor| flavor.flavor_id() == grant.flavor_id())
        {
            return Err(AppError::NotFound(format!(
                "flavor '{}' not found",
                grant.flavor_id()
            )));
        }

        let mut grants = self.grants.lock().await;
        if grants.contains(grant) {
            return Err(AppError::Conflict("grant exists".to_owned()));
        }
        grants.push(grant.clone());

        Ok(Self::grants_for(&grants, grant.flavor_id()))
    }

    async fn delete_grant(&self, grant: &AccessGrant) -> AppResult<Vec<AccessGrant>> {
        let mut grants = self.grants.lock().await;
        let before = grants.len();
        grants.retain(|stored| stored != grant);
        if grants.len() == before {
            return Err(AppError::NotFound("grant missing".to_owned()));
        }

        Ok(Self::grants_for(&grants, grant.flavor_id()))
    }
}
