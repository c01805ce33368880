use async_trait::async_trait;
use flavorgate_core::{AppResult, TenantId};
use flavorgate_domain::{AccessGrant, Flavor, FlavorId};

/// Catalog read request issued by the catalog filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlavorCatalogQuery {
    /// Optional `is_public` narrowing pushed down to the store.
    pub is_public: Option<bool>,
    /// Tenant whose grants on private flavors must accompany the result.
    pub tenant_id: TenantId,
}

/// Flavors plus the requesting tenant's grants, read in one unit of work.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlavorCatalogSnapshot {
    /// Flavors matching the query, in no particular order.
    pub flavors: Vec<Flavor>,
    /// Grants held by the query tenant on private flavors of the snapshot.
    pub grants: Vec<AccessGrant>,
}

/// Repository port for flavors and tenant access grants.
///
/// Grant mutations must be atomic per `(flavor_id, tenant_id)` pair: of two
/// concurrent identical calls exactly one succeeds.
#[async_trait]
pub trait FlavorRepository: Send + Sync {
    /// Finds a flavor by external key.
    async fn find_flavor(&self, flavor_id: &FlavorId) -> AppResult<Option<Flavor>>;

    /// Reads the flavor catalog together with the tenant's private grants.
    async fn load_catalog(&self, query: FlavorCatalogQuery) -> AppResult<FlavorCatalogSnapshot>;

    /// Lists every grant recorded for a flavor.
    async fn list_grants_for_flavor(&self, flavor_id: &FlavorId) -> AppResult<Vec<AccessGrant>>;

    /// Inserts a grant and returns the flavor's grants after the insert.
    ///
    /// Fails with `AppError::Conflict` when the pair is already granted and
    /// `AppError::NotFound` when the flavor does not exist.
    async fn insert_grant(&self, grant: &AccessGrant) -> AppResult<Vec<AccessGrant>>;

    /// Deletes a grant and returns the flavor's grants after the delete.
    ///
    /// Fails with `AppError::NotFound` when the pair is not granted.
    async fn delete_grant(&self, grant: &AccessGrant) -> AppResult<Vec<AccessGrant>>;
}
