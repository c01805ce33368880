use std::sync::Arc;

use flavorgate_core::{AppError, CallerContext, TenantId};
use flavorgate_domain::{AccessGrant, Flavor, FlavorId};
use tracing::{debug, info};

use crate::{FlavorAccessError, FlavorAccessResult, FlavorRepository};


/// Application service managing tenant access grants on private flavors.
#[derive(Clone)]
pub struct FlavorAccessService {
    repository: Arc<dyn FlavorRepository>,
}

impl FlavorAccessService {
    /// Creates a new access service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn FlavorRepository>) -> Self {
        Self { repository }
    }

    /// Lists the grants recorded for a private flavor, ordered by tenant.
    ///
    /// Public flavors have no access list and report `NotVisible`. Any caller
    /// may read the list; the actor is accepted but narrows nothing.
    pub async fn list_grants(
        &self,
        _actor: &CallerContext,
        flavor_id: &FlavorId,
    ) -> FlavorAccessResult<Vec<AccessGrant>> {
        self.require_private_flavor(flavor_id).await?;

        let grants = self
            .repository
            .list_grants_for_flavor(flavor_id)
            .await
            .map_err(FlavorAccessError::storage)?;

        Ok(sorted_by_tenant(grants))
    }

    /// Grants a tenant access to a private flavor.
    ///
    /// Returns the complete grant list for the flavor after the insert.
    pub async fn grant(
        &self,
        actor: &CallerContext,
        flavor_id: &FlavorId,
        tenant_id: &TenantId,
    ) -> FlavorAccessResult<Vec<AccessGrant>> {
        require_admin(actor, "grant flavor access")?;
        self.require_private_flavor(flavor_id).await?;

        let grant = AccessGrant::new(flavor_id.clone(), tenant_id.clone());
        let grants = self
            .repository
            .insert_grant(&grant)
            .await
            .map_err(|error| match error {
                AppError::Conflict(_) => FlavorAccessError::AlreadyGranted {
                    flavor_id: flavor_id.clone(),
                    tenant_id: tenant_id.clone(),
                },
                AppError::NotFound(_) => FlavorAccessError::NotFound {
                    flavor_id: flavor_id.clone(),
                },
                other => FlavorAccessError::storage(other),
            })
            .inspect_err(|error| {
                debug!(%flavor_id, %tenant_id, %error, "flavor access grant rejected");
            })?;

        info!(
            %flavor_id,
            %tenant_id,
            actor = %actor.tenant_id(),
            "flavor access granted"
        );

        Ok(sorted_by_tenant(grants))
    }

    /// Revokes a tenant's access to a flavor.
    ///
    /// Revoking a pair that was never granted is an error, not a no-op.
    pub async fn revoke(
        &self,
        actor: &CallerContext,
        flavor_id: &FlavorId,
        tenant_id: &TenantId,
    ) -> FlavorAccessResult<Vec<AccessGrant>> {
        require_admin(actor, "revoke flavor access")?;

        let grant = AccessGrant::new(flavor_id.clone(), tenant_id.clone());
        let grants = self
            .repository
            .delete_grant(&grant)
            .await
            .map_err(|error| match error {
                AppError::NotFound(_) => FlavorAccessError::GrantNotFound {
                    flavor_id: flavor_id.clone(),
                    tenant_id: tenant_id.clone(),
                },
                other => FlavorAccessError::storage(other),
            })
            .inspect_err(|error| {
                debug!(%flavor_id, %tenant_id, %error, "flavor access revoke rejected");
            })?;

        info!(
            %flavor_id,
            %tenant_id,
            actor = %actor.tenant_id(),
            "flavor access revoked"
        );

        Ok(sorted_by_tenant(grants))
    }

    async fn require_private_flavor(&self, flavor_id: &FlavorId) -> FlavorAccessResult<Flavor> {
        let flavor = self
            .repository
            .find_flavor(flavor_id)
            .await
            .map_err(FlavorAccessError::storage)?
            .ok_or_else(|| FlavorAccessError::NotFound {
                flavor_id: flavor_id.clone(),
            })?;

        if flavor.is_public() {
            return Err(FlavorAccessError::NotVisible {
                flavor_id: flavor_id.clone(),
            });
        }

        Ok(flavor)
    }
}

fn require_admin(actor: &CallerContext, operation: &str) -> FlavorAccessResult<()> {
    if actor.is_admin() {
        return Ok(());
    }

    Err(FlavorAccessError::Forbidden(format!(
        "tenant '{}' is not allowed to {operation}",
        actor.tenant_id()
    )))
}

fn sorted_by_tenant(mut grants: Vec<AccessGrant>) -> Vec<AccessGrant> {
    grants.sort_by(|left, right| {
        left.tenant_id()
            .cmp(right.tenant_id())
            .then_with(|| left.flavor_id().cmp(right.flavor_id()))
    });
    grants
}
