use std::sync::Arc;

use flavorgate_core::CallerContext;
use flavorgate_domain::{Flavor, FlavorId, VisibilityFilter, can_see_flavor};

use crate::{
    FlavorAccessError, FlavorAccessResult, FlavorCatalogQuery, FlavorCatalogSnapshot,
    FlavorRepository,
};

/// Application service producing the caller-visible flavor catalog.
#[derive(Clone)]
pub struct FlavorCatalogService {
    repository: Arc<dyn FlavorRepository>,
}

impl FlavorCatalogService {
    /// Creates a new catalog service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn FlavorRepository>) -> Self {
        Self { repository }
    }

    /// Lists flavors the caller can see, narrowed by the visibility filter.
    ///
    /// The result is ordered by flavor key; an empty result is not an error.
    pub async fn list_flavors(
        &self,
        caller: &CallerContext,
        filter: VisibilityFilter,
    ) -> FlavorAccessResult<Vec<Flavor>> {
        let FlavorCatalogSnapshot { flavors, grants } = self
            .repository
            .load_catalog(FlavorCatalogQuery {
                is_public: filter.is_public(),
                tenant_id: caller.tenant_id().clone(),
            })
            .await
            .map_err(FlavorAccessError::storage)?;

        let mut visible: Vec<Flavor> = flavors
            .into_iter()
            .filter(|flavor| filter.admits(flavor) && can_see_flavor(flavor, caller, &grants))
            .collect();
        visible.sort_by(Flavor::catalog_order);

        Ok(visible)
    }

    /// Returns one flavor if the caller can see it.
    ///
    /// A private flavor hidden from the caller reports `NotFound`, exactly as
    /// a missing one does.
    pub async fn show_flavor(
        &self,
        caller: &CallerContext,
        flavor_id: &FlavorId,
    ) -> FlavorAccessResult<Flavor> {
        let flavor = self
            .repository
            .find_flavor(flavor_id)
            .await
            .map_err(FlavorAccessError::storage)?
            .ok_or_else(|| FlavorAccessError::NotFound {
                flavor_id: flavor_id.clone(),
            })?;

        let grants = if flavor.is_public() || caller.is_admin() {
            Vec::new()
        } else {
            self.repository
                .list_grants_for_flavor(flavor_id)
                .await
                .map_err(FlavorAccessError::storage)?
        };

        if !can_see_flavor(&flavor, caller, &grants) {
            return Err(FlavorAccessError::NotFound {
                flavor_id: flavor_id.clone(),
            });
        }

        Ok(flavor)
    }
}
