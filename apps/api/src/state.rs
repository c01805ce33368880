use flavorgate_application::{FlavorAccessService, FlavorCatalogService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub flavor_catalog_service: FlavorCatalogService,
    pub flavor_access_service: FlavorAccessService,
}
