use axum::Router;
use axum::middleware::from_fn;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};

pub fn build_router(app_state: AppState) -> Router {
    let compute_routes = Router::new()
        .route(
            "/v2/{project_id}/flavors",
            get(handlers::flavors::list_flavors_handler),
        )
        .route(
            "/v2/{project_id}/flavors/detail",
            get(handlers::flavors::list_flavor_details_handler),
        )
        .route(
            "/v2/{project_id}/flavors/{flavor_id}",
            get(handlers::flavors::show_flavor_handler),
        )
        .route(
            "/v2/{project_id}/flavors/{flavor_id}/os-flavor-access",
            get(handlers::flavor_access::list_flavor_access_handler),
        )
        .route(
            "/v2/{project_id}/flavors/{flavor_id}/action",
            post(handlers::flavor_access::flavor_action_handler),
        )
        .route_layer(from_fn(middleware::require_caller));

    Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(compute_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
