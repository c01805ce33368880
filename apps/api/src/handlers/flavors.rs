use axum::Json;
use axum::extract::{Extension, Path, Query, State};

use flavorgate_core::CallerContext;
use flavorgate_domain::{Flavor, FlavorId, VisibilityFilter};

use crate::dto::{
    FlavorDetailListResponse, FlavorDetailResponse, FlavorListQuery, FlavorResponse,
    FlavorSummaryListResponse, FlavorSummaryResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;


pub async fn list_flavors_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
    Path(_project_id): Path<String>,
    Query(query): Query<FlavorListQuery>,
) -> ApiResult<Json<FlavorSummaryListResponse>> {
    let flavors = visible_flavors(&state, &caller, &query).await?;

    Ok(Json(FlavorSummaryListResponse {
        flavors: flavors.iter().map(FlavorSummaryResponse::from).collect(),
    }))
}

pub async fn list_flavor_details_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
    Path(_project_id): Path<String>,
    Query(query): Query<FlavorListQuery>,
) -> ApiResult<Json<FlavorDetailListResponse>> {
    let flavors = visible_flavors(&state, &caller, &query).await?;

    Ok(Json(FlavorDetailListResponse {
        flavors: flavors.iter().map(FlavorDetailResponse::from).collect(),
    }))
}

pub async fn show_flavor_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
    Path((_project_id, flavor_id)): Path<(String, String)>,
) -> ApiResult<Json<FlavorResponse>> {
    let flavor_id = FlavorId::new(flavor_id)?;
    let flavor = state
        .flavor_catalog_service
        .show_flavor(&caller, &flavor_id)
        .await?;

    Ok(Json(FlavorResponse {
        flavor: FlavorDetailResponse::from(&flavor),
    }))
}

async fn visible_flavors(
    state: &AppState,
    caller: &CallerContext,
    query: &FlavorListQuery,
) -> ApiResult<Vec<Flavor>> {
    let filter = VisibilityFilter::from_query(query.is_public.as_deref())?;

    Ok(state
        .flavor_catalog_service
        .list_flavors(caller, filter)
        .await?)
}
