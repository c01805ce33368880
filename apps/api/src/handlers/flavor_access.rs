use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Path, State};
use axum::http::HeaderMap;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};

use flavorgate_application::render_access_list_xml;
use flavorgate_core::{AppError, CallerContext, TenantId};
use flavorgate_domain::{AccessGrant, FlavorId};

use crate::dto::{FlavorAccessListResponse, FlavorActionRequest, TenantAccessRequest};
use crate::error::ApiResult;
use crate::handlers::negotiation::prefers_xml;
use crate::state::AppState;

#[cfg(test)]
mod tests;

const XML_CONTENT_TYPE: &str = "application/xml; charset=utf-8";

pub async fn list_flavor_access_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
    Path((_project_id, flavor_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let flavor_id = FlavorId::new(flavor_id)?;
    let grants = state
        .flavor_access_service
        .list_grants(&caller, &flavor_id)
        .await?;

    access_list_response(&headers, &grants)
}

pub async fn flavor_action_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
    Path((_project_id, flavor_id)): Path<(String, String)>,
    headers: HeaderMap,
    payload: Result<Json<FlavorActionRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(payload) = payload?;
    let flavor_id = FlavorId::new(flavor_id)?;

    let grants = match (payload.add_tenant_access, payload.remove_tenant_access) {
        (Some(request), None) => {
            let tenant_id = requested_tenant(request)?;
            state
                .flavor_access_service
                .grant(&caller, &flavor_id, &tenant_id)
                .await?
        }
        (None, Some(request)) => {
            let tenant_id = requested_tenant(request)?;
            state
                .flavor_access_service
                .revoke(&caller, &flavor_id, &tenant_id)
                .await?
        }
        _ => {
            return Err(AppError::Validation(
                "exactly one of 'addTenantAccess' or 'removeTenantAccess' is required".to_owned(),
            )
            .into());
        }
    };

    access_list_response(&headers, &grants)
}

fn requested_tenant(request: TenantAccessRequest) -> ApiResult<TenantId> {
    let tenant = request
        .tenant
        .ok_or_else(|| AppError::Validation("missing tenant parameter".to_owned()))?;

    Ok(TenantId::new(tenant)?)
}

fn access_list_response(headers: &HeaderMap, grants: &[AccessGrant]) -> ApiResult<Response> {
    if prefers_xml(headers) {
        let document = render_access_list_xml(grants)?;
        return Ok(([(CONTENT_TYPE, XML_CONTENT_TYPE)], document).into_response());
    }

    Ok(Json(FlavorAccessListResponse::from(grants)).into_response())
}
