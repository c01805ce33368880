use axum::extract::Request;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use flavorgate_core::{AppError, AppResult, CallerContext, TenantId};

use crate::error::ApiResult;

pub const PROJECT_ID_HEADER: &str = "x-project-id";
pub const ROLES_HEADER: &str = "x-roles";

const ADMIN_ROLE: &str = "admin";

/// Resolves the caller context forwarded by the upstream identity layer.
pub async fn require_caller(mut request: Request, next: Next) -> ApiResult<Response> {
    let caller = caller_from_headers(request.headers())?;

    request.extensions_mut().insert(caller);
    Ok(next.run(request).await)
}

pub fn caller_from_headers(headers: &HeaderMap) -> AppResult<CallerContext> {
    let project_id = headers
        .get(PROJECT_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| AppError::Unauthorized("project identity required".to_owned()))?;
    let tenant_id = TenantId::new(project_id)?;

    let is_admin = headers
        .get_all(ROLES_HEADER)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .any(|role| role.trim().eq_ignore_ascii_case(ADMIN_ROLE));

    Ok(CallerContext::new(tenant_id, is_admin))
}
