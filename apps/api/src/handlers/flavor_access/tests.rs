use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::header::{ACCEPT, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;

use flavorgate_application::parse_access_list_xml;
use flavorgate_core::CallerContext;

use crate::dto::{
    FlavorAccessListResponse, FlavorAccessResponse, FlavorActionRequest, TenantAccessRequest,
};
use crate::error::ErrorResponse;
use crate::handlers::test_support::{admin, body_bytes, body_json, member, seeded_state};
use crate::state::AppState;

use super::{flavor_action_handler, list_flavor_access_handler};

fn access(flavor_id: &str, tenant_id: &str) -> FlavorAccessResponse {
    FlavorAccessResponse {
        flavor_id: flavor_id.to_owned(),
        tenant_id: tenant_id.to_owned(),
    }
}

fn add(tenant: Option<&str>) -> FlavorActionRequest {
    FlavorActionRequest {
        add_tenant_access: Some(TenantAccessRequest {
            tenant: tenant.map(ToOwned::to_owned),
        }),
        remove_tenant_access: None,
    }
}

fn remove(tenant: &str) -> FlavorActionRequest {
    FlavorActionRequest {
        add_tenant_access: None,
        remove_tenant_access: Some(TenantAccessRequest {
            tenant: Some(tenant.to_owned()),
        }),
    }
}

async fn act(
    state: &AppState,
    caller: CallerContext,
    flavor_id: &str,
    request: FlavorActionRequest,
) -> Result<axum::response::Response, StatusCode> {
    flavor_action_handler(
        State(state.clone()),
        Extension(caller),
        Path(("admin".to_owned(), flavor_id.to_owned())),
        HeaderMap::new(),
        Ok(Json(request)),
    )
    .await
    .map_err(|error| error.status())
}

#[tokio::test]
async fn access_list_is_json_ordered_by_tenant() {
    let state = seeded_state().await;

    let response = list_flavor_access_handler(
        State(state),
        Extension(member("proj9")),
        Path(("proj9".to_owned(), "2".to_owned())),
        HeaderMap::new(),
    )
    .await;
    assert!(response.is_ok());

    let body: FlavorAccessListResponse =
        body_json(response.unwrap_or_else(|_| unreachable!())).await;
    assert_eq!(
        body.flavor_access,
        vec![access("2", "proj2"), access("2", "proj3")]
    );
}

#[tokio::test]
async fn access_list_renders_xml_when_preferred() {
    let state = seeded_state().await;
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/xml"));

    let response = list_flavor_access_handler(
        State(state),
        Extension(admin()),
        Path(("admin".to_owned(), "3".to_owned())),
        headers,
    )
    .await
    .unwrap_or_else(|_| unreachable!());

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    assert!(content_type.starts_with("application/xml"));

    let body = String::from_utf8(body_bytes(response).await).unwrap_or_default();
    assert!(body.starts_with("<?xml version='1.0' encoding='UTF-8'?>"));
    let records = parse_access_list_xml(body.as_str()).unwrap_or_default();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].tenant_id, "proj3");
}

#[tokio::test]
async fn access_list_of_public_flavor_is_not_found() {
    let state = seeded_state().await;

    let response = list_flavor_access_handler(
        State(state),
        Extension(admin()),
        Path(("admin".to_owned(), "1".to_owned())),
        HeaderMap::new(),
    )
    .await;

    assert_eq!(
        response.err().map(|error| error.status()),
        Some(StatusCode::NOT_FOUND)
    );
}

#[tokio::test]
async fn public_and_missing_flavors_share_not_found_body() {
    let state = seeded_state().await;

    for flavor_id in ["1", "99"] {
        let response = list_flavor_access_handler(
            State(state.clone()),
            Extension(member("proj2")),
            Path(("proj2".to_owned(), flavor_id.to_owned())),
            HeaderMap::new(),
        )
        .await;
        assert!(response.is_err());

        let response = response
            .err()
            .map(IntoResponse::into_response)
            .unwrap_or_else(|| unreachable!());
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body: ErrorResponse = body_json(response).await;
        assert_eq!(
            body.message,
            format!("not found: flavor '{flavor_id}' was not found")
        );
    }
}

#[tokio::test]
async fn add_tenant_access_returns_updated_list() {
    let state = seeded_state().await;

    let response = act(&state, admin(), "3", add(Some("proj2"))).await;
    assert!(response.is_ok());

    let body: FlavorAccessListResponse =
        body_json(response.unwrap_or_else(|_| unreachable!())).await;
    assert_eq!(
        body.flavor_access,
        vec![access("3", "proj2"), access("3", "proj3")]
    );
}

#[tokio::test]
async fn duplicate_add_is_conflict() {
    let state = seeded_state().await;

    let result = act(&state, admin(), "2", add(Some("proj3"))).await;
    assert_eq!(result.err(), Some(StatusCode::CONFLICT));
}

#[tokio::test]
async fn add_on_public_flavor_is_not_found() {
    let state = seeded_state().await;

    let result = act(&state, admin(), "0", add(Some("proj2"))).await;
    assert_eq!(result.err(), Some(StatusCode::NOT_FOUND));
}

#[tokio::test]
async fn unprivileged_actions_are_forbidden() {
    let state = seeded_state().await;

    let added = act(&state, member("proj3"), "3", add(Some("proj2"))).await;
    assert_eq!(added.err(), Some(StatusCode::FORBIDDEN));

    let removed = act(&state, member("proj3"), "3", remove("proj3")).await;
    assert_eq!(removed.err(), Some(StatusCode::FORBIDDEN));
}

#[tokio::test]
async fn missing_or_blank_tenant_is_bad_request() {
    let state = seeded_state().await;

    let missing = act(&state, admin(), "3", add(None)).await;
    assert_eq!(missing.err(), Some(StatusCode::BAD_REQUEST));

    let blank = act(&state, admin(), "3", add(Some("  "))).await;
    assert_eq!(blank.err(), Some(StatusCode::BAD_REQUEST));
}

#[tokio::test]
async fn unknown_action_is_bad_request() {
    let state = seeded_state().await;
    let request = FlavorActionRequest {
        add_tenant_access: None,
        remove_tenant_access: None,
    };

    let result = act(&state, admin(), "3", request).await;
    assert_eq!(result.err(), Some(StatusCode::BAD_REQUEST));
}

#[tokio::test]
async fn remove_tenant_access_round_trip() {
    let state = seeded_state().await;

    let removed = act(&state, admin(), "2", remove("proj2")).await;
    assert!(removed.is_ok());
    let body: FlavorAccessListResponse =
        body_json(removed.unwrap_or_else(|_| unreachable!())).await;
    assert_eq!(body.flavor_access, vec![access("2", "proj3")]);

    let again = act(&state, admin(), "2", remove("proj2")).await;
    assert_eq!(again.err(), Some(StatusCode::NOT_FOUND));
}
