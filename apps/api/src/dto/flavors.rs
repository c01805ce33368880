use flavorgate_application::{AccessRecord, access_list_records};
use flavorgate_domain::{AccessGrant, Flavor};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Flavor list entry carrying identity only.
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/flavor-summary-response.ts"
)]
pub struct FlavorSummaryResponse {
    pub id: String,
    pub name: String,
}

/// Flavor summary listing.
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/flavor-summary-list-response.ts"
)]
pub struct FlavorSummaryListResponse {
    pub flavors: Vec<FlavorSummaryResponse>,
}

/// Full flavor representation including access data.
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/flavor-detail-response.ts"
)]
pub struct FlavorDetailResponse {
    pub id: String,
    pub name: String,
    pub ram: u32,
    pub vcpus: u32,
    pub disk: u32,
    #[serde(rename = "OS-FLV-EXT-DATA:ephemeral")]
    pub ephemeral: u32,
    pub swap: u32,
    pub rxtx_factor: f64,
    #[serde(rename = "os-flavor-access:is_public")]
    pub is_public: bool,
}

/// Single flavor payload.
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/flavor-response.ts"
)]
pub struct FlavorResponse {
    pub flavor: FlavorDetailResponse,
}

/// Detailed flavor listing.
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/flavor-detail-list-response.ts"
)]
pub struct FlavorDetailListResponse {
    pub flavors: Vec<FlavorDetailResponse>,
}

/// One tenant access grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/flavor-access-response.ts"
)]
pub struct FlavorAccessResponse {
    pub flavor_id: String,
    pub tenant_id: String,
}

/// Access list of a private flavor.
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/flavor-access-list-response.ts"
)]
pub struct FlavorAccessListResponse {
    pub flavor_access: Vec<FlavorAccessResponse>,
}

/// Tenant named by an access action.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/tenant-access-request.ts"
)]
pub struct TenantAccessRequest {
    #[ts(optional)]
    pub tenant: Option<String>,
}

/// Body of `POST /flavors/{flavor_id}/action`.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/flavor-action-request.ts"
)]
pub struct FlavorActionRequest {
    #[serde(rename = "addTenantAccess")]
    #[ts(optional)]
    pub add_tenant_access: Option<TenantAccessRequest>,
    #[serde(rename = "removeTenantAccess")]
    #[ts(optional)]
    pub remove_tenant_access: Option<TenantAccessRequest>,
}

/// Query string accepted by flavor listings.
#[derive(Debug, Default, Deserialize)]
pub struct FlavorListQuery {
    pub is_public: Option<String>,
}

impl From<&Flavor> for FlavorSummaryResponse {
    fn from(flavor: &Flavor) -> Self {
        Self {
            id: flavor.flavor_id().to_string(),
            name: flavor.spec().name.clone(),
        }
    }
}

impl From<&Flavor> for FlavorDetailResponse {
    fn from(flavor: &Flavor) -> Self {
        let spec = flavor.spec();
        Self {
            id: flavor.flavor_id().to_string(),
            name: spec.name.clone(),
            ram: spec.memory_mb,
            vcpus: spec.vcpus,
            disk: spec.root_gb,
            ephemeral: spec.ephemeral_gb,
            swap: spec.swap_mb,
            rxtx_factor: spec.rxtx_factor,
            is_public: flavor.is_public(),
        }
    }
}

impl From<AccessRecord> for FlavorAccessResponse {
    fn from(record: AccessRecord) -> Self {
        Self {
            flavor_id: record.flavor_id,
            tenant_id: record.tenant_id,
        }
    }
}

impl From<&[AccessGrant]> for FlavorAccessListResponse {
    fn from(grants: &[AccessGrant]) -> Self {
        Self {
            flavor_access: access_list_records(grants)
                .into_iter()
                .map(FlavorAccessResponse::from)
                .collect(),
        }
    }
}
