mod common;
mod flavors;

pub use common::HealthResponse;
pub use flavors::{
    FlavorAccessListResponse, FlavorAccessResponse, FlavorActionRequest, FlavorDetailListResponse,
    FlavorDetailResponse, FlavorListQuery, FlavorResponse, FlavorSummaryListResponse,
    FlavorSummaryResponse, TenantAccessRequest,
};
