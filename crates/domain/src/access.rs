use std::str::FromStr;

use flavorgate_core::{AppError, CallerContext, TenantId};
use serde::{Deserialize, Serialize};

use crate::{Flavor, FlavorId};

/// Explicit authorization for one tenant to see and use one private flavor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccessGrant {
    flavor_id: FlavorId,
    tenant_id: TenantId,
}

impl AccessGrant {
    /// Creates a grant value for the pair.
    #[must_use]
    pub fn new(flavor_id: FlavorId, tenant_id: TenantId) -> Self {
        Self {
            flavor_id,
            tenant_id,
        }
    }

    /// Returns the granted flavor.
    #[must_use]
    pub fn flavor_id(&self) -> &FlavorId {
        &self.flavor_id
    }

    /// Returns the grantee tenant.
    #[must_use]
    pub fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    /// Returns whether this grant authorizes `tenant_id` on `flavor_id`.
    #[must_use]
    pub fn covers(&self, flavor_id: &FlavorId, tenant_id: &TenantId) -> bool {
        &self.flavor_id == flavor_id && &self.tenant_id == tenant_id
    }
}

/// Decides whether `caller` may see `flavor`.
///
/// Public flavors are visible to everyone. Private flavors are visible to
/// administrators and to tenants holding a grant for that flavor.
#[must_use]
pub fn can_see_flavor(flavor: &Flavor, caller: &CallerContext, grants: &[AccessGrant]) -> bool {
    if flavor.is_public() || caller.is_admin() {
        return true;
    }

    grants
        .iter()
        .any(|grant| grant.covers(flavor.flavor_id(), caller.tenant_id()))
}

/// Optional public/private narrowing of a flavor listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisibilityFilter {
    /// No narrowing.
    #[default]
    All,
    /// Public flavors only.
    PublicOnly,
    /// Private flavors only.
    PrivateOnly,
}

impl VisibilityFilter {
    /// Parses the optional `is_public` query value; absent means [`Self::All`].
    pub fn from_query(value: Option<&str>) -> Result<Self, AppError> {
        value.map_or(Ok(Self::All), Self::from_str)
    }

    /// Returns the `is_public` value a store should match, if any.
    #[must_use]
    pub fn is_public(self) -> Option<bool> {
        match self {
            Self::All => None,
            Self::PublicOnly => Some(true),
            Self::PrivateOnly => Some(false),
        }
    }

    /// Returns whether the flavor falls inside the filter, ignoring visibility.
    #[must_use]
    pub fn admits(self, flavor: &Flavor) -> bool {
        self.is_public()
            .is_none_or(|is_public| is_public == flavor.is_public())
    }
}

impl FromStr for VisibilityFilter {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::All),
            "true" | "t" | "yes" | "y" | "on" | "1" => Ok(Self::PublicOnly),
            "false" | "f" | "no" | "n" | "off" | "0" => Ok(Self::PrivateOnly),
            _ => Err(AppError::Validation(format!(
                "invalid is_public filter '{value}'"
            ))),
        }
    }
}
