use crate::TenantId;

/// Identity and privilege level of the tenant issuing a request.
///
/// Resolved by upstream identity middleware; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerContext {
    tenant_id: TenantId,
    is_admin: bool,
}

impl CallerContext {
    /// Creates a caller context from tenancy and privilege data.
    #[must_use]
    pub fn new(tenant_id: TenantId, is_admin: bool) -> Self {
        Self {
            tenant_id,
            is_admin,
        }
    }

    /// Creates an unprivileged caller for the tenant.
    #[must_use]
    pub fn tenant(tenant_id: TenantId) -> Self {
        Self::new(tenant_id, false)
    }

    /// Creates an administrative caller acting from the tenant.
    #[must_use]
    pub fn admin(tenant_id: TenantId) -> Self {
        Self::new(tenant_id, true)
    }

    /// Returns the tenant the request was issued from.
    #[must_use]
    pub fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    /// Returns whether the caller holds administrative privilege.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.is_admin
    }
}
