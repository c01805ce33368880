use flavorgate_core::{AppError, TenantId};
use flavorgate_domain::FlavorId;
use thiserror::Error;

/// Result type returned by flavor catalog and access use-cases.
pub type FlavorAccessResult<T> = Result<T, FlavorAccessError>;

/// Typed failures of flavor catalog and access use-cases.
#[derive(Debug, Error)]
pub enum FlavorAccessError {
    /// Referenced flavor does not exist.
    #[error("flavor '{flavor_id}' was not found")]
    NotFound {
        /// Requested flavor.
        flavor_id: FlavorId,
    },

    /// Operation does not apply to the flavor under the access model.
    #[error("flavor '{flavor_id}' has no access list")]
    NotVisible {
        /// Requested flavor.
        flavor_id: FlavorId,
    },

    /// Pair is already granted.
    #[error("tenant '{tenant_id}' already has access to flavor '{flavor_id}'")]
    AlreadyGranted {
        /// Requested flavor.
        flavor_id: FlavorId,
        /// Requested tenant.
        tenant_id: TenantId,
    },

    /// Pair is not granted.
    #[error("tenant '{tenant_id}' has no access to flavor '{flavor_id}'")]
    GrantNotFound {
        /// Requested flavor.
        flavor_id: FlavorId,
        /// Requested tenant.
        tenant_id: TenantId,
    },

    /// Caller lacks the privilege the operation requires.
    #[error("{0}")]
    Forbidden(String),

    /// Flavor store failure.
    #[error("flavor store failure: {0}")]
    Storage(String),
}

impl FlavorAccessError {
    /// Wraps a store error that has no use-case specific meaning.
    ///
    /// Rows the store cannot decode are integrity failures, not caller errors.
    #[must_use]
    pub fn storage(error: AppError) -> Self {
        Self::Storage(error.to_string())
    }
}

impl From<FlavorAccessError> for AppError {
    fn from(value: FlavorAccessError) -> Self {
        let message = value.to_string();
        match value {
            // Public and missing flavors must be indistinguishable to callers.
            FlavorAccessError::NotFound { flavor_id }
            | FlavorAccessError::NotVisible { flavor_id } => {
                Self::NotFound(format!("flavor '{flavor_id}' was not found"))
            }
            FlavorAccessError::GrantNotFound { .. } => Self::NotFound(message),
            FlavorAccessError::AlreadyGranted { .. } => Self::Conflict(message),
            FlavorAccessError::Forbidden(_) => Self::Forbidden(message),
            FlavorAccessError::Storage(_) => Self::Internal(message),
        }
    }
}
