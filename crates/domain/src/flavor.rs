use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use flavorgate_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

/// External flavor key used in routes and grant rows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlavorId(NonEmptyString);

impl FlavorId {
    /// Creates a flavor identifier, rejecting blank values.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        NonEmptyString::new(value)
            .map(Self)
            .map_err(|_| AppError::Validation("flavor id must not be empty".to_owned()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    fn numeric_value(&self) -> Option<u64> {
        self.as_str().parse::<u64>().ok()
    }
}

impl Display for FlavorId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Numeric ids compare by value and sort ahead of non-numeric ids, which
/// compare lexicographically.
impl Ord for FlavorId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric_value(), other.numeric_value()) {
            (Some(left), Some(right)) => left
                .cmp(&right)
                .then_with(|| self.as_str().cmp(other.as_str())),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.as_str().cmp(other.as_str()),
        }
    }
}

impl PartialOrd for FlavorId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Descriptive sizing payload carried by a flavor.
///
/// Opaque to access decisions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlavorSpec {
    /// Human-friendly flavor name.
    pub name: String,
    /// Memory in MiB.
    pub memory_mb: u32,
    /// Virtual CPU count.
    pub vcpus: u32,
    /// Root disk in GiB.
    pub root_gb: u32,
    /// Ephemeral disk in GiB.
    pub ephemeral_gb: u32,
    /// Swap in MiB.
    pub swap_mb: u32,
    /// Network bandwidth factor.
    pub rxtx_factor: f64,
}

/// Hardware profile record, either public or private.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flavor {
    id: i64,
    flavor_id: FlavorId,
    is_public: bool,
    spec: FlavorSpec,
}

impl Flavor {
    /// Creates a flavor record with validated descriptive fields.
    pub fn new(id: i64, flavor_id: FlavorId, is_public: bool, spec: FlavorSpec) -> AppResult<Self> {
        if spec.name.trim().is_empty() {
            return Err(AppError::Validation(format!(
                "flavor '{flavor_id}' must have a name"
            )));
        }
        if !spec.rxtx_factor.is_finite() || spec.rxtx_factor <= 0.0 {
            return Err(AppError::Validation(format!(
                "flavor '{flavor_id}' rxtx_factor must be a positive number"
            )));
        }

        Ok(Self {
            id,
            flavor_id,
            is_public,
            spec,
        })
    }

    /// Returns the stable internal key.
    #[must_use]
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Returns the external flavor key.
    #[must_use]
    pub fn flavor_id(&self) -> &FlavorId {
        &self.flavor_id
    }

    /// Returns whether every tenant can see the flavor.
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.is_public
    }

    /// Returns the descriptive payload.
    #[must_use]
    pub fn spec(&self) -> &FlavorSpec {
        &self.spec
    }

    /// Deterministic catalog ordering: flavor key first, internal id second.
    #[must_use]
    pub fn catalog_order(&self, other: &Self) -> Ordering {
        self.flavor_id
            .cmp(&other.flavor_id)
            .then_with(|| self.id.cmp(&other.id))
    }
}
