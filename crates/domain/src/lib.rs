//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod access;
mod flavor;

pub use access::{AccessGrant, VisibilityFilter, can_see_flavor};
pub use flavor::{Flavor, FlavorId, FlavorSpec};
