//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_flavor_repository;
mod postgres_flavor_repository;

pub use in_memory_flavor_repository::InMemoryFlavorRepository;
pub use postgres_flavor_repository::PostgresFlavorRepository;
