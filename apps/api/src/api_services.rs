mod database;
mod flavor_store;

pub use database::connect_and_migrate;
pub use flavor_store::{FlavorStore, build_app_state};
