//! Application services and ports.

#![forbid(unsafe_code)]

mod access_list_presenter;
#[cfg(test)]
mod fakes;
mod flavor_access_error;
mod flavor_access_service;
mod flavor_catalog_service;
mod flavor_ports;

pub use access_list_presenter::{
    AccessRecord, access_list_records, parse_access_list_xml, render_access_list_xml,
};
pub use flavor_access_error::{FlavorAccessError, FlavorAccessResult};
pub use flavor_access_service::FlavorAccessService;
pub use flavor_catalog_service::FlavorCatalogService;
pub use flavor_ports::{FlavorCatalogQuery, FlavorCatalogSnapshot, FlavorRepository};
