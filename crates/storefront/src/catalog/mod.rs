//! Client and product directories: the slice of the surrounding platform the
//! rating service validates interaction events against. Everything else the
//! wider storefront does (carts, orders, tickets) lives outside this crate.

pub mod domain;
pub mod repository;
pub mod router;

pub use domain::{ClientId, ClientRecord, ProductId, ProductRecord};
pub use repository::{ClientDirectory, DirectoryError, ProductCatalog};
pub use router::catalog_router;
