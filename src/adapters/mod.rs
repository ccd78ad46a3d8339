// Adapters layer: concrete implementations of the catalog port.

pub mod global_catalog;
pub mod iam;

pub use global_catalog::GlobalCatalogClient;
