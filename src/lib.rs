pub mod adapters;
pub mod api;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::GlobalCatalogClient;
pub use config::TomlConfig;
pub use core::CatalogService;
pub use domain::model::{PricingLookup, Service, ServicePricing};
pub use utils::error::{CatalogError, Result};
