pub mod aggregator;
pub mod cache;
pub mod normalizer;
pub mod pricing;

pub use crate::domain::model::{PricingLookup, Service, ServicePricing};
pub use crate::domain::ports::{CatalogClient, Clock, ConfigProvider};
pub use crate::utils::error::Result;

use crate::domain::ports::SystemClock;
use aggregator::CatalogAggregator;
use pricing::PricingTreeBuilder;
use std::sync::Arc;

/// Aggregator and pricing builder wired to one upstream client.
#[derive(Clone)]
pub struct CatalogService {
    aggregator: Arc<CatalogAggregator>,
    pricing: Arc<PricingTreeBuilder>,
}

impl CatalogService {
    pub fn new<C: ConfigProvider>(client: Arc<dyn CatalogClient>, config: &C) -> Self {
        Self::with_clock(client, config, Arc::new(SystemClock))
    }

    pub fn with_clock<C: ConfigProvider>(
        client: Arc<dyn CatalogClient>,
        config: &C,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let aggregator = Arc::new(CatalogAggregator::with_cache_settings(
            client.clone(),
            config.page_size(),
            config.cache_ttl(),
            config.cache_max_entries(),
            clock.clone(),
        ));
        let pricing = Arc::new(PricingTreeBuilder::with_cache_settings(
            client,
            aggregator.clone(),
            config.concurrent_requests(),
            config.cache_ttl(),
            config.cache_max_entries(),
            clock,
        ));

        Self { aggregator, pricing }
    }

    pub fn aggregator(&self) -> &CatalogAggregator {
        &self.aggregator
    }

    pub fn pricing(&self) -> &PricingTreeBuilder {
        &self.pricing
    }

    pub async fn get_pricing(&self, service_id: &str, region: Option<&str>) -> Result<PricingLookup> {
        self.pricing.get_pricing(service_id, region).await
    }

    /// 清除服務清單與部署定價快取
    pub async fn refresh(&self) {
        self.aggregator.invalidate().await;
        self.pricing.invalidate().await;
        tracing::info!("🧹 Catalog caches cleared");
    }
}
