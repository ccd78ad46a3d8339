use crate::domain::model::{CatalogPage, ListEntriesRequest, PricingDocument};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::{Duration, Instant};

/// Upstream service catalog. Implementations must be shareable across requests.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// One page of catalog entries.
    async fn list_entries(&self, request: &ListEntriesRequest) -> Result<CatalogPage>;

    /// Full entry tree (all children, unlimited depth).
    async fn get_entry(&self, id: &str) -> Result<serde_json::Value>;

    /// Pricing for a single deployment. Fails with an upstream status error when
    /// the deployment has no priced metrics.
    async fn get_deployment_pricing(&self, deployment_id: &str) -> Result<PricingDocument>;
}

pub trait ConfigProvider: Send + Sync {
    fn catalog_endpoint(&self) -> &str;
    fn page_size(&self) -> usize;
    fn cache_ttl(&self) -> Duration;
    fn cache_max_entries(&self) -> usize;
    fn concurrent_requests(&self) -> usize;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to; lets cache expiry be tested without sleeping.
#[derive(Debug)]
pub struct ManualClock {
    now: std::sync::Mutex<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: std::sync::Mutex::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}
