use crate::core::cache::{TtlCache, DEFAULT_MAX_ENTRIES, DEFAULT_TTL};
use crate::core::normalizer::normalize_service;
use crate::domain::model::{ListEntriesRequest, Service};
use crate::domain::ports::{CatalogClient, Clock, SystemClock};
use crate::utils::error::{CatalogError, Result};
use std::sync::Arc;
use std::time::Duration;

/// 上游單頁上限
pub const MAX_PAGE_SIZE: usize = 200;

/// Drives pagination against the catalog and caches the normalized service set.
pub struct CatalogAggregator {
    client: Arc<dyn CatalogClient>,
    page_size: usize,
    cache: TtlCache<(), Arc<Vec<Service>>>,
}

impl CatalogAggregator {
    pub fn new(client: Arc<dyn CatalogClient>) -> Self {
        Self::with_cache_settings(
            client,
            MAX_PAGE_SIZE,
            DEFAULT_TTL,
            DEFAULT_MAX_ENTRIES,
            Arc::new(SystemClock),
        )
    }

    pub fn with_cache_settings(
        client: Arc<dyn CatalogClient>,
        page_size: usize,
        ttl: Duration,
        max_entries: usize,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            client,
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
            cache: TtlCache::new(ttl, max_entries, clock),
        }
    }

    /// Every active service in upstream order, served from cache while fresh.
    pub async fn list_all_services(&self) -> Result<Arc<Vec<Service>>> {
        self.cache
            .get_or_try_insert_with((), || async {
                tracing::info!("🔄 Service cache miss, aggregating catalog");
                let services = self.aggregate().await?;
                tracing::info!("✅ Cached {} services for {:?}", services.len(), self.cache.ttl());
                Ok::<_, CatalogError>(Arc::new(services))
            })
            .await
    }

    pub async fn list_ibm_services(&self) -> Result<Vec<Service>> {
        self.filtered(|svc| svc.is_ibm_provided()).await
    }

    pub async fn list_public_services(&self) -> Result<Vec<Service>> {
        self.filtered(|svc| svc.is_public()).await
    }

    pub async fn list_ibm_public_services(&self) -> Result<Vec<Service>> {
        self.filtered(|svc| svc.is_ibm_provided() && svc.is_public())
            .await
    }

    pub async fn find_service(&self, service_id: &str) -> Result<Option<Service>> {
        let services = self.list_all_services().await?;
        Ok(services.iter().find(|svc| svc.id == service_id).cloned())
    }

    pub async fn invalidate(&self) {
        self.cache.invalidate_all().await;
    }

    async fn filtered<F>(&self, predicate: F) -> Result<Vec<Service>>
    where
        F: Fn(&Service) -> bool,
    {
        let services = self.list_all_services().await?;
        Ok(services.iter().filter(|&svc| predicate(svc)).cloned().collect())
    }

    async fn aggregate(&self) -> Result<Vec<Service>> {
        let first = self
            .client
            .list_entries(&ListEntriesRequest::active_services(0, self.page_size))
            .await?;
        let total = first.count;
        let mut entries = first.resources;

        tracing::debug!("📡 Catalog reports {} services, first page had {}", total, entries.len());

        while entries.len() < total {
            let offset = entries.len();
            let page = self
                .client
                .list_entries(&ListEntriesRequest::active_services(offset, self.page_size))
                .await?;

            tracing::debug!(
                "📡 Fetched page at offset {} ({} entries, {}/{})",
                offset,
                page.resources.len(),
                offset + page.resources.len(),
                total
            );

            if page.resources.is_empty() {
                return Err(CatalogError::UpstreamContract {
                    message: format!(
                        "empty page at offset {} before reaching reported count {}",
                        offset, total
                    ),
                });
            }
            entries.extend(page.resources);
        }

        entries.iter().map(normalize_service).collect()
    }
}
