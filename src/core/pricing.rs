use crate::core::aggregator::CatalogAggregator;
use crate::core::cache::{TtlCache, DEFAULT_MAX_ENTRIES, DEFAULT_TTL};
use crate::core::normalizer::{
    entry_id, required_as, required_bool, required_str, resolve_geo_tags,
};
use crate::domain::model::{DeploymentPricing, PlanPricing, PricingLookup, ServicePricing};
use crate::domain::ports::{CatalogClient, Clock, SystemClock};
use crate::utils::error::{CatalogError, Result};
use futures::stream::{self, StreamExt, TryStreamExt};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_CONCURRENT_REQUESTS: usize = 5;

fn children(entry: &Value) -> &[Value] {
    entry
        .get("children")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// 部署所在區域：geo_tags 的第一個值，沒有則為空字串
pub fn deployment_location(deployment: &Value) -> String {
    resolve_geo_tags(deployment)
        .into_iter()
        .next()
        .unwrap_or_default()
}

/// Assembles the service → plan → deployment pricing tree for one service.
pub struct PricingTreeBuilder {
    client: Arc<dyn CatalogClient>,
    aggregator: Arc<CatalogAggregator>,
    cache: TtlCache<String, DeploymentPricing>,
    concurrent_requests: usize,
}

impl PricingTreeBuilder {
    pub fn new(client: Arc<dyn CatalogClient>, aggregator: Arc<CatalogAggregator>) -> Self {
        Self::with_cache_settings(
            client,
            aggregator,
            DEFAULT_CONCURRENT_REQUESTS,
            DEFAULT_TTL,
            DEFAULT_MAX_ENTRIES,
            Arc::new(SystemClock),
        )
    }

    pub fn with_cache_settings(
        client: Arc<dyn CatalogClient>,
        aggregator: Arc<CatalogAggregator>,
        concurrent_requests: usize,
        ttl: Duration,
        max_entries: usize,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            client,
            aggregator,
            cache: TtlCache::new(ttl, max_entries, clock),
            concurrent_requests: concurrent_requests.max(1),
        }
    }

    pub async fn get_pricing(&self, service_id: &str, region: Option<&str>) -> Result<PricingLookup> {
        if self.aggregator.find_service(service_id).await?.is_none() {
            tracing::info!("🔍 Service {} is not in the catalog", service_id);
            return Ok(PricingLookup::ServiceNotFound);
        }

        tracing::info!("💰 Building pricing tree for {}", service_id);
        let entry = self.client.get_entry(service_id).await?;
        let id = required_str(&entry, "/id", Some(service_id))?;
        let id_ref = Some(id.as_str());

        let geo_tags = resolve_geo_tags(&entry);
        if let Some(region) = region {
            if !geo_tags.is_empty() && !geo_tags.iter().any(|tag| tag == region) {
                tracing::info!("🌍 Service {} does not operate in region {}", service_id, region);
                return Ok(PricingLookup::RegionMismatch {
                    region: region.to_string(),
                });
            }
        }

        let mut plans = Vec::new();
        for plan in children(&entry) {
            plans.push(self.build_plan(plan, region).await?);
        }

        Ok(PricingLookup::Found(ServicePricing {
            service_name: required_str(&entry, "/name", id_ref)?,
            catalog_crn: required_str(&entry, "/catalog_crn", id_ref)?,
            url: required_str(&entry, "/url", id_ref)?,
            pricing_tags: match entry.get("pricing_tags") {
                Some(Value::Null) | None => Vec::new(),
                Some(_) => required_as(&entry, "/pricing_tags", id_ref)?,
            },
            geo_tags,
            created: required_as(&entry, "/created", id_ref)?,
            updated: required_as(&entry, "/updated", id_ref)?,
            disabled: required_bool(&entry, "/disabled", id_ref)?,
            plans,
            service_id: id,
        }))
    }

    pub async fn invalidate(&self) {
        self.cache.invalidate_all().await;
    }

    async fn build_plan(&self, plan: &Value, region: Option<&str>) -> Result<PlanPricing> {
        let plan_id = required_str(plan, "/id", entry_id(plan))?;
        tracing::debug!("📋 Getting plan pricing for {}", plan_id);

        let targets: Vec<(Value, String)> = children(plan)
            .iter()
            .map(|deployment| (deployment.clone(), deployment_location(deployment)))
            .filter(|(_, location)| region.map_or(true, |region| region == location))
            .collect();

        // buffered 保持上游順序
        let deployments: Vec<DeploymentPricing> = stream::iter(targets)
            .map(|(deployment, location)| async move {
                self.deployment_pricing(&deployment, location).await
            })
            .buffered(self.concurrent_requests)
            .try_collect()
            .await?;

        let id_ref = Some(plan_id.as_str());
        Ok(PlanPricing {
            catalog_crn: required_str(plan, "/catalog_crn", id_ref)?,
            active: required_bool(plan, "/active", id_ref)?,
            disabled: required_bool(plan, "/disabled", id_ref)?,
            deployments,
            id: plan_id,
        })
    }

    async fn deployment_pricing(&self, deployment: &Value, location: String) -> Result<DeploymentPricing> {
        let deployment_id = required_str(deployment, "/id", None)?;
        tracing::debug!("-- Getting deployment pricing for {}", deployment_id);

        let lookup = self
            .cache
            .get_or_try_insert_with(deployment_id.clone(), || async {
                let document = self.client.get_deployment_pricing(&deployment_id).await?;
                Ok::<_, CatalogError>(DeploymentPricing::priced(&deployment_id, &location, document))
            })
            .await;

        match lookup {
            Ok(pricing) => Ok(pricing),
            Err(err) if err.is_pricing_unavailable() => {
                tracing::warn!(
                    "⚠️ No pricing for deployment {} ({}), most likely a free or lite plan; adding it without pricing details",
                    deployment_id,
                    err
                );
                let name = required_str(deployment, "/name", Some(&deployment_id))?;
                Ok(DeploymentPricing::not_paid(&deployment_id, &location, &name))
            }
            Err(err) => Err(err),
        }
    }
}
