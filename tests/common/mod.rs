#![allow(dead_code)]

use async_trait::async_trait;
use catalog_proxy::domain::model::{CatalogPage, ListEntriesRequest, PricingDocument};
use catalog_proxy::domain::ports::CatalogClient;
use catalog_proxy::utils::error::{CatalogError, Result};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// 記憶體內的假目錄，記錄每種上游呼叫的次數
#[derive(Default)]
pub struct FakeCatalog {
    summaries: Vec<Value>,
    entries: HashMap<String, Value>,
    priced: HashMap<String, PricingDocument>,
    pricing_delays: HashMap<String, Duration>,
    undecodable_pricing: HashSet<String>,
    pricing_completed: Mutex<Vec<String>>,
    list_offsets: Mutex<Vec<usize>>,
    entry_calls: AtomicUsize,
    pricing_calls: AtomicUsize,
}

impl FakeCatalog {
    pub fn new(summaries: Vec<Value>) -> Self {
        Self {
            summaries,
            ..Default::default()
        }
    }

    pub fn with_entry(mut self, entry: Value) -> Self {
        let id = entry["id"].as_str().unwrap_or_default().to_string();
        self.entries.insert(id, entry);
        self
    }

    pub fn with_pricing(mut self, document: PricingDocument) -> Self {
        let id = document.deployment_id.clone().unwrap_or_default();
        self.priced.insert(id, document);
        self
    }

    /// 讓指定部署的定價回應延遲
    pub fn with_pricing_delay(mut self, deployment_id: &str, delay: Duration) -> Self {
        self.pricing_delays.insert(deployment_id.to_string(), delay);
        self
    }

    /// 指定部署的定價回應無法解析（非狀態碼錯誤）
    pub fn with_undecodable_pricing(mut self, deployment_id: &str) -> Self {
        self.undecodable_pricing.insert(deployment_id.to_string());
        self
    }

    /// 定價查詢完成的先後順序
    pub fn pricing_completion_order(&self) -> Vec<String> {
        self.pricing_completed.lock().unwrap().clone()
    }

    pub fn list_offsets(&self) -> Vec<usize> {
        self.list_offsets.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> usize {
        self.list_offsets.lock().unwrap().len()
    }

    pub fn entry_calls(&self) -> usize {
        self.entry_calls.load(Ordering::SeqCst)
    }

    pub fn pricing_calls(&self) -> usize {
        self.pricing_calls.load(Ordering::SeqCst)
    }
}

fn not_found(url: String) -> CatalogError {
    CatalogError::UpstreamStatus {
        status: 404,
        url,
        body: "not found".to_string(),
    }
}

#[async_trait]
impl CatalogClient for FakeCatalog {
    async fn list_entries(&self, request: &ListEntriesRequest) -> Result<CatalogPage> {
        self.list_offsets.lock().unwrap().push(request.offset);

        let start = request.offset.min(self.summaries.len());
        let end = (request.offset + request.limit).min(self.summaries.len());
        let resources = self.summaries[start..end].to_vec();

        Ok(CatalogPage {
            resource_count: resources.len(),
            resources,
            count: self.summaries.len(),
            offset: request.offset,
        })
    }

    async fn get_entry(&self, id: &str) -> Result<Value> {
        self.entry_calls.fetch_add(1, Ordering::SeqCst);
        self.entries
            .get(id)
            .cloned()
            .ok_or_else(|| not_found(format!("/{}", id)))
    }

    async fn get_deployment_pricing(&self, deployment_id: &str) -> Result<PricingDocument> {
        self.pricing_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.pricing_delays.get(deployment_id) {
            tokio::time::sleep(*delay).await;
        }
        self.pricing_completed
            .lock()
            .unwrap()
            .push(deployment_id.to_string());

        if self.undecodable_pricing.contains(deployment_id) {
            let err = serde_json::from_str::<PricingDocument>("<html>maintenance</html>")
                .expect_err("html is not a pricing document");
            return Err(CatalogError::from(err));
        }

        self.priced
            .get(deployment_id)
            .cloned()
            .ok_or_else(|| not_found(format!("/{}/pricing", deployment_id)))
    }
}

/// 清單 API 回傳的服務摘要
pub fn service_summary(id: &str, provider: &str, visibility: &str) -> Value {
    json!({
        "id": id,
        "name": id,
        "kind": "service",
        "active": true,
        "disabled": false,
        "catalog_crn": format!("crn:v1:bluemix:public:globalcatalog::::service:{}", id),
        "tags": ["ibm_created"],
        "geo_tags": ["us-south"],
        "images": {"image": format!("https://cdn.example.com/{}.svg", id)},
        "visibility": {"restrictions": visibility},
        "provider": {"name": provider},
        "overview_ui": {"en": {"display_name": format!("{} display", id), "description": "A service"}},
        "created": "2019-03-01T10:00:00.000Z",
        "updated": "2024-05-20T08:30:00.000Z"
    })
}

pub fn numbered_services(count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| service_summary(&format!("svc-{:03}", i), "IBM", "public"))
        .collect()
}

/// 完整的服務條目：兩個方案，各兩個部署
pub fn cloudant_entry() -> Value {
    json!({
        "id": "cloudant",
        "name": "cloudantnosqldb",
        "kind": "service",
        "url": "https://globalcatalog.cloud.ibm.com/api/v1/cloudant",
        "catalog_crn": "crn:v1:bluemix:public:globalcatalog::::service:cloudant",
        "created": "2019-03-01T10:00:00.000Z",
        "updated": "2024-05-20T08:30:00.000Z",
        "disabled": false,
        "pricing_tags": ["free", "paid"],
        "geo_tags": ["us-south", "eu-de"],
        "children": [
            {
                "id": "cloudant-lite",
                "kind": "plan",
                "catalog_crn": "crn:v1:bluemix:public:globalcatalog::::plan:cloudant-lite",
                "active": true,
                "disabled": false,
                "children": [
                    {"id": "cloudant-lite-us-south", "kind": "deployment", "name": "lite-us-south", "geo_tags": ["us-south"]},
                    {"id": "cloudant-lite-eu-de", "kind": "deployment", "name": "lite-eu-de", "geo_tags": ["eu-de"]}
                ]
            },
            {
                "id": "cloudant-standard",
                "kind": "plan",
                "catalog_crn": "crn:v1:bluemix:public:globalcatalog::::plan:cloudant-standard",
                "active": true,
                "disabled": false,
                "children": [
                    {"id": "cloudant-standard-us-south", "kind": "deployment", "name": "standard-us-south", "geo_tags": ["us-south"]},
                    {"id": "cloudant-standard-eu-de", "kind": "deployment", "name": "standard-eu-de", "geo_tags": ["eu-de"]}
                ]
            }
        ]
    })
}

pub fn paid_pricing(deployment_id: &str, location: &str) -> PricingDocument {
    serde_json::from_value(json!({
        "deployment_id": deployment_id,
        "type": "Paid",
        "deployment_location": location,
        "effective_from": "2024-01-01T00:00:00Z",
        "effective_until": null,
        "metrics": [{
            "metric_id": "part-is-capacity",
            "tier_model": "Linear",
            "charge_unit": "CAPACITY",
            "charge_unit_quantity": 1,
            "usage_cap_qty": 0,
            "amounts": [{
                "country": "USA",
                "currency": "USD",
                "prices": [{"quantity_tier": 1, "price": 1.25}]
            }]
        }]
    }))
    .unwrap()
}

/// 已註冊 cloudant 完整條目與標準方案定價的假目錄
pub fn cloudant_catalog() -> FakeCatalog {
    FakeCatalog::new(vec![
        service_summary("cloudant", "IBM", "public"),
        service_summary("partner-db", "Partner Inc", "public"),
    ])
    .with_entry(cloudant_entry())
    .with_pricing(paid_pricing("cloudant-standard-us-south", "us-south"))
    .with_pricing(paid_pricing("cloudant-standard-eu-de", "eu-de"))
}
