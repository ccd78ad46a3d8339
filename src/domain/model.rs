use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 服務可見性，對應目錄的 `visibility.restrictions`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Visibility {
    Public,
    IbmOnly,
    Private,
    Other(String),
}

impl From<String> for Visibility {
    fn from(value: String) -> Self {
        match value.as_str() {
            "public" => Visibility::Public,
            "ibm_only" => Visibility::IbmOnly,
            "private" => Visibility::Private,
            _ => Visibility::Other(value),
        }
    }
}

impl From<Visibility> for String {
    fn from(value: Visibility) -> Self {
        match value {
            Visibility::Public => "public".to_string(),
            Visibility::IbmOnly => "ibm_only".to_string(),
            Visibility::Private => "private".to_string(),
            Visibility::Other(other) => other,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Images {
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub small_image: Option<String>,
    #[serde(default)]
    pub medium_image: Option<String>,
    #[serde(default)]
    pub feature_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub ui_name: String,
    pub kind: String,
    pub provider: String,
    pub tags: Vec<String>,
    pub geo_tags: Vec<String>,
    pub visibility: Visibility,
    pub active: bool,
    pub disabled: bool,
    pub catalog_crn: String,
    pub images: Images,
    pub description: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl Service {
    pub fn is_ibm_provided(&self) -> bool {
        self.provider.eq_ignore_ascii_case("ibm")
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTier {
    #[serde(default)]
    pub quantity_tier: Option<f64>,
    #[serde(default)]
    pub price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingAmount {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub prices: Vec<PriceTier>,
}

/// 單一計量項目；未列出的上游欄位原樣保留
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingMetric {
    #[serde(default)]
    pub metric_id: Option<String>,
    #[serde(default)]
    pub tier_model: Option<String>,
    #[serde(default)]
    pub part_ref: Option<String>,
    #[serde(default)]
    pub charge_unit: Option<String>,
    #[serde(default)]
    pub charge_unit_quantity: Option<f64>,
    #[serde(default)]
    pub usage_cap_qty: Option<f64>,
    #[serde(default)]
    pub effective_from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub effective_until: Option<DateTime<Utc>>,
    #[serde(default)]
    pub amounts: Vec<PricingAmount>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// `GET /{deployment_id}/pricing` 的回應內容
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingDocument {
    #[serde(default)]
    pub deployment_id: Option<String>,
    #[serde(default, rename = "type")]
    pub pricing_type: Option<String>,
    #[serde(default)]
    pub deployment_location: Option<String>,
    #[serde(default)]
    pub effective_from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub effective_until: Option<DateTime<Utc>>,
    #[serde(default)]
    pub metrics: Vec<PricingMetric>,
}

pub const NOT_PAID_TYPE: &str = "not_paid";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentPricing {
    pub id: String,
    pub location: String,
    #[serde(rename = "type")]
    pub pricing_type: Option<String>,
    pub name: Option<String>,
    pub effective_from: Option<DateTime<Utc>>,
    pub effective_until: Option<DateTime<Utc>>,
    pub metrics: Vec<PricingMetric>,
}

impl DeploymentPricing {
    /// Builds the record for a deployment the catalog has priced.
    pub fn priced(deployment_id: &str, location: &str, document: PricingDocument) -> Self {
        Self {
            id: document
                .deployment_id
                .unwrap_or_else(|| deployment_id.to_string()),
            location: document
                .deployment_location
                .unwrap_or_else(|| location.to_string()),
            pricing_type: document.pricing_type.map(|t| t.to_lowercase()),
            name: None,
            effective_from: document.effective_from,
            effective_until: document.effective_until,
            metrics: document.metrics,
        }
    }

    /// Placeholder for deployments without billable pricing (free and lite plans).
    pub fn not_paid(deployment_id: &str, location: &str, name: &str) -> Self {
        Self {
            id: deployment_id.to_string(),
            location: location.to_string(),
            pricing_type: Some(NOT_PAID_TYPE.to_string()),
            name: Some(name.to_string()),
            effective_from: None,
            effective_until: None,
            metrics: Vec::new(),
        }
    }

    pub fn is_not_paid(&self) -> bool {
        self.pricing_type.as_deref() == Some(NOT_PAID_TYPE)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanPricing {
    pub id: String,
    pub catalog_crn: String,
    pub active: bool,
    pub disabled: bool,
    pub deployments: Vec<DeploymentPricing>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServicePricing {
    pub service_id: String,
    pub service_name: String,
    pub catalog_crn: String,
    pub url: String,
    pub pricing_tags: Vec<String>,
    pub geo_tags: Vec<String>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub disabled: bool,
    pub plans: Vec<PlanPricing>,
}

/// 定價查詢結果；找不到服務或區域不符都不是錯誤
#[derive(Debug, Clone, PartialEq)]
pub enum PricingLookup {
    Found(ServicePricing),
    ServiceNotFound,
    RegionMismatch { region: String },
}

/// 目錄列表 API 的單頁回應
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogPage {
    #[serde(default)]
    pub resources: Vec<serde_json::Value>,
    pub count: usize,
    #[serde(default)]
    pub offset: usize,
    #[serde(default)]
    pub resource_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntriesRequest {
    pub offset: usize,
    pub limit: usize,
    pub languages: String,
    pub query: String,
    pub complete: bool,
    pub catalog: bool,
}

impl ListEntriesRequest {
    pub const SERVICE_QUERY: &'static str = "kind:service active:true";

    pub fn active_services(offset: usize, limit: usize) -> Self {
        Self {
            offset,
            limit,
            languages: "en-us".to_string(),
            query: Self::SERVICE_QUERY.to_string(),
            complete: false,
            catalog: true,
        }
    }
}
