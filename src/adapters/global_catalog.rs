use crate::adapters::iam::IamTokenProvider;
use crate::config::TomlConfig;
use crate::domain::model::{CatalogPage, ListEntriesRequest, PricingDocument};
use crate::domain::ports::CatalogClient;
use crate::utils::error::{CatalogError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

/// [`CatalogClient`] backed by the Global Catalog v1 REST API.
pub struct GlobalCatalogClient {
    client: Client,
    endpoint: Url,
    auth: Option<IamTokenProvider>,
}

impl GlobalCatalogClient {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let endpoint = Url::parse(endpoint).map_err(|e| CatalogError::InvalidConfigValueError {
            field: "catalog.endpoint".to_string(),
            value: endpoint.to_string(),
            reason: e.to_string(),
        })?;
        if endpoint.cannot_be_a_base() {
            return Err(CatalogError::InvalidConfigValueError {
                field: "catalog.endpoint".to_string(),
                value: endpoint.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }

        let user_agent = format!("catalog-proxy/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            endpoint,
            auth: None,
        })
    }

    pub fn with_api_key(mut self, iam_endpoint: &str, api_key: &str) -> Self {
        self.auth = Some(IamTokenProvider::new(
            self.client.clone(),
            iam_endpoint,
            api_key,
        ));
        self
    }

    pub fn from_config(config: &TomlConfig) -> Result<Self> {
        let client = Self::new(&config.catalog.endpoint, config.request_timeout())?;

        match config.catalog.api_key() {
            Some(api_key) => Ok(client.with_api_key(&config.catalog.iam_endpoint, api_key)),
            None => {
                tracing::warn!("⚠️ No catalog API key configured, sending unauthenticated requests");
                Ok(client)
            }
        }
    }

    fn entry_url(&self, segments: &[&str]) -> Url {
        let mut url = self.endpoint.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, query: &[(&str, String)]) -> Result<T> {
        let mut request = self.client.get(url.clone()).query(query);

        if let Some(auth) = &self.auth {
            request = request.bearer_auth(auth.bearer_token().await?);
        }

        tracing::debug!("📡 GET {} {:?}", url, query);
        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("📡 Catalog response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::UpstreamStatus {
                status: status.as_u16(),
                url: url.to_string(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl CatalogClient for GlobalCatalogClient {
    async fn list_entries(&self, request: &ListEntriesRequest) -> Result<CatalogPage> {
        let query = [
            ("offset", request.offset.to_string()),
            ("limit", request.limit.to_string()),
            ("languages", request.languages.clone()),
            ("q", request.query.clone()),
            ("complete", request.complete.to_string()),
            ("catalog", request.catalog.to_string()),
        ];
        self.get_json(self.endpoint.clone(), &query).await
    }

    async fn get_entry(&self, id: &str) -> Result<serde_json::Value> {
        let query = [("include", "*".to_string()), ("depth", "*".to_string())];
        self.get_json(self.entry_url(&[id]), &query).await
    }

    async fn get_deployment_pricing(&self, deployment_id: &str) -> Result<PricingDocument> {
        self.get_json(self.entry_url(&[deployment_id, "pricing"]), &[])
            .await
    }
}
