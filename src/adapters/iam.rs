use crate::utils::error::{CatalogError, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

const API_KEY_GRANT_TYPE: &str = "urn:ibm:params:oauth:grant-type:apikey";
/// 到期前提早換發
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    refresh_at: Instant,
}

/// Exchanges an API key for IAM bearer tokens and reuses them until shortly
/// before they expire. Only one exchange runs at a time.
pub struct IamTokenProvider {
    client: Client,
    endpoint: String,
    api_key: String,
    token: Mutex<Option<CachedToken>>,
}

impl IamTokenProvider {
    pub fn new(client: Client, endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            token: Mutex::new(None),
        }
    }

    pub async fn bearer_token(&self) -> Result<String> {
        let mut token = self.token.lock().await;

        if let Some(cached) = token.as_ref() {
            if Instant::now() < cached.refresh_at {
                return Ok(cached.access_token.clone());
            }
        }

        let fresh = self.request_token().await?;
        let access_token = fresh.access_token.clone();
        *token = Some(fresh);
        Ok(access_token)
    }

    async fn request_token(&self) -> Result<CachedToken> {
        tracing::debug!("🔑 Requesting IAM token from {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&[
                ("grant_type", API_KEY_GRANT_TYPE),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Authentication {
                message: format!("IAM token endpoint returned {}: {}", status, body),
            });
        }

        let token: TokenResponse = response.json().await?;
        let lifetime = Duration::from_secs(token.expires_in.unwrap_or(3600));

        Ok(CachedToken {
            access_token: token.access_token,
            refresh_at: Instant::now() + lifetime.saturating_sub(REFRESH_MARGIN),
        })
    }
}
