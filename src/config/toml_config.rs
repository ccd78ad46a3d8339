use crate::core::ConfigProvider;
use crate::utils::error::{CatalogError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_range, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CATALOG_ENDPOINT: &str = "https://globalcatalog.cloud.ibm.com/api/v1";
pub const DEFAULT_IAM_ENDPOINT: &str = "https://iam.cloud.ibm.com/identity/token";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub server: ServerConfig,
    pub catalog: CatalogConfig,
    pub cache: CacheConfig,
    pub pricing: PricingConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub endpoint: String,
    pub iam_endpoint: String,
    pub api_key: Option<String>,
    pub page_size: usize,
    pub timeout_seconds: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_CATALOG_ENDPOINT.to_string(),
            iam_endpoint: DEFAULT_IAM_ENDPOINT.to_string(),
            api_key: None,
            page_size: 200,
            timeout_seconds: 30,
        }
    }
}

impl CatalogConfig {
    /// 已設定的 API key；空字串或未替換的 `${VAR}` 視為未設定
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && !key.starts_with("${"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_seconds: u64,
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: 43_200,
            max_entries: 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    pub concurrent_requests: usize,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            concurrent_requests: 5,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub json: bool,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CatalogError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CatalogError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 沒有設定檔時，沿用 SDK 慣用的環境變數
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(endpoint) = std::env::var("GLOBAL_CATALOG_URL") {
            config.catalog.endpoint = endpoint;
        }
        if let Ok(api_key) = std::env::var("GLOBAL_CATALOG_APIKEY") {
            config.catalog.api_key = Some(api_key);
        }
        if let Ok(iam_endpoint) = std::env::var("GLOBAL_CATALOG_AUTH_URL") {
            config.catalog.iam_endpoint = iam_endpoint;
        }
        if let Ok(port) = std::env::var("PORT") {
            config.server.port = port.parse().map_err(|_| CatalogError::InvalidConfigValueError {
                field: "PORT".to_string(),
                value: port.clone(),
                reason: "must be a port number".to_string(),
            })?;
        }

        Ok(config)
    }

    /// 替換環境變數 (例如 ${GLOBAL_CATALOG_APIKEY})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CatalogError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("server.host", &self.server.host)?;
        validate_positive_number("server.port", u64::from(self.server.port), 1)?;

        validate_url("catalog.endpoint", &self.catalog.endpoint)?;
        validate_url("catalog.iam_endpoint", &self.catalog.iam_endpoint)?;
        validate_range("catalog.page_size", self.catalog.page_size, 1, 200)?;
        validate_positive_number("catalog.timeout_seconds", self.catalog.timeout_seconds, 1)?;

        validate_positive_number("cache.ttl_seconds", self.cache.ttl_seconds, 1)?;
        validate_positive_number("cache.max_entries", self.cache.max_entries as u64, 1)?;

        validate_positive_number(
            "pricing.concurrent_requests",
            self.pricing.concurrent_requests as u64,
            1,
        )?;

        Ok(())
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.catalog.timeout_seconds)
    }
}

impl ConfigProvider for TomlConfig {
    fn catalog_endpoint(&self) -> &str {
        &self.catalog.endpoint
    }

    fn page_size(&self) -> usize {
        self.catalog.page_size
    }

    fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_seconds)
    }

    fn cache_max_entries(&self) -> usize {
        self.cache.max_entries
    }

    fn concurrent_requests(&self) -> usize {
        self.pricing.concurrent_requests
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[server]
host = "127.0.0.1"
port = 9000

[catalog]
endpoint = "https://catalog.example.com/api/v1"
page_size = 100
timeout_seconds = 10

[cache]
ttl_seconds = 60
max_entries = 16

[pricing]
concurrent_requests = 2

[logging]
json = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.listen_address(), "127.0.0.1:9000");
        assert_eq!(config.catalog_endpoint(), "https://catalog.example.com/api/v1");
        assert_eq!(config.page_size(), 100);
        assert_eq!(config.cache_ttl(), Duration::from_secs(60));
        assert_eq!(config.cache_max_entries(), 16);
        assert_eq!(config.concurrent_requests(), 2);
        assert_eq!(config.catalog.iam_endpoint, DEFAULT_IAM_ENDPOINT);
        assert!(config.logging.json);
        assert_ok!(config.validate());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();

        assert_eq!(config.catalog.endpoint, DEFAULT_CATALOG_ENDPOINT);
        assert_eq!(config.page_size(), 200);
        assert_eq!(config.cache_ttl(), Duration::from_secs(12 * 60 * 60));
        assert_eq!(config.cache_max_entries(), 1024);
        assert_eq!(config.server.port, 8000);
        assert!(config.catalog.api_key().is_none());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("CATALOG_PROXY_TEST_APIKEY", "secret-key");

        let toml_content = r#"
[catalog]
api_key = "${CATALOG_PROXY_TEST_APIKEY}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.catalog.api_key(), Some("secret-key"));

        std::env::remove_var("CATALOG_PROXY_TEST_APIKEY");
    }

    #[test]
    fn test_unresolved_api_key_placeholder_is_ignored() {
        let toml_content = r#"
[catalog]
api_key = "${CATALOG_PROXY_DEFINITELY_UNSET}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.catalog.api_key().is_none());
    }

    #[test]
    fn test_config_validation() {
        let invalid = [
            "[catalog]\nendpoint = \"invalid-url\"",
            "[catalog]\npage_size = 500",
            "[cache]\nttl_seconds = 0",
            "[pricing]\nconcurrent_requests = 0",
        ];

        for content in invalid {
            let config = TomlConfig::from_toml_str(content).unwrap();
            assert_err!(config.validate(), "expected invalid: {}", content);
        }
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[server]\nport = 8081\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.server.port, 8081);
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let result = TomlConfig::from_toml_str("[server\nport = ");
        assert!(matches!(
            result,
            Err(CatalogError::ConfigValidationError { .. })
        ));
    }
}
