use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Catalog returned status {status} for {url}: {body}")]
    UpstreamStatus {
        status: u16,
        url: String,
        body: String,
    },

    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    #[error("Unexpected catalog response: {message}")]
    UpstreamContract { message: String },

    #[error("Malformed catalog entry{}: missing or invalid field '{field}'", entry_suffix(.entry_id))]
    MalformedEntry {
        field: String,
        entry_id: Option<String>,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration '{field}'")]
    MissingConfigError { field: String },
}

fn entry_suffix(entry_id: &Option<String>) -> String {
    entry_id
        .as_deref()
        .map(|id| format!(" {}", id))
        .unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Upstream,
    Data,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CatalogError {
    pub fn malformed(field: impl Into<String>, entry_id: Option<&str>) -> Self {
        CatalogError::MalformedEntry {
            field: field.into(),
            entry_id: entry_id.map(str::to_string),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            CatalogError::Http(_)
            | CatalogError::UpstreamStatus { .. }
            | CatalogError::Authentication { .. }
            | CatalogError::UpstreamContract { .. } => ErrorCategory::Upstream,
            CatalogError::MalformedEntry { .. } | CatalogError::SerializationError(_) => {
                ErrorCategory::Data
            }
            CatalogError::ConfigError { .. }
            | CatalogError::ConfigValidationError { .. }
            | CatalogError::InvalidConfigValueError { .. }
            | CatalogError::MissingConfigError { .. } => ErrorCategory::Configuration,
            CatalogError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 上游暫時失敗，稍後重試即可
            CatalogError::Http(_) | CatalogError::UpstreamStatus { .. } => ErrorSeverity::Medium,
            CatalogError::UpstreamContract { .. }
            | CatalogError::MalformedEntry { .. }
            | CatalogError::SerializationError(_) => ErrorSeverity::High,
            CatalogError::Authentication { .. }
            | CatalogError::ConfigError { .. }
            | CatalogError::ConfigValidationError { .. }
            | CatalogError::InvalidConfigValueError { .. }
            | CatalogError::MissingConfigError { .. } => ErrorSeverity::High,
            CatalogError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    /// 定價查詢被上游以 4xx 拒絕，代表該部署沒有計費資料；
    /// 授權失敗、限流與 5xx 不算
    pub fn is_pricing_unavailable(&self) -> bool {
        match self {
            CatalogError::UpstreamStatus { status, .. } => {
                (400..500).contains(status) && !matches!(*status, 401 | 403 | 429)
            }
            _ => false,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            CatalogError::Http(_) => "Check network connectivity to the catalog endpoint",
            CatalogError::UpstreamStatus { .. } => {
                "The catalog rejected the request; retry later or verify the endpoint"
            }
            CatalogError::Authentication { .. } => {
                "Verify GLOBAL_CATALOG_APIKEY and the IAM token endpoint"
            }
            CatalogError::UpstreamContract { .. } | CatalogError::MalformedEntry { .. } => {
                "The catalog response did not match the expected shape; report it upstream"
            }
            CatalogError::SerializationError(_) => "Inspect the raw catalog payload",
            CatalogError::IoError(_) => "Check file paths and permissions",
            CatalogError::ConfigError { .. }
            | CatalogError::ConfigValidationError { .. }
            | CatalogError::InvalidConfigValueError { .. }
            | CatalogError::MissingConfigError { .. } => {
                "Fix the configuration file or environment variables"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Upstream => format!("Could not reach the service catalog: {}", self),
            ErrorCategory::Data => format!("The service catalog returned unexpected data: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}
