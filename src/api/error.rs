use crate::utils::error::{CatalogError, ErrorCategory};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    Catalog(CatalogError),
}

impl ApiError {
    pub fn service_not_found(service_id: &str) -> Self {
        ApiError::NotFound(format!("Service {} not found", service_id))
    }

    pub fn region_mismatch(region: &str) -> Self {
        ApiError::NotFound(format!("Service is not available in region {}", region))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Catalog(err) => match err.category() {
                ErrorCategory::Upstream => StatusCode::BAD_GATEWAY,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::NotFound(message) => message.clone(),
            ApiError::Catalog(err) => err.to_string(),
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        ApiError::Catalog(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if let ApiError::Catalog(err) = &self {
            tracing::error!(
                "❌ Request failed: {} (Category: {:?}, Severity: {:?})",
                err,
                err.category(),
                err.severity()
            );
        }

        (status, Json(json!({ "error": self.message() }))).into_response()
    }
}
