use crate::api::error::{ApiError, ApiResult};
use crate::api::AppState;
use crate::domain::model::{PricingLookup, Service, ServicePricing};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct PricingParams {
    pub region: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// GET /
pub async fn public_services(State(state): State<AppState>) -> ApiResult<Json<Vec<Service>>> {
    let services = state.service.aggregator().list_public_services().await?;
    Ok(Json(services))
}

/// GET /ibm
pub async fn ibm_public_services(State(state): State<AppState>) -> ApiResult<Json<Vec<Service>>> {
    let services = state.service.aggregator().list_ibm_public_services().await?;
    Ok(Json(services))
}

/// GET /all
pub async fn all_services(State(state): State<AppState>) -> ApiResult<Json<Vec<Service>>> {
    let services = state.service.aggregator().list_all_services().await?;
    Ok(Json(services.as_ref().clone()))
}

/// GET /pricing/:service_id
pub async fn service_pricing(
    State(state): State<AppState>,
    Path(service_id): Path<String>,
    Query(params): Query<PricingParams>,
) -> ApiResult<Json<ServicePricing>> {
    // `?region=` 視同未指定
    let region = params.region.as_deref().filter(|r| !r.is_empty());

    match state.service.get_pricing(&service_id, region).await? {
        PricingLookup::Found(pricing) => Ok(Json(pricing)),
        PricingLookup::ServiceNotFound => Err(ApiError::service_not_found(&service_id)),
        PricingLookup::RegionMismatch { region } => Err(ApiError::region_mismatch(&region)),
    }
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// POST /cache/refresh
pub async fn refresh_cache(State(state): State<AppState>) -> StatusCode {
    state.service.refresh().await;
    StatusCode::NO_CONTENT
}
