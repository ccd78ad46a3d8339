mod common;

use anyhow::Result;
use catalog_proxy::core::aggregator::CatalogAggregator;
use catalog_proxy::domain::model::Visibility;
use catalog_proxy::{CatalogError, CatalogService, TomlConfig};
use common::{numbered_services, service_summary, FakeCatalog};
use serde_json::json;
use std::sync::Arc;

/// 450 筆、每頁 200：三次呼叫，offset 0 / 200 / 400
#[tokio::test]
async fn test_aggregates_all_pages_in_upstream_order() -> Result<()> {
    let catalog = Arc::new(FakeCatalog::new(numbered_services(450)));
    let aggregator = CatalogAggregator::new(catalog.clone());

    let services = aggregator.list_all_services().await?;

    assert_eq!(catalog.list_offsets(), vec![0, 200, 400]);
    assert_eq!(services.len(), 450);
    let expected: Vec<String> = (0..450).map(|i| format!("svc-{:03}", i)).collect();
    let actual: Vec<String> = services.iter().map(|s| s.id.clone()).collect();
    assert_eq!(actual, expected);
    Ok(())
}

#[tokio::test]
async fn test_exact_page_multiple_stops_without_extra_call() -> Result<()> {
    let catalog = Arc::new(FakeCatalog::new(numbered_services(400)));
    let aggregator = CatalogAggregator::new(catalog.clone());

    assert_eq!(aggregator.list_all_services().await?.len(), 400);
    assert_eq!(catalog.list_offsets(), vec![0, 200]);
    Ok(())
}

#[tokio::test]
async fn test_empty_catalog() -> Result<()> {
    let catalog = Arc::new(FakeCatalog::new(vec![]));
    let aggregator = CatalogAggregator::new(catalog.clone());

    assert!(aggregator.list_all_services().await?.is_empty());
    assert_eq!(catalog.list_calls(), 1);
    Ok(())
}

/// 5 筆服務：2 筆 IBM（大小寫不同），3 筆其他供應商
#[tokio::test]
async fn test_ibm_filter_is_case_insensitive() -> Result<()> {
    let catalog = Arc::new(FakeCatalog::new(vec![
        service_summary("cos", "IBM", "public"),
        service_summary("mongo", "MongoDB Inc", "public"),
        service_summary("kms", "ibm", "public"),
        service_summary("sendgrid", "SendGrid", "public"),
        service_summary("ibmish", "IBM Partner", "public"),
    ]));
    let aggregator = CatalogAggregator::new(catalog.clone());

    let ibm: Vec<String> = aggregator
        .list_ibm_services()
        .await?
        .into_iter()
        .map(|s| s.id)
        .collect();

    assert_eq!(ibm, vec!["cos", "kms"]);
    Ok(())
}

#[tokio::test]
async fn test_public_views_exclude_restricted_services() -> Result<()> {
    let catalog = Arc::new(FakeCatalog::new(vec![
        service_summary("cos", "IBM", "public"),
        service_summary("internal-tool", "IBM", "ibm_only"),
        service_summary("private-beta", "IBM", "private"),
        service_summary("partner", "Partner Inc", "public"),
    ]));
    let aggregator = CatalogAggregator::new(catalog.clone());

    let public = aggregator.list_public_services().await?;
    assert_eq!(public.len(), 2);
    assert!(public.iter().all(|s| s.visibility == Visibility::Public));

    let ibm_public = aggregator.list_ibm_public_services().await?;
    assert_eq!(ibm_public.len(), 1);
    assert_eq!(ibm_public[0].id, "cos");
    Ok(())
}

/// 快取有效期間內第二次呼叫不產生上游流量
#[tokio::test]
async fn test_second_aggregation_is_served_from_cache() -> Result<()> {
    let catalog = Arc::new(FakeCatalog::new(numbered_services(250)));
    let service = CatalogService::new(catalog.clone(), &TomlConfig::default());

    let first = service.aggregator().list_all_services().await?;
    let calls_after_first = catalog.list_calls();
    let second = service.aggregator().list_all_services().await?;

    assert_eq!(calls_after_first, 2);
    assert_eq!(catalog.list_calls(), calls_after_first);
    assert_eq!(first, second);
    Ok(())
}

#[tokio::test]
async fn test_refresh_forces_reaggregation() -> Result<()> {
    let catalog = Arc::new(FakeCatalog::new(numbered_services(3)));
    let service = CatalogService::new(catalog.clone(), &TomlConfig::default());

    service.aggregator().list_all_services().await?;
    service.refresh().await;
    service.aggregator().list_all_services().await?;

    assert_eq!(catalog.list_offsets(), vec![0, 0]);
    Ok(())
}

#[tokio::test]
async fn test_display_name_falls_back_to_overview_then_name() -> Result<()> {
    let mut with_overview = service_summary("with-overview", "IBM", "public");
    with_overview["metadata"] = json!({"other": {}});

    let mut bare = service_summary("bare", "IBM", "public");
    bare["overview_ui"] = json!({"en": {"description": "no display name"}});

    let mut swagger = service_summary("swagger", "IBM", "public");
    swagger["metadata"] = json!({
        "other": {"swagger_urls": [{"i18n": {"en": {"name": "Swagger Name"}}}]}
    });

    let catalog = Arc::new(FakeCatalog::new(vec![with_overview, bare, swagger]));
    let aggregator = CatalogAggregator::new(catalog);

    let names: Vec<String> = aggregator
        .list_all_services()
        .await?
        .iter()
        .map(|s| s.ui_name.clone())
        .collect();

    assert_eq!(names, vec!["with-overview display", "bare", "Swagger Name"]);
    Ok(())
}

#[tokio::test]
async fn test_malformed_entry_fails_the_whole_aggregation() -> Result<()> {
    let mut broken = service_summary("broken", "IBM", "public");
    broken
        .as_object_mut()
        .expect("summary is an object")
        .remove("catalog_crn");

    let catalog = Arc::new(FakeCatalog::new(vec![
        service_summary("ok", "IBM", "public"),
        broken,
    ]));
    let aggregator = CatalogAggregator::new(catalog);

    match aggregator.list_all_services().await {
        Err(CatalogError::MalformedEntry { field, entry_id }) => {
            assert_eq!(field, "catalog_crn");
            assert_eq!(entry_id.as_deref(), Some("broken"));
        }
        other => panic!("expected malformed entry, got {:?}", other),
    }
    Ok(())
}
