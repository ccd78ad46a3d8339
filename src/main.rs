use catalog_proxy::core::ConfigProvider;
use catalog_proxy::utils::{error::CatalogError, logger, validation::Validate};
use catalog_proxy::{api, CatalogService, CliConfig, GlobalCatalogClient};
use clap::Parser;
use std::sync::Arc;

fn exit_with(e: &CatalogError) -> ! {
    tracing::error!(
        "❌ Startup failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 先載入設定，才知道日誌格式
    let config = match cli.load() {
        Ok(config) => config,
        Err(e) => {
            logger::init_cli_logger(cli.verbose);
            exit_with(&e)
        }
    };

    logger::init_logger(cli.verbose, config.logging.json);

    tracing::info!("Starting catalog-proxy v{}", env!("CARGO_PKG_VERSION"));
    tracing::debug!(
        "Config: page_size={}, cache_ttl={}s, cache_max_entries={}, concurrent_requests={}",
        config.catalog.page_size,
        config.cache.ttl_seconds,
        config.cache.max_entries,
        config.pricing.concurrent_requests
    );

    // 驗證配置
    if let Err(e) = config.validate() {
        exit_with(&e);
    }

    let client = match GlobalCatalogClient::from_config(&config) {
        Ok(client) => Arc::new(client),
        Err(e) => exit_with(&e),
    };
    tracing::info!("📚 Using catalog at {}", config.catalog_endpoint());

    let service = CatalogService::new(client, &config);
    api::setup_and_serve(&config, service).await
}
