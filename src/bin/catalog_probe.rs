use catalog_proxy::core::CatalogService;
use catalog_proxy::utils::{error::CatalogError, logger, validation::Validate};
use catalog_proxy::{GlobalCatalogClient, PricingLookup, Service, TomlConfig};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "catalog-probe")]
#[command(about = "Query the Global Catalog once and print the result as JSON")]
struct Args {
    /// Path to TOML configuration file; environment variables are used when omitted
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List aggregated services
    Services {
        /// Only IBM-provided services
        #[arg(long)]
        ibm: bool,

        /// Only public services
        #[arg(long)]
        public: bool,
    },
    /// Build the pricing tree of one service
    Pricing {
        service_id: String,

        #[arg(long)]
        region: Option<String>,
    },
}

fn report(e: &CatalogError) -> ExitCode {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());
    ExitCode::from(1)
}

fn print_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => report(&CatalogError::from(e)),
    }
}

async fn list_services(service: &CatalogService, ibm: bool, public: bool) -> Result<Vec<Service>, CatalogError> {
    let aggregator = service.aggregator();
    match (ibm, public) {
        (true, true) => aggregator.list_ibm_public_services().await,
        (true, false) => aggregator.list_ibm_services().await,
        (false, true) => aggregator.list_public_services().await,
        (false, false) => Ok(aggregator.list_all_services().await?.as_ref().clone()),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    logger::init_stderr_logger(args.verbose);

    let config = match &args.config {
        Some(path) => TomlConfig::from_file(path),
        None => TomlConfig::from_env(),
    };
    let config = match config.and_then(|config| config.validate().map(|_| config)) {
        Ok(config) => config,
        Err(e) => return report(&e),
    };

    let client = match GlobalCatalogClient::from_config(&config) {
        Ok(client) => Arc::new(client),
        Err(e) => return report(&e),
    };
    let service = CatalogService::new(client, &config);

    match args.command {
        Command::Services { ibm, public } => match list_services(&service, ibm, public).await {
            Ok(services) => {
                tracing::info!("📦 {} services", services.len());
                print_json(&services)
            }
            Err(e) => report(&e),
        },
        Command::Pricing { service_id, region } => {
            match service.get_pricing(&service_id, region.as_deref()).await {
                Ok(PricingLookup::Found(pricing)) => print_json(&pricing),
                Ok(PricingLookup::ServiceNotFound) => {
                    eprintln!("❌ Service {} not found", service_id);
                    ExitCode::from(2)
                }
                Ok(PricingLookup::RegionMismatch { region }) => {
                    eprintln!("❌ Service is not available in region {}", region);
                    ExitCode::from(2)
                }
                Err(e) => report(&e),
            }
        }
    }
}
