//! Storage Onboarding
//!
//! Lists AWS file systems that can be onboarded as cluster shared storage,
//! either once from the command line or through a REST API.

use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use storage_onboarding::{
    ApiServer, EfsInventoryRef, FsxInventoryRef, InventoryFactory, InventorySnapshot,
    OnboardingConfig, OnboardingService, Result, SettingsSourceConfig,
};

// =============================================================================
// CLI Arguments
// =============================================================================

/// Storage Onboarding - EFS and FSx eligibility for cluster shared storage
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (YAML or JSON)
    #[arg(long, global = true, env = "ONBOARDING_CONFIG")]
    config: Option<PathBuf>,

    /// Settings document, overriding the configured settings source
    #[arg(long, global = true, env = "SETTINGS_FILE")]
    settings_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, global = true, env = "LOG_JSON")]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the REST API
    Serve {
        /// REST API bind address
        #[arg(long, env = "API_ADDR")]
        api_addr: Option<SocketAddr>,
    },
    /// Resolve candidates once and print the report as JSON
    List {
        /// File system onboarded earlier in this session (repeatable)
        #[arg(long = "just-onboarded", value_name = "ID")]
        just_onboarded: Vec<String>,

        /// Read inventory from a snapshot file instead of the AWS proxy
        #[arg(long, value_name = "FILE")]
        inventory_file: Option<PathBuf>,
    },
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    init_logging(&args);

    let mut config = OnboardingConfig::load_or_default(args.config.as_deref()).await?;
    if let Some(path) = args.settings_file {
        config.settings = SettingsSourceConfig::File { path };
    }

    match args.command {
        Command::Serve { api_addr } => {
            if let Some(addr) = api_addr {
                config.api.rest_addr = addr;
            }
            serve(config).await
        }
        Command::List {
            just_onboarded,
            inventory_file,
        } => list(config, &just_onboarded, inventory_file).await,
    }
}

async fn serve(config: OnboardingConfig) -> Result<()> {
    info!("Starting Storage Onboarding");
    info!("  Version: {}", storage_onboarding::VERSION);
    info!("  REST API: {}", config.api.rest_addr);
    info!("  AWS proxy: {}", config.proxy.endpoint);

    let (efs, fsx) = InventoryFactory::proxy(config.proxy.clone())?;
    let service = OnboardingService::new(config.build_settings_registry()?, efs, fsx)?;
    let server = Arc::new(ApiServer::new(config.api, service));

    let signal_server = server.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown signal received");
                signal_server.shutdown();
            }
            Err(e) => error!("Failed to listen for shutdown signal: {}", e),
        }
    });

    server.run().await?;

    info!("Shutdown complete");
    Ok(())
}

async fn list(
    config: OnboardingConfig,
    just_onboarded: &[String],
    inventory_file: Option<PathBuf>,
) -> Result<()> {
    let (efs, fsx): (EfsInventoryRef, FsxInventoryRef) = match inventory_file {
        Some(path) => {
            info!("Using inventory snapshot {}", path.display());
            InventoryFactory::snapshot(InventorySnapshot::load(&path).await?)
        }
        None => InventoryFactory::proxy(config.proxy.clone())?,
    };

    let service = OnboardingService::new(config.build_settings_registry()?, efs, fsx)?;
    let report = service.list_file_systems_for_onboard(just_onboarded).await?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

// =============================================================================
// Logging Setup
// =============================================================================

fn init_logging(args: &Args) {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let mut filter = EnvFilter::from_default_env().add_directive(level.into());
    for directive in ["hyper=warn", "reqwest=info", "tower=warn", "axum=info"] {
        if let Ok(directive) = directive.parse() {
            filter = filter.add_directive(directive);
        }
    }

    // Logs go to stderr so `list` output stays machine-readable
    if args.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}
