use anyhow::Result;
use clap::Parser;
use subscription_gateway::server::server::{self, AppState};
use subscription_gateway::utils::config_loader;
use subscription_gateway::utils::logging::{self, LogLevel};
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG", default_value = "subscription-gateway.yaml")]
    config: String,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // -------------------------------
    // 1. Load YAML config
    // -------------------------------

    let service_config = config_loader::run(&args.config).await?;
    logging::run(&service_config, args.log_level);

    // -------------------------------
    // 2. Build upstream clients (shared connection pool, single token cache)
    // -------------------------------

    let state = AppState::from_config(&service_config)?;

    // -------------------------------
    // 3. Serve until shutdown
    // -------------------------------

    info!("Service starting...");
    server::start(&service_config.server, state).await?;
    info!("Service stopped");

    Ok(())
}
