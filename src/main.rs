//! service-gateway - resilient API gateway
//!
//! Loads configuration, installs tracing and serves until shut down.

#![allow(missing_docs)]

use clap::Parser;
use service_gateway::core::services::ServiceEnvironment;
use service_gateway::server::builder::{load_config, run_server};
use service_gateway::utils::logging::{bootstrap_subscriber, init_tracing};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::instrument::WithSubscriber;

#[derive(Debug, Parser)]
#[command(name = "gateway", version, about = "Resilient API gateway")]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Missing .env is normal outside local development.
    let _ = dotenvy::dotenv();
    let env = ServiceEnvironment::from_process();

    // The configured subscriber depends on the config, so loading logs through a
    // scoped one.
    let config = match load_config(cli.config.as_deref(), &env)
        .with_subscriber(bootstrap_subscriber())
        .await
    {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_tracing(config.logging()) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    match run_server(config, env).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Print error using Display (not Debug) to preserve newlines
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
