//! Stepwire CLI
//!
//! Command-line interface for querying job step state from the controller.

mod commands;
mod config;

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use colored::*;
use commands::{Commands, handle_command};
use config::Config;
use stepwire_client::tcp::DEFAULT_CONTROLLER_PORT;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "stepwire")]
#[command(about = "Query job step state from the cluster controller", long_about = None)]
struct Cli {
    /// Controller address (host:port)
    #[arg(
        long,
        global = true,
        env = "STEPWIRE_CONTROLLER_ADDR",
        default_value_t = format!("127.0.0.1:{}", DEFAULT_CONTROLLER_PORT)
    )]
    controller: String,

    /// Connect and I/O timeout in seconds
    #[arg(long, global = true, env = "STEPWIRE_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr so stdout carries only the report
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stepwire_cli=warn,stepwire_client=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config {
        controller_addr: cli.controller,
        timeout: cli.timeout_secs.map(Duration::from_secs),
    };

    handle_command(cli.command, &config).await
}
