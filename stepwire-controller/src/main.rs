//! Stepwire Controller
//!
//! Minimal controller daemon that answers job step queries from an in-memory
//! job step table.

mod config;
mod server;
mod service;
mod table;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::table::StepTable;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stepwire_controller=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Stepwire Controller");

    let config = Config::from_env()?;
    config.validate()?;

    let table = match &config.steps_file {
        Some(path) => StepTable::load(path)?,
        None => StepTable::default(),
    };
    if table.is_empty() {
        warn!("Job step table is empty, every query will return an error code");
    } else {
        info!("Loaded {} job step(s)", table.len());
    }

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    info!("Listening on {}", config.bind_addr);

    server::serve(listener, Arc::new(table), config.max_frame_length).await;
    Ok(())
}
