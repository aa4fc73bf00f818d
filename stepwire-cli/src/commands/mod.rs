//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod steps;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Show job step state for a job
    Steps {
        /// Job ID
        job_id: u32,

        /// Only this step (default: all steps)
        #[arg(long)]
        step: Option<u32>,

        /// Print the collection as JSON instead of the text report
        #[arg(long)]
        json: bool,
    },
}

/// Handle a CLI command
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Steps { job_id, step, json } => {
            steps::handle_steps_command(job_id, step, json, config).await
        }
    }
}
