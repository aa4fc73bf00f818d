//! Job step command handler
//!
//! Runs one job step query and prints the result to stdout, either as the
//! plain-text report or as JSON.

use std::io::{self, Write};

use anyhow::{Context, Result};
use stepwire_client::{JobStepCollection, JobStepQuery, JobStepQueryClient};
use stepwire_core::report;
use tracing::debug;

use crate::config::Config;

/// Query job steps and print them
///
/// # Arguments
/// * `job_id` - The job to query
/// * `step` - A single step, or `None` for every step
/// * `json` - Print JSON instead of the text report
/// * `config` - The CLI configuration
pub async fn handle_steps_command(
    job_id: u32,
    step: Option<u32>,
    json: bool,
    config: &Config,
) -> Result<()> {
    let client = JobStepQueryClient::with_config(config.transport_config());
    let query = match step {
        Some(step_id) => JobStepQuery::single(job_id, step_id),
        None => JobStepQuery::all_steps(job_id),
    };

    debug!("Querying {} for job {}", config.controller_addr, job_id);
    let steps = client
        .get_job_steps(query)
        .await
        .with_context(|| format!("job step query for job {} failed", job_id))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    print_steps(&mut out, &steps, json)?;
    out.flush().context("Failed to flush stdout")?;

    Ok(())
}

fn print_steps<W: Write>(out: &mut W, steps: &JobStepCollection, json: bool) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, steps).context("Failed to encode JSON")?;
        writeln!(out)?;
    } else {
        report::write_collection(out, steps).context("Failed to write report")?;
    }
    Ok(())
}
