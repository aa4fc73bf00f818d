//! Controller configuration
//!
//! Defines where the controller listens, where its job step table comes from
//! and how large a request frame may be.

use std::path::PathBuf;

use stepwire_core::protocol::DEFAULT_MAX_FRAME_LENGTH;

/// Controller configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to listen on (e.g., "0.0.0.0:6817")
    pub bind_addr: String,

    /// JSON file holding the job step table, if any
    pub steps_file: Option<PathBuf>,

    /// Largest frame accepted from a client
    pub max_frame_length: usize,
}

impl Config {
    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - STEPWIRE_BIND_ADDR (optional, default: 0.0.0.0:6817)
    /// - STEPWIRE_STEPS_FILE (optional, JSON array of job step records)
    /// - STEPWIRE_MAX_FRAME_BYTES (optional, default: 8 MiB)
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr =
            std::env::var("STEPWIRE_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:6817".to_string());

        let steps_file = std::env::var("STEPWIRE_STEPS_FILE").ok().map(PathBuf::from);

        let max_frame_length = match std::env::var("STEPWIRE_MAX_FRAME_BYTES") {
            Ok(value) => value.parse::<usize>().map_err(|e| {
                anyhow::anyhow!("STEPWIRE_MAX_FRAME_BYTES is not a valid size: {}", e)
            })?,
            Err(_) => DEFAULT_MAX_FRAME_LENGTH,
        };

        Ok(Self {
            bind_addr,
            steps_file,
            max_frame_length,
        })
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.bind_addr.is_empty() {
            anyhow::bail!("bind_addr cannot be empty");
        }

        if !self.bind_addr.contains(':') {
            anyhow::bail!("bind_addr must be in host:port form");
        }

        if self.max_frame_length == 0 {
            anyhow::bail!("max_frame_length must be greater than 0");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:6817".to_string(),
            steps_file: None,
            max_frame_length: DEFAULT_MAX_FRAME_LENGTH,
        }
    }
}
