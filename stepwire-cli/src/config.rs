//! Configuration module
//!
//! Handles CLI configuration: where the controller lives and how long the
//! transport may wait on it.

use std::time::Duration;

use stepwire_client::TcpTransportConfig;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Address of the controller (host:port)
    pub controller_addr: String,
    /// Deadline applied to connecting and to each read or write
    pub timeout: Option<Duration>,
}

impl Config {
    /// Transport settings for this configuration
    pub fn transport_config(&self) -> TcpTransportConfig {
        let config = TcpTransportConfig::new(self.controller_addr.clone());
        match self.timeout {
            Some(timeout) => config.with_timeout(timeout),
            None => config,
        }
    }
}
