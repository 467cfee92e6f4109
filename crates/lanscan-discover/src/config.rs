//! Configuration for the lanscan discovery engine.

use std::time::Duration;

use serde::Deserialize;

use crate::error::{DiscoverError, Result};

/// Top-level discover configuration.
///
/// Loaded from `lanscan.toml` `[discover]` section or
/// `LANSCAN_DISCOVER__` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoverConfig {
    /// Three-octet IPv4 prefix swept by active probing (e.g. "192.168.1").
    /// Used verbatim; not validated.
    #[serde(default = "default_subnet")]
    pub subnet: String,

    /// Path to the ARP cache listing binary (default: "arp").
    #[serde(default = "default_arp_path")]
    pub arp_path: String,

    /// Arguments that make the ARP binary list every entry.
    #[serde(default = "default_arp_args")]
    pub arp_args: Vec<String>,

    /// Path to the ping binary used by the sweep.
    #[serde(default = "default_ping_path")]
    pub ping_path: String,

    /// Ping arguments placed before the target host.
    #[serde(default = "default_ping_args")]
    pub ping_args: Vec<String>,

    /// Number of probes dispatched concurrently per sweep batch.
    #[serde(default = "default_batch_size")]
    pub sweep_batch_size: usize,

    /// Per-probe timeout in milliseconds.
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
}

impl DiscoverConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.sweep_batch_size == 0 {
            return Err(DiscoverError::Config(
                "sweep_batch_size must be at least 1".to_string(),
            ));
        }
        if self.probe_timeout_ms == 0 {
            return Err(DiscoverError::Config(
                "probe_timeout_ms must be at least 1".to_string(),
            ));
        }
        if self.arp_path.is_empty() {
            return Err(DiscoverError::Config(
                "arp_path must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_subnet() -> String {
    "192.168.1".to_string()
}

fn default_arp_path() -> String {
    "arp".to_string()
}

fn default_arp_args() -> Vec<String> {
    vec!["-a".to_string()]
}

fn default_ping_path() -> String {
    "ping".to_string()
}

fn default_ping_args() -> Vec<String> {
    vec!["-c".to_string(), "1".to_string(), "-W".to_string(), "1".to_string()]
}

fn default_batch_size() -> usize {
    50
}

fn default_probe_timeout_ms() -> u64 {
    100
}

impl Default for DiscoverConfig {
    fn default() -> Self {
        Self {
            subnet: default_subnet(),
            arp_path: default_arp_path(),
            arp_args: default_arp_args(),
            ping_path: default_ping_path(),
            ping_args: default_ping_args(),
            sweep_batch_size: default_batch_size(),
            probe_timeout_ms: default_probe_timeout_ms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DiscoverConfig::default();
        assert_eq!(config.subnet, "192.168.1");
        assert_eq!(config.arp_path, "arp");
        assert_eq!(config.arp_args, vec!["-a"]);
        assert_eq!(config.sweep_batch_size, 50);
        assert_eq!(config.probe_timeout(), Duration::from_millis(100));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: DiscoverConfig =
            serde_json::from_str(r#"{"subnet": "10.0.0", "sweep_batch_size": 25}"#).unwrap();
        assert_eq!(config.subnet, "10.0.0");
        assert_eq!(config.sweep_batch_size, 25);
        assert_eq!(config.ping_path, "ping");
        assert_eq!(config.probe_timeout_ms, 100);
    }

    #[test]
    fn test_validate_rejects_zero_batch() {
        let config = DiscoverConfig {
            sweep_batch_size: 0,
            ..Default::default()
        };
        match config.validate() {
            Err(DiscoverError::Config(msg)) => assert!(msg.contains("sweep_batch_size")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_zero_timeout_and_empty_arp_path() {
        let config = DiscoverConfig {
            probe_timeout_ms: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(DiscoverError::Config(_))));

        let config = DiscoverConfig {
            arp_path: String::new(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(DiscoverError::Config(_))));
    }
}
