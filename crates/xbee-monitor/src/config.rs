//! Monitor configuration.
//!
//! Settings come from an optional YAML file and are then overridden by
//! command-line flags:
//!
//! ```yaml
//! port: /dev/ttyUSB0
//! baud_rate: 9600
//! poll_interval_ms: 10
//! queries: [ID, SH, SL]
//! echo_bytes: false
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use xbee_api::AtCommand;

use crate::error::{MonitorError, MonitorResult};

/// Default serial speed of XBee ZigBee modules.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Default sleep between polls that found no data.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 10;

/// Configuration for the monitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Serial device, e.g. `/dev/ttyUSB0` or `COM3`.
    pub port: Option<String>,
    /// Serial speed in baud.
    pub baud_rate: u32,
    /// Sleep between polls that found no data (milliseconds).
    pub poll_interval_ms: u64,
    /// AT commands sent once the port is open.
    pub queries: Vec<String>,
    /// Log every received byte at trace level.
    pub echo_bytes: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            port: None,
            baud_rate: DEFAULT_BAUD_RATE,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            queries: vec!["ID".to_string()],
            echo_bytes: false,
        }
    }
}

impl MonitorConfig {
    /// Parse a YAML document.
    pub fn from_yaml(yaml: &str) -> MonitorResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a YAML config file.
    pub fn load(path: &Path) -> MonitorResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    /// Apply command-line overrides. Empty `queries` keeps the configured list.
    pub fn apply_overrides(
        &mut self,
        port: Option<String>,
        baud_rate: Option<u32>,
        queries: Vec<String>,
        echo_bytes: bool,
    ) {
        if port.is_some() {
            self.port = port;
        }
        if let Some(baud_rate) = baud_rate {
            self.baud_rate = baud_rate;
        }
        if !queries.is_empty() {
            self.queries = queries;
        }
        self.echo_bytes |= echo_bytes;
    }

    /// Sleep between empty polls.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// The configured queries as validated AT commands.
    pub fn at_queries(&self) -> MonitorResult<Vec<AtCommand>> {
        self.queries
            .iter()
            .map(|q| AtCommand::new(q).map_err(MonitorError::from))
            .collect()
    }

    /// Serial device to open.
    pub fn require_port(&self) -> MonitorResult<&str> {
        self.port.as_deref().ok_or_else(|| {
            MonitorError::Config("no serial port given (use --port or a config file)".to_string())
        })
    }
}
