//! Error types for the monitor.

use std::io;

use thiserror::Error;
use xbee_api::EncodeError;

/// Errors that stop the monitor.
///
/// Framing and decode problems in the byte stream are not errors here; they
/// are reported to the sink and the stream carries on.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Reading from or writing to the byte source or output failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Serial port could not be opened or configured.
    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// Invalid or incomplete configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Config file is not valid YAML for [`crate::MonitorConfig`].
    #[error("failed to parse config file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A configured AT query could not be encoded.
    #[error("invalid query: {0}")]
    Encode(#[from] EncodeError),

    /// Ctrl-C handler could not be installed.
    #[error("failed to install Ctrl-C handler: {0}")]
    Signal(#[from] ctrlc::Error),
}

/// Result type alias for monitor operations.
pub type MonitorResult<T> = Result<T, MonitorError>;
