//! XBee API Serial Monitor
//!
//! Host-side plumbing around [`xbee_api`]: byte sources (a serial port or a
//! recorded capture), frame sinks that render decoded frames, and the
//! [`Monitor`] loop that drives bytes from one to the other.
//!
//! # Example
//!
//! ```rust,ignore
//! use xbee_monitor::{ConsoleSink, Monitor, MonitorConfig, SerialSource};
//!
//! let config = MonitorConfig::default();
//! let source = SerialSource::open("/dev/ttyUSB0", config.baud_rate)?;
//! let mut monitor = Monitor::with_config(source, ConsoleSink::new(std::io::stdout()), &config);
//! monitor.send_queries(&config.at_queries()?)?;
//! monitor.run(&stop)?;
//! ```

mod config;
mod error;
mod monitor;
mod sink;
mod source;

pub use config::*;
pub use error::*;
pub use monitor::*;
pub use sink::*;
pub use source::*;
