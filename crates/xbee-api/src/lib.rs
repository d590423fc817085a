//! XBee ZigBee API Frames
//!
//! This crate provides an incremental parser, a typed decoder and a small
//! encoder for the XBee ZigBee API framing protocol (non-escaped mode, `AP=1`).
//!
//! # Wire Format
//!
//! ```text
//! +------+--------+--------+------------+-----------------+----------+
//! | 0x7E | len_hi | len_lo | frame_type | payload[len-1]  | checksum |
//! +------+--------+--------+------------+-----------------+----------+
//! ```
//!
//! The length is big-endian and counts the frame type byte plus the payload.
//! The checksum is `0xFF - (sum(frame_type, payload) mod 256)`.
//!
//! # Example
//!
//! ```rust,ignore
//! use xbee_api::{decode, FrameEvent, FrameStateMachine};
//!
//! let mut parser = FrameStateMachine::new();
//! for &byte in &received {
//!     if let FrameEvent::FrameComplete(raw) = parser.feed(byte) {
//!         let frame = decode(raw)?;
//!         println!("{}", frame.type_name().unwrap_or("Unknown frame type"));
//!     }
//! }
//! ```

pub mod checksum;
mod constants;
mod encoder;
mod error;
mod frames;
mod parser;

pub use checksum::ChecksumAccumulator;
pub use constants::*;
pub use encoder::*;
pub use error::*;
pub use frames::*;
pub use parser::*;
