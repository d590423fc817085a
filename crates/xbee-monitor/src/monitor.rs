//! The driver loop.
//!
//! [`Monitor`] pulls whatever bytes the source has ready, pushes them through
//! a [`FrameStateMachine`] one at a time, decodes completed frames and hands
//! the results to a [`FrameSink`]. Nothing in a poll blocks; waiting for the
//! next byte happens only in [`Monitor::run`], between polls.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use tracing::{debug, info, trace, warn};
use xbee_api::{build_at_command_frame, decode, AtCommand, FrameEvent, FrameStateMachine};

use crate::config::MonitorConfig;
use crate::error::MonitorResult;
use crate::sink::{hex_bytes, FrameSink};
use crate::source::ByteSource;

/// Counters for one monitoring session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StreamStats {
    /// Bytes read from the source.
    pub bytes: u64,
    /// Frames decoded and delivered.
    pub frames: u64,
    /// Bytes outside any frame.
    pub garbage: u64,
    /// Frames dropped on checksum.
    pub checksum_failures: u64,
    /// Frames dropped for zero length.
    pub zero_length: u64,
    /// Frames dropped for zero frame type.
    pub zero_type: u64,
    /// Frames cut off by a new start delimiter.
    pub preempted: u64,
    /// Frames that passed the checksum but failed to decode.
    pub malformed: u64,
}

impl StreamStats {
    /// Count a parser event.
    pub fn record(&mut self, event: &FrameEvent) {
        match event {
            FrameEvent::Continue | FrameEvent::FrameComplete(_) => {}
            FrameEvent::Garbage(_) => self.garbage += 1,
            FrameEvent::ChecksumFailed => self.checksum_failures += 1,
            FrameEvent::ZeroLengthFrame => self.zero_length += 1,
            FrameEvent::ZeroFrameType => self.zero_type += 1,
            FrameEvent::FramePreempted => self.preempted += 1,
        }
    }

    /// Frames lost to any framing or decode problem.
    pub fn dropped(&self) -> u64 {
        self.checksum_failures + self.zero_length + self.zero_type + self.preempted + self.malformed
    }

    fn log_summary(&self) {
        info!(
            "{} bytes, {} frames, {} dropped ({} checksum, {} zero length, {} zero type, {} preempted, {} malformed), {} garbage bytes",
            self.bytes,
            self.frames,
            self.dropped(),
            self.checksum_failures,
            self.zero_length,
            self.zero_type,
            self.preempted,
            self.malformed,
            self.garbage
        );
    }
}

/// Pulls bytes from a source and delivers decoded frames to a sink.
pub struct Monitor<S, K> {
    source: S,
    sink: K,
    parser: FrameStateMachine,
    stats: StreamStats,
    poll_interval: Duration,
    echo_bytes: bool,
}

impl<S: ByteSource, K: FrameSink> Monitor<S, K> {
    /// Create a monitor with default settings.
    pub fn new(source: S, sink: K) -> Self {
        Self::with_config(source, sink, &MonitorConfig::default())
    }

    /// Create a monitor using the polling settings from `config`.
    pub fn with_config(source: S, sink: K, config: &MonitorConfig) -> Self {
        Monitor {
            source,
            sink,
            parser: FrameStateMachine::new(),
            stats: StreamStats::default(),
            poll_interval: config.poll_interval(),
            echo_bytes: config.echo_bytes,
        }
    }

    /// Counters so far.
    pub fn stats(&self) -> StreamStats {
        self.stats
    }

    /// The sink.
    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// The source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Take the monitor apart.
    pub fn into_parts(self) -> (S, K) {
        (self.source, self.sink)
    }

    /// Process every byte that is available right now.
    ///
    /// Returns the number of bytes consumed; zero means the source had
    /// nothing ready.
    pub fn poll(&mut self) -> MonitorResult<usize> {
        let mut consumed = 0;
        loop {
            let available = self.source.bytes_available()?;
            if available == 0 {
                break;
            }
            for _ in 0..available {
                let byte = self.source.read_one()?;
                consumed += 1;
                self.handle_byte(byte)?;
            }
        }
        Ok(consumed)
    }

    /// Poll until `stop` is set or the source runs dry for good.
    pub fn run(&mut self, stop: &AtomicBool) -> MonitorResult<()> {
        info!("monitoring XBee API frames");
        while !stop.load(Ordering::Relaxed) {
            if self.poll()? == 0 {
                if self.source.at_end() {
                    debug!("end of input");
                    break;
                }
                thread::sleep(self.poll_interval);
            }
        }
        if self.parser.in_frame() {
            debug!("input ended inside a frame ({:?})", self.parser.state());
        }
        self.stats.log_summary();
        Ok(())
    }

    fn handle_byte(&mut self, byte: u8) -> MonitorResult<()> {
        self.stats.bytes += 1;
        if self.echo_bytes {
            trace!("rx 0x{:02X}", byte);
        }

        match self.parser.feed(byte) {
            FrameEvent::Continue => {}
            FrameEvent::FrameComplete(raw) => {
                trace!(
                    "frame 0x{:02X}: {}",
                    raw.frame_type,
                    hex_bytes(&raw.payload)
                );
                match decode(raw) {
                    Ok(frame) => {
                        self.stats.frames += 1;
                        self.sink.on_frame(&frame)?;
                    }
                    Err(e) => {
                        self.stats.malformed += 1;
                        self.sink.on_decode_error(&e)?;
                    }
                }
            }
            event => {
                self.stats.record(&event);
                self.sink.on_event(&event)?;
            }
        }
        Ok(())
    }
}

impl<S: ByteSource + Write, K: FrameSink> Monitor<S, K> {
    /// Send local AT command queries through the source.
    pub fn send_queries(&mut self, queries: &[AtCommand]) -> MonitorResult<()> {
        for query in queries {
            let frame = build_at_command_frame(&query.to_string())?;
            if let Err(e) = self.source.write_all(&frame) {
                warn!("failed to send AT {}: {}", query, e);
                return Err(e.into());
            }
            info!("sent AT {} query", query);
        }
        self.source.flush()?;
        Ok(())
    }
}
