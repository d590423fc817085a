//! Frame sinks: where decoded frames and stream diagnostics end up.

use std::io::{self, Write};

use tracing::{debug, warn};
use xbee_api::{DecodeError, DumpValue, Frame, FrameDump, FrameEvent};

/// Receives everything the monitor pulls out of the byte stream.
pub trait FrameSink {
    /// A frame passed its checksum and decoded.
    fn on_frame(&mut self, frame: &Frame) -> io::Result<()>;

    /// A diagnostic from the parser (garbage, a dropped frame).
    fn on_event(&mut self, event: &FrameEvent) -> io::Result<()>;

    /// A frame passed its checksum but its payload did not fit its type.
    fn on_decode_error(&mut self, error: &DecodeError) -> io::Result<()>;
}

/// Render a frame dump as text, one field per line.
///
/// ```text
/// AT Command Response (0x88)
///   frame_id: 0x01
///   command: ID
///   status: OK
///   data: 0x00 0x00 0x00 0x00 0x00 0x00 0x12 0x34
/// ```
pub fn render_dump(dump: &FrameDump) -> String {
    let mut out = format!(
        "{} (0x{:02X})",
        dump.type_name.unwrap_or("Unknown frame type"),
        dump.frame_type
    );
    for field in &dump.fields {
        out.push_str("\n  ");
        out.push_str(field.name);
        out.push_str(": ");
        out.push_str(&render_value(&field.value));
    }
    out
}

fn render_value(value: &DumpValue) -> String {
    match value {
        DumpValue::Hex8(v) => format!("0x{:02X}", v),
        DumpValue::Hex16(v) => format!("0x{:04X}", v),
        DumpValue::Hex64(v) => format!("0x{:016X}", v),
        DumpValue::Text(text) => text.clone(),
        DumpValue::Bytes(bytes) if bytes.is_empty() => "(none)".to_string(),
        DumpValue::Bytes(bytes) => hex_bytes(bytes),
    }
}

/// Format bytes as space separated `0xNN` values.
pub fn hex_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("0x{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Prints frames to a writer and logs diagnostics.
pub struct ConsoleSink<W: Write> {
    out: W,
}

impl<W: Write> ConsoleSink<W> {
    /// Print frames to `out`.
    pub fn new(out: W) -> Self {
        ConsoleSink { out }
    }

    /// Give back the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> FrameSink for ConsoleSink<W> {
    fn on_frame(&mut self, frame: &Frame) -> io::Result<()> {
        writeln!(self.out, "{}", render_dump(&frame.dump()))?;
        self.out.flush()
    }

    fn on_event(&mut self, event: &FrameEvent) -> io::Result<()> {
        match event {
            FrameEvent::Garbage(byte) => debug!("dropping garbage byte 0x{:02X}", byte),
            FrameEvent::ChecksumFailed => warn!("checksum failed, frame dropped"),
            FrameEvent::ZeroLengthFrame => warn!("frame of zero length, dropped"),
            FrameEvent::ZeroFrameType => warn!("zero frame type, frame dropped"),
            FrameEvent::FramePreempted => warn!("new start delimiter, previous frame dropped"),
            FrameEvent::Continue | FrameEvent::FrameComplete(_) => {}
        }
        Ok(())
    }

    fn on_decode_error(&mut self, error: &DecodeError) -> io::Result<()> {
        warn!("{}", error);
        Ok(())
    }
}

/// Keeps everything in memory.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    /// Decoded frames, in arrival order.
    pub frames: Vec<Frame>,
    /// Parser diagnostics, in arrival order.
    pub events: Vec<FrameEvent>,
    /// Decode failures, in arrival order.
    pub decode_errors: Vec<DecodeError>,
}

impl RecordingSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameSink for RecordingSink {
    fn on_frame(&mut self, frame: &Frame) -> io::Result<()> {
        self.frames.push(frame.clone());
        Ok(())
    }

    fn on_event(&mut self, event: &FrameEvent) -> io::Result<()> {
        self.events.push(event.clone());
        Ok(())
    }

    fn on_decode_error(&mut self, error: &DecodeError) -> io::Result<()> {
        self.decode_errors.push(error.clone());
        Ok(())
    }
}
