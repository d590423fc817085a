//! Byte sources.
//!
//! A [`ByteSource`] is polled, never waited on: the monitor asks how many
//! bytes are ready and reads exactly that many, one at a time.

use std::io::{self, Read, Write};
use std::path::Path;
use std::time::Duration;

use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use tracing::debug;

use crate::error::MonitorResult;

/// Read timeout for the serial port. Reads only happen after
/// `bytes_to_read` reported data, so this is only hit on a dead link.
const SERIAL_READ_TIMEOUT: Duration = Duration::from_millis(100);

/// A non-blocking supply of bytes.
pub trait ByteSource {
    /// Number of bytes that can be read right now.
    fn bytes_available(&mut self) -> io::Result<usize>;

    /// Read one byte. Only called after `bytes_available` returned non-zero.
    fn read_one(&mut self) -> io::Result<u8>;

    /// Whether the source will never produce more data.
    fn at_end(&self) -> bool {
        false
    }
}

/// A serial port in 8N1 mode.
pub struct SerialSource {
    port: Box<dyn SerialPort>,
}

impl SerialSource {
    /// Open a serial device at the given speed.
    pub fn open(path: &str, baud_rate: u32) -> MonitorResult<Self> {
        let port = serialport::new(path, baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(SERIAL_READ_TIMEOUT)
            .open()?;
        debug!("opened {} at {} baud", path, baud_rate);
        Ok(SerialSource { port })
    }
}

impl ByteSource for SerialSource {
    fn bytes_available(&mut self) -> io::Result<usize> {
        Ok(self.port.bytes_to_read()? as usize)
    }

    fn read_one(&mut self) -> io::Result<u8> {
        let mut byte = [0u8; 1];
        self.port.read_exact(&mut byte)?;
        Ok(byte[0])
    }
}

impl Write for SerialSource {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.port.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.port.flush()
    }
}

/// Bytes captured earlier, played back from memory.
///
/// Anything written to it is kept in [`ReplaySource::written`] so outbound
/// frames can be inspected.
#[derive(Debug, Default, Clone)]
pub struct ReplaySource {
    data: Vec<u8>,
    pos: usize,
    chunk: Option<usize>,
    written: Vec<u8>,
}

impl ReplaySource {
    /// Play back the given bytes.
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        ReplaySource {
            data: data.into(),
            ..Self::default()
        }
    }

    /// Play back a raw capture file.
    pub fn from_file(path: &Path) -> MonitorResult<Self> {
        let data = std::fs::read(path)?;
        debug!("loaded {} bytes from {}", data.len(), path.display());
        Ok(Self::new(data))
    }

    /// Report at most `chunk` bytes per poll, like a slow link would.
    pub fn with_chunk_size(mut self, chunk: usize) -> Self {
        self.chunk = Some(chunk.max(1));
        self
    }

    /// Bytes not yet read.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Everything written to this source so far.
    pub fn written(&self) -> &[u8] {
        &self.written
    }
}

impl ByteSource for ReplaySource {
    fn bytes_available(&mut self) -> io::Result<usize> {
        let remaining = self.remaining();
        Ok(match self.chunk {
            Some(chunk) => remaining.min(chunk),
            None => remaining,
        })
    }

    fn read_one(&mut self) -> io::Result<u8> {
        let byte = self
            .data
            .get(self.pos)
            .copied()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "replay exhausted"))?;
        self.pos += 1;
        Ok(byte)
    }

    fn at_end(&self) -> bool {
        self.remaining() == 0
    }
}

impl Write for ReplaySource {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
