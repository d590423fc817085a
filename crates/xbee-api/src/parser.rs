//! Incremental API frame parser.
//!
//! [`FrameStateMachine`] consumes one byte at a time and never blocks. It
//! resynchronizes on any `0x7E`, so a stream with dropped or duplicated bytes
//! loses at most the frame that was in flight.
//!
//! ```text
//!            0x7E            any             len != 0        len bytes        checksum
//!   Idle ─────────► LenHigh ─────► LenLow ─────────► Payload ─────────► Checksum ─────► Idle
//!                                    │ len == 0         │ type == 0
//!                                    ▼                  ▼
//!                                 Rejected ◄────────────┘   (absorbs until next 0x7E)
//! ```

use bytes::{BufMut, Bytes, BytesMut};
use log::{debug, trace};

use crate::checksum::ChecksumAccumulator;
use crate::constants::*;
use crate::error::FramingError;

/// A checksum-validated frame as it came off the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    /// API identifier.
    pub frame_type: u8,
    /// Bytes following the frame type, checksum excluded.
    pub payload: Bytes,
}

impl RawFrame {
    /// Create a raw frame.
    pub fn new(frame_type: u8, payload: Bytes) -> Self {
        RawFrame {
            frame_type,
            payload,
        }
    }

    /// Create a raw frame by copying the payload.
    pub fn from_slice(frame_type: u8, payload: &[u8]) -> Self {
        Self::new(frame_type, Bytes::copy_from_slice(payload))
    }

    /// Value of the length field for this frame (type byte plus payload).
    pub fn length(&self) -> usize {
        self.payload.len() + 1
    }

    /// Checksum byte that closes this frame.
    pub fn checksum(&self) -> u8 {
        let mut acc = ChecksumAccumulator::new();
        acc.add(self.frame_type);
        acc.extend(&self.payload);
        acc.checksum()
    }
}

/// Where the parser is within a frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParserState {
    /// Between frames, scanning for a start delimiter.
    #[default]
    Idle,
    /// Expecting the high byte of the length.
    ReadLengthHigh,
    /// Expecting the low byte of the length.
    ReadLengthLow,
    /// Reading the frame type and payload.
    ReadPayload,
    /// Expecting the checksum byte.
    ReadChecksum,
    /// Frame rejected; ignoring bytes until the next start delimiter.
    Rejected,
}

/// Result of feeding a single byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameEvent {
    /// Byte consumed, nothing to report.
    Continue,
    /// Byte outside any frame was ignored.
    Garbage(u8),
    /// A frame passed its checksum.
    FrameComplete(RawFrame),
    /// A frame failed its checksum and was dropped.
    ChecksumFailed,
    /// A frame declared zero length and was dropped.
    ZeroLengthFrame,
    /// A frame carried the reserved frame type zero and was dropped.
    ZeroFrameType,
    /// A new start delimiter cut off a frame in progress.
    FramePreempted,
}

impl FrameEvent {
    /// True for [`FrameEvent::Continue`].
    pub fn is_continue(&self) -> bool {
        matches!(self, FrameEvent::Continue)
    }

    /// True for events that dropped a frame.
    pub fn is_error(&self) -> bool {
        self.framing_error().is_some()
    }

    /// The framing error this event reports, if any.
    pub fn framing_error(&self) -> Option<FramingError> {
        match self {
            FrameEvent::ChecksumFailed => Some(FramingError::ChecksumFailed),
            FrameEvent::ZeroLengthFrame => Some(FramingError::ZeroLengthFrame),
            FrameEvent::ZeroFrameType => Some(FramingError::ZeroFrameType),
            FrameEvent::FramePreempted => Some(FramingError::FramePreempted),
            FrameEvent::Continue | FrameEvent::Garbage(_) | FrameEvent::FrameComplete(_) => None,
        }
    }
}

/// Byte-at-a-time parser for API frames.
///
/// Each instance owns its own state, so independent streams need independent
/// parsers and nothing is shared between them.
#[derive(Debug, Default)]
pub struct FrameStateMachine {
    state: ParserState,
    /// Bytes of frame type plus payload still to come.
    remaining_length: u16,
    checksum: ChecksumAccumulator,
    frame_type: Option<u8>,
    payload: BytesMut,
}

impl FrameStateMachine {
    /// Create a parser in the idle state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Bytes still expected before the checksum.
    pub fn remaining_length(&self) -> u16 {
        self.remaining_length
    }

    /// Whether a frame is partially received.
    pub fn in_frame(&self) -> bool {
        !matches!(self.state, ParserState::Idle | ParserState::Rejected)
    }

    /// Drop any partial frame and return to idle.
    pub fn reset(&mut self) {
        self.clear();
        self.state = ParserState::Idle;
    }

    /// Consume one byte.
    pub fn feed(&mut self, byte: u8) -> FrameEvent {
        if byte == START_DELIMITER {
            let preempted = self.in_frame();
            if preempted {
                debug!(
                    "start delimiter in state {:?}, dropping partial frame",
                    self.state
                );
            }
            self.clear();
            self.state = ParserState::ReadLengthHigh;
            return if preempted {
                FrameEvent::FramePreempted
            } else {
                FrameEvent::Continue
            };
        }

        match self.state {
            ParserState::Idle => FrameEvent::Garbage(byte),

            ParserState::ReadLengthHigh => {
                self.remaining_length = u16::from(byte) << 8;
                self.state = ParserState::ReadLengthLow;
                FrameEvent::Continue
            }

            ParserState::ReadLengthLow => {
                self.remaining_length |= u16::from(byte);
                if self.remaining_length == 0 {
                    debug!("zero length frame, dropping");
                    self.state = ParserState::Rejected;
                    return FrameEvent::ZeroLengthFrame;
                }
                trace!("frame length {}", self.remaining_length);
                self.payload.reserve(usize::from(self.remaining_length - 1));
                self.state = ParserState::ReadPayload;
                FrameEvent::Continue
            }

            ParserState::ReadPayload => {
                match self.frame_type {
                    None if byte == FRAME_TYPE_RESERVED => {
                        debug!("zero frame type, dropping");
                        self.state = ParserState::Rejected;
                        return FrameEvent::ZeroFrameType;
                    }
                    None => self.frame_type = Some(byte),
                    Some(_) => self.payload.put_u8(byte),
                }
                self.checksum.add(byte);
                self.remaining_length -= 1;
                if self.remaining_length == 0 {
                    self.state = ParserState::ReadChecksum;
                }
                FrameEvent::Continue
            }

            ParserState::ReadChecksum => {
                self.state = ParserState::Idle;
                match self.frame_type.take() {
                    Some(frame_type) if self.checksum.is_valid(byte) => {
                        trace!(
                            "frame 0x{:02X} complete, {} payload bytes",
                            frame_type,
                            self.payload.len()
                        );
                        let payload = self.payload.split().freeze();
                        FrameEvent::FrameComplete(RawFrame::new(frame_type, payload))
                    }
                    _ => {
                        debug!(
                            "checksum failed: expected 0x{:02X}, got 0x{:02X}",
                            self.checksum.checksum(),
                            byte
                        );
                        self.payload.clear();
                        FrameEvent::ChecksumFailed
                    }
                }
            }

            ParserState::Rejected => FrameEvent::Continue,
        }
    }

    /// Feed a slice and collect every event other than `Continue`.
    pub fn feed_all(&mut self, bytes: &[u8]) -> Vec<FrameEvent> {
        bytes
            .iter()
            .map(|&byte| self.feed(byte))
            .filter(|event| !event.is_continue())
            .collect()
    }

    fn clear(&mut self) {
        self.remaining_length = 0;
        self.checksum.reset();
        self.frame_type = None;
        self.payload.clear();
    }
}
