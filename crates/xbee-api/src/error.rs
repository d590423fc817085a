//! Protocol error types.

use thiserror::Error;

/// Framing errors reported by the state machine.
///
/// All of these are recoverable: the parser resynchronizes on the next
/// start delimiter.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramingError {
    /// Length field was zero, so there is no room for a frame type.
    #[error("frame of zero length")]
    ZeroLengthFrame,

    /// Frame type byte was the reserved value zero.
    #[error("zero frame type")]
    ZeroFrameType,

    /// Trailing checksum did not match the frame contents.
    #[error("checksum failed")]
    ChecksumFailed,

    /// A start delimiter arrived before the previous frame completed.
    #[error("partial frame dropped by new start delimiter")]
    FramePreempted,
}

/// Errors produced while turning a raw frame into a typed frame.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Payload does not fit the layout of its frame type.
    #[error("malformed frame 0x{frame_type:02X}: {reason}")]
    MalformedFrame {
        /// Frame type of the rejected frame.
        frame_type: u8,
        /// What was wrong with it.
        reason: String,
    },
}

impl DecodeError {
    /// Payload shorter than the decoder's fixed layout.
    pub fn too_short(frame_type: u8, expected: usize, actual: usize) -> Self {
        DecodeError::MalformedFrame {
            frame_type,
            reason: format!(
                "payload too short: expected at least {} bytes, got {}",
                expected, actual
            ),
        }
    }

    /// Frame type of the frame that failed to decode.
    pub fn frame_type(&self) -> u8 {
        match self {
            DecodeError::MalformedFrame { frame_type, .. } => *frame_type,
        }
    }
}

/// Errors raised while building outbound frames.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// AT command mnemonic is not exactly two printable ASCII characters.
    #[error("invalid AT command: {0:?}")]
    InvalidCommand(String),

    /// Frame type zero cannot be sent.
    #[error("frame type zero is reserved")]
    ZeroFrameType,

    /// Frame type plus payload do not fit in the 16-bit length field.
    #[error("payload too long: maximum {max} bytes, got {actual}")]
    PayloadTooLong {
        /// Maximum payload length.
        max: usize,
        /// Length that was requested.
        actual: usize,
    },
}

/// Any error from this crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum XbeeError {
    /// Stream framing error.
    #[error(transparent)]
    Framing(#[from] FramingError),

    /// Frame decoding error.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Frame encoding error.
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Result type alias for this crate.
pub type XbeeResult<T> = Result<T, XbeeError>;
