//! Outbound frame encoding.

use std::fmt;

use bytes::BufMut;

use crate::checksum::ChecksumAccumulator;
use crate::constants::*;
use crate::error::EncodeError;

/// Largest payload that fits the length field alongside the frame type.
pub const MAX_PAYLOAD_LEN: usize = MAX_FRAME_LENGTH - 1;

/// A validated two-character AT command mnemonic, such as `ID` or `D0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AtCommand([u8; 2]);

impl AtCommand {
    /// Validate a mnemonic. It must be exactly two printable ASCII characters.
    pub fn new(command: &str) -> Result<Self, EncodeError> {
        match command.as_bytes() {
            &[a, b] if a.is_ascii_graphic() && b.is_ascii_graphic() => Ok(AtCommand([a, b])),
            _ => Err(EncodeError::InvalidCommand(command.to_string())),
        }
    }

    /// The two mnemonic bytes.
    pub fn as_bytes(&self) -> &[u8; 2] {
        &self.0
    }
}

impl fmt::Display for AtCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.0[0] as char, self.0[1] as char)
    }
}

impl std::str::FromStr for AtCommand {
    type Err = EncodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AtCommand::new(s)
    }
}

/// Wrap a frame type and payload in start delimiter, length and checksum.
pub fn encode_api_frame(frame_type: u8, payload: &[u8]) -> Result<Vec<u8>, EncodeError> {
    if frame_type == FRAME_TYPE_RESERVED {
        return Err(EncodeError::ZeroFrameType);
    }
    if payload.len() > MAX_PAYLOAD_LEN {
        return Err(EncodeError::PayloadTooLong {
            max: MAX_PAYLOAD_LEN,
            actual: payload.len(),
        });
    }

    let mut checksum = ChecksumAccumulator::new();
    checksum.add(frame_type);
    checksum.extend(payload);

    let mut buf = Vec::with_capacity(payload.len() + 5);
    buf.put_u8(START_DELIMITER);
    buf.put_u16(payload.len() as u16 + 1);
    buf.put_u8(frame_type);
    buf.put_slice(payload);
    buf.put_u8(checksum.checksum());
    Ok(buf)
}

/// Build a local AT command frame with frame id `0x01`.
///
/// ```text
/// 7E 00 04 08 01 <c0> <c1> <checksum>
/// ```
pub fn build_at_command_frame(command: &str) -> Result<Vec<u8>, EncodeError> {
    build_at_command_frame_with_id(command, DEFAULT_FRAME_ID)
}

/// Build a local AT command frame with an explicit frame id.
pub fn build_at_command_frame_with_id(
    command: &str,
    frame_id: u8,
) -> Result<Vec<u8>, EncodeError> {
    let command = AtCommand::new(command)?;
    let [c0, c1] = *command.as_bytes();
    encode_api_frame(API_AT_COMMAND, &[frame_id, c0, c1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_id_query() {
        let frame = build_at_command_frame("ID").expect("valid command");
        assert_eq!(frame, vec![0x7E, 0x00, 0x04, 0x08, 0x01, 0x49, 0x44, 0x69]);
    }

    #[test]
    fn test_build_is_deterministic() {
        assert_eq!(
            build_at_command_frame("SH").unwrap(),
            build_at_command_frame("SH").unwrap()
        );
    }

    #[test]
    fn test_build_with_frame_id() {
        let frame = build_at_command_frame_with_id("NI", 0x52).expect("valid command");
        // 0xFF - ((0x08 + 0x52 + 0x4E + 0x49) & 0xFF) = 0x0E
        assert_eq!(frame, vec![0x7E, 0x00, 0x04, 0x08, 0x52, 0x4E, 0x49, 0x0E]);
    }

    #[test]
    fn test_invalid_commands_rejected() {
        for bad in ["", "I", "IDX", "I ", "\u{e9}D", "\n\r"] {
            assert_eq!(
                build_at_command_frame(bad),
                Err(EncodeError::InvalidCommand(bad.to_string()))
            );
        }
    }

    #[test]
    fn test_at_command_display() {
        let cmd: AtCommand = "d0".parse().expect("valid command");
        assert_eq!(cmd.to_string(), "d0");
        assert_eq!(cmd.as_bytes(), b"d0");
    }

    #[test]
    fn test_encode_api_frame_limits() {
        assert_eq!(encode_api_frame(0x00, &[1]), Err(EncodeError::ZeroFrameType));

        let payload = vec![0u8; MAX_PAYLOAD_LEN + 1];
        assert_eq!(
            encode_api_frame(0x10, &payload),
            Err(EncodeError::PayloadTooLong {
                max: MAX_PAYLOAD_LEN,
                actual: MAX_PAYLOAD_LEN + 1,
            })
        );

        let frame = encode_api_frame(0x10, &vec![0u8; MAX_PAYLOAD_LEN]).expect("fits");
        assert_eq!(&frame[1..3], &[0xFF, 0xFF]);
    }

    #[test]
    fn test_encode_empty_payload() {
        let frame = encode_api_frame(0x8A, &[]).expect("valid frame");
        assert_eq!(frame, vec![0x7E, 0x00, 0x01, 0x8A, 0x75]);
    }
}
