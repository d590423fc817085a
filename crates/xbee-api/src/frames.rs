//! Typed API frames.
//!
//! [`decode`] turns a [`RawFrame`] into a [`Frame`] by looking up the frame
//! type in a fixed decoder table. Frame types without a decoder become
//! [`Frame::Opaque`], so decoding only fails when a known frame type carries
//! a payload too short for its layout.

use std::fmt;

use bytes::Bytes;

use crate::constants::*;
use crate::error::DecodeError;
use crate::parser::RawFrame;

/// Status byte of an AT command response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtCommandStatus {
    /// Command accepted.
    Ok,
    /// Command failed.
    Error,
    /// Mnemonic not recognised.
    InvalidCommand,
    /// Parameter rejected.
    InvalidParameter,
    /// Remote command could not be delivered.
    TxFailure,
    /// Status code not documented.
    Unknown(u8),
}

impl fmt::Display for AtCommandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AtCommandStatus::Ok => write!(f, "OK"),
            AtCommandStatus::Error => write!(f, "ERROR"),
            AtCommandStatus::InvalidCommand => write!(f, "invalid command"),
            AtCommandStatus::InvalidParameter => write!(f, "invalid parameter"),
            AtCommandStatus::TxFailure => write!(f, "TX failure"),
            AtCommandStatus::Unknown(code) => write!(f, "unknown status (0x{:02X})", code),
        }
    }
}

impl From<u8> for AtCommandStatus {
    fn from(code: u8) -> Self {
        match code {
            AT_STATUS_OK => AtCommandStatus::Ok,
            AT_STATUS_ERROR => AtCommandStatus::Error,
            AT_STATUS_INVALID_COMMAND => AtCommandStatus::InvalidCommand,
            AT_STATUS_INVALID_PARAMETER => AtCommandStatus::InvalidParameter,
            AT_STATUS_TX_FAILURE => AtCommandStatus::TxFailure,
            _ => AtCommandStatus::Unknown(code),
        }
    }
}

impl From<AtCommandStatus> for u8 {
    fn from(status: AtCommandStatus) -> Self {
        match status {
            AtCommandStatus::Ok => AT_STATUS_OK,
            AtCommandStatus::Error => AT_STATUS_ERROR,
            AtCommandStatus::InvalidCommand => AT_STATUS_INVALID_COMMAND,
            AtCommandStatus::InvalidParameter => AT_STATUS_INVALID_PARAMETER,
            AtCommandStatus::TxFailure => AT_STATUS_TX_FAILURE,
            AtCommandStatus::Unknown(code) => code,
        }
    }
}

/// ZigBee IO data sample RX indicator (`0x92`).
///
/// Only the digital sample word is extracted. Analog samples that follow it
/// are left unparsed even when `analog_mask` is non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IoSample {
    /// 64-bit address of the sending module.
    pub sender_address: u64,
    /// 16-bit network address of the sending module.
    pub source_network_address: u16,
    /// Receive option flags.
    pub receive_options: u8,
    /// Number of sample sets (always 1 on current firmware).
    pub sample_count: u8,
    /// Digital channels enabled for sampling.
    pub digital_mask: u16,
    /// Analog channels enabled for sampling.
    pub analog_mask: u8,
    /// Digital sample word, 0 when no digital channel is enabled.
    pub digital_samples: u16,
}

/// Local AT command response (`0x88`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtCommandResponse {
    /// Frame id echoed from the request.
    pub frame_id: u8,
    /// Two-character command mnemonic.
    pub command_name: [u8; 2],
    /// Command status.
    pub result: AtCommandStatus,
    /// Register value or other response data, unparsed.
    pub extra_bytes: Bytes,
}

impl AtCommandResponse {
    /// Command mnemonic as text.
    pub fn command_str(&self) -> String {
        String::from_utf8_lossy(&self.command_name).to_string()
    }
}

/// A decoded API frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Any frame type without a dedicated decoder.
    Opaque {
        /// API identifier.
        frame_type: u8,
        /// Payload, unmodified.
        payload: Bytes,
    },
    /// IO data sample.
    IoSample(IoSample),
    /// AT command response.
    AtCommandResponse(AtCommandResponse),
}

impl Frame {
    /// Decode a raw frame.
    pub fn decode(raw: RawFrame) -> Result<Self, DecodeError> {
        decode(raw)
    }

    /// API identifier of this frame.
    pub fn frame_type(&self) -> u8 {
        match self {
            Frame::Opaque { frame_type, .. } => *frame_type,
            Frame::IoSample(_) => API_IO_SAMPLE_INDICATOR,
            Frame::AtCommandResponse(_) => API_AT_COMMAND_RESPONSE,
        }
    }

    /// Documented name of this frame's type.
    pub fn type_name(&self) -> Option<&'static str> {
        frame_type_name(self.frame_type())
    }

    /// Logical contents for display.
    pub fn dump(&self) -> FrameDump {
        let fields = match self {
            Frame::Opaque { payload, .. } => vec![DumpField::new(
                "payload",
                DumpValue::Bytes(payload.clone()),
            )],
            Frame::IoSample(sample) => vec![
                DumpField::new("sender_address", DumpValue::Hex64(sample.sender_address)),
                DumpField::new(
                    "source_network_address",
                    DumpValue::Hex16(sample.source_network_address),
                ),
                DumpField::new("receive_options", DumpValue::Hex8(sample.receive_options)),
                DumpField::new("number_of_samples", DumpValue::Hex8(sample.sample_count)),
                DumpField::new("digital_sample_mask", DumpValue::Hex16(sample.digital_mask)),
                DumpField::new("analog_sample_mask", DumpValue::Hex8(sample.analog_mask)),
                DumpField::new("digital_samples", DumpValue::Hex16(sample.digital_samples)),
            ],
            Frame::AtCommandResponse(response) => vec![
                DumpField::new("frame_id", DumpValue::Hex8(response.frame_id)),
                DumpField::new("command", DumpValue::Text(response.command_str())),
                DumpField::new("status", DumpValue::Text(response.result.to_string())),
                DumpField::new("data", DumpValue::Bytes(response.extra_bytes.clone())),
            ],
        };

        FrameDump {
            frame_type: self.frame_type(),
            type_name: self.type_name(),
            fields,
        }
    }
}

/// Value of a single dumped field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DumpValue {
    /// One byte, shown as hex.
    Hex8(u8),
    /// Two bytes, shown as hex.
    Hex16(u16),
    /// Eight bytes, shown as hex.
    Hex64(u64),
    /// Free text.
    Text(String),
    /// Unparsed bytes.
    Bytes(Bytes),
}

/// A named field in a frame dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpField {
    /// Field name.
    pub name: &'static str,
    /// Field value.
    pub value: DumpValue,
}

impl DumpField {
    fn new(name: &'static str, value: DumpValue) -> Self {
        DumpField { name, value }
    }
}

/// What a frame looks like for display, without any character formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameDump {
    /// API identifier.
    pub frame_type: u8,
    /// Documented name, if the type is known.
    pub type_name: Option<&'static str>,
    /// Decoded fields, in wire order.
    pub fields: Vec<DumpField>,
}

type DecodeFn = fn(&RawFrame) -> Result<Frame, DecodeError>;

/// Frame types with a dedicated decoder.
const DECODERS: &[(u8, DecodeFn)] = &[
    (API_IO_SAMPLE_INDICATOR, decode_io_sample),
    (API_AT_COMMAND_RESPONSE, decode_at_command_response),
];

/// Decode a raw frame into a typed frame.
///
/// Unknown frame types always succeed as [`Frame::Opaque`].
pub fn decode(raw: RawFrame) -> Result<Frame, DecodeError> {
    match DECODERS.iter().find(|(frame_type, _)| *frame_type == raw.frame_type) {
        Some((_, decoder)) => decoder(&raw),
        None => Ok(Frame::Opaque {
            frame_type: raw.frame_type,
            payload: raw.payload,
        }),
    }
}

fn decode_io_sample(raw: &RawFrame) -> Result<Frame, DecodeError> {
    let p = &raw.payload;
    if p.len() < IO_SAMPLE_MIN_LEN {
        return Err(DecodeError::too_short(
            raw.frame_type,
            IO_SAMPLE_MIN_LEN,
            p.len(),
        ));
    }

    let mut address = [0u8; 8];
    address.copy_from_slice(&p[0..8]);
    let sender_address = u64::from_be_bytes(address);
    let source_network_address = u16::from_be_bytes([p[8], p[9]]);
    let receive_options = p[10];
    let sample_count = p[11];
    let digital_mask = u16::from_be_bytes([p[12], p[13]]);
    let analog_mask = p[14];

    let digital_samples = if digital_mask != 0 {
        if p.len() < IO_SAMPLE_WITH_DIGITAL_LEN {
            return Err(DecodeError::too_short(
                raw.frame_type,
                IO_SAMPLE_WITH_DIGITAL_LEN,
                p.len(),
            ));
        }
        u16::from_be_bytes([p[15], p[16]])
    } else {
        0
    };

    Ok(Frame::IoSample(IoSample {
        sender_address,
        source_network_address,
        receive_options,
        sample_count,
        digital_mask,
        analog_mask,
        digital_samples,
    }))
}

fn decode_at_command_response(raw: &RawFrame) -> Result<Frame, DecodeError> {
    let p = &raw.payload;
    if p.len() < AT_RESPONSE_MIN_LEN {
        return Err(DecodeError::too_short(
            raw.frame_type,
            AT_RESPONSE_MIN_LEN,
            p.len(),
        ));
    }

    Ok(Frame::AtCommandResponse(AtCommandResponse {
        frame_id: p[0],
        command_name: [p[1], p[2]],
        result: AtCommandStatus::from(p[3]),
        extra_bytes: p.slice(AT_RESPONSE_MIN_LEN..),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn io_sample_payload(digital_mask: u16) -> Vec<u8> {
        let mut payload = vec![
            0x00, 0x13, 0xA2, 0x00, 0x40, 0x52, 0x2B, 0xAA, // sender
            0x7D, 0x84, // network address
            0x01, // receive options
            0x01, // sample count
        ];
        payload.extend_from_slice(&digital_mask.to_be_bytes());
        payload.push(0x02); // analog mask
        if digital_mask != 0 {
            payload.extend_from_slice(&[0x00, 0x14]);
        }
        payload
    }

    #[test]
    fn test_decode_io_sample_with_digital() {
        let raw = RawFrame::from_slice(0x92, &io_sample_payload(0x001C));
        let frame = decode(raw).expect("should decode");
        assert_eq!(
            frame,
            Frame::IoSample(IoSample {
                sender_address: 0x0013_A200_4052_2BAA,
                source_network_address: 0x7D84,
                receive_options: 0x01,
                sample_count: 0x01,
                digital_mask: 0x001C,
                analog_mask: 0x02,
                digital_samples: 0x0014,
            })
        );
    }

    #[test]
    fn test_decode_io_sample_without_digital() {
        let raw = RawFrame::from_slice(0x92, &io_sample_payload(0));
        match decode(raw).expect("should decode") {
            Frame::IoSample(sample) => {
                assert_eq!(sample.digital_mask, 0);
                assert_eq!(sample.digital_samples, 0);
            }
            other => panic!("unexpected frame {:?}", other),
        }
    }

    #[test]
    fn test_io_sample_ignores_trailing_analog_bytes() {
        let mut payload = io_sample_payload(0x0010);
        payload.extend_from_slice(&[0x02, 0x25]);
        let frame = decode(RawFrame::from_slice(0x92, &payload)).expect("should decode");
        assert!(matches!(frame, Frame::IoSample(s) if s.digital_samples == 0x0014));
    }

    #[test]
    fn test_io_sample_too_short() {
        let err = decode(RawFrame::from_slice(0x92, &[0xFF])).unwrap_err();
        assert_eq!(err, DecodeError::too_short(0x92, 15, 1));
    }

    #[test]
    fn test_io_sample_missing_digital_word() {
        let mut payload = io_sample_payload(0x0001);
        payload.truncate(15);
        let err = decode(RawFrame::from_slice(0x92, &payload)).unwrap_err();
        assert_eq!(err, DecodeError::too_short(0x92, 17, 15));
    }

    #[test]
    fn test_decode_at_command_response() {
        let raw = RawFrame::from_slice(0x88, &[0x01, b'I', b'D', 0x00, 0x33, 0x32]);
        let frame = decode(raw).expect("should decode");
        match &frame {
            Frame::AtCommandResponse(response) => {
                assert_eq!(response.frame_id, 1);
                assert_eq!(response.command_str(), "ID");
                assert_eq!(response.result, AtCommandStatus::Ok);
                assert_eq!(&response.extra_bytes[..], &[0x33, 0x32]);
            }
            other => panic!("unexpected frame {:?}", other),
        }
        assert_eq!(frame.frame_type(), 0x88);
        assert_eq!(frame.type_name(), Some("AT Command Response"));
    }

    #[test]
    fn test_at_response_unknown_status() {
        let raw = RawFrame::from_slice(0x88, &[0x05, b'N', b'D', 0x09]);
        match decode(raw).expect("should decode") {
            Frame::AtCommandResponse(response) => {
                assert_eq!(response.result, AtCommandStatus::Unknown(9));
                assert!(response.extra_bytes.is_empty());
            }
            other => panic!("unexpected frame {:?}", other),
        }
    }

    #[test]
    fn test_at_response_too_short() {
        let err = decode(RawFrame::from_slice(0x88, &[0x01, b'I', b'D'])).unwrap_err();
        assert!(matches!(err, DecodeError::MalformedFrame { frame_type: 0x88, .. }));
    }

    #[test]
    fn test_unknown_type_is_opaque() {
        for frame_type in [0x08, 0x8A, 0x90, 0xFE] {
            let raw = RawFrame::from_slice(frame_type, &[1, 2, 3]);
            let frame = decode(raw).expect("opaque decode never fails");
            assert_eq!(
                frame,
                Frame::Opaque {
                    frame_type,
                    payload: Bytes::from_static(&[1, 2, 3]),
                }
            );
        }
    }

    #[test]
    fn test_status_code_conversion() {
        for code in 0..=255u8 {
            assert_eq!(u8::from(AtCommandStatus::from(code)), code);
        }
        assert_eq!(AtCommandStatus::from(4), AtCommandStatus::TxFailure);
        assert_eq!(AtCommandStatus::InvalidParameter.to_string(), "invalid parameter");
    }

    #[test]
    fn test_dump_opaque() {
        let frame = decode(RawFrame::from_slice(0x8A, &[0x06])).expect("should decode");
        let dump = frame.dump();
        assert_eq!(dump.frame_type, 0x8A);
        assert_eq!(dump.type_name, Some("Modem Status"));
        assert_eq!(
            dump.fields,
            vec![DumpField::new(
                "payload",
                DumpValue::Bytes(Bytes::from_static(&[0x06]))
            )]
        );
    }

    #[test]
    fn test_dump_io_sample_field_order() {
        let frame = decode(RawFrame::from_slice(0x92, &io_sample_payload(0x001C)))
            .expect("should decode");
        let names: Vec<_> = frame.dump().fields.iter().map(|f| f.name).collect();
        assert_eq!(
            names,
            vec![
                "sender_address",
                "source_network_address",
                "receive_options",
                "number_of_samples",
                "digital_sample_mask",
                "analog_sample_mask",
                "digital_samples",
            ]
        );
    }

    #[test]
    fn test_dump_unknown_type_has_no_name() {
        let frame = decode(RawFrame::from_slice(0x42, &[])).expect("should decode");
        assert_eq!(frame.dump().type_name, None);
    }
}
