//! Protocol constants
//!
//! Frame delimiters, API identifiers and status codes used by XBee ZigBee
//! firmware in API mode.

// ============================================================================
// Framing
// ============================================================================

/// Marks the start of every API frame.
pub const START_DELIMITER: u8 = 0x7E;

/// Largest value the 16-bit length field can carry.
pub const MAX_FRAME_LENGTH: usize = 0xFFFF;

/// Frame type zero is reserved and never valid on the wire.
pub const FRAME_TYPE_RESERVED: u8 = 0x00;

// ============================================================================
// API Identifiers (host → module)
// ============================================================================

/// Local AT command.
pub const API_AT_COMMAND: u8 = 0x08;
/// Local AT command, parameter queued until `AC` or another AT command.
pub const API_AT_COMMAND_QUEUE: u8 = 0x09;
/// ZigBee transmit request.
pub const API_TRANSMIT_REQUEST: u8 = 0x10;
/// Explicit addressing ZigBee command frame.
pub const API_EXPLICIT_ADDRESSING: u8 = 0x11;
/// Remote AT command request.
pub const API_REMOTE_COMMAND_REQUEST: u8 = 0x17;
/// Create source route.
pub const API_CREATE_SOURCE_ROUTE: u8 = 0x21;

// ============================================================================
// API Identifiers (module → host)
// ============================================================================

/// Local AT command response.
pub const API_AT_COMMAND_RESPONSE: u8 = 0x88;
/// Modem status.
pub const API_MODEM_STATUS: u8 = 0x8A;
/// ZigBee transmit status.
pub const API_TRANSMIT_STATUS: u8 = 0x8B;
/// ZigBee receive packet (AO=0).
pub const API_RECEIVE_PACKET: u8 = 0x90;
/// ZigBee explicit RX indicator (AO=1).
pub const API_EXPLICIT_RX_INDICATOR: u8 = 0x91;
/// ZigBee IO data sample RX indicator.
pub const API_IO_SAMPLE_INDICATOR: u8 = 0x92;
/// XBee sensor read indicator (AO=0).
pub const API_SENSOR_READ_INDICATOR: u8 = 0x94;
/// Node identification indicator (AO=0).
pub const API_NODE_IDENTIFICATION: u8 = 0x95;
/// Remote command response.
pub const API_REMOTE_COMMAND_RESPONSE: u8 = 0x97;
/// Over-the-air firmware update status.
pub const API_OTA_UPDATE_STATUS: u8 = 0xA0;
/// Route record indicator.
pub const API_ROUTE_RECORD: u8 = 0xA1;
/// Many-to-one route request indicator.
pub const API_MANY_TO_ONE_ROUTE_REQUEST: u8 = 0xA3;

// ============================================================================
// AT Command Status Codes
// ============================================================================

/// Command accepted.
pub const AT_STATUS_OK: u8 = 0;
/// Command failed.
pub const AT_STATUS_ERROR: u8 = 1;
/// Mnemonic not recognised.
pub const AT_STATUS_INVALID_COMMAND: u8 = 2;
/// Parameter rejected.
pub const AT_STATUS_INVALID_PARAMETER: u8 = 3;
/// Remote command could not be delivered.
pub const AT_STATUS_TX_FAILURE: u8 = 4;

// ============================================================================
// Frame Layout
// ============================================================================

/// Frame id used for outbound AT commands unless one is given explicitly.
pub const DEFAULT_FRAME_ID: u8 = 0x01;

/// Minimum IO sample payload (without digital samples).
pub const IO_SAMPLE_MIN_LEN: usize = 15;

/// IO sample payload when the digital mask is non-zero.
pub const IO_SAMPLE_WITH_DIGITAL_LEN: usize = 17;

/// Minimum AT command response payload: frame id, mnemonic, status.
pub const AT_RESPONSE_MIN_LEN: usize = 4;

/// Human readable name for a frame type, if it is one the firmware documents.
pub fn frame_type_name(frame_type: u8) -> Option<&'static str> {
    let name = match frame_type {
        API_AT_COMMAND => "AT Command",
        API_AT_COMMAND_QUEUE => "AT Command - Queue Parameter Value",
        API_TRANSMIT_REQUEST => "ZigBee Transmit Request",
        API_EXPLICIT_ADDRESSING => "Explicit Addressing ZigBee Command Frame",
        API_REMOTE_COMMAND_REQUEST => "Remote Command Request",
        API_CREATE_SOURCE_ROUTE => "Create Source Route",
        API_AT_COMMAND_RESPONSE => "AT Command Response",
        API_MODEM_STATUS => "Modem Status",
        API_TRANSMIT_STATUS => "ZigBee Transmit Status",
        API_RECEIVE_PACKET => "ZigBee Receive Packet (AO=0)",
        API_EXPLICIT_RX_INDICATOR => "ZigBee Explicit Rx Indicator (AO=1)",
        API_IO_SAMPLE_INDICATOR => "ZigBee IO Data Sample Rx Indicator",
        API_SENSOR_READ_INDICATOR => "XBee Sensor Read Indicator (AO=0)",
        API_NODE_IDENTIFICATION => "Node Identification Indicator (AO=0)",
        API_REMOTE_COMMAND_RESPONSE => "Remote Command Response",
        API_OTA_UPDATE_STATUS => "Over-the-Air Firmware Update Status",
        API_ROUTE_RECORD => "Route Record Indicator",
        API_MANY_TO_ONE_ROUTE_REQUEST => "Many-to-One Route Request Indicator",
        _ => return None,
    };
    Some(name)
}
