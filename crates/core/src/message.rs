//! HID++ 1.0 receiver register messages.
//!
//! The receiver answers register 0xB5 (pairing information) reads on its own
//! channel (device index 0xFF). Two responses matter here:
//!
//! ```text
//! Pairing information (opcode 0x20 + n):
//!   [0] report ID  [1] 0xFF  [2] sub ID  [3] 0xB5  [4] opcode
//!   [5] destination ID  [6] default report rate
//!   [7..9] wireless PID (big-endian)  [9..11] reserved
//!   [11] device type  [12..20] reserved
//!
//! Peer name (opcode 0x40 + n):
//!   [0] report ID  [1] 0xFF  [2] sub ID  [3] 0xB5  [4] opcode
//!   [5] name length  [6..20] name bytes (not NUL-terminated)
//! ```
//!
//! Errors come back as a short report with sub ID 0x8F:
//! `[0x10, 0xFF, 0x8F, sub ID, register, error code, 0x00]`.

use crate::error::{Error, Result};
use crate::hidpp::{ReportType, FRAME_SIZE};

/// Maximum number of raw name bytes a peer name response carries.
pub const MAX_NAME_LEN: usize = 14;

/// HID++ 1.0 sub ID signalling an error report.
pub const ERROR_SUB_ID: u8 = 0x8F;

/// Receiver protocol constants.
///
/// Values must match the receiver firmware exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiverProtocol {
    /// Device index addressing the receiver itself.
    pub receiver_index: u8,
    /// Sub ID for a long register read.
    pub sub_id: u8,
    /// Pairing information register.
    pub register: u8,
    /// Opcode: pairing information for the first paired device.
    pub get_first_device_id: u8,
    /// Opcode: name of the first paired device.
    pub get_first_device_name: u8,
}

impl ReceiverProtocol {
    pub const DEFAULT: Self = Self {
        receiver_index: 0xFF,
        sub_id: 0x83,
        register: 0xB5,
        get_first_device_id: 0x20,
        get_first_device_name: 0x40,
    };
}

impl Default for ReceiverProtocol {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Receiver command kinds issued by the probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiverCommand {
    /// Read the pairing information (wireless PID) of the first paired device.
    GetFirstDeviceId,
    /// Read the name of the first paired device.
    GetFirstDeviceName,
}

impl ReceiverCommand {
    /// Opcode placed in the paired-device-index byte.
    pub fn opcode(self, protocol: &ReceiverProtocol) -> u8 {
        match self {
            Self::GetFirstDeviceId => protocol.get_first_device_id,
            Self::GetFirstDeviceName => protocol.get_first_device_name,
        }
    }
}

/// A receiver register read request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiverRequest {
    pub report_type: ReportType,
    pub device_index: u8,
    pub sub_id: u8,
    pub register: u8,
    pub paired_device_index: u8,
}

impl ReceiverRequest {
    /// Build the short request for a command using the given constants.
    pub fn new(command: ReceiverCommand, protocol: &ReceiverProtocol) -> Self {
        Self {
            report_type: ReportType::Short,
            device_index: protocol.receiver_index,
            sub_id: protocol.sub_id,
            register: protocol.register,
            paired_device_index: command.opcode(protocol),
        }
    }

    /// Build the request for a command with the standard receiver constants.
    pub fn for_command(command: ReceiverCommand) -> Self {
        Self::new(command, &ReceiverProtocol::DEFAULT)
    }

    /// Encode into a HID report, trimmed to the length of its report type.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = vec![0u8; self.report_type.frame_len()];
        buf[0] = self.report_type.report_id();
        buf[1] = self.device_index;
        buf[2] = self.sub_id;
        buf[3] = self.register;
        buf[4] = self.paired_device_index;
        buf
    }
}

/// Decoded pairing information for a paired device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairingInfo {
    pub paired_device_index: u8,
    pub destination_id: u8,
    pub default_report_rate: u8,
    /// Wireless product ID, already converted to host order.
    pub wireless_id: u16,
    pub device_type: u8,
}

/// Decoded peer name response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerName {
    pub paired_device_index: u8,
    /// Length byte as reported by the receiver.
    pub name_length: u8,
    /// Raw name field; bytes past `name_length` are unspecified.
    pub name_bytes: [u8; MAX_NAME_LEN],
}

impl PeerName {
    /// The meaningful part of the name field.
    ///
    /// Bounded by the reported length (a zero or oversized length covers the
    /// whole field) and cut at the first NUL.
    pub fn raw_name(&self) -> &[u8] {
        let len = match self.name_length as usize {
            0 => MAX_NAME_LEN,
            n => n.min(MAX_NAME_LEN),
        };
        let bytes = &self.name_bytes[..len];
        match bytes.iter().position(|&b| b == 0) {
            Some(nul) => &bytes[..nul],
            None => bytes,
        }
    }
}

/// A decoded receiver response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiverResponse {
    PairingInfo(PairingInfo),
    PeerName(PeerName),
}

impl ReceiverResponse {
    /// Decode a raw report as the answer to `req`.
    ///
    /// HID++ 1.0 error reports for the same register are turned into
    /// [`Error::ReceiverProtocol`].
    pub fn decode(req: &ReceiverRequest, data: &[u8]) -> Result<Self> {
        let (report_type, frame) = ReportType::split(data)?;

        if frame[1] != req.device_index {
            return Err(Error::UnexpectedResponse(format!(
                "device index 0x{:02X}, expected 0x{:02X}",
                frame[1], req.device_index
            )));
        }

        if frame[2] == ERROR_SUB_ID {
            // [3] failed sub ID, [4] register, [5] error code
            return Err(Error::ReceiverProtocol {
                register: frame[4],
                code: frame[5],
            });
        }

        if frame[2] != req.sub_id || frame[3] != req.register {
            return Err(Error::UnexpectedResponse(format!(
                "sub ID 0x{:02X} register 0x{:02X}, expected 0x{:02X} 0x{:02X}",
                frame[2], frame[3], req.sub_id, req.register
            )));
        }

        if report_type != ReportType::Long {
            return Err(Error::UnexpectedResponse(
                "register read answered with a short report".into(),
            ));
        }

        let opcode = frame[4];
        if opcode & 0xF0 != req.paired_device_index & 0xF0 {
            return Err(Error::UnexpectedResponse(format!(
                "opcode 0x{opcode:02X}, expected 0x{:02X}",
                req.paired_device_index
            )));
        }

        match opcode & 0xF0 {
            0x20 => Ok(Self::PairingInfo(PairingInfo {
                paired_device_index: opcode,
                destination_id: frame[5],
                default_report_rate: frame[6],
                wireless_id: u16::from_be_bytes([frame[7], frame[8]]),
                device_type: frame[11],
            })),
            0x40 => {
                let mut name_bytes = [0u8; MAX_NAME_LEN];
                name_bytes.copy_from_slice(&frame[6..6 + MAX_NAME_LEN]);
                Ok(Self::PeerName(PeerName {
                    paired_device_index: opcode,
                    name_length: frame[5],
                    name_bytes,
                }))
            }
            _ => Err(Error::UnexpectedResponse(format!(
                "unsupported opcode 0x{opcode:02X}"
            ))),
        }
    }
}

const _: () = assert!(6 + MAX_NAME_LEN == FRAME_SIZE);
