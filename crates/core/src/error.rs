//! Error types for hidpp-receiver-core.

use thiserror::Error;

/// Which half of a request/response exchange failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoOp {
    Write,
    Read,
}

impl std::fmt::Display for IoOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Write => f.write_str("write"),
            Self::Read => f.write_str("read"),
        }
    }
}

/// Core library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Transport write or read failed.
    #[error("transport {op} failed: {source}")]
    Io {
        op: IoOp,
        source: std::io::Error,
    },

    /// HID device communication or framing failure.
    #[error("HID error: {0}")]
    Hid(String),

    /// Device not found during enumeration.
    #[error("device not found: {0}")]
    DeviceNotFound(String),

    /// Receiver answered with a HID++ 1.0 error report.
    #[error("receiver error: register 0x{register:02X}, code 0x{code:02X}")]
    ReceiverProtocol { register: u8, code: u8 },

    /// Response does not decode as the requested shape.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// The receiver did not report a usable product ID for the paired device.
    #[error("invalid device identity from receiver")]
    InvalidIdentity,

    /// The receiver did not report a name for the paired device.
    #[error("device name unavailable from receiver")]
    NameUnavailable,

    /// Configuration file could not be read or parsed.
    #[error("config error: {0}")]
    Config(String),

    /// Permission denied opening the HID device.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Operation timed out.
    #[error("timeout: {0}")]
    Timeout(String),
}

impl Error {
    /// Shorthand for a transport failure wrapping an I/O error.
    pub fn io(op: IoOp, source: std::io::Error) -> Self {
        Self::Io { op, source }
    }

    /// OS error code of the underlying transport failure, if any.
    pub fn io_code(&self) -> Option<i32> {
        match self {
            Self::Io { source, .. } => source.raw_os_error(),
            _ => None,
        }
    }
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, Error>;
