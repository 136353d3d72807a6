//! Error classification for receiver communication.
//!
//! Nothing in this crate retries; callers use the class to decide whether to
//! probe again, give up on the device, or tell the user what to fix.

use crate::error::Error;
use std::io::ErrorKind;

/// Classification of communication errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Transient errors that may succeed if the probe is run again.
    Transient,
    /// Receiver is disconnected.
    Disconnected,
    /// Permission denied opening or talking to the hidraw node.
    PermissionDenied,
    /// Receiver returned an error report.
    Protocol,
    /// Corrupted or unexpected data.
    InvalidResponse,
    /// The receiver answered but no paired device identity was available.
    Identity,
}

impl ErrorClass {
    /// Classify an error.
    pub fn classify(err: &Error) -> Self {
        match err {
            Error::Timeout(_) => Self::Transient,
            Error::PermissionDenied(_) => Self::PermissionDenied,
            Error::DeviceNotFound(_) => Self::Disconnected,
            Error::ReceiverProtocol { .. } => Self::Protocol,
            Error::InvalidIdentity | Error::NameUnavailable => Self::Identity,
            Error::Io { source, .. } => match source.kind() {
                ErrorKind::PermissionDenied => Self::PermissionDenied,
                ErrorKind::TimedOut | ErrorKind::Interrupted | ErrorKind::WouldBlock => {
                    Self::Transient
                }
                ErrorKind::NotFound | ErrorKind::BrokenPipe => Self::Disconnected,
                // ENODEV is what hidraw returns after the receiver is unplugged.
                _ if source.raw_os_error() == Some(19) => Self::Disconnected,
                _ => Self::InvalidResponse,
            },
            Error::Hid(msg) => {
                let lower = msg.to_lowercase();
                if lower.contains("disconnect")
                    || lower.contains("not found")
                    || lower.contains("no such device")
                {
                    Self::Disconnected
                } else if lower.contains("permission")
                    || lower.contains("access denied")
                    || lower.contains("access is denied")
                {
                    Self::PermissionDenied
                } else if lower.contains("timeout") || lower.contains("timed out") {
                    Self::Transient
                } else {
                    Self::InvalidResponse
                }
            }
            Error::UnexpectedResponse(_) | Error::Config(_) => Self::InvalidResponse,
        }
    }

    /// Short user-facing hint for this class.
    pub fn hint(&self) -> &'static str {
        match self {
            Self::Transient => "the receiver did not answer in time; try again",
            Self::Disconnected => "the receiver is not connected",
            Self::PermissionDenied => "no access to the hidraw device; check udev rules",
            Self::Protocol => "the receiver rejected the request",
            Self::InvalidResponse => "the receiver sent an unexpected response",
            Self::Identity => "no paired device answered; wake the device and try again",
        }
    }
}
