//! hidpp-receiver-core: HID++ receiver framing and paired-device identity probe.
//!
//! A device connected through a Logitech wireless receiver shows up with the
//! receiver's USB identity. This crate asks the receiver for the real product
//! ID and name of the first paired device and stores them in a device record.

pub mod comm;
pub mod config;
pub mod device;
pub mod error;
pub mod hidpp;
pub mod identity;
pub mod message;
pub mod probe;
pub mod transport;

/// Logitech USB Vendor ID.
pub const LOGITECH_VID: u16 = 0x046D;

/// Known Logitech receiver product IDs.
pub mod pids {
    /// Unifying receiver.
    pub const UNIFYING_C52B: u16 = 0xC52B;
    /// Unifying receiver (second revision).
    pub const UNIFYING_C532: u16 = 0xC532;
    /// Nano receiver.
    pub const NANO_C534: u16 = 0xC534;
    /// Lightspeed receiver.
    pub const LIGHTSPEED_C539: u16 = 0xC539;
    /// Lightspeed receiver.
    pub const LIGHTSPEED_C53A: u16 = 0xC53A;
    /// Lightspeed receiver.
    pub const LIGHTSPEED_C53F: u16 = 0xC53F;
    /// Lightspeed receiver.
    pub const LIGHTSPEED_C547: u16 = 0xC547;
}
