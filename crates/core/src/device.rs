//! Device model: receiver discovery and the device record the probe fills in.

use crate::error::{Error, Result};
use crate::{pids, LOGITECH_VID};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// HID usage page of the HID++ vendor collection.
pub const HIDPP_USAGE_PAGE: u16 = 0xFF00;

/// Supported Logitech receiver models.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiverModel {
    Unifying,
    Nano,
    Lightspeed,
}

impl ReceiverModel {
    /// Look up model from USB product ID.
    pub fn from_pid(pid: u16) -> Option<Self> {
        match pid {
            pids::UNIFYING_C52B | pids::UNIFYING_C532 => Some(Self::Unifying),
            pids::NANO_C534 => Some(Self::Nano),
            pids::LIGHTSPEED_C539
            | pids::LIGHTSPEED_C53A
            | pids::LIGHTSPEED_C53F
            | pids::LIGHTSPEED_C547 => Some(Self::Lightspeed),
            _ => None,
        }
    }

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unifying => "Logitech Unifying Receiver",
            Self::Nano => "Logitech Nano Receiver",
            Self::Lightspeed => "Logitech Lightspeed Receiver",
        }
    }
}

/// Information about a discovered receiver interface.
#[derive(Debug, Clone)]
pub struct ReceiverInfo {
    pub model: ReceiverModel,
    pub vid: u16,
    pub pid: u16,
    pub path: String,
    pub usage_page: u16,
    pub interface_number: i32,
}

impl ReceiverInfo {
    /// Build from a hidapi device entry; `None` unless it is a known receiver.
    pub fn from_hid_info(info: &hidapi::DeviceInfo) -> Option<Self> {
        if info.vendor_id() != LOGITECH_VID {
            return None;
        }
        let model = ReceiverModel::from_pid(info.product_id())?;
        Some(Self {
            model,
            vid: info.vendor_id(),
            pid: info.product_id(),
            path: info.path().to_string_lossy().into_owned(),
            usage_page: info.usage_page(),
            interface_number: info.interface_number(),
        })
    }

    /// Whether this interface is the HID++ vendor collection.
    pub fn is_hidpp_interface(&self) -> bool {
        self.usage_page == HIDPP_USAGE_PAGE
    }
}

/// Discover all connected Logitech receivers.
///
/// Enumerates USB HID devices and returns every interface of a recognized
/// receiver, HID++ interfaces first.
pub fn discover_receivers() -> Result<Vec<ReceiverInfo>> {
    debug!("Starting HID device enumeration");
    let api = hidapi::HidApi::new().map_err(|e| Error::Hid(e.to_string()))?;

    let mut receivers = Vec::new();
    for info in api.device_list() {
        if let Some(receiver) = ReceiverInfo::from_hid_info(info) {
            info!(
                model = receiver.model.name(),
                vid = format_args!("0x{:04X}", receiver.vid),
                pid = format_args!("0x{:04X}", receiver.pid),
                usage_page = format_args!("0x{:04X}", receiver.usage_page),
                path = %receiver.path,
                "Found Logitech receiver"
            );
            receivers.push(receiver);
        }
    }

    sort_hidpp_first(&mut receivers);
    debug!(count = receivers.len(), "Receiver enumeration complete");
    Ok(receivers)
}

/// Pick the receiver to talk to: the first entry of a discovery result.
pub fn first_receiver(receivers: &[ReceiverInfo]) -> Result<&ReceiverInfo> {
    receivers
        .first()
        .ok_or_else(|| Error::DeviceNotFound("no supported Logitech receiver".into()))
}

/// Map a failure to open `path` onto the error the CLI reports.
pub fn open_error(path: &str, message: &str) -> Error {
    let lower = message.to_lowercase();
    if lower.contains("permission")
        || lower.contains("access denied")
        || lower.contains("access is denied")
    {
        Error::PermissionDenied(format!("{path}: {message}"))
    } else if lower.contains("no such") || lower.contains("not found") {
        Error::DeviceNotFound(format!("{path}: {message}"))
    } else {
        Error::Hid(format!("open {path}: {message}"))
    }
}

fn sort_hidpp_first(receivers: &mut [ReceiverInfo]) {
    // Stable: enumeration order is kept within each group.
    receivers.sort_by_key(|r| !r.is_hidpp_interface());
}

/// Real identity of a paired device as resolved through its receiver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedIdentity {
    /// Wireless product ID of the paired device.
    pub product_id: u16,
    /// Display name, `"Logitech <name> wireless"`.
    pub name: String,
}

/// Record describing a device reached through a receiver.
///
/// Starts out with the receiver's own USB identity; a successful probe
/// replaces `product_id` and `name` with the paired device's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub vid: u16,
    pub product_id: u16,
    pub name: String,
    pub path: String,
}

impl DeviceRecord {
    /// Record seeded from a discovered receiver.
    pub fn from_receiver(info: &ReceiverInfo) -> Self {
        Self::from_usb(info.vid, info.pid, &info.path, None)
    }

    /// Record seeded from the USB identity of an opened device.
    ///
    /// Known receivers get their model name; anything else falls back to the
    /// product string reported by the device.
    pub fn from_usb(vid: u16, pid: u16, path: &str, product: Option<&str>) -> Self {
        let name = match ReceiverModel::from_pid(pid) {
            Some(model) if vid == LOGITECH_VID => model.name().to_string(),
            _ => product.unwrap_or("Unknown HID device").to_string(),
        };
        Self {
            vid,
            product_id: pid,
            name,
            path: path.to_string(),
        }
    }

    /// Replace the stored identity in one step; the previous name is dropped.
    pub fn apply_identity(&mut self, identity: ResolvedIdentity) {
        self.product_id = identity.product_id;
        self.name = identity.name;
    }
}
