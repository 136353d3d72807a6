//! Identity probe for devices connected through a receiver.
//!
//! Steps, no retries, first failure wins:
//! 1. Read the real ID; a failed read or an ID of zero aborts the probe
//! 2. Read the real name; a failed read aborts the probe
//! 3. Commit ID and name to the device record together
//!
//! On failure the record keeps its pre-probe contents.

use crate::device::{DeviceRecord, ResolvedIdentity};
use crate::error::{Error, Result};
use crate::identity::{read_real_id, read_real_name};
use crate::transport::HidTransport;
use tracing::{debug, error, info};

/// Resolve the real identity of the first paired device and store it in `record`.
///
/// Transport and protocol failures from the queries are logged and reported
/// as [`Error::InvalidIdentity`] or [`Error::NameUnavailable`].
pub fn extended_probe(
    transport: &dyn HidTransport,
    record: &mut DeviceRecord,
) -> Result<ResolvedIdentity> {
    debug!("device is wireless, resolving real identity through receiver");

    let product_id = match read_real_id(transport) {
        Ok(0) => {
            error!("receiver reported device id 0");
            return Err(Error::InvalidIdentity);
        }
        Ok(id) => id,
        Err(e) => {
            error!(error = %e, "unable to get real device from receiver");
            return Err(Error::InvalidIdentity);
        }
    };

    let name = read_real_name(transport).map_err(|e| {
        error!(error = %e, "unable to read real name from device");
        Error::NameUnavailable
    })?;

    let identity = ResolvedIdentity { product_id, name };
    record.apply_identity(identity.clone());

    info!(
        product_id = format_args!("0x{:04X}", identity.product_id),
        name = %identity.name,
        "Resolved paired device"
    );
    Ok(identity)
}
