//! Real identity queries for the first device paired to a receiver.
//!
//! A receiver reports its own USB product ID; the paired device is only
//! reachable through receiver register 0xB5:
//!   - opcode 0x20: pairing information → bytes 7..9 = wireless PID (big-endian)
//!   - opcode 0x40: peer name → byte 5 = length, bytes 6..20 = name
//!
//! Protocol reference: libratbag (MIT), Solaar (protocol knowledge only).

use crate::error::{Error, Result};
use crate::message::{ReceiverCommand, ReceiverRequest, ReceiverResponse, MAX_NAME_LEN};
use crate::transport::{receiver_request, HidTransport};
use tracing::debug;

const NAME_PREFIX: &str = "Logitech ";
const NAME_SUFFIX: &str = " wireless";

/// Capacity of the display name buffer, terminator included.
///
/// Equal to `strlen("Logitech %s wireless") + MAX_NAME_LEN`; a display name
/// never exceeds `NAME_BUFFER_LEN - 1` bytes.
pub const NAME_BUFFER_LEN: usize =
    NAME_PREFIX.len() + "%s".len() + NAME_SUFFIX.len() + MAX_NAME_LEN;

/// Read the wireless product ID of the first paired device.
///
/// The ID is returned as the receiver reports it; zero is not rejected here.
pub fn read_real_id(transport: &dyn HidTransport) -> Result<u16> {
    let req = ReceiverRequest::for_command(ReceiverCommand::GetFirstDeviceId);

    let resp = receiver_request(transport, &req).inspect_err(|e| {
        debug!(error = %e, "real device id exchange failed");
    })?;

    match resp {
        ReceiverResponse::PairingInfo(info) => {
            debug!(
                wireless_id = format_args!("{:04x}", info.wireless_id),
                device_type = info.device_type,
                "real device id read"
            );
            Ok(info.wireless_id)
        }
        other => Err(Error::UnexpectedResponse(format!(
            "expected pairing information, got {other:?}"
        ))),
    }
}

/// Read the display name of the first paired device.
///
/// Returns `"Logitech <name> wireless"`.
pub fn read_real_name(transport: &dyn HidTransport) -> Result<String> {
    let req = ReceiverRequest::for_command(ReceiverCommand::GetFirstDeviceName);

    let resp = receiver_request(transport, &req).inspect_err(|e| {
        debug!(error = %e, "real device name exchange failed");
    })?;

    match resp {
        ReceiverResponse::PeerName(peer) => {
            let name = format_display_name(peer.raw_name());
            debug!(name = %name, "real device name read");
            Ok(name)
        }
        other => Err(Error::UnexpectedResponse(format!(
            "expected peer name, got {other:?}"
        ))),
    }
}

/// Format raw name bytes into the display name.
///
/// The result is truncated to `NAME_BUFFER_LEN - 1` bytes on a character
/// boundary and never contains a NUL.
pub fn format_display_name(raw: &[u8]) -> String {
    let raw = match raw.iter().position(|&b| b == 0) {
        Some(nul) => &raw[..nul],
        None => raw,
    };
    let mut name = format!("{NAME_PREFIX}{}{NAME_SUFFIX}", String::from_utf8_lossy(raw));

    let max = NAME_BUFFER_LEN - 1;
    if name.len() > max {
        let mut end = max;
        while !name.is_char_boundary(end) {
            end -= 1;
        }
        name.truncate(end);
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IoOp;
    use crate::transport::mock::MockTransport;

    const EIO: i32 = 5;

    #[test]
    fn name_buffer_len_matches_template() {
        assert_eq!(NAME_BUFFER_LEN, "Logitech %s wireless".len() + 14);
    }

    #[test]
    fn read_real_id_decodes_big_endian() {
        for id in [0x0001u16, 0x0042, 0x1234, 0x407D, 0xC08D, 0xFF00, 0xFFFF] {
            let mock = MockTransport::new();
            mock.push_pairing_info(id);
            assert_eq!(read_real_id(&mock).unwrap(), id);
        }
    }

    #[test]
    fn read_real_id_returns_zero_unjudged() {
        let mock = MockTransport::new();
        mock.push_pairing_info(0x0000);
        assert_eq!(read_real_id(&mock).unwrap(), 0);
    }

    #[test]
    fn read_real_id_write_failure() {
        let mock = MockTransport::new();
        mock.fail_next_write(EIO);
        let err = read_real_id(&mock).unwrap_err();
        assert!(matches!(err, Error::Io { op: IoOp::Write, .. }));
        assert_eq!(mock.read_count(), 0);
    }

    #[test]
    fn read_real_id_read_failure() {
        let mock = MockTransport::new();
        mock.push_read_failure(EIO);
        let err = read_real_id(&mock).unwrap_err();
        assert!(matches!(err, Error::Io { op: IoOp::Read, .. }));
    }

    #[test]
    fn read_real_id_rejects_receiver_error() {
        let mock = MockTransport::new();
        mock.push_response(vec![0x10, 0xFF, 0x8F, 0x83, 0xB5, 0x02, 0x00]);
        assert!(matches!(
            read_real_id(&mock),
            Err(Error::ReceiverProtocol { code: 0x02, .. })
        ));
    }

    #[test]
    fn read_real_name_ignores_padding_garbage() {
        let mock = MockTransport::new();
        mock.push_peer_name(b"G502", 0xA5);
        assert_eq!(read_real_name(&mock).unwrap(), "Logitech G502 wireless");
    }

    #[test]
    fn read_real_name_full_field_is_bounded() {
        let mock = MockTransport::new();
        mock.push_peer_name(b"ABCDEFGHIJKLMN", 0x41);
        let name = read_real_name(&mock).unwrap();
        assert_eq!(name, "Logitech ABCDEFGHIJKLMN wireless");
        assert!(name.len() < NAME_BUFFER_LEN);
        assert!(!name.contains('\0'));
    }

    #[test]
    fn read_real_name_read_failure() {
        let mock = MockTransport::new();
        mock.push_read_failure(EIO);
        assert!(read_real_name(&mock).is_err());
    }

    #[test]
    fn read_real_name_rejects_pairing_info() {
        let mock = MockTransport::new();
        mock.push_pairing_info(0x1234);
        assert!(matches!(
            read_real_name(&mock),
            Err(Error::UnexpectedResponse(_))
        ));
    }

    #[test]
    fn format_display_name_truncates_overlong_input() {
        let name = format_display_name(&[b'Z'; 40]);
        assert_eq!(name.len(), NAME_BUFFER_LEN - 1);
        assert!(name.starts_with("Logitech ZZZ"));
    }

    #[test]
    fn format_display_name_respects_char_boundaries() {
        // The byte limit falls inside the last two-byte character that fits.
        let raw = format!("a{}", "é".repeat(12));
        let name = format_display_name(raw.as_bytes());
        assert_eq!(name.len(), NAME_BUFFER_LEN - 2);
        assert!(name.ends_with('é'));
    }

    #[test]
    fn format_display_name_replaces_invalid_utf8() {
        let name = format_display_name(&[b'M', 0xFF, b'X']);
        assert_eq!(name, "Logitech M\u{FFFD}X wireless");
    }
}
