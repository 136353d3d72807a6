//! HID transport abstraction and the receiver request/response exchange.
//!
//! Provides a trait-based transport layer so that real HID devices and
//! mock devices share the same interface.

use crate::error::Result;
use crate::hidpp::ReportType;
use crate::message::{ReceiverRequest, ReceiverResponse};
use tracing::trace;

/// Abstraction over raw HID read/write.
///
/// The receiver protocol carries no request tag: a response is matched to
/// its request only by call order, so callers must not interleave exchanges
/// on one transport.
pub trait HidTransport: Send {
    /// Write one raw HID report (7 or 20 bytes).
    fn write_report(&self, data: &[u8]) -> Result<()>;

    /// Read one raw HID report, expected to use `expected` framing.
    fn read_report(&self, expected: ReportType) -> Result<Vec<u8>>;
}

/// Send a receiver request and decode its response.
///
/// Writes the request with the length its own report ID selects, then reads
/// exactly one long report. A write failure returns before anything is read.
pub fn receiver_request(
    transport: &dyn HidTransport,
    req: &ReceiverRequest,
) -> Result<ReceiverResponse> {
    let encoded = req.encode();
    trace!(
        sub_id = format_args!("0x{:02X}", req.sub_id),
        register = format_args!("0x{:02X}", req.register),
        opcode = format_args!("0x{:02X}", req.paired_device_index),
        report_hex = format_args!("{:02X?}", encoded),
        "HID++ receiver TX"
    );

    transport.write_report(&encoded)?;

    // Register reads are always answered with a long report.
    let raw = transport.read_report(ReportType::Long)?;
    trace!(report_hex = format_args!("{:02X?}", raw), "HID++ receiver RX");

    ReceiverResponse::decode(req, &raw)
}


#[cfg(test)]
mod tests {
    use super::mock::{Call, MockTransport};
    use super::*;
    use crate::error::{Error, IoOp};
    use crate::hidpp::SHORT_REPORT_LEN;
    use crate::message::ReceiverCommand;

    const EIO: i32 = 5;

    #[test]
    fn exchange_writes_short_and_reads_long() {
        let mock = MockTransport::new();
        mock.push_pairing_info(0xC08D);

        let req = ReceiverRequest::for_command(ReceiverCommand::GetFirstDeviceId);
        let resp = receiver_request(&mock, &req).unwrap();
        assert!(matches!(resp, ReceiverResponse::PairingInfo(ref p) if p.wireless_id == 0xC08D));

        let calls = mock.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], Call::Write(req.encode()));
        assert_eq!(calls[1], Call::Read(ReportType::Long));
        let Call::Write(ref written) = calls[0] else {
            unreachable!()
        };
        assert_eq!(written.len(), SHORT_REPORT_LEN);
    }

    #[test]
    fn write_failure_short_circuits_read() {
        let mock = MockTransport::new();
        mock.fail_next_write(EIO);
        mock.push_pairing_info(0xC08D);

        let req = ReceiverRequest::for_command(ReceiverCommand::GetFirstDeviceId);
        let err = receiver_request(&mock, &req).unwrap_err();
        assert!(matches!(err, Error::Io { op: IoOp::Write, .. }));
        assert_eq!(err.io_code(), Some(EIO));
        assert_eq!(mock.write_count(), 1);
        assert_eq!(mock.read_count(), 0);
    }

    #[test]
    fn read_failure_surfaces_code() {
        let mock = MockTransport::new();
        mock.push_read_failure(EIO);

        let req = ReceiverRequest::for_command(ReceiverCommand::GetFirstDeviceName);
        let err = receiver_request(&mock, &req).unwrap_err();
        assert!(matches!(err, Error::Io { op: IoOp::Read, .. }));
        assert_eq!(err.io_code(), Some(EIO));
        assert_eq!(mock.write_count(), 1);
        assert_eq!(mock.read_count(), 1);
    }

    #[test]
    fn exchange_never_retries() {
        let mock = MockTransport::new();
        mock.push_read_failure(EIO);
        mock.push_pairing_info(0x1234);

        let req = ReceiverRequest::for_command(ReceiverCommand::GetFirstDeviceId);
        assert!(receiver_request(&mock, &req).is_err());
        assert_eq!(mock.calls().len(), 2);
    }
}
