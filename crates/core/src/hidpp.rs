//! HID++ report framing.
//!
//! HID++ uses two report formats:
//! - Short reports: 7 bytes (report ID 0x10)
//! - Long reports: 20 bytes (report ID 0x11)
//!
//! The report ID in byte 0 decides how many bytes of a frame are significant.
//! Writing or reading a frame whose length disagrees with its report ID is a
//! protocol violation.
//!
//! Protocol reference: libratbag (MIT) and Solaar (GPLv2, protocol knowledge only).

use crate::error::{Error, Result};

/// HID++ report ID for short messages (7 bytes total).
pub const SHORT_REPORT_ID: u8 = 0x10;
/// HID++ report ID for long messages (20 bytes total).
pub const LONG_REPORT_ID: u8 = 0x11;

/// Short report length (including report ID).
pub const SHORT_REPORT_LEN: usize = 7;
/// Long report length (including report ID).
pub const LONG_REPORT_LEN: usize = 20;

/// Size of the buffer backing any HID++ frame.
pub const FRAME_SIZE: usize = LONG_REPORT_LEN;

/// Short or long HID++ framing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportType {
    Short,
    Long,
}

impl ReportType {
    /// Look up the framing for a report ID.
    pub fn from_report_id(report_id: u8) -> Option<Self> {
        match report_id {
            SHORT_REPORT_ID => Some(Self::Short),
            LONG_REPORT_ID => Some(Self::Long),
            _ => None,
        }
    }

    /// Report ID byte carried at offset 0.
    pub fn report_id(self) -> u8 {
        match self {
            Self::Short => SHORT_REPORT_ID,
            Self::Long => LONG_REPORT_ID,
        }
    }

    /// Number of significant bytes, report ID included.
    pub fn frame_len(self) -> usize {
        match self {
            Self::Short => SHORT_REPORT_LEN,
            Self::Long => LONG_REPORT_LEN,
        }
    }

    /// Determine the framing of a raw report and check it is complete.
    ///
    /// Returns the report type and the significant bytes of `data`.
    pub fn split(data: &[u8]) -> Result<(Self, &[u8])> {
        let Some(&report_id) = data.first() else {
            return Err(Error::Hid("empty report".into()));
        };

        let report_type = Self::from_report_id(report_id)
            .ok_or_else(|| Error::Hid(format!("unknown report ID: 0x{report_id:02X}")))?;

        if data.len() < report_type.frame_len() {
            return Err(Error::Hid(format!(
                "incomplete report: got {} bytes, expected {}",
                data.len(),
                report_type.frame_len()
            )));
        }

        Ok((report_type, &data[..report_type.frame_len()]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_id_selects_length() {
        assert_eq!(ReportType::from_report_id(0x10), Some(ReportType::Short));
        assert_eq!(ReportType::from_report_id(0x11), Some(ReportType::Long));
        assert_eq!(ReportType::Short.frame_len(), 7);
        assert_eq!(ReportType::Long.frame_len(), 20);
        assert_eq!(ReportType::Long.report_id(), LONG_REPORT_ID);
    }

    #[test]
    fn unknown_report_id_rejected() {
        assert_eq!(ReportType::from_report_id(0x20), None);
        let data = [0x99, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06];
        assert!(ReportType::split(&data).is_err());
    }

    #[test]
    fn split_trims_to_significant_bytes() {
        let mut data = vec![SHORT_REPORT_ID, 0xFF, 0x8F, 0x83, 0xB5, 0x03, 0x00];
        data.resize(FRAME_SIZE, 0xEE);
        let (kind, frame) = ReportType::split(&data).unwrap();
        assert_eq!(kind, ReportType::Short);
        assert_eq!(frame.len(), SHORT_REPORT_LEN);
    }

    #[test]
    fn split_rejects_truncated_long_report() {
        let data = [LONG_REPORT_ID, 0xFF, 0x83, 0xB5, 0x20, 0x00, 0x00];
        assert!(ReportType::split(&data).is_err());
    }

    #[test]
    fn split_rejects_empty() {
        assert!(ReportType::split(&[]).is_err());
    }
}
