//! Module for J1939-73 Diagnostic trouble code data

use crate::codec::{fmi_from_byte, spn_from_bytes};
use crate::slot::SpnNameLookup;
use std::fmt::{Display, Formatter};

/// Size of a single DTC record on the wire
pub const DTC_RECORD_SIZE: usize = 4;

/// Diagnostic trouble code (DTC) storage struct
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiagnosticTroubleCode {
    /// Suspect parameter number (0..524287)
    pub spn: u32,
    /// Failure mode identifier (0..31)
    pub fmi: u8,
    /// Number of times the fault has been detected (0..127)
    pub occurrence_count: u8,
}

impl DiagnosticTroubleCode {
    /// Decodes a single 4 byte DTC record.
    ///
    /// Returns `None` if the record does not describe a DTC. That is the case
    /// for a zero SPN, and for the all `0xFF` "no data" record
    pub fn from_record(record: &[u8; DTC_RECORD_SIZE]) -> Option<Self> {
        if record.iter().all(|b| *b == 0xFF) {
            return None;
        }
        let spn = spn_from_bytes(record[0], record[1], record[2]);
        if spn == 0 {
            return None;
        }
        Some(Self {
            spn,
            fmi: fmi_from_byte(record[2]),
            occurrence_count: record[3] & 0x7F,
        })
    }

    /// Formats the DTC with the SPN's name from `names`
    pub fn to_report_string(&self, names: &dyn SpnNameLookup) -> String {
        format!(
            "DTC: {} ({}) {} ({}) {} times",
            names.spn_name(self.spn).unwrap_or_else(|| "Unknown".into()),
            self.spn,
            fmi_description(self.fmi),
            self.fmi,
            self.occurrence_count
        )
    }
}

impl Display for DiagnosticTroubleCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "DTC: SPN {} {} ({}) {} times",
            self.spn,
            fmi_description(self.fmi),
            self.fmi,
            self.occurrence_count
        )
    }
}

/// Parses a list of DTCs out of a trouble code message body (Lamp bytes already removed).
///
/// The body is scanned in 4 byte records. Records which don't hold a DTC are skipped,
/// and any trailing bytes that do not make up a whole record are ignored
pub fn parse_dtcs(body: &[u8]) -> Vec<DiagnosticTroubleCode> {
    body.chunks_exact(DTC_RECORD_SIZE)
        .filter_map(|c| c.try_into().ok())
        .filter_map(|record: &[u8; DTC_RECORD_SIZE]| {
            let dtc = DiagnosticTroubleCode::from_record(record);
            if dtc.is_none() {
                log::trace!("Skipping empty DTC record {record:02X?}");
            }
            dtc
        })
        .collect()
}

/// Returns the SAE J1939-73 description of a failure mode identifier
pub fn fmi_description(fmi: u8) -> &'static str {
    match fmi {
        0 => "Data Valid But Above Normal Operational Range - Most Severe Level",
        1 => "Data Valid But Below Normal Operational Range - Most Severe Level",
        2 => "Data Erratic, Intermittent Or Incorrect",
        3 => "Voltage Above Normal, Or Shorted To High Source",
        4 => "Voltage Below Normal, Or Shorted To Low Source",
        5 => "Current Below Normal Or Open Circuit",
        6 => "Current Above Normal Or Grounded Circuit",
        7 => "Mechanical System Not Responding Or Out Of Adjustment",
        8 => "Abnormal Frequency Or Pulse Width Or Period",
        9 => "Abnormal Update Rate",
        10 => "Abnormal Rate Of Change",
        11 => "Root Cause Not Known",
        12 => "Bad Intelligent Device Or Component",
        13 => "Out Of Calibration",
        14 => "Special Instructions",
        15 => "Data Valid But Above Normal Operating Range - Least Severe Level",
        16 => "Data Valid But Above Normal Operating Range - Moderately Severe Level",
        17 => "Data Valid But Below Normal Operating Range - Least Severe Level",
        18 => "Data Valid But Below Normal Operating Range - Moderately Severe Level",
        19 => "Received Network Data In Error",
        20 => "Data Drifted High",
        21 => "Data Drifted Low",
        31 => "Condition Exists",
        _ => "Reserved For SAE Assignment",
    }
}

#[cfg(test)]
pub mod dtc_test {
    use super::*;
    use crate::slot::SpnNameTable;

    #[test]
    fn test_single_dtc() {
        let dtcs = parse_dtcs(&[0x61, 0x02, 0x13, 0x00]);
        assert_eq!(
            dtcs,
            vec![DiagnosticTroubleCode {
                spn: 609,
                fmi: 19,
                occurrence_count: 0
            }]
        );
    }

    #[test]
    fn test_excluded_records() {
        // Zero SPN
        assert!(parse_dtcs(&[0x00, 0x00, 0x00, 0x00]).is_empty());
        assert!(parse_dtcs(&[0x00, 0x00, 0x1F, 0x05]).is_empty());
        // No data record
        assert!(parse_dtcs(&[0xFF, 0xFF, 0xFF, 0xFF]).is_empty());
        // Partial trailing record
        assert!(parse_dtcs(&[0x61, 0x02, 0x13]).is_empty());
    }

    #[test]
    fn test_excluded_records_keep_order() {
        let dtcs = parse_dtcs(&[
            0xBE, 0x00, 0x00, 0x01, // SPN 190
            0xFF, 0xFF, 0xFF, 0xFF, // No data
            0x61, 0x02, 0x13, 0x02, // SPN 609
            0x00, 0x00, 0x00, 0x00, // Zero SPN
            0x6E, 0x00, 0x00, // Partial
        ]);
        let spns: Vec<u32> = dtcs.iter().map(|d| d.spn).collect();
        assert_eq!(spns, vec![190, 609]);
        assert_eq!(dtcs[1].occurrence_count, 2);
    }

    #[test]
    fn test_occurrence_count_masks_conversion_bit() {
        let dtcs = parse_dtcs(&[0xBE, 0x00, 0x00, 0x85]);
        assert_eq!(dtcs.len(), 1);
        assert_eq!(dtcs[0].spn, 190);
        assert_eq!(dtcs[0].occurrence_count, 5);
    }

    #[test]
    fn test_high_spn_bits() {
        let dtcs = parse_dtcs(&[
            0x01, 0x00, 0xE3, 0x01, 0x00, 0x00, 0x00, 0x00, 0x9C, 0x0E, 0x20, 0x7F,
        ]);
        assert_eq!(dtcs.len(), 2);
        assert_eq!(dtcs[0].spn, 0x70001);
        assert_eq!(dtcs[0].fmi, 3);
        assert_eq!(dtcs[1].spn, 0x10E9C);
        assert_eq!(dtcs[1].fmi, 0);
        assert_eq!(dtcs[1].occurrence_count, 127);
    }

    #[test]
    fn test_dtc_report_string() {
        let mut names = SpnNameTable::default();
        names.insert(609, "Controller #2");
        let dtc = DiagnosticTroubleCode {
            spn: 609,
            fmi: 19,
            occurrence_count: 1,
        };
        assert_eq!(
            dtc.to_report_string(&names),
            "DTC: Controller #2 (609) Received Network Data In Error (19) 1 times"
        );
        assert_eq!(
            dtc.to_string(),
            "DTC: SPN 609 Received Network Data In Error (19) 1 times"
        );
    }
}
