//! DM19 (Calibration information)

use std::fmt::{Display, Formatter};

use crate::codec::{ascii, trim_ascii_field};
use crate::j1939::{ModuleName, PGN_DM19, RawMessage, exact_records};
use crate::DecodeResult;

const CALIBRATION_RECORD_SIZE: usize = 20;

/// A single calibration of a module
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalibrationInformation {
    /// Calibration identification (Up to 16 characters)
    pub calibration_identification: String,
    /// Calibration verification number
    pub calibration_verification_number: u32,
}

impl CalibrationInformation {
    fn from_record(record: &[u8; CALIBRATION_RECORD_SIZE]) -> Self {
        Self {
            calibration_verification_number: u32::from_le_bytes([
                record[0], record[1], record[2], record[3],
            ]),
            calibration_identification: trim_ascii_field(&ascii(&record[4..])).to_string(),
        }
    }
}

impl Display for CalibrationInformation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CAL ID of {} and CVN of 0x{:08X}",
            self.calibration_identification, self.calibration_verification_number
        )
    }
}

/// Decoded DM19 message
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalibrationInformationPacket {
    /// Address of the module that sent the message
    pub source_address: u8,
    /// Calibrations, in the order they were sent
    pub calibrations: Vec<CalibrationInformation>,
}

impl CalibrationInformationPacket {
    /// Decodes a DM19 message. The message must hold a whole number of 20 byte calibration records
    pub fn decode(msg: &RawMessage) -> DecodeResult<Self> {
        msg.expect_pgn(PGN_DM19)?;
        let calibrations = exact_records::<CALIBRATION_RECORD_SIZE>(PGN_DM19, &msg.data)?
            .map(CalibrationInformation::from_record)
            .collect();
        Ok(Self {
            source_address: msg.source_address,
            calibrations,
        })
    }
}

impl Display for CalibrationInformationPacket {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "DM19 from {}: ", ModuleName(self.source_address))?;
        match self.calibrations.as_slice() {
            [] => write!(f, "No Calibrations"),
            [single] => write!(f, "{single}"),
            many => {
                writeln!(f, "[")?;
                for cal in many {
                    writeln!(f, "  {cal}")?;
                }
                write!(f, "]")
            }
        }
    }
}
