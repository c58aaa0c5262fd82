//! DM30 (Scaled test results)

use std::fmt::{Display, Formatter};

use crate::codec::{fmi_from_byte, group_thousands, spn_from_bytes};
use crate::j1939::{ModuleName, PGN_DM30, RawMessage, exact_records};
use crate::slot::{NoReferenceData, Slot, SlotLookup};
use crate::units::FormatOptions;
use crate::DecodeResult;

/// Size of a single scaled test result record
pub const SCALED_TEST_RESULT_SIZE: usize = 12;

/// High byte of a test value which carries a test status rather than a value
const TEST_STATUS_BYTE: u8 = 0xFB;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, strum_macros::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
/// Outcome of a test
pub enum TestResult {
    /// Value is within the test limits
    #[strum(serialize = "Test Passed")]
    Passed,
    /// Value is above the maximum or below the minimum
    #[strum(serialize = "Test Failed")]
    Failed,
    /// Test has not completed yet
    #[strum(serialize = "Test Not Complete")]
    NotComplete,
    /// Test cannot be performed
    #[strum(serialize = "Test Cannot Be Performed")]
    CannotBePerformed,
}

impl TestResult {
    /// Works out the result from the raw test value and limits
    pub fn from_raw(value: u16, maximum: u16, minimum: u16) -> Self {
        let [low, high] = value.to_le_bytes();
        if high == TEST_STATUS_BYTE {
            return match low {
                0x00 => Self::NotComplete,
                0x01 => Self::CannotBePerformed,
                other => {
                    log::warn!(
                        "Unknown test status 0xFB{other:02X}, treating as cannot be performed"
                    );
                    Self::CannotBePerformed
                }
            };
        }
        if (minimum..=maximum).contains(&value) {
            Self::Passed
        } else {
            Self::Failed
        }
    }

    /// Returns true if the test ran, and its value and limits are meaningful
    pub fn has_value(&self) -> bool {
        matches!(self, Self::Passed | Self::Failed)
    }
}

/// A single test result reported by a module
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScaledTestResult {
    /// Test identifier
    pub test_identifier: u8,
    /// SPN the test is for
    pub spn: u32,
    /// FMI the test is for
    pub fmi: u8,
    /// SLOT used to scale the value and limits
    pub slot_id: u16,
    /// Raw test value
    pub raw_value: u16,
    /// Raw maximum limit
    pub raw_maximum: u16,
    /// Raw minimum limit
    pub raw_minimum: u16,
    /// Test outcome
    pub result: TestResult,
}

impl ScaledTestResult {
    /// Decodes a 12 byte test result record
    pub fn from_record(record: &[u8; SCALED_TEST_RESULT_SIZE]) -> Self {
        let word = |i: usize| u16::from_le_bytes([record[i], record[i + 1]]);
        let raw_value = word(6);
        let raw_maximum = word(8);
        let raw_minimum = word(10);
        Self {
            test_identifier: record[0],
            spn: spn_from_bytes(record[1], record[2], record[3]),
            fmi: fmi_from_byte(record[3]),
            slot_id: word(4),
            raw_value,
            raw_maximum,
            raw_minimum,
            result: TestResult::from_raw(raw_value, raw_maximum, raw_minimum),
        }
    }

    /// Formats the test result. Values are scaled with the SLOT from `slots`, when
    /// the SLOT is unknown the raw values are printed without a unit
    pub fn format(&self, slots: &dyn SlotLookup, options: &FormatOptions) -> String {
        let mut res = format!(
            "SPN {} FMI {} (SLOT {}) Result: {}.",
            self.spn, self.fmi, self.slot_id, self.result
        );
        if self.result.has_value() {
            let slot = slots.find_slot(self.slot_id);
            let value = |raw| format_value(raw, slot.as_ref(), options);
            res.push_str(&format!(
                " Min: {}, Value: {}, Max: {}",
                value(self.raw_minimum),
                value(self.raw_value),
                value(self.raw_maximum)
            ));
        }
        res
    }
}

fn format_value(raw: u16, slot: Option<&Slot>, options: &FormatOptions) -> String {
    match slot {
        Some(s) => {
            let v = group_thousands(s.scale(raw), options.decimals);
            match &s.unit {
                Some(unit) => format!("{v} {unit}"),
                None => v,
            }
        }
        None => raw.to_string(),
    }
}

impl Display for ScaledTestResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format(&NoReferenceData, &FormatOptions::default()))
    }
}

/// Decoded DM30 message
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScaledTestResultsPacket {
    /// Address of the module that sent the message
    pub source_address: u8,
    /// Test results, in the order they were sent
    pub results: Vec<ScaledTestResult>,
}

impl ScaledTestResultsPacket {
    /// Decodes a DM30 message. The message must hold a whole number of 12 byte records
    pub fn decode(msg: &RawMessage) -> DecodeResult<Self> {
        msg.expect_pgn(PGN_DM30)?;
        let results: Vec<ScaledTestResult> =
            exact_records::<SCALED_TEST_RESULT_SIZE>(PGN_DM30, &msg.data)?
                .map(ScaledTestResult::from_record)
                .collect();
        log::debug!(
            "DM30 from 0x{:02X} holds {} test results",
            msg.source_address,
            results.len()
        );
        Ok(Self {
            source_address: msg.source_address,
            results,
        })
    }

    /// Formats every test result, one per line
    pub fn to_report_string(&self, slots: &dyn SlotLookup, options: &FormatOptions) -> String {
        let mut res = format!("DM30 from {}:", ModuleName(self.source_address));
        if self.results.is_empty() {
            res.push_str(" No Test Results");
        }
        for r in &self.results {
            res.push_str("\n  ");
            res.push_str(&r.format(slots, options));
        }
        res
    }
}

impl Display for ScaledTestResultsPacket {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_report_string(&NoReferenceData, &FormatOptions::default()))
    }
}
