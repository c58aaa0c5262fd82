//! DM20 (Monitor performance ratio)

use std::fmt::{Display, Formatter};

use crate::codec::spn_from_bytes;
use crate::j1939::{ModuleName, PGN_DM20, RawMessage};
use crate::slot::{NoReferenceData, SpnNameLookup};
use crate::DecodeResult;

const HEADER_SIZE: usize = 4;
const RATIO_RECORD_SIZE: usize = 7;

/// In use performance ratio of a single monitor
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PerformanceRatio {
    /// SPN of the monitor
    pub spn: u32,
    /// Number of times the monitor ran
    pub numerator: u16,
    /// Number of times the conditions to run the monitor were met
    pub denominator: u16,
}

impl PerformanceRatio {
    fn from_record(record: &[u8; RATIO_RECORD_SIZE]) -> Self {
        Self {
            spn: spn_from_bytes(record[0], record[1], record[2]),
            numerator: u16::from_le_bytes([record[3], record[4]]),
            denominator: u16::from_le_bytes([record[5], record[6]]),
        }
    }
}

/// Decoded DM20 message
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonitorPerformanceRatioPacket {
    /// Address of the module that sent the message
    pub source_address: u8,
    /// Number of ignition cycles
    pub ignition_cycles: u16,
    /// Number of times the general OBD monitoring conditions were encountered
    pub obd_monitoring_conditions_encountered: u16,
    /// Ratios, in the order they were sent
    pub ratios: Vec<PerformanceRatio>,
}

impl MonitorPerformanceRatioPacket {
    /// Decodes a DM20 message. A trailing partial ratio record is ignored
    pub fn decode(msg: &RawMessage) -> DecodeResult<Self> {
        msg.expect_pgn(PGN_DM20)?;
        let header = msg.fixed::<HEADER_SIZE>()?;
        let ratios = msg
            .body_from(HEADER_SIZE)?
            .chunks_exact(RATIO_RECORD_SIZE)
            .filter_map(|c| c.try_into().ok())
            .map(PerformanceRatio::from_record)
            .collect();
        Ok(Self {
            source_address: msg.source_address,
            ignition_cycles: u16::from_le_bytes([header[0], header[1]]),
            obd_monitoring_conditions_encountered: u16::from_le_bytes([header[2], header[3]]),
            ratios,
        })
    }

    /// Formats the packet, naming each monitor's SPN using `names`
    pub fn to_report_string(&self, names: &dyn SpnNameLookup) -> String {
        let mut res = format!(
            "DM20 from {}: Ignition Cycles: {}, OBD Monitoring Conditions Encountered: {}",
            ModuleName(self.source_address),
            self.ignition_cycles,
            self.obd_monitoring_conditions_encountered
        );
        if self.ratios.is_empty() {
            res.push_str(", No Ratios");
        }
        for r in &self.ratios {
            res.push_str(&format!(
                "\n  {} ({}): {} / {}",
                names.spn_name(r.spn).unwrap_or_else(|| "Unknown".into()),
                r.spn,
                r.numerator,
                r.denominator
            ));
        }
        res
    }
}

impl Display for MonitorPerformanceRatioPacket {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_report_string(&NoReferenceData))
    }
}
