//! DM24 (SPN support)

use std::fmt::{Display, Formatter};

use bitflags::bitflags;

use crate::codec::spn_from_bytes;
use crate::j1939::{ModuleName, PGN_DM24, RawMessage};
use crate::DecodeResult;

const SPN_SUPPORT_RECORD_SIZE: usize = 4;

bitflags! {
    /// What an SPN is supported in. On the wire a bit is cleared when the SPN
    /// is supported, here a set flag means supported
    #[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct SpnSupport: u8 {
        /// Expanded freeze frame (DM25)
        const EXPANDED_FREEZE_FRAME = 0x01;
        /// Data stream (Broadcast or on request)
        const DATA_STREAM = 0x02;
        /// Scaled test results (DM7/DM30)
        const SCALED_TEST_RESULTS = 0x04;
    }
}

impl SpnSupport {
    /// Reads the support bits of the 3rd byte of a DM24 record
    pub fn from_wire(b: u8) -> Self {
        Self::from_bits_truncate(!b)
    }
}

/// A single DM24 record
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SupportedSpn {
    /// SPN
    pub spn: u32,
    /// Where the SPN is supported
    pub support: SpnSupport,
    /// Length of the SPN's data in the freeze frame, in bytes
    pub data_length: u8,
}

impl SupportedSpn {
    /// Decodes a 4 byte record. Returns `None` for padding records
    pub fn from_record(record: &[u8; SPN_SUPPORT_RECORD_SIZE]) -> Option<Self> {
        if record.iter().all(|b| *b == 0xFF) {
            return None;
        }
        Some(Self {
            spn: spn_from_bytes(record[0], record[1], record[2]),
            support: SpnSupport::from_wire(record[2]),
            data_length: record[3],
        })
    }
}

impl Display for SupportedSpn {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut supported = Vec::new();
        if self.support.contains(SpnSupport::DATA_STREAM) {
            supported.push("Data Stream");
        }
        if self.support.contains(SpnSupport::EXPANDED_FREEZE_FRAME) {
            supported.push("Freeze Frame");
        }
        if self.support.contains(SpnSupport::SCALED_TEST_RESULTS) {
            supported.push("Test Results");
        }
        if supported.is_empty() {
            supported.push("None");
        }
        write!(
            f,
            "SPN {} - {} (Length {})",
            self.spn,
            supported.join(", "),
            self.data_length
        )
    }
}

/// Decoded DM24 message
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpnSupportPacket {
    /// Address of the module that sent the message
    pub source_address: u8,
    /// SPNs, in the order they were sent
    pub spns: Vec<SupportedSpn>,
}

impl SpnSupportPacket {
    /// Decodes a DM24 message. A trailing partial record is ignored
    pub fn decode(msg: &RawMessage) -> DecodeResult<Self> {
        msg.expect_pgn(PGN_DM24)?;
        let spns: Vec<SupportedSpn> = msg
            .data
            .chunks_exact(SPN_SUPPORT_RECORD_SIZE)
            .filter_map(|c| c.try_into().ok())
            .filter_map(SupportedSpn::from_record)
            .collect();
        log::debug!(
            "DM24 from 0x{:02X} lists {} SPNs",
            msg.source_address,
            spns.len()
        );
        Ok(Self {
            source_address: msg.source_address,
            spns,
        })
    }

    /// SPNs with the given support, EG: the SPNs to request scaled test results for
    pub fn spns_supporting(&self, support: SpnSupport) -> impl Iterator<Item = u32> + '_ {
        self.spns
            .iter()
            .filter(move |s| s.support.contains(support))
            .map(|s| s.spn)
    }
}

impl Display for SpnSupportPacket {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "DM24 from {}:", ModuleName(self.source_address))?;
        if self.spns.is_empty() {
            return write!(f, " No SPNs");
        }
        for s in &self.spns {
            write!(f, "\n  {s}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
pub mod dm24_test {
    use super::*;

    #[test]
    fn test_decode() {
        let data = vec![
            // SPN 92, data stream and freeze frame, 1 byte
            0x5C, 0x00, 0x1C, 0x01,
            // SPN 5031, test results only
            0xA7, 0x13, 0x1B, 0x00,
            // SPN 524287, nothing supported
            0xFF, 0xFF, 0xFF, 0x02,
            0xFF, 0xFF, 0xFF, 0xFF,
            0x00, 0x00,
        ];
        let p = SpnSupportPacket::decode(&RawMessage::new(PGN_DM24, 0x00, data)).unwrap();
        assert_eq!(p.spns.len(), 3);
        assert_eq!(p.spns[0].spn, 92);
        assert_eq!(
            p.spns[0].support,
            SpnSupport::DATA_STREAM | SpnSupport::EXPANDED_FREEZE_FRAME
        );
        assert_eq!(p.spns[0].data_length, 1);
        assert_eq!(p.spns[1].spn, 5031);
        assert_eq!(p.spns[1].support, SpnSupport::SCALED_TEST_RESULTS);
        assert_eq!(p.spns[2].spn, 524287);
        assert!(p.spns[2].support.is_empty());

        let test_spns: Vec<u32> = p.spns_supporting(SpnSupport::SCALED_TEST_RESULTS).collect();
        assert_eq!(test_spns, vec![5031]);
        assert_eq!(p.spns_supporting(SpnSupport::DATA_STREAM).count(), 1);
    }

    #[test]
    fn test_display() {
        let data = vec![0x5C, 0x00, 0x18, 0x01, 0xA7, 0x13, 0x1F, 0x00];
        let p = SpnSupportPacket::decode(&RawMessage::new(PGN_DM24, 0x00, data)).unwrap();
        assert_eq!(
            p.to_string(),
            "DM24 from Engine #1 (0):\n  \
             SPN 92 - Data Stream, Freeze Frame, Test Results (Length 1)\n  \
             SPN 5031 - None (Length 0)"
        );
        let empty = SpnSupportPacket::decode(&RawMessage::new(PGN_DM24, 0x00, vec![])).unwrap();
        assert_eq!(empty.to_string(), "DM24 from Engine #1 (0): No SPNs");
    }
}
