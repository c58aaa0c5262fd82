//! DTC list messages (DM1, DM2, DM6, DM12, DM23 and DM28).
//!
//! All of them share one layout: 2 lamp status bytes followed by 4 byte DTC records

use std::fmt::{Display, Formatter};

use strum_macros::IntoStaticStr;

use crate::dtc::{DiagnosticTroubleCode, parse_dtcs};
use crate::j1939::{
    ModuleName, PGN_DM1, PGN_DM2, PGN_DM6, PGN_DM12, PGN_DM23, PGN_DM28, RawMessage,
};
use crate::lamp::LampSet;
use crate::slot::{NoReferenceData, SpnNameLookup};
use crate::{DecodeError, DecodeResult};

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
/// Which DTC list a [TroubleCodePacket] holds
pub enum TroubleCodeKind {
    /// Active DTCs
    #[strum(serialize = "DM1")]
    Dm1,
    /// Previously active DTCs
    #[strum(serialize = "DM2")]
    Dm2,
    /// Emission related pending DTCs
    #[strum(serialize = "DM6")]
    Dm6,
    /// Emission related active DTCs
    #[strum(serialize = "DM12")]
    Dm12,
    /// Emission related previously active DTCs
    #[strum(serialize = "DM23")]
    Dm23,
    /// Permanent DTCs
    #[strum(serialize = "DM28")]
    Dm28,
}

impl TroubleCodeKind {
    /// Returns the kind of DTC list a PGN carries
    pub fn from_pgn(pgn: u32) -> Option<Self> {
        match pgn {
            PGN_DM1 => Some(Self::Dm1),
            PGN_DM2 => Some(Self::Dm2),
            PGN_DM6 => Some(Self::Dm6),
            PGN_DM12 => Some(Self::Dm12),
            PGN_DM23 => Some(Self::Dm23),
            PGN_DM28 => Some(Self::Dm28),
            _ => None,
        }
    }

    /// PGN of the message
    pub fn pgn(&self) -> u32 {
        match self {
            Self::Dm1 => PGN_DM1,
            Self::Dm2 => PGN_DM2,
            Self::Dm6 => PGN_DM6,
            Self::Dm12 => PGN_DM12,
            Self::Dm23 => PGN_DM23,
            Self::Dm28 => PGN_DM28,
        }
    }

    /// Short name of the message, EG: `DM6`
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

/// Size of the lamp status header
const LAMP_BYTES: usize = 2;

/// Decoded DTC list message
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TroubleCodePacket {
    /// Which DTC list the message holds
    pub kind: TroubleCodeKind,
    /// Address of the module that sent the message
    pub source_address: u8,
    /// Lamp status
    pub lamps: LampSet,
    /// DTCs, in the order they were sent
    pub dtcs: Vec<DiagnosticTroubleCode>,
}

impl TroubleCodePacket {
    /// Decodes any of the DTC list messages
    pub fn decode(msg: &RawMessage) -> DecodeResult<Self> {
        let kind = TroubleCodeKind::from_pgn(msg.pgn).ok_or(DecodeError::UnsupportedPgn(msg.pgn))?;
        let header = msg.fixed::<LAMP_BYTES>()?;
        let dtcs = parse_dtcs(msg.body_from(LAMP_BYTES)?);
        log::debug!(
            "{} from 0x{:02X} holds {} DTCs",
            kind.name(),
            msg.source_address,
            dtcs.len()
        );
        Ok(Self {
            kind,
            source_address: msg.source_address,
            lamps: LampSet::from_bytes(header[0], header[1]),
            dtcs,
        })
    }

    /// Formats the packet, naming each DTC's SPN using `names`
    pub fn to_report_string(&self, names: &dyn SpnNameLookup) -> String {
        let mut res = format!(
            "{} from {}: {}",
            self.kind.name(),
            ModuleName(self.source_address),
            self.lamps
        );
        if self.dtcs.is_empty() {
            res.push_str(", No DTCs");
        }
        for dtc in &self.dtcs {
            res.push('\n');
            res.push_str(&dtc.to_report_string(names));
        }
        res
    }
}

impl Display for TroubleCodePacket {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_report_string(&NoReferenceData))
    }
}

#[cfg(test)]
pub mod trouble_codes_test {
    use super::*;
    use crate::lamp::LampStatus;
    use crate::slot::SpnNameTable;

    fn decode(pgn: u32, data: &[u8]) -> DecodeResult<TroubleCodePacket> {
        TroubleCodePacket::decode(&RawMessage::new(pgn, 0x00, data))
    }

    #[test]
    fn test_single_dtc() {
        let p = decode(PGN_DM6, &[0x00, 0xFF, 0x61, 0x02, 0x13, 0x00]).unwrap();
        assert_eq!(p.kind, TroubleCodeKind::Dm6);
        assert_eq!(
            p.dtcs,
            vec![DiagnosticTroubleCode {
                spn: 609,
                fmi: 19,
                occurrence_count: 0
            }]
        );
        assert_eq!(p.lamps.mil, LampStatus::Off);
    }

    #[test]
    fn test_no_dtcs() {
        assert!(decode(PGN_DM12, &[0x00; 6]).unwrap().dtcs.is_empty());
        // Partial trailing record is ignored
        let p = decode(PGN_DM12, &[0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF]).unwrap();
        assert!(p.dtcs.is_empty());
        // Lamp bytes only
        assert!(decode(PGN_DM28, &[0x00, 0x00]).unwrap().dtcs.is_empty());
    }

    #[test]
    fn test_short_message() {
        assert_eq!(
            decode(PGN_DM23, &[0x40]),
            Err(DecodeError::InvalidLength {
                pgn: PGN_DM23,
                required: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_wrong_pgn() {
        assert!(decode(crate::j1939::PGN_DM5, &[0x00; 8]).is_err());
    }

    #[test]
    fn test_mil_on_multiple_dtcs() {
        let p = decode(
            PGN_DM1,
            &[0x40, 0xFF, 0xBE, 0x00, 0x00, 0x01, 0x6E, 0x00, 0x12, 0x02, 0xFF, 0xFF],
        )
        .unwrap();
        assert_eq!(p.lamps.mil, LampStatus::On);
        assert_eq!(p.dtcs.len(), 2);
        assert_eq!(p.dtcs[0].spn, 190);
        assert_eq!(p.dtcs[1].spn, 110);
        assert_eq!(p.dtcs[1].fmi, 18);
        assert_eq!(p.dtcs[1].occurrence_count, 2);
    }

    #[test]
    fn test_report_string() {
        let p = decode(PGN_DM6, &[0x00, 0xFF, 0x61, 0x02, 0x13, 0x00]).unwrap();
        let mut names = SpnNameTable::default();
        names.insert(609, "Controller #2");
        assert_eq!(
            p.to_report_string(&names),
            "DM6 from Engine #1 (0): MIL: off, RSL: off, AWL: off, PL: off\n\
             DTC: Controller #2 (609) Received Network Data In Error (19) 0 times"
        );
        let empty = decode(PGN_DM6, &[0x00, 0xFF]).unwrap();
        assert_eq!(
            empty.to_string(),
            "DM6 from Engine #1 (0): MIL: off, RSL: off, AWL: off, PL: off, No DTCs"
        );
    }
}
