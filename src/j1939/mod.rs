//! Module for SAE J1939-73 diagnostic messages

use crate::codec::{ScaledValue, byte_at, scaled_word};
use crate::{DecodeError, DecodeResult};
use std::fmt::{Display, Formatter};

mod component_id;
mod dm5;
mod dm19;
mod dm20;
mod dm21;
mod dm24;
mod dm26;
mod dm30;
mod enumerations;
mod trouble_codes;

// Exports
pub use component_id::*;
pub use dm5::*;
pub use dm19::*;
pub use dm20::*;
pub use dm21::*;
pub use dm24::*;
pub use dm26::*;
pub use dm30::*;
pub use enumerations::*;
pub use trouble_codes::*;

/// DM1 - Active diagnostic trouble codes
pub const PGN_DM1: u32 = 65226;
/// DM2 - Previously active diagnostic trouble codes
pub const PGN_DM2: u32 = 65227;
/// DM5 - Diagnostic readiness 1
pub const PGN_DM5: u32 = 65230;
/// DM6 - Emission related pending DTCs
pub const PGN_DM6: u32 = 65231;
/// DM12 - Emission related active DTCs
pub const PGN_DM12: u32 = 65236;
/// DM19 - Calibration information
pub const PGN_DM19: u32 = 54016;
/// DM20 - Monitor performance ratio
pub const PGN_DM20: u32 = 49664;
/// DM21 - Diagnostic readiness 2
pub const PGN_DM21: u32 = 49408;
/// DM23 - Emission related previously active DTCs
pub const PGN_DM23: u32 = 64949;
/// DM24 - SPN support
pub const PGN_DM24: u32 = 64950;
/// DM26 - Diagnostic readiness 3
pub const PGN_DM26: u32 = 64952;
/// DM28 - Permanent DTCs
pub const PGN_DM28: u32 = 64896;
/// DM30 - Scaled test results
pub const PGN_DM30: u32 = 41984;
/// Component identification
pub const PGN_COMPONENT_ID: u32 = 65259;

/// Decoded 29bit J1939 CAN identifier
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct J1939Id {
    /// Message priority (0 is highest)
    pub priority: u8,
    /// Parameter group number
    pub pgn: u32,
    /// Address of the sender
    pub source_address: u8,
    /// Address of the receiver. Only present for PDU1 (Destination specific) messages
    pub destination_address: Option<u8>,
}

impl J1939Id {
    /// Splits a 29bit CAN identifier into its J1939 fields
    pub const fn from_can_id(id: u32) -> Self {
        let priority = ((id >> 26) & 0x07) as u8;
        let data_page = (id >> 24) & 0x03;
        let pdu_format = (id >> 16) & 0xFF;
        let pdu_specific = ((id >> 8) & 0xFF) as u8;
        let source_address = (id & 0xFF) as u8;
        if pdu_format < 240 {
            // PDU1, PDU specific is the destination address
            Self {
                priority,
                pgn: (data_page << 16) | (pdu_format << 8),
                source_address,
                destination_address: Some(pdu_specific),
            }
        } else {
            // PDU2, PDU specific is the group extension
            Self {
                priority,
                pgn: (data_page << 16) | (pdu_format << 8) | pdu_specific as u32,
                source_address,
                destination_address: None,
            }
        }
    }
}

/// A complete (Possibly transport protocol reassembled) J1939 message, as received
/// from the bus layer
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawMessage {
    /// Parameter group number of the message
    pub pgn: u32,
    /// Address of the module that sent the message
    pub source_address: u8,
    /// Message payload
    pub data: Vec<u8>,
}

impl RawMessage {
    /// Creates a message
    pub fn new<T: Into<Vec<u8>>>(pgn: u32, source_address: u8, data: T) -> Self {
        Self {
            pgn,
            source_address,
            data: data.into(),
        }
    }

    /// Creates a message from a CAN frame with a 29bit identifier
    pub fn from_can_frame(can_id: u32, data: &[u8]) -> Self {
        let id = J1939Id::from_can_id(can_id);
        Self::new(id.pgn, id.source_address, data)
    }

    pub(crate) fn expect_pgn(&self, want: u32) -> DecodeResult<()> {
        if self.pgn == want {
            Ok(())
        } else {
            Err(DecodeError::MismatchedPgn {
                want,
                received: self.pgn,
            })
        }
    }

    fn too_short(&self, required: usize) -> DecodeError {
        DecodeError::InvalidLength {
            pgn: self.pgn,
            required,
            actual: self.data.len(),
        }
    }

    /// Returns the first `N` bytes of the message, or an error if the message is shorter
    pub(crate) fn fixed<const N: usize>(&self) -> DecodeResult<&[u8; N]> {
        self.data
            .get(..N)
            .and_then(|d| d.try_into().ok())
            .ok_or_else(|| self.too_short(N))
    }

    /// Returns the bytes from `index` onwards, or an error if the message is shorter than `index`
    pub(crate) fn body_from(&self, index: usize) -> DecodeResult<&[u8]> {
        self.data.get(index..).ok_or_else(|| self.too_short(index))
    }

    /// Reads a single byte
    pub fn byte(&self, index: usize) -> DecodeResult<u8> {
        byte_at(&self.data, index).ok_or_else(|| self.too_short(index.saturating_add(1)))
    }

    /// Reads a little endian word and scales it, see [crate::codec::scaled_word]
    pub fn scaled_word(&self, index: usize, scale: f64) -> DecodeResult<ScaledValue> {
        scaled_word(&self.data, index, scale)
            .ok_or_else(|| self.too_short(index.saturating_add(2)))
    }
}

/// Splits a record list body into whole records, rejecting bodies with a partial record
pub(crate) fn exact_records<const N: usize>(
    pgn: u32,
    body: &[u8],
) -> DecodeResult<impl Iterator<Item = &[u8; N]>> {
    if body.len() % N != 0 {
        return Err(DecodeError::InvalidRecordLength {
            pgn,
            record_size: N,
            actual: body.len(),
        });
    }
    Ok(body.chunks_exact(N).filter_map(|c| c.try_into().ok()))
}

/// A decoded J1939 diagnostic message
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Packet {
    /// DM5
    DiagnosticReadiness(DiagnosticReadinessPacket),
    /// DM26
    TripReadiness(Dm26TripReadiness),
    /// DM1, DM2, DM6, DM12, DM23 and DM28
    TroubleCodes(TroubleCodePacket),
    /// DM19
    CalibrationInformation(CalibrationInformationPacket),
    /// DM20
    MonitorPerformanceRatio(MonitorPerformanceRatioPacket),
    /// DM21
    DiagnosticReadiness2(DiagnosticReadiness2Packet),
    /// DM24
    SpnSupport(SpnSupportPacket),
    /// DM30
    ScaledTestResults(ScaledTestResultsPacket),
    /// Component identification
    ComponentIdentification(ComponentIdentification),
}

impl Packet {
    /// Decodes a message according to its PGN
    pub fn decode(msg: &RawMessage) -> DecodeResult<Self> {
        let packet = match msg.pgn {
            PGN_DM5 => Self::DiagnosticReadiness(DiagnosticReadinessPacket::decode(msg)?),
            PGN_DM26 => Self::TripReadiness(Dm26TripReadiness::decode(msg)?),
            PGN_DM1 | PGN_DM2 | PGN_DM6 | PGN_DM12 | PGN_DM23 | PGN_DM28 => {
                Self::TroubleCodes(TroubleCodePacket::decode(msg)?)
            }
            PGN_DM19 => Self::CalibrationInformation(CalibrationInformationPacket::decode(msg)?),
            PGN_DM20 => Self::MonitorPerformanceRatio(MonitorPerformanceRatioPacket::decode(msg)?),
            PGN_DM21 => Self::DiagnosticReadiness2(DiagnosticReadiness2Packet::decode(msg)?),
            PGN_DM24 => Self::SpnSupport(SpnSupportPacket::decode(msg)?),
            PGN_DM30 => Self::ScaledTestResults(ScaledTestResultsPacket::decode(msg)?),
            PGN_COMPONENT_ID => {
                Self::ComponentIdentification(ComponentIdentification::decode(msg)?)
            }
            pgn => {
                log::warn!("No decoder for PGN {pgn} from 0x{:02X}", msg.source_address);
                return Err(DecodeError::UnsupportedPgn(pgn));
            }
        };
        log::debug!("Decoded PGN {} from 0x{:02X}", msg.pgn, msg.source_address);
        Ok(packet)
    }

    /// PGN of the packet
    pub fn pgn(&self) -> u32 {
        match self {
            Packet::DiagnosticReadiness(_) => PGN_DM5,
            Packet::TripReadiness(_) => PGN_DM26,
            Packet::TroubleCodes(p) => p.kind.pgn(),
            Packet::CalibrationInformation(_) => PGN_DM19,
            Packet::MonitorPerformanceRatio(_) => PGN_DM20,
            Packet::DiagnosticReadiness2(_) => PGN_DM21,
            Packet::SpnSupport(_) => PGN_DM24,
            Packet::ScaledTestResults(_) => PGN_DM30,
            Packet::ComponentIdentification(_) => PGN_COMPONENT_ID,
        }
    }

    /// Address of the module that sent the packet
    pub fn source_address(&self) -> u8 {
        match self {
            Packet::DiagnosticReadiness(p) => p.source_address,
            Packet::TripReadiness(p) => p.source_address,
            Packet::TroubleCodes(p) => p.source_address,
            Packet::CalibrationInformation(p) => p.source_address,
            Packet::MonitorPerformanceRatio(p) => p.source_address,
            Packet::DiagnosticReadiness2(p) => p.source_address,
            Packet::SpnSupport(p) => p.source_address,
            Packet::ScaledTestResults(p) => p.source_address,
            Packet::ComponentIdentification(p) => p.source_address,
        }
    }
}

impl Display for Packet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Packet::DiagnosticReadiness(p) => Display::fmt(p, f),
            Packet::TripReadiness(p) => Display::fmt(p, f),
            Packet::TroubleCodes(p) => Display::fmt(p, f),
            Packet::CalibrationInformation(p) => Display::fmt(p, f),
            Packet::MonitorPerformanceRatio(p) => Display::fmt(p, f),
            Packet::DiagnosticReadiness2(p) => Display::fmt(p, f),
            Packet::SpnSupport(p) => Display::fmt(p, f),
            Packet::ScaledTestResults(p) => Display::fmt(p, f),
            Packet::ComponentIdentification(p) => Display::fmt(p, f),
        }
    }
}
