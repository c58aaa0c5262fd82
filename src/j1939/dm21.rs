//! DM21 (Diagnostic readiness 2)

use std::fmt::{Display, Formatter};

use crate::codec::ScaledValue;
use crate::j1939::{ModuleName, PGN_DM21, RawMessage};
use crate::units::{FormatOptions, format_distance, format_minutes};
use crate::DecodeResult;

/// Decoded DM21 message. Distances are in km, times are in minutes
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiagnosticReadiness2Packet {
    /// Address of the module that sent the message
    pub source_address: u8,
    /// Distance traveled while the MIL is activated
    pub distance_with_mil_on: ScaledValue,
    /// Distance traveled since DTCs were cleared
    pub distance_since_dtcs_cleared: ScaledValue,
    /// Engine run time while the MIL is activated
    pub minutes_with_mil_on: ScaledValue,
    /// Time since DTCs were cleared
    pub minutes_since_dtcs_cleared: ScaledValue,
}

impl DiagnosticReadiness2Packet {
    /// Decodes a DM21 message
    pub fn decode(msg: &RawMessage) -> DecodeResult<Self> {
        msg.expect_pgn(PGN_DM21)?;
        // Every word must be present, the trailing ones included
        msg.fixed::<8>()?;
        Ok(Self {
            source_address: msg.source_address,
            distance_with_mil_on: msg.scaled_word(0, 1.0)?,
            distance_since_dtcs_cleared: msg.scaled_word(2, 1.0)?,
            minutes_with_mil_on: msg.scaled_word(4, 1.0)?,
            minutes_since_dtcs_cleared: msg.scaled_word(6, 1.0)?,
        })
    }

    /// Formats the packet, one value per line
    pub fn to_report_string(&self, options: &FormatOptions) -> String {
        format!(
            "DM21 from {}: [\n  \
             Distance Traveled While MIL is Activated:     {}\n  \
             Time Run by Engine While MIL is Activated:    {}\n  \
             Distance Since DTCs Cleared:                  {}\n  \
             Time Since DTCs Cleared:                      {}\n]",
            ModuleName(self.source_address),
            format_distance(self.distance_with_mil_on, options),
            format_minutes(self.minutes_with_mil_on),
            format_distance(self.distance_since_dtcs_cleared, options),
            format_minutes(self.minutes_since_dtcs_cleared),
        )
    }
}

impl Display for DiagnosticReadiness2Packet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_report_string(&FormatOptions::default()))
    }
}
