//! DM26 (Diagnostic readiness 3). Readiness of the current drive cycle

use std::fmt::{Display, Formatter};

use crate::codec::{ScaledValue, format_count, group_thousands};
use crate::j1939::{ModuleName, PGN_DM26, RawMessage};
use crate::monitored_system::MonitoredSystem;
use crate::readiness::{
    READINESS_MESSAGE_SIZE, ReadinessStatus, decode_continuous, decode_non_continuous,
    write_systems,
};
use crate::DecodeResult;

/// Decoded DM26 message.
///
/// DM26 carries no OBD compliance byte, so every sender is treated as an OBD module.
/// Equality follows the same rule as [super::DiagnosticReadinessPacket]
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dm26TripReadiness {
    /// Address of the module that sent the message
    pub source_address: u8,
    /// Seconds since the engine was started
    pub time_since_engine_start: ScaledValue,
    /// Raw number of warm-ups since DTCs were cleared. See [crate::codec::format_count]
    pub warm_ups_since_clear: u8,
    continuous: Vec<MonitoredSystem>,
    non_continuous: Vec<MonitoredSystem>,
}

impl Dm26TripReadiness {
    /// Decodes a DM26 message
    pub fn decode(msg: &RawMessage) -> DecodeResult<Self> {
        msg.expect_pgn(PGN_DM26)?;
        let data = msg.fixed::<READINESS_MESSAGE_SIZE>()?;
        Ok(Self {
            source_address: msg.source_address,
            time_since_engine_start: msg.scaled_word(0, 1.0)?,
            warm_ups_since_clear: data[2],
            continuous: decode_continuous(data, msg.source_address, true),
            non_continuous: decode_non_continuous(data, msg.source_address, true),
        })
    }
}

impl ReadinessStatus for Dm26TripReadiness {
    fn source_address(&self) -> u8 {
        self.source_address
    }

    fn continuously_monitored_systems(&self) -> &[MonitoredSystem] {
        &self.continuous
    }

    fn non_continuously_monitored_systems(&self) -> &[MonitoredSystem] {
        &self.non_continuous
    }
}

impl PartialEq for Dm26TripReadiness {
    fn eq(&self, other: &Self) -> bool {
        self.source_address == other.source_address
            && self.continuous == other.continuous
            && self.non_continuous == other.non_continuous
    }
}

impl Display for Dm26TripReadiness {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let time = match self.time_since_engine_start {
            ScaledValue::Value(s) => format!("{} seconds", group_thousands(s, 0)),
            sentinel => sentinel.to_string(),
        };
        write!(
            f,
            "DM26 from {}: Warm-ups: {}, Time Since Engine Start: {}",
            ModuleName(self.source_address),
            format_count(self.warm_ups_since_clear),
            time
        )?;
        write_systems(f, self)
    }
}

#[cfg(test)]
pub mod dm26_test {
    use super::*;
    use crate::monitored_system::Status;

    #[test]
    fn test_decode() {
        let data = vec![0xD2, 0x04, 0x03, 0x11, 0x01, 0x00, 0x01, 0x00];
        let msg = RawMessage::new(PGN_DM26, 0x00, data);
        let p = Dm26TripReadiness::decode(&msg).unwrap();
        assert_eq!(p.time_since_engine_start, ScaledValue::Value(1234.0));
        assert_eq!(p.warm_ups_since_clear, 3);
        // Misfire supported, not complete
        assert_eq!(p.continuously_monitored_systems()[2].status, Status::NotComplete);
        assert_eq!(p.continuously_monitored_systems()[0].status, Status::NotSupported);
        let catalyst = p
            .non_continuously_monitored_systems()
            .iter()
            .find(|s| s.name == "Catalyst")
            .unwrap();
        assert_eq!(catalyst.status, Status::NotComplete);
        assert!(p.to_string().starts_with(
            "DM26 from Engine #1 (0): Warm-ups: 3, Time Since Engine Start: 1,234 seconds\n"
        ));
        assert!(p.to_string().ends_with("Secondary air system       not supported"));
        assert!(p.to_string().contains("\n    Catalyst                   not complete\n"));
    }

    #[test]
    fn test_warm_up_byte_does_not_disable_readiness() {
        // Byte 2 is the warm-up count in DM26, a value of 5 must not be read as "not OBD"
        let data = vec![0xFF, 0xFF, 0x05, 0x04, 0x00, 0x00, 0x00, 0x00];
        let msg = RawMessage::new(PGN_DM26, 0x00, data);
        let p = Dm26TripReadiness::decode(&msg).unwrap();
        assert_eq!(p.time_since_engine_start, ScaledValue::NotAvailable);
        assert_eq!(p.continuously_monitored_systems()[0].status, Status::Complete);
        assert!(p.to_string().contains("Time Since Engine Start: not available"));
    }

    #[test]
    fn test_wrong_pgn() {
        let msg = RawMessage::new(crate::j1939::PGN_DM5, 0x00, vec![0x00; 8]);
        assert!(Dm26TripReadiness::decode(&msg).is_err());
    }
}
