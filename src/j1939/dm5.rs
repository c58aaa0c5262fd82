//! DM5 (Diagnostic readiness 1)

use std::fmt::{Display, Formatter};

use crate::codec::format_count;
use crate::j1939::{ModuleName, ObdCompliance, PGN_DM5, RawMessage};
use crate::monitored_system::MonitoredSystem;
use crate::readiness::{
    READINESS_MESSAGE_SIZE, ReadinessStatus, decode_continuous, decode_non_continuous,
    write_systems,
};
use crate::DecodeResult;

/// Decoded DM5 message.
///
/// Two DM5 packets are equal when they come from the same module and report the same
/// monitored systems, the DTC counts and OBD compliance are not part of the comparison
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiagnosticReadinessPacket {
    /// Address of the module that sent the message
    pub source_address: u8,
    /// Raw number of active DTCs. See [crate::codec::format_count]
    pub active_code_count: u8,
    /// Raw number of previously active DTCs. See [crate::codec::format_count]
    pub previously_active_code_count: u8,
    /// Raw OBD compliance byte
    pub obd_compliance_raw: u8,
    continuous: Vec<MonitoredSystem>,
    non_continuous: Vec<MonitoredSystem>,
}

/// OBD compliance values which mean the module is not an OBD module
const NON_OBD_COMPLIANCE: [u8; 2] = [0x05, 0xFF];

impl DiagnosticReadinessPacket {
    /// Decodes a DM5 message
    pub fn decode(msg: &RawMessage) -> DecodeResult<Self> {
        msg.expect_pgn(PGN_DM5)?;
        let data = msg.fixed::<READINESS_MESSAGE_SIZE>()?;
        let obd_compliance_raw = data[2];
        let obd_module = !NON_OBD_COMPLIANCE.contains(&obd_compliance_raw);
        if !obd_module {
            log::debug!(
                "Module 0x{:02X} is not an OBD module (compliance 0x{obd_compliance_raw:02X})",
                msg.source_address
            );
        }
        Ok(Self {
            source_address: msg.source_address,
            active_code_count: data[0],
            previously_active_code_count: data[1],
            obd_compliance_raw,
            continuous: decode_continuous(data, msg.source_address, obd_module),
            non_continuous: decode_non_continuous(data, msg.source_address, obd_module),
        })
    }

    /// OBD compliance of the module
    pub fn obd_compliance(&self) -> ObdCompliance {
        ObdCompliance::from(self.obd_compliance_raw)
    }

    /// Returns true if the module reports itself as an OBD module. If not, all
    /// of its monitored systems are reported as not supported
    pub fn is_obd_module(&self) -> bool {
        !NON_OBD_COMPLIANCE.contains(&self.obd_compliance_raw)
    }
}

impl ReadinessStatus for DiagnosticReadinessPacket {
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

impl PartialEq for DiagnosticReadinessPacket {
    fn eq(&self, other: &Self) -> bool {
        self.source_address == other.source_address
            && self.continuous == other.continuous
            && self.non_continuous == other.non_continuous
    }
}

impl Display for DiagnosticReadinessPacket {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "DM5 from {}: OBD Compliance: {} ({}), Active Codes: {}, Previously Active Codes: {}",
            ModuleName(self.source_address),
            self.obd_compliance(),
            self.obd_compliance_raw,
            format_count(self.active_code_count),
            format_count(self.previously_active_code_count)
        )?;
        write_systems(f, self)
    }
}

#[cfg(test)]
pub mod dm5_test {
    use super::*;
    use crate::DecodeError;
    use crate::monitored_system::Status;
    use std::collections::HashSet;

    fn dm5(data: &[u8]) -> DiagnosticReadinessPacket {
        DiagnosticReadinessPacket::decode(&RawMessage::new(PGN_DM5, 0x00, data)).unwrap()
    }

    #[test]
    fn test_decode() {
        let p = dm5(&[0x01, 0xFF, 0x14, 0x37, 0xE1, 0x1C, 0x61, 0x08]);
        assert_eq!(p.active_code_count, 1);
        assert_eq!(p.previously_active_code_count, 0xFF);
        assert_eq!(p.obd_compliance(), ObdCompliance::HdObd);
        assert!(p.is_obd_module());

        // 0x37 - all 3 supported, fuel system and misfire not complete
        let c = p.continuously_monitored_systems();
        assert_eq!(c[0].name, "Comprehensive component");
        assert_eq!(c[0].status, Status::Complete);
        assert_eq!(c[1].status, Status::NotComplete);
        assert_eq!(c[2].status, Status::NotComplete);

        let nc = p.non_continuously_monitored_systems();
        let status_of = |name: &str| nc.iter().find(|s| s.name == name).unwrap().status;
        assert_eq!(status_of("Catalyst"), Status::NotComplete);
        assert_eq!(status_of("EGR/VVT system"), Status::Complete);
        assert_eq!(status_of("Exhaust Gas Sensor"), Status::NotComplete);
        assert_eq!(status_of("Exhaust Gas Sensor heater"), Status::NotComplete);
        assert_eq!(status_of("NOx catalyst/adsorber"), Status::NotComplete);
        assert_eq!(status_of("Diesel Particulate Filter"), Status::Complete);
        assert_eq!(status_of("NMHC converting catalyst"), Status::Complete);
        assert_eq!(status_of("Evaporative system"), Status::NotSupported);
    }

    #[test]
    fn test_not_obd_module() {
        for compliance in [0x05, 0xFF] {
            let p = dm5(&[0x00, 0x00, compliance, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);
            assert!(!p.is_obd_module());
            assert!(p.monitored_systems().iter().all(|s| s.status == Status::NotSupported));
        }
    }

    #[test]
    fn test_monitored_systems_unique() {
        let p = dm5(&[0x00, 0x00, 0x14, 0x77, 0xFF, 0x1F, 0x00, 0x00]);
        let systems = p.monitored_systems();
        assert_eq!(
            systems.len(),
            p.continuously_monitored_systems().len() + p.non_continuously_monitored_systems().len()
        );
        let keys: HashSet<(String, u8)> = systems
            .iter()
            .map(|s| (s.name.clone(), s.source_address))
            .collect();
        assert_eq!(keys.len(), systems.len());
    }

    #[test]
    fn test_equality() {
        let a = dm5(&[0x00, 0x00, 0x14, 0x77, 0xFF, 0x1F, 0x00, 0x00]);
        // Different DTC counts, same systems
        let b = dm5(&[0x03, 0x01, 0x14, 0x77, 0xFF, 0x1F, 0x00, 0x00]);
        assert_eq!(a, b);
        let c = dm5(&[0x00, 0x00, 0x14, 0x77, 0xFF, 0x1F, 0x01, 0x00]);
        assert_ne!(a, c);
        let d = DiagnosticReadinessPacket::decode(&RawMessage::new(
            PGN_DM5,
            0x01,
            vec![0x00, 0x00, 0x14, 0x77, 0xFF, 0x1F, 0x00, 0x00],
        ))
        .unwrap();
        assert_ne!(a, d);
    }

    #[test]
    fn test_short_message() {
        let res = DiagnosticReadinessPacket::decode(&RawMessage::new(PGN_DM5, 0x00, vec![0x00; 7]));
        assert_eq!(
            res,
            Err(DecodeError::InvalidLength {
                pgn: PGN_DM5,
                required: 8,
                actual: 7
            })
        );
    }

    #[test]
    fn test_display() {
        let p = dm5(&[0x00, 0x00, 0x14, 0x00, 0x00, 0x00, 0x00, 0x00]);
        let s = p.to_string();
        assert!(s.starts_with(
            "DM5 from Engine #1 (0): OBD Compliance: HD OBD (20), Active Codes: 0, Previously Active Codes: 0\n"
        ));
        assert!(s.contains(
            "Continuously Monitored System Support/Status:\n    Comprehensive component    not supported"
        ));
        assert!(s.ends_with("Secondary air system       not supported"));
        assert_eq!(s.lines().count(), 1 + 1 + 3 + 1 + 13);
    }
}
