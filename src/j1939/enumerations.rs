//! Enumeration data for J1939-73 parameters

use std::fmt::{Display, Formatter};

#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
/// OBD compliance of a module (SPN 1220)
pub enum ObdCompliance {
    /// OBD II (California ARB)
    ObdII,
    /// OBD (Federal EPA)
    Obd,
    /// OBD and OBD II
    ObdAndObdII,
    /// OBD I
    ObdI,
    /// Not intended to meet OBD II requirements
    NotObd,
    /// EOBD
    Eobd,
    /// EOBD and OBD II
    EobdAndObdII,
    /// EOBD and OBD
    EobdAndObd,
    /// EOBD, OBD and OBD II
    EobdObdAndObdII,
    /// JOBD
    Jobd,
    /// JOBD and OBD II
    JobdAndObdII,
    /// JOBD and EOBD
    JobdAndEobd,
    /// JOBD, EOBD and OBD II
    JobdEobdAndObdII,
    /// Heavy duty vehicles (EURO IV) B1
    EuroIvB1,
    /// Heavy duty vehicles (EURO V) B2
    EuroVB2,
    /// Heavy duty vehicles (EURO EEC) C (Gas engines)
    EuroEecC,
    /// Engine manufacturer diagnostics
    Emd,
    /// Engine manufacturer diagnostics enhanced
    EmdPlus,
    /// Heavy duty OBD partial
    HdObdP,
    /// Heavy duty OBD
    HdObd,
    /// World wide harmonized OBD
    WwhObd,
    /// OBD II (Heavy duty)
    ObdIIHd,
    /// Heavy duty EOBD
    HdEobd,
    /// Reserved for SAE assignment
    Reserved(u8),
    /// Module reported an error
    Error,
    /// Not available
    NotAvailable,
}

impl From<u8> for ObdCompliance {
    fn from(x: u8) -> Self {
        match x {
            0x01 => Self::ObdII,
            0x02 => Self::Obd,
            0x03 => Self::ObdAndObdII,
            0x04 => Self::ObdI,
            0x05 => Self::NotObd,
            0x06 => Self::Eobd,
            0x07 => Self::EobdAndObdII,
            0x08 => Self::EobdAndObd,
            0x09 => Self::EobdObdAndObdII,
            0x0A => Self::Jobd,
            0x0B => Self::JobdAndObdII,
            0x0C => Self::JobdAndEobd,
            0x0D => Self::JobdEobdAndObdII,
            0x0E => Self::EuroIvB1,
            0x0F => Self::EuroVB2,
            0x10 => Self::EuroEecC,
            0x11 => Self::Emd,
            0x12 => Self::EmdPlus,
            0x13 => Self::HdObdP,
            0x14 => Self::HdObd,
            0x15 => Self::WwhObd,
            0x16 => Self::ObdIIHd,
            0x17 => Self::HdEobd,
            0xFE => Self::Error,
            0xFF => Self::NotAvailable,
            x => Self::Reserved(x),
        }
    }
}

impl Display for ObdCompliance {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self {
            ObdCompliance::ObdII => write!(f, "OBD II"),
            ObdCompliance::Obd => write!(f, "OBD"),
            ObdCompliance::ObdAndObdII => write!(f, "OBD and OBD II"),
            ObdCompliance::ObdI => write!(f, "OBD I"),
            ObdCompliance::NotObd => write!(f, "Not intended to meet OBD II requirements"),
            ObdCompliance::Eobd => write!(f, "EOBD"),
            ObdCompliance::EobdAndObdII => write!(f, "EOBD and OBD II"),
            ObdCompliance::EobdAndObd => write!(f, "EOBD and OBD"),
            ObdCompliance::EobdObdAndObdII => write!(f, "EOBD, OBD and OBD II"),
            ObdCompliance::Jobd => write!(f, "JOBD"),
            ObdCompliance::JobdAndObdII => write!(f, "JOBD and OBD II"),
            ObdCompliance::JobdAndEobd => write!(f, "JOBD and EOBD"),
            ObdCompliance::JobdEobdAndObdII => write!(f, "JOBD, EOBD and OBD II"),
            ObdCompliance::EuroIvB1 => write!(f, "Heavy Duty Vehicles (EURO IV) B1"),
            ObdCompliance::EuroVB2 => write!(f, "Heavy Duty Vehicles (EURO V) B2"),
            ObdCompliance::EuroEecC => write!(f, "Heavy Duty Vehicles (EURO EEC) C (gas engines)"),
            ObdCompliance::Emd => write!(f, "EMD"),
            ObdCompliance::EmdPlus => write!(f, "EMD+"),
            ObdCompliance::HdObdP => write!(f, "HD OBD P"),
            ObdCompliance::HdObd => write!(f, "HD OBD"),
            ObdCompliance::WwhObd => write!(f, "WWH OBD"),
            ObdCompliance::ObdIIHd => write!(f, "OBD II"),
            ObdCompliance::HdEobd => write!(f, "HD EOBD"),
            ObdCompliance::Reserved(x) => write!(f, "Reserved for SAE assignment 0x{x:02X}"),
            ObdCompliance::Error => write!(f, "Error"),
            ObdCompliance::NotAvailable => write!(f, "Not available"),
        }
    }
}

/// Returns the J1939 preferred function name of a source address, or `None` for
/// addresses without a fixed assignment
pub fn address_name(address: u8) -> Option<&'static str> {
    Some(match address {
        0x00 => "Engine #1",
        0x01 => "Engine #2",
        0x02 => "Turbocharger",
        0x03 => "Transmission #1",
        0x04 => "Transmission #2",
        0x05 => "Shift Console - Primary",
        0x0B => "Brakes - System Controller",
        0x0F => "Retarder - Engine",
        0x10 => "Retarder - Driveline",
        0x11 => "Cruise Control",
        0x17 => "Instrument Cluster #1",
        0x21 => "Body Controller",
        0x3D => "Exhaust Emission Controller",
        0xF9 => "Off Board Diagnostic-Service Tool #1",
        0xFA => "Off Board Diagnostic-Service Tool #2",
        0xFE => "Null",
        0xFF => "Global",
        _ => return None,
    })
}

/// Wrapper that formats a source address as `"<name> (<address>)"`
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ModuleName(pub u8);

impl Display for ModuleName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", address_name(self.0).unwrap_or("Unknown"), self.0)
    }
}

#[cfg(test)]
pub mod enumerations_test {
    use super::*;

    #[test]
    fn test_obd_compliance() {
        assert_eq!(ObdCompliance::from(0x14), ObdCompliance::HdObd);
        assert_eq!(ObdCompliance::from(0x05), ObdCompliance::NotObd);
        assert_eq!(ObdCompliance::from(0x30), ObdCompliance::Reserved(0x30));
        assert_eq!(ObdCompliance::from(0xFF), ObdCompliance::NotAvailable);
        assert_eq!(ObdCompliance::from(0x14).to_string(), "HD OBD");
    }

    #[test]
    fn test_module_name() {
        assert_eq!(ModuleName(0x00).to_string(), "Engine #1 (0)");
        assert_eq!(ModuleName(0x55).to_string(), "Unknown (85)");
    }
}
