//! Diagnostic readiness bit decoding shared by DM5 and DM26.
//!
//! Both messages carry the same 5 byte readiness block at bytes 3-7:
//!
//! | Byte | Content |
//! |------|---------|
//! | 3    | Continuously monitored systems. Bits 0-2 support, bits 4-6 status |
//! | 4-5  | Non-continuously monitored systems support |
//! | 6-7  | Non-continuously monitored systems status |
//!
//! A set status bit means the monitor is **not** complete.

use std::fmt::Formatter;

use crate::monitored_system::{MonitoredSystem, Status};

/// Size of a message carrying the readiness block
pub const READINESS_MESSAGE_SIZE: usize = 8;

const CONTINUOUS_BYTE: usize = 3;

/// Location of a monitored system within the readiness block
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SystemDefinition {
    /// Name of the system
    pub name: &'static str,
    /// Byte holding the support bit. For non-continuously monitored systems,
    /// the status bit is 2 bytes further on
    pub byte: usize,
    /// Bit mask of the system. For continuously monitored systems, this is the status bit mask,
    /// and the support bit mask is this shifted down by 4
    pub mask: u8,
}

impl SystemDefinition {
    /// Identifier of the system, the byte and mask combined
    pub const fn id(&self) -> u16 {
        ((self.byte as u16) << 8) | self.mask as u16
    }
}

/// Continuously monitored systems, in report order
pub const CONTINUOUS_SYSTEMS: [SystemDefinition; 3] = [
    SystemDefinition { name: "Comprehensive component", byte: CONTINUOUS_BYTE, mask: 0x40 },
    SystemDefinition { name: "Fuel System", byte: CONTINUOUS_BYTE, mask: 0x20 },
    SystemDefinition { name: "Misfire", byte: CONTINUOUS_BYTE, mask: 0x10 },
];

/// Non-continuously monitored systems, in report order
pub const NON_CONTINUOUS_SYSTEMS: [SystemDefinition; 13] = [
    SystemDefinition { name: "A/C system refrigerant", byte: 4, mask: 0x10 },
    SystemDefinition { name: "Boost pressure control sys", byte: 5, mask: 0x02 },
    SystemDefinition { name: "Catalyst", byte: 4, mask: 0x01 },
    SystemDefinition { name: "Cold start aid system", byte: 5, mask: 0x01 },
    SystemDefinition { name: "Diesel Particulate Filter", byte: 5, mask: 0x04 },
    SystemDefinition { name: "EGR/VVT system", byte: 4, mask: 0x80 },
    SystemDefinition { name: "Evaporative system", byte: 4, mask: 0x04 },
    SystemDefinition { name: "Exhaust Gas Sensor", byte: 4, mask: 0x20 },
    SystemDefinition { name: "Exhaust Gas Sensor heater", byte: 4, mask: 0x40 },
    SystemDefinition { name: "Heated catalyst", byte: 4, mask: 0x02 },
    SystemDefinition { name: "NMHC converting catalyst", byte: 5, mask: 0x10 },
    SystemDefinition { name: "NOx catalyst/adsorber", byte: 5, mask: 0x08 },
    SystemDefinition { name: "Secondary air system", byte: 4, mask: 0x08 },
];

/// Decodes the 3 continuously monitored systems.
///
/// If `obd_module` is false, every system is reported as not supported regardless of the bits
pub fn decode_continuous(
    data: &[u8; READINESS_MESSAGE_SIZE],
    source_address: u8,
    obd_module: bool,
) -> Vec<MonitoredSystem> {
    let status_byte = data[CONTINUOUS_BYTE];
    CONTINUOUS_SYSTEMS
        .iter()
        .map(|def| {
            let completed_mask = def.mask;
            let supported_mask = completed_mask >> 4;
            let supported = obd_module && (status_byte & supported_mask) == supported_mask;
            let not_completed = (status_byte & completed_mask) == completed_mask;
            MonitoredSystem::new(
                def.name,
                Status::from_bits(supported, not_completed),
                source_address,
                def.id(),
            )
        })
        .collect()
}

/// Decodes the 13 non-continuously monitored systems.
///
/// If `obd_module` is false, every system is reported as not supported regardless of the bits
pub fn decode_non_continuous(
    data: &[u8; READINESS_MESSAGE_SIZE],
    source_address: u8,
    obd_module: bool,
) -> Vec<MonitoredSystem> {
    NON_CONTINUOUS_SYSTEMS
        .iter()
        .map(|def| {
            let supported = obd_module && (data[def.byte] & def.mask) == def.mask;
            let not_completed = (data[def.byte + 2] & def.mask) == def.mask;
            MonitoredSystem::new(
                def.name,
                Status::from_bits(supported, not_completed),
                source_address,
                def.id(),
            )
        })
        .collect()
}

/// Common accessors of messages that carry the readiness block
pub trait ReadinessStatus {
    /// Address of the module that sent the message
    fn source_address(&self) -> u8;

    /// Continuously monitored systems (Comprehensive component, fuel system, misfire)
    fn continuously_monitored_systems(&self) -> &[MonitoredSystem];

    /// Non-continuously monitored systems
    fn non_continuously_monitored_systems(&self) -> &[MonitoredSystem];

    /// All monitored systems, continuously monitored systems first
    fn monitored_systems(&self) -> Vec<MonitoredSystem> {
        let mut res = self.continuously_monitored_systems().to_vec();
        res.extend_from_slice(self.non_continuously_monitored_systems());
        res
    }
}

/// Writes both monitored system lists in report form, each line preceded by a newline
pub(crate) fn write_systems<P: ReadinessStatus + ?Sized>(
    f: &mut Formatter<'_>,
    packet: &P,
) -> std::fmt::Result {
    write!(f, "\nContinuously Monitored System Support/Status:")?;
    for s in packet.continuously_monitored_systems() {
        write!(f, "\n    {s}")?;
    }
    write!(f, "\nNon-continuously Monitored System Support/Status:")?;
    for s in packet.non_continuously_monitored_systems() {
        write!(f, "\n    {s}")?;
    }
    Ok(())
}
