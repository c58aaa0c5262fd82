//! Monitored systems, and merging the monitored system status
//! reported by multiple modules into a vehicle level status

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use crate::readiness::ReadinessStatus;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, strum_macros::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
/// Readiness status of a monitored system
pub enum Status {
    /// Monitor has completed
    #[strum(serialize = "complete")]
    Complete,
    /// Monitor is supported but has not completed
    #[strum(serialize = "not complete")]
    NotComplete,
    /// Monitor is not supported
    #[strum(serialize = "not supported")]
    NotSupported,
}

impl Status {
    /// Applies the J1939-73 readiness rule to a pair of support / completion bits.
    ///
    /// Note that a *set* completion bit means the monitor is **not** complete
    pub const fn from_bits(supported: bool, not_completed: bool) -> Self {
        match (supported, not_completed) {
            (false, _) => Status::NotSupported,
            (true, true) => Status::NotComplete,
            (true, false) => Status::Complete,
        }
    }
}

/// A single monitored system as reported by one module.
///
/// Ordering is by name, then source address, then status, then id
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonitoredSystem {
    /// Name of the system
    pub name: String,
    /// Address of the module which reported the system
    pub source_address: u8,
    /// Status of the system
    pub status: Status,
    /// Identifier of the system. Upper byte is the byte the system is decoded from,
    /// lower byte is the bit mask of the system within that byte
    pub id: u16,
}

impl MonitoredSystem {
    /// Creates a monitored system
    pub fn new<T: Into<String>>(name: T, status: Status, source_address: u8, id: u16) -> Self {
        Self {
            name: name.into(),
            status,
            source_address,
            id,
        }
    }
}

impl Display for MonitoredSystem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:<26} {}", self.name, self.status)
    }
}

#[derive(Debug)]
struct CompositeState {
    reports: BTreeMap<u8, Status>,
    status: Status,
}

impl CompositeState {
    fn derive_status(&self) -> Status {
        if self.reports.values().any(|s| *s == Status::NotComplete) {
            Status::NotComplete
        } else if self.reports.values().any(|s| *s == Status::Complete) {
            Status::Complete
        } else {
            // No reports, or every report says not supported
            Status::NotSupported
        }
    }
}

/// A monitored system whose status is merged from the reports of every module
/// that monitors it.
///
/// The system is complete only once every supporting module says so, and a single
/// not complete report vetoes completeness. Equality and hashing ignore the status,
/// so a composite stays findable in a map or set while its status changes.
#[derive(Debug)]
pub struct CompositeMonitoredSystem {
    name: String,
    source_address: u8,
    id: u16,
    state: Mutex<CompositeState>,
}

impl CompositeMonitoredSystem {
    /// Creates a composite with no reports, which is therefore not supported
    pub fn new<T: Into<String>>(name: T, source_address: u8, id: u16) -> Self {
        Self {
            name: name.into(),
            source_address,
            id,
            state: Mutex::new(CompositeState {
                reports: BTreeMap::new(),
                status: Status::NotSupported,
            }),
        }
    }

    /// Name of the system
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Address the composite is reported under
    pub fn source_address(&self) -> u8 {
        self.source_address
    }

    /// Identifier of the system
    pub fn id(&self) -> u16 {
        self.id
    }

    /// Records the status `system` reports for its source address, replacing any previous
    /// report from the same address.
    ///
    /// Returns true if the merged status changed as a result
    pub fn add_report(&self, system: &MonitoredSystem) -> bool {
        // The state is recomputed in full before the lock is released, so a poisoned lock
        // still holds a consistent state
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.reports.insert(system.source_address, system.status);
        let new_status = state.derive_status();
        let changed = new_status != state.status;
        if changed {
            log::debug!(
                "{} changed from {} to {} after report from 0x{:02X}",
                self.name,
                state.status,
                new_status,
                system.source_address
            );
        }
        state.status = new_status;
        changed
    }

    /// Merged status of the system
    pub fn status(&self) -> Status {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .status
    }

    /// Addresses of all modules which have reported this system
    pub fn source_addresses(&self) -> Vec<u8> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .reports
            .keys()
            .copied()
            .collect()
    }

    /// Returns the composite as a plain [MonitoredSystem] with its current merged status
    pub fn snapshot(&self) -> MonitoredSystem {
        MonitoredSystem::new(self.name.clone(), self.status(), self.source_address, self.id)
    }
}

impl PartialEq for CompositeMonitoredSystem {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.source_address == other.source_address
            && self.id == other.id
    }
}

impl Eq for CompositeMonitoredSystem {}

impl Hash for CompositeMonitoredSystem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.source_address.hash(state);
        self.id.hash(state);
    }
}

impl Display for CompositeMonitoredSystem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:<26} {}", self.name, self.status())
    }
}

/// Source address the vehicle level composites are reported under (J1939 global address)
pub const VEHICLE_ADDRESS: u8 = 0xFF;

/// Vehicle level readiness, holding one [CompositeMonitoredSystem] per system name.
///
/// Can be shared between threads, each thread feeding the packets of the modules it talks to
#[derive(Debug, Default)]
pub struct VehicleReadiness {
    systems: RwLock<BTreeMap<String, Arc<CompositeMonitoredSystem>>>,
}

impl VehicleReadiness {
    /// Creates an empty vehicle readiness, where every system is not supported
    pub fn new() -> Self {
        Self::default()
    }

    fn composite_for(&self, system: &MonitoredSystem) -> Arc<CompositeMonitoredSystem> {
        if let Some(c) = self
            .systems
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&system.name)
        {
            return c.clone();
        }
        self.systems
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(system.name.clone())
            .or_insert_with(|| {
                Arc::new(CompositeMonitoredSystem::new(
                    system.name.clone(),
                    VEHICLE_ADDRESS,
                    system.id,
                ))
            })
            .clone()
    }

    /// Adds the report of a single module's monitored system.
    /// Returns true if the vehicle level status of the system changed
    pub fn add_system(&self, system: &MonitoredSystem) -> bool {
        self.composite_for(system).add_report(system)
    }

    /// Adds every monitored system of a readiness packet.
    /// Returns the names of the systems whose vehicle level status changed
    pub fn add_packet<P: ReadinessStatus + ?Sized>(&self, packet: &P) -> Vec<String> {
        packet
            .monitored_systems()
            .iter()
            .filter(|s| self.add_system(s))
            .map(|s| s.name.clone())
            .collect()
    }

    /// Returns the vehicle level status of a system, or `None` if no module has reported it
    pub fn status_of(&self, name: &str) -> Option<Status> {
        self.systems
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .map(|c| c.status())
    }

    /// Returns a snapshot of every vehicle level system, ordered by name
    pub fn systems(&self) -> Vec<MonitoredSystem> {
        self.systems
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(|c| c.snapshot())
            .collect()
    }
}
