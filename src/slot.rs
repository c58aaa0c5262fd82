//! Reference data consumed by the renderers.
//!
//! SLOT definitions (Scaling, Limit, Offset and Transfer function) and SPN names
//! come from the SAE J1939 digital annex, which is not shipped with this crate.
//! Applications provide them through [SlotLookup] and [SpnNameLookup], either with
//! their own implementation or by filling a [SlotTable] / [SpnNameTable].

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
/// Scaling definition for a raw parameter
pub struct Slot {
    /// SLOT identifier
    pub id: u16,
    /// Name of the SLOT, EG: `SAEtm11`
    pub name: String,
    /// Value of 1 raw bit
    pub scaling: f64,
    /// Offset added after scaling
    pub offset: f64,
    /// Engineering unit of the scaled value
    pub unit: Option<String>,
}

impl Slot {
    /// Converts a raw value into engineering units
    pub fn scale(&self, raw: u16) -> f64 {
        f64::from(raw) * self.scaling + self.offset
    }
}

/// Lookup of SLOT definitions by SLOT identifier
pub trait SlotLookup: Send + Sync {
    /// Returns the SLOT with the identifier, or `None` if it is unknown
    fn find_slot(&self, id: u16) -> Option<Slot>;
}

/// Lookup of human readable SPN names
pub trait SpnNameLookup: Send + Sync {
    /// Returns the name of the SPN, or `None` if it is unknown
    fn spn_name(&self, spn: u32) -> Option<String>;
}

#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
/// In memory [SlotLookup]
pub struct SlotTable {
    slots: HashMap<u16, Slot>,
}

impl SlotTable {
    /// Adds (or replaces) a SLOT definition
    pub fn insert(&mut self, slot: Slot) {
        self.slots.insert(slot.id, slot);
    }

    /// Number of SLOTs in the table
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if the table holds no SLOTs
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Loads a table from a JSON array of [Slot] objects
    #[cfg(feature = "reference-data")]
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let slots: Vec<Slot> = serde_json::from_str(json)?;
        log::debug!("Loaded {} SLOT definitions", slots.len());
        Ok(slots.into_iter().collect())
    }
}

impl FromIterator<Slot> for SlotTable {
    fn from_iter<T: IntoIterator<Item = Slot>>(iter: T) -> Self {
        Self {
            slots: iter.into_iter().map(|s| (s.id, s)).collect(),
        }
    }
}

impl SlotLookup for SlotTable {
    fn find_slot(&self, id: u16) -> Option<Slot> {
        self.slots.get(&id).cloned()
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
/// In memory [SpnNameLookup]
pub struct SpnNameTable {
    names: HashMap<u32, String>,
}

impl SpnNameTable {
    /// Adds (or replaces) the name of an SPN
    pub fn insert<T: Into<String>>(&mut self, spn: u32, name: T) {
        self.names.insert(spn, name.into());
    }

    /// Loads a table from a JSON object mapping SPN numbers to names,
    /// EG: `{"190": "Engine Speed"}`
    #[cfg(feature = "reference-data")]
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let table: Self = serde_json::from_str(json)?;
        log::debug!("Loaded {} SPN names", table.names.len());
        Ok(table)
    }
}

impl SpnNameLookup for SpnNameTable {
    fn spn_name(&self, spn: u32) -> Option<String> {
        self.names.get(&spn).cloned()
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
/// Lookup that knows no SLOTs and no SPN names.
/// Renderers fall back to raw values when using this
pub struct NoReferenceData;

impl SlotLookup for NoReferenceData {
    fn find_slot(&self, _id: u16) -> Option<Slot> {
        None
    }
}

impl SpnNameLookup for NoReferenceData {
    fn spn_name(&self, _spn: u32) -> Option<String> {
        None
    }
}
