//! Malfunction indicator and warning lamp decoding.
//!
//! Every J1939 trouble code message starts with two lamp bytes. The first holds
//! the current state of each lamp, the second holds the flash state. Each lamp
//! occupies the same 2 bit position in both bytes.

use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, IntoStaticStr};

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
/// Lamps reported in the lamp status bytes
pub enum Lamp {
    /// Malfunction indicator lamp
    #[strum(serialize = "MIL")]
    Mil,
    /// Red stop lamp
    #[strum(serialize = "RSL")]
    RedStop,
    /// Amber warning lamp
    #[strum(serialize = "AWL")]
    AmberWarning,
    /// Protect lamp
    #[strum(serialize = "PL")]
    Protect,
}

impl Lamp {
    /// Bit shift of the lamp's 2 bit field within both lamp bytes
    pub const fn shift(&self) -> u8 {
        match self {
            Lamp::Mil => 6,
            Lamp::RedStop => 4,
            Lamp::AmberWarning => 2,
            Lamp::Protect => 0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
/// Decoded state of a single lamp
pub enum LampStatus {
    /// Lamp is off
    #[strum(serialize = "off")]
    Off,
    /// Lamp is on, steady
    #[strum(serialize = "on")]
    On,
    /// Lamp is flashing at 1Hz
    #[strum(serialize = "slow flash")]
    SlowFlash,
    /// Lamp is flashing at 2Hz
    #[strum(serialize = "fast flash")]
    FastFlash,
    /// Reserved or not available combination
    #[strum(serialize = "other")]
    Other,
}

impl LampStatus {
    /// Decodes a lamp from its 2 bit `current` and 2 bit `flash` fields
    pub const fn from_fields(current: u8, flash: u8) -> Self {
        match (current & 0b11, flash & 0b11) {
            (0b00, _) => LampStatus::Off,
            (0b01, 0b00) => LampStatus::SlowFlash,
            (0b01, 0b01) => LampStatus::FastFlash,
            (0b01, 0b11) => LampStatus::On,
            _ => LampStatus::Other,
        }
    }

    /// Decodes `lamp` out of the current and flash lamp bytes
    pub const fn from_bytes(lamp: Lamp, current_byte: u8, flash_byte: u8) -> Self {
        let shift = lamp.shift();
        Self::from_fields(current_byte >> shift, flash_byte >> shift)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
/// The 4 lamps of a single message, decoded once when the message is decoded
pub struct LampSet {
    /// Malfunction indicator lamp
    pub mil: LampStatus,
    /// Red stop lamp
    pub red_stop: LampStatus,
    /// Amber warning lamp
    pub amber_warning: LampStatus,
    /// Protect lamp
    pub protect: LampStatus,
}

impl LampSet {
    /// Decodes all 4 lamps out of the current and flash lamp bytes
    pub const fn from_bytes(current_byte: u8, flash_byte: u8) -> Self {
        Self {
            mil: LampStatus::from_bytes(Lamp::Mil, current_byte, flash_byte),
            red_stop: LampStatus::from_bytes(Lamp::RedStop, current_byte, flash_byte),
            amber_warning: LampStatus::from_bytes(Lamp::AmberWarning, current_byte, flash_byte),
            protect: LampStatus::from_bytes(Lamp::Protect, current_byte, flash_byte),
        }
    }

    /// Returns the status of a single lamp
    pub const fn get(&self, lamp: Lamp) -> LampStatus {
        match lamp {
            Lamp::Mil => self.mil,
            Lamp::RedStop => self.red_stop,
            Lamp::AmberWarning => self.amber_warning,
            Lamp::Protect => self.protect,
        }
    }
}

impl std::fmt::Display for LampSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, lamp) in Lamp::iter().enumerate() {
            if i != 0 {
                f.write_str(", ")?;
            }
            let name: &'static str = lamp.into();
            write!(f, "{name}: {}", self.get(lamp))?;
        }
        Ok(())
    }
}
