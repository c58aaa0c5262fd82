//! Unit wrappers and the dual unit presentation used by packet renderers

use crate::codec::{ScaledValue, group_thousands};
use std::fmt::{Display, Formatter};

/// Wrapper for J1939 distance values
#[derive(Debug, Copy, Clone, PartialOrd, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Distance(f64); // self.0 is in km

impl Distance {
    /// From kilometers
    pub fn from_kilometers(km: f64) -> Self {
        Self(km)
    }

    /// From miles
    pub fn from_miles(miles: f64) -> Self {
        Self(miles * KM_PER_MILE)
    }

    /// to Kilometers
    pub fn to_kilometers(&self) -> f64 {
        self.0
    }

    /// to miles
    pub fn to_miles(&self) -> f64 {
        self.0 / KM_PER_MILE
    }
}

const KM_PER_MILE: f64 = 1.609344;

impl Display for Distance {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format_dual_unit(
            self.to_kilometers(),
            "km",
            self.to_miles(),
            "mi",
            0,
        ))
    }
}

/// Formats a value with its unit, followed by the same value pre-converted into a second unit.
///
/// Output is `"<value> <unit> (<converted> <converted_unit>)"`, both numbers grouped in thousands.
/// The converted value is always shown with one more decimal place than the primary value
pub fn format_dual_unit(
    value: f64,
    unit: &str,
    converted: f64,
    converted_unit: &str,
    decimals: usize,
) -> String {
    format!(
        "{} {} ({} {})",
        group_thousands(value, decimals),
        unit,
        group_thousands(converted, decimals + 1),
        converted_unit
    )
}

/// Presentation settings for the renderers which print scaled values
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FormatOptions {
    /// Decimal places used for slot scaled test result values
    pub decimals: usize,
    /// Print values which have a common second unit in both units (EG: km and mi)
    pub unit_conversions: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            decimals: 1,
            unit_conversions: true,
        }
    }
}

/// Formats a scaled distance (In km), or the sentinel name.
///
/// With [FormatOptions::unit_conversions] set the value is printed as a dual km/mi string
pub fn format_distance(value: ScaledValue, options: &FormatOptions) -> String {
    match value {
        ScaledValue::Value(km) if options.unit_conversions => {
            Distance::from_kilometers(km).to_string()
        }
        ScaledValue::Value(km) => format!("{} km", group_thousands(km, 0)),
        sentinel => sentinel.to_string(),
    }
}

/// Formats a scaled time (In minutes) as `"<minutes> minutes"`, or the sentinel name
pub fn format_minutes(value: ScaledValue) -> String {
    match value {
        ScaledValue::Value(m) => format!("{} minutes", group_thousands(m, 0)),
        sentinel => sentinel.to_string(),
    }
}
