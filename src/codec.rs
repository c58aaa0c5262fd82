//! Byte and word extraction helpers shared by every J1939 decoder,
//! along with the J1939 sentinel conventions for raw values.

use std::fmt::{Display, Formatter};

/// Raw byte value reserved for "error" indication
pub const ERROR_BYTE: u8 = 0xFE;
/// Raw byte value reserved for "not available"
pub const NOT_AVAILABLE_BYTE: u8 = 0xFF;

/// Reads a single byte. Returns `None` if `index` is past the end of `data`
pub fn byte_at(data: &[u8], index: usize) -> Option<u8> {
    data.get(index).copied()
}

/// Reads a little endian 16bit word starting at `index`
pub fn word_at(data: &[u8], index: usize) -> Option<u16> {
    let b = data.get(index..)?.get(..2)?;
    Some(u16::from_le_bytes([b[0], b[1]]))
}

/// Packs the 19bit SPN that J1939-73 spreads over 3 bytes.
///
/// The low 16 bits are `b0` and `b1`, the top 3 bits are bits 5-7 of `b2`
/// (The remaining 5 bits of `b2` belong to whatever field follows the SPN, usually the FMI)
pub const fn spn_from_bytes(b0: u8, b1: u8, b2: u8) -> u32 {
    (((b2 & 0xE0) as u32) << 11) | ((b1 as u32) << 8) | b0 as u32
}

/// Lower 5 bits of the 3rd SPN byte, the Failure Mode Identifier
pub const fn fmi_from_byte(b2: u8) -> u8 {
    b2 & 0x1F
}

#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
/// A scaled J1939 parameter, which may carry one of the reserved sentinel states
/// instead of a number
pub enum ScaledValue {
    /// Raw value multiplied by its scale factor
    Value(f64),
    /// Module reported an error for the parameter
    Error,
    /// Parameter is not available from the module
    NotAvailable,
}

impl Display for ScaledValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ScaledValue::Value(v) => write!(f, "{}", group_thousands(*v, 0)),
            ScaledValue::Error => write!(f, "error"),
            ScaledValue::NotAvailable => write!(f, "not available"),
        }
    }
}

/// Interprets a raw 16bit word using the J1939 sentinel convention
/// on its high byte, and scales it by `scale` otherwise
pub fn scale_word(raw: u16, scale: f64) -> ScaledValue {
    match (raw >> 8) as u8 {
        NOT_AVAILABLE_BYTE => ScaledValue::NotAvailable,
        ERROR_BYTE => ScaledValue::Error,
        _ => ScaledValue::Value(f64::from(raw) * scale),
    }
}

/// Reads a little endian word at `index` (Low byte first), and scales it.
///
/// A high byte of `0xFF` yields [ScaledValue::NotAvailable], and a high byte of `0xFE`
/// yields [ScaledValue::Error]
pub fn scaled_word(data: &[u8], index: usize, scale: f64) -> Option<ScaledValue> {
    word_at(data, index).map(|raw| scale_word(raw, scale))
}

/// Formats a raw byte that represents a count (EG: Number of active DTCs).
///
/// The byte itself is always kept raw by the decoders; the sentinel values are only
/// interpreted here
pub fn format_count(raw: u8) -> String {
    match raw {
        ERROR_BYTE => "error".into(),
        NOT_AVAILABLE_BYTE => "not available".into(),
        x => x.to_string(),
    }
}

/// Formats a number with `decimals` decimal places and a `,` thousands separator.
///
/// ```
/// use j1939_diagnostics::codec::group_thousands;
/// assert_eq!(group_thousands(1234567.891, 1), "1,234,567.9");
/// assert_eq!(group_thousands(-1000.0, 0), "-1,000");
/// ```
pub fn group_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };
    let mut res = String::with_capacity(formatted.len() + int_part.len() / 3 + 1);
    // -0.0 would otherwise show up as "-0"
    let non_zero = int_part
        .bytes()
        .chain(frac_part.unwrap_or("").bytes())
        .any(|c| c != b'0');
    if value.is_sign_negative() && non_zero {
        res.push('-');
    }
    for (pos, c) in int_part.chars().enumerate() {
        if pos != 0 && (int_part.len() - pos) % 3 == 0 {
            res.push(',');
        }
        res.push(c);
    }
    if let Some(frac) = frac_part {
        res.push('.');
        res.push_str(frac);
    }
    res
}

/// Decodes a byte sequence as ISO-8859-1 (Every byte maps to the char with the same code point),
/// which is how J1939 transmits its ASCII parameters
pub fn ascii(data: &[u8]) -> String {
    data.iter().map(|b| *b as char).collect()
}

/// Trims whitespace and control characters (Including NUL padding) from both ends
pub fn trim_ascii_field(s: &str) -> &str {
    s.trim_matches(|c: char| c <= ' ')
}
