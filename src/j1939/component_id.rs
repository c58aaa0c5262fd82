//! Component identification (PGN 65259)

use std::fmt::{Display, Formatter};

use crate::codec::{ascii, trim_ascii_field};
use crate::j1939::{ModuleName, PGN_COMPONENT_ID, RawMessage};
use crate::DecodeResult;

const FIELD_DELIMITER: char = '*';

/// Decoded component identification message.
///
/// Each field is `None` when the message ran out of delimiters before it was reached,
/// and `Some("")` when a delimiter was present but the field is empty
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComponentIdentification {
    /// Address of the module that sent the message
    pub source_address: u8,
    /// Make
    pub make: Option<String>,
    /// Model
    pub model: Option<String>,
    /// Serial number
    pub serial_number: Option<String>,
    /// Unit number (Power unit)
    pub unit_number: Option<String>,
}

impl ComponentIdentification {
    /// Decodes a component identification message. Any length is accepted,
    /// missing fields are left as `None`
    pub fn decode(msg: &RawMessage) -> DecodeResult<Self> {
        msg.expect_pgn(PGN_COMPONENT_ID)?;
        let [make, model, serial_number, unit_number] = split_fields(&ascii(&msg.data));
        Ok(Self {
            source_address: msg.source_address,
            make,
            model,
            serial_number,
            unit_number,
        })
    }
}

/// Fills the 4 fields left to right. Once no delimiter is left, the current field takes
/// the rest of the text and the fields after it stay unset
fn split_fields(text: &str) -> [Option<String>; 4] {
    let mut fields: [Option<String>; 4] = Default::default();
    let mut rest = text;
    for field in fields.iter_mut() {
        match rest.split_once(FIELD_DELIMITER) {
            Some((value, remaining)) => {
                *field = Some(trim_ascii_field(value).to_string());
                rest = remaining;
            }
            None => {
                *field = Some(trim_ascii_field(rest).to_string());
                break;
            }
        }
    }
    fields
}

impl Display for ComponentIdentification {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let field = |v: &Option<String>| v.clone().unwrap_or_default();
        write!(
            f,
            "Component Identification from {}: Make: {}, Model: {}, Serial: {}, Unit: {}",
            ModuleName(self.source_address),
            field(&self.make),
            field(&self.model),
            field(&self.serial_number),
            field(&self.unit_number)
        )
    }
}
