//! Encoded call arguments.
//!
//! An [`EncodedArgument`] is what the signer receives for each user-facing
//! parameter: a pure value, an object id, or a pure vector.
//!
//! ## Precision
//!
//! JSON consumers commonly store numbers as IEEE-754 doubles, which are exact
//! only up to `2^53 - 1` ([`MAX_SAFE_INTEGER`]). Two rules follow:
//! - encoded pure integers of width `<= 32` are JSON numbers, wider ones are
//!   always decimal strings (one decoding rule per width);
//! - free-standing display integers use [`json_integer`], which switches to a
//!   string above `MAX_SAFE_INTEGER`.

use move_core_types::account_address::AccountAddress;
use move_core_types::u256::U256;
use serde_json::{json, Value};

use crate::address::address_to_string;
use crate::type_parsing::IntWidth;

/// Largest integer a double represents exactly, `2^53 - 1`.
pub const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

/// A value passed by value (BCS-encoded) rather than by object reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PureValue {
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    U256(U256),
    Bool(bool),
    Address(AccountAddress),
    String(String),
    Vector(Vec<PureValue>),
}

impl PureValue {
    /// Build an integer of the given width. The caller has range-checked
    /// `value`; anything that does not fit yields `None`.
    pub fn integer(width: IntWidth, value: U256) -> Option<Self> {
        let decimal = value.to_string();
        Some(match width {
            IntWidth::U8 => PureValue::U8(decimal.parse().ok()?),
            IntWidth::U16 => PureValue::U16(decimal.parse().ok()?),
            IntWidth::U32 => PureValue::U32(decimal.parse().ok()?),
            IntWidth::U64 => PureValue::U64(decimal.parse().ok()?),
            IntWidth::U128 => PureValue::U128(decimal.parse().ok()?),
            IntWidth::U256 => PureValue::U256(value),
        })
    }

    /// JSON form for the signer: native numbers for widths up to 32 bits,
    /// decimal strings from 64 bits up.
    pub fn to_json(&self) -> Value {
        match self {
            PureValue::U8(v) => json!(v),
            PureValue::U16(v) => json!(v),
            PureValue::U32(v) => json!(v),
            PureValue::U64(v) => Value::String(v.to_string()),
            PureValue::U128(v) => Value::String(v.to_string()),
            PureValue::U256(v) => Value::String(v.to_string()),
            PureValue::Bool(b) => Value::Bool(*b),
            PureValue::Address(addr) => Value::String(address_to_string(addr)),
            PureValue::String(s) => Value::String(s.clone()),
            PureValue::Vector(values) => Value::Array(values.iter().map(|v| v.to_json()).collect()),
        }
    }

    /// BCS bytes of this value as a pure transaction input.
    pub fn to_bcs_bytes(&self) -> Result<Vec<u8>, bcs::Error> {
        let mut out = Vec::new();
        self.write_bcs(&mut out)?;
        Ok(out)
    }

    fn write_bcs(&self, out: &mut Vec<u8>) -> Result<(), bcs::Error> {
        match self {
            PureValue::U8(v) => out.push(*v),
            PureValue::U16(v) => out.extend_from_slice(&v.to_le_bytes()),
            PureValue::U32(v) => out.extend_from_slice(&v.to_le_bytes()),
            PureValue::U64(v) => out.extend_from_slice(&v.to_le_bytes()),
            PureValue::U128(v) => out.extend_from_slice(&v.to_le_bytes()),
            PureValue::U256(v) => out.extend_from_slice(&v.to_le_bytes()),
            PureValue::Bool(b) => out.push(u8::from(*b)),
            PureValue::Address(addr) => out.extend_from_slice(addr.as_ref()),
            PureValue::String(s) => out.extend(bcs::to_bytes(s)?),
            PureValue::Vector(values) => {
                write_uleb128(values.len(), out);
                for value in values {
                    value.write_bcs(out)?;
                }
            }
        }
        Ok(())
    }
}

/// One argument of a built call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodedArgument {
    Pure(PureValue),
    /// Object passed by its normalized id (`0x` + 64 hex).
    Object { id: String },
    /// Vector literal. `element_width` is set for integer elements.
    PureVector {
        element_width: Option<IntWidth>,
        values: Vec<PureValue>,
    },
}

impl EncodedArgument {
    pub fn is_object(&self) -> bool {
        matches!(self, EncodedArgument::Object { .. })
    }

    /// Tagged JSON form handed to signers.
    pub fn to_json(&self) -> Value {
        match self {
            EncodedArgument::Pure(value) => json!({ "kind": "pure", "value": value.to_json() }),
            EncodedArgument::Object { id } => json!({ "kind": "object", "objectId": id }),
            EncodedArgument::PureVector {
                element_width,
                values,
            } => json!({
                "kind": "pureVector",
                "elementType": element_width.map(|w| w.keyword()),
                "values": values.iter().map(|v| v.to_json()).collect::<Vec<_>>(),
            }),
        }
    }

    /// BCS bytes for pure arguments; `None` for objects.
    pub fn pure_bytes(&self) -> Result<Option<Vec<u8>>, bcs::Error> {
        match self {
            EncodedArgument::Pure(value) => value.to_bcs_bytes().map(Some),
            EncodedArgument::Object { .. } => Ok(None),
            EncodedArgument::PureVector { values, .. } => PureValue::Vector(values.clone())
                .to_bcs_bytes()
                .map(Some),
        }
    }
}

/// JSON rendering of a display integer: a number when exactly representable
/// as a double, a decimal string otherwise.
///
/// # Examples
///
/// ```
/// use move_core_types::u256::U256;
/// use sui_call_types::argument::{json_integer, MAX_SAFE_INTEGER};
///
/// assert!(json_integer(U256::from(MAX_SAFE_INTEGER)).is_number());
/// assert!(json_integer(U256::from(MAX_SAFE_INTEGER + 1)).is_string());
/// ```
pub fn json_integer(value: U256) -> Value {
    if value <= U256::from(MAX_SAFE_INTEGER) {
        if let Ok(n) = value.to_string().parse::<u64>() {
            return json!(n);
        }
    }
    Value::String(value.to_string())
}

/// Append a ULEB128 length prefix.
pub fn write_uleb128(mut value: usize, out: &mut Vec<u8>) {
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            break;
        }
        out.push(byte | 0x80);
    }
}

/// Read a ULEB128 length prefix. Returns the value and bytes consumed.
pub fn read_uleb128(bytes: &[u8]) -> Option<(usize, usize)> {
    let mut value: usize = 0;
    let mut shift = 0u32;
    for (i, byte) in bytes.iter().enumerate() {
        if shift >= usize::BITS {
            return None;
        }
        value |= ((byte & 0x7F) as usize) << shift;
        if byte & 0x80 == 0 {
            return Some((value, i + 1));
        }
        shift += 7;
    }
    None
}
