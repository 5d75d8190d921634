//! # Simulation Result Decoding
//!
//! Read-only simulation returns one BCS byte sequence per declared return
//! slot, tagged with its Move type. This module turns those back into
//! display values.
//!
//! | Type | Decoding |
//! |------|----------|
//! | `u8` .. `u256` | little-endian, at most the width's byte length |
//! | `bool` | `1` is true, `0` is false, any other byte kept raw |
//! | `address`, `signer`, `0x2::object::ID` | `0x` + 64 lowercase hex |
//! | `vector<T>` | ULEB128 length, then elements |
//! | `0x1::string::String`, `0x1::ascii::String` | UTF-8 text |
//! | anything else | raw bytes with the type tag |
//!
//! Decoding never fails. Anything that cannot be interpreted exactly comes
//! back as [`DecodedValue::Raw`].

use std::fmt;

use anyhow::{Context, Result};
use base64::Engine;
use move_core_types::u256::U256;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sui_call_types::address::ADDRESS_HEX_LEN;
use sui_call_types::argument::read_uleb128;
use sui_call_types::{json_integer, IntWidth, TypeCategory, TypeDescriptor};

const ADDRESS_BYTES: usize = ADDRESS_HEX_LEN / 2;

/// A decoded return value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedValue {
    Integer { width: IntWidth, value: U256 },
    Bool(bool),
    /// A `bool` slot holding something other than 0 or 1.
    RawByte(u8),
    Address(String),
    Text(String),
    Vector(Vec<DecodedValue>),
    /// Bytes that could not be interpreted as `type_tag`.
    Raw { bytes: Vec<u8>, type_tag: String },
}

impl DecodedValue {
    fn raw(bytes: &[u8], type_tag: &str) -> Self {
        DecodedValue::Raw {
            bytes: bytes.to_vec(),
            type_tag: type_tag.to_string(),
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, DecodedValue::Raw { .. } | DecodedValue::RawByte(_))
    }

    /// JSON form. Integers above `2^53 - 1` become decimal strings.
    pub fn to_json(&self) -> Value {
        match self {
            DecodedValue::Integer { value, .. } => json_integer(*value),
            DecodedValue::Bool(b) => Value::Bool(*b),
            DecodedValue::RawByte(b) => json!({ "rawByte": b }),
            DecodedValue::Address(s) | DecodedValue::Text(s) => Value::String(s.clone()),
            DecodedValue::Vector(values) => {
                Value::Array(values.iter().map(DecodedValue::to_json).collect())
            }
            DecodedValue::Raw { bytes, type_tag } => json!({
                "rawHex": hex::encode(bytes),
                "type": type_tag,
            }),
        }
    }
}

impl fmt::Display for DecodedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodedValue::Integer { value, .. } => write!(f, "{}", value),
            DecodedValue::Bool(b) => write!(f, "{}", b),
            DecodedValue::RawByte(b) => write!(f, "[{}] (bool)", b),
            DecodedValue::Address(s) | DecodedValue::Text(s) => f.write_str(s),
            DecodedValue::Vector(values) => {
                f.write_str("[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                f.write_str("]")
            }
            DecodedValue::Raw { bytes, type_tag } => write!(f, "{:?} ({})", bytes, type_tag),
        }
    }
}

/// One return slot of a simulation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnSlot {
    pub bytes: Vec<u8>,
    pub type_tag: String,
}

impl ReturnSlot {
    pub fn new(bytes: Vec<u8>, type_tag: impl Into<String>) -> Self {
        Self {
            bytes,
            type_tag: type_tag.into(),
        }
    }

    /// Build a slot from base64 bytes, as RPC responses carry them.
    pub fn from_base64(encoded: &str, type_tag: impl Into<String>) -> Result<Self> {
        let type_tag = type_tag.into();
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(encoded.trim())
            .with_context(|| format!("invalid base64 return value for {}", type_tag))?;
        Ok(Self { bytes, type_tag })
    }

    pub fn decode(&self) -> DecodedValue {
        decode_return_value(&self.bytes, &self.type_tag)
    }
}

/// Decode every return slot, in order.
pub fn decode_simulation(slots: &[ReturnSlot]) -> Vec<DecodedValue> {
    slots.iter().map(ReturnSlot::decode).collect()
}

/// Decode the bytes of one return slot declared as `type_tag`.
///
/// # Examples
///
/// ```
/// use sui_call_codec::decoder::decode_return_value;
///
/// assert_eq!(decode_return_value(&[0x39, 0x30], "u16").to_string(), "12345");
/// assert_eq!(
///     decode_return_value(&[1, 2], "0x2::pool::Pool").to_string(),
///     "[1, 2] (0x2::pool::Pool)"
/// );
/// ```
pub fn decode_return_value(bytes: &[u8], type_tag: &str) -> DecodedValue {
    let descriptor = TypeDescriptor::parse(type_tag);
    let decoded = match &descriptor.category {
        TypeCategory::UnsignedInt(width) => decode_integer(bytes, *width),
        TypeCategory::Boolean => match bytes {
            [b] => Some(decode_bool(*b)),
            _ => None,
        },
        _ if is_address_like(&descriptor) => decode_address(bytes),
        _ => decode_prefix(bytes, &descriptor)
            .filter(|(_, consumed)| *consumed == bytes.len())
            .map(|(value, _)| value),
    };
    decoded.unwrap_or_else(|| DecodedValue::raw(bytes, type_tag))
}

/// Whole-slot little-endian integer. Longer than the width is not guessed at.
fn decode_integer(bytes: &[u8], width: IntWidth) -> Option<DecodedValue> {
    if bytes.is_empty() || bytes.len() > width.byte_len() {
        return None;
    }
    let mut buf = [0u8; 32];
    buf[..bytes.len()].copy_from_slice(bytes);
    Some(DecodedValue::Integer {
        width,
        value: U256::from_le_bytes(&buf),
    })
}

fn decode_bool(byte: u8) -> DecodedValue {
    match byte {
        0 => DecodedValue::Bool(false),
        1 => DecodedValue::Bool(true),
        other => DecodedValue::RawByte(other),
    }
}

/// Address bytes, left-padded to 32 bytes.
fn decode_address(bytes: &[u8]) -> Option<DecodedValue> {
    if bytes.is_empty() || bytes.len() > ADDRESS_BYTES {
        return None;
    }
    let hex = hex::encode(bytes);
    Some(DecodedValue::Address(format!(
        "0x{:0>width$}",
        hex,
        width = ADDRESS_HEX_LEN
    )))
}

fn is_address_like(descriptor: &TypeDescriptor) -> bool {
    match &descriptor.category {
        TypeCategory::Address | TypeCategory::Signer => true,
        TypeCategory::ObjectReference { inner_type, .. } => {
            let lower = inner_type.to_ascii_lowercase();
            lower.ends_with("::object::id") || lower.ends_with("::object::uid")
        }
        _ => false,
    }
}

fn is_string_like(descriptor: &TypeDescriptor) -> bool {
    match &descriptor.category {
        TypeCategory::ObjectReference { inner_type, .. } => {
            let lower = inner_type.to_ascii_lowercase();
            lower.ends_with("::string::string") || lower.ends_with("::ascii::string")
        }
        _ => false,
    }
}

/// Decode one BCS value from the front of `bytes`. Returns the value and the
/// number of bytes consumed, or `None` when the type is not decodable or the
/// bytes run out.
fn decode_prefix(bytes: &[u8], descriptor: &TypeDescriptor) -> Option<(DecodedValue, usize)> {
    match &descriptor.category {
        TypeCategory::UnsignedInt(width) => {
            let len = width.byte_len();
            let value = decode_integer(bytes.get(..len)?, *width)?;
            Some((value, len))
        }
        TypeCategory::Boolean => bytes.first().map(|b| (decode_bool(*b), 1)),
        TypeCategory::Vector(element) => {
            let (count, mut offset) = read_uleb128(bytes)?;
            // Every element takes at least one byte.
            if count > bytes.len() - offset {
                return None;
            }
            let mut values = Vec::with_capacity(count);
            for _ in 0..count {
                let (value, consumed) = decode_prefix(&bytes[offset..], element)?;
                values.push(value);
                offset += consumed;
            }
            Some((DecodedValue::Vector(values), offset))
        }
        _ if is_address_like(descriptor) => {
            let value = decode_address(bytes.get(..ADDRESS_BYTES)?)?;
            Some((value, ADDRESS_BYTES))
        }
        _ if is_string_like(descriptor) => {
            let (len, offset) = read_uleb128(bytes)?;
            let end = offset.checked_add(len)?;
            let text = std::str::from_utf8(bytes.get(offset..end)?).ok()?;
            Some((DecodedValue::Text(text.to_string()), end))
        }
        _ => None,
    }
}
