//! Vector literal parsing.
//!
//! Accepted forms:
//! - a JSON array, each element validated against the element type
//!   (`[1, 2, 3]`, `["0x1", "0x2"]`, `[[1], [2, 3]]`)
//! - for `vector<u8>` only: a byte-string literal `b"Hi"` (one element per
//!   character code) or a `0x`-prefixed hex string
//!
//! Any failing element aborts the whole vector; the error carries the index.

use serde_json::Value;
use sui_call_types::{
    ArgumentError, EncodedArgument, IntWidth, PureValue, TypeCategory, TypeDescriptor,
};

use crate::scalar::encode_pure_scalar;

/// Encode a vector literal for a parameter whose element type is `element`.
pub fn encode_vector(
    param: &str,
    text: &str,
    element: &TypeDescriptor,
) -> Result<EncodedArgument, ArgumentError> {
    let values = parse_vector_values(param, text, element)?;
    let element_width = match element.category {
        TypeCategory::UnsignedInt(width) => Some(width),
        _ => None,
    };
    Ok(EncodedArgument::PureVector {
        element_width,
        values,
    })
}

/// Parse a vector literal into its encoded elements.
pub fn parse_vector_values(
    param: &str,
    text: &str,
    element: &TypeDescriptor,
) -> Result<Vec<PureValue>, ArgumentError> {
    let text = text.trim();

    if element.category == TypeCategory::UnsignedInt(IntWidth::U8) {
        if let Some(body) = byte_string_body(text) {
            let texts: Vec<String> = body.chars().map(|c| (c as u32).to_string()).collect();
            return encode_elements(param, texts.iter().map(String::as_str), element);
        }
        if let Some(hex_body) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
            let bytes = hex::decode(hex_body).map_err(|e| {
                ArgumentError::format(param, "an even-length hex byte string", e.to_string())
            })?;
            return Ok(bytes.into_iter().map(PureValue::U8).collect());
        }
    }

    let json: Value = serde_json::from_str(text).map_err(|e| {
        ArgumentError::format(param, format!("a JSON array for {}", element), e.to_string())
    })?;
    let items = json.as_array().ok_or_else(|| {
        ArgumentError::format(
            param,
            format!("a JSON array for {}", element),
            format!("got {}", json_kind(&json)),
        )
    })?;
    array_values(param, items, element)
}

/// Body of a `b"..."` literal, if `text` is one.
fn byte_string_body(text: &str) -> Option<&str> {
    text.strip_prefix("b\"")?.strip_suffix('"')
}

fn encode_elements<'a>(
    param: &str,
    texts: impl Iterator<Item = &'a str>,
    element: &TypeDescriptor,
) -> Result<Vec<PureValue>, ArgumentError> {
    texts
        .enumerate()
        .map(|(index, text)| {
            encode_pure_scalar(&element_name(param, index), text, element)
                .map_err(|e| wrap(param, index, e))
        })
        .collect()
}

fn array_values(
    param: &str,
    items: &[Value],
    element: &TypeDescriptor,
) -> Result<Vec<PureValue>, ArgumentError> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            element_value(&element_name(param, index), item, element)
                .map_err(|e| wrap(param, index, e))
        })
        .collect()
}

fn element_value(
    name: &str,
    item: &Value,
    element: &TypeDescriptor,
) -> Result<PureValue, ArgumentError> {
    if let TypeCategory::Vector(inner) = &element.category {
        return match item {
            Value::Array(items) => array_values(name, items, inner).map(PureValue::Vector),
            // Nested byte strings and hex are allowed at any depth.
            Value::String(s) => parse_vector_values(name, s, inner).map(PureValue::Vector),
            other => Err(ArgumentError::format(
                name,
                format!("an array for {}", element),
                format!("got {}", json_kind(other)),
            )),
        };
    }

    let text = match item {
        Value::String(s) => s.clone(),
        // Literal digits; relies on serde_json's `arbitrary_precision`.
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => {
            return Err(ArgumentError::format(
                name,
                format!("a {} element", element),
                format!("got {}", json_kind(other)),
            ))
        }
    };
    encode_pure_scalar(name, &text, element)
}

fn element_name(param: &str, index: usize) -> String {
    format!("{}[{}]", param, index)
}

fn wrap(param: &str, index: usize, error: ArgumentError) -> ArgumentError {
    ArgumentError::Vector {
        param: param.to_string(),
        index,
        source: Box::new(error),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
