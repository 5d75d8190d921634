//! Scalar argument encoding.
//!
//! Converts the text of a non-vector parameter into an [`EncodedArgument`].
//! Objects and addresses share hex normalization, but the category decides
//! the output: a `signer` or `address` is a pure value, anything declared as a
//! reference or struct-qualified type is passed by object id.

use move_core_types::account_address::AccountAddress;
use sui_call_types::address::{normalize_address_strict, normalize_object_id};
use sui_call_types::{
    ArgumentError, EncodedArgument, PureValue, RangeBound, TypeCategory, TypeDescriptor,
};

use crate::numeric::parse_unsigned;

/// Parse a boolean. Case-insensitive `true`/`false`, nothing else.
pub fn parse_bool(param: &str, text: &str) -> Result<bool, ArgumentError> {
    if text.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if text.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ArgumentError::format(
            param,
            "true or false",
            format!("'{}' is not a boolean", text),
        ))
    }
}

/// Normalize and parse an address or signer value.
pub fn parse_address(param: &str, text: &str) -> Result<AccountAddress, ArgumentError> {
    let normalized = normalize_address_strict(text).map_err(|e| {
        ArgumentError::format(param, "a hex address of up to 64 digits", e.to_string())
    })?;
    AccountAddress::from_hex_literal(&normalized).map_err(|e| {
        ArgumentError::format(param, "a hex address of up to 64 digits", e.to_string())
    })
}

/// Normalize an object id to `0x` + 64 lowercase hex.
pub fn parse_object_id(param: &str, text: &str) -> Result<String, ArgumentError> {
    normalize_object_id(text)
        .map_err(|e| ArgumentError::format(param, "a 0x-prefixed 64-digit object id", e.to_string()))
}

/// Sanity-check a free-form string. Text containing a quote or backslash
/// must be a well-formed JSON string literal.
pub fn check_string(param: &str, text: &str) -> Result<(), ArgumentError> {
    if text.contains('"') || text.contains('\\') {
        serde_json::from_str::<String>(text).map_err(|e| {
            ArgumentError::format(param, "a string with valid JSON escaping", e.to_string())
        })?;
    }
    Ok(())
}

/// Encode text as a pure value for integer, boolean, address, signer and
/// string categories. Object and vector categories are rejected here; they
/// go through [`encode_scalar`] and the vector codec respectively.
pub fn encode_pure_scalar(
    param: &str,
    text: &str,
    descriptor: &TypeDescriptor,
) -> Result<PureValue, ArgumentError> {
    match &descriptor.category {
        TypeCategory::UnsignedInt(width) => {
            let value = parse_unsigned(param, text, *width)?;
            PureValue::integer(*width, value).ok_or_else(|| ArgumentError::Range {
                param: param.to_string(),
                type_name: width.to_string(),
                bound: RangeBound::Max,
                limit: width.max_value().to_string(),
            })
        }
        TypeCategory::Boolean => parse_bool(param, text).map(PureValue::Bool),
        TypeCategory::Address | TypeCategory::Signer => {
            parse_address(param, text).map(PureValue::Address)
        }
        TypeCategory::GenericString => {
            check_string(param, text)?;
            Ok(PureValue::String(text.to_string()))
        }
        TypeCategory::ObjectReference { .. } => Err(ArgumentError::format(
            param,
            "a pure value",
            format!("{} is passed by object id", descriptor),
        )),
        TypeCategory::Vector(_) => Err(ArgumentError::format(
            param,
            "a scalar value",
            format!("{} is a vector type", descriptor),
        )),
    }
}

/// Encode the text of a scalar parameter.
pub fn encode_scalar(
    param: &str,
    text: &str,
    descriptor: &TypeDescriptor,
) -> Result<EncodedArgument, ArgumentError> {
    match &descriptor.category {
        TypeCategory::ObjectReference { .. } => {
            parse_object_id(param, text).map(|id| EncodedArgument::Object { id })
        }
        _ => encode_pure_scalar(param, text, descriptor).map(EncodedArgument::Pure),
    }
}
