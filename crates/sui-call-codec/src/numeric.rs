//! Range checking for Move unsigned integers.
//!
//! Text is accepted only as plain ASCII digits: no sign, no whitespace, no
//! exponent. Values are parsed at full 256-bit precision before the width
//! bound is applied, so `2^64` is reported as "too large for u64" rather than
//! wrapping.

use move_core_types::u256::U256;
use sui_call_types::{ArgumentError, IntWidth, RangeBound, ValidationOutcome};

use crate::CodecOptions;

const DIGITS_ONLY: &str = "an unsigned integer, digits 0-9 only";

/// Parse `text` as an integer of `width`.
///
/// # Examples
///
/// ```
/// use sui_call_codec::numeric::parse_unsigned;
/// use sui_call_types::IntWidth;
///
/// assert!(parse_unsigned("amount", "255", IntWidth::U8).is_ok());
/// assert!(parse_unsigned("amount", "256", IntWidth::U8).is_err());
/// assert!(parse_unsigned("amount", "1e3", IntWidth::U64).is_err());
/// ```
pub fn parse_unsigned(param: &str, text: &str, width: IntWidth) -> Result<U256, ArgumentError> {
    if text.is_empty() {
        return Err(ArgumentError::format(param, DIGITS_ONLY, "empty value"));
    }

    if let Some(magnitude) = text.strip_prefix('-') {
        if !magnitude.is_empty() && magnitude.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ArgumentError::Range {
                param: param.to_string(),
                type_name: width.to_string(),
                bound: RangeBound::Min,
                limit: "0".to_string(),
            });
        }
    }

    if let Some((position, found)) = text.chars().enumerate().find(|(_, c)| !c.is_ascii_digit()) {
        let reason = if found.is_whitespace() {
            format!("whitespace at position {}", position)
        } else {
            format!("unexpected character '{}' at position {}", found, position)
        };
        return Err(ArgumentError::format(param, DIGITS_ONLY, reason));
    }

    let max = width.max_value();
    let too_large = || ArgumentError::Range {
        param: param.to_string(),
        type_name: width.to_string(),
        bound: RangeBound::Max,
        limit: max.to_string(),
    };

    // Text is all digits here, so a parse failure can only be 256-bit overflow.
    let value = U256::from_str_radix(text, 10).map_err(|_| too_large())?;
    if value > max {
        return Err(too_large());
    }
    Ok(value)
}

/// Advisory for u64 values that look like token amounts in smallest units.
pub fn amount_warning(width: IntWidth, value: U256, options: &CodecOptions) -> Option<String> {
    if width == IntWidth::U64 && value > U256::from(options.large_amount_warning) {
        Some(format!(
            "large value ({}); this is likely a token amount in smallest units",
            value
        ))
    } else {
        None
    }
}

/// Validate the text of an integer parameter.
///
/// Empty text is valid only for optional parameters. The normalized value is
/// the canonical decimal form (leading zeros removed).
pub fn validate_unsigned(
    param: &str,
    text: &str,
    width: IntWidth,
    optional: bool,
    options: &CodecOptions,
) -> ValidationOutcome {
    if text.is_empty() {
        return if optional {
            ValidationOutcome::empty()
        } else {
            ValidationOutcome::invalid(ArgumentError::Required {
                param: param.to_string(),
            })
        };
    }

    match parse_unsigned(param, text, width) {
        Ok(value) => {
            let outcome = ValidationOutcome::ok(value.to_string());
            match amount_warning(width, value, options) {
                Some(warning) => outcome.with_warning(warning),
                None => outcome,
            }
        }
        Err(error) => ValidationOutcome::invalid(error),
    }
}
