//! Address and object-id normalization.
//!
//! Sui addresses and object ids are 32-byte values that users paste in many
//! shapes:
//! - Short form: "0x2"
//! - Full form: "0x0000000000000000000000000000000000000000000000000000000000000002"
//! - Without prefix: "2"
//! - Explorer copies that dropped leading zero bytes
//!
//! Everything is normalized to `0x` followed by 64 lowercase hex characters.
//! Unlike a display helper, the functions here never truncate: an over-long
//! body is an error, not something to clip.

use std::fmt;

use move_core_types::account_address::AccountAddress;

/// Hex characters in a canonical address body.
pub const ADDRESS_HEX_LEN: usize = 64;

/// Why a hex string could not be normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HexShapeError {
    Empty,
    NonHex { position: usize, found: char },
    TooLong { len: usize },
}

impl fmt::Display for HexShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HexShapeError::Empty => write!(f, "no hex digits"),
            HexShapeError::NonHex { position, found } => {
                write!(f, "non-hex character '{}' at position {}", found, position)
            }
            HexShapeError::TooLong { len } => write!(
                f,
                "{} hex characters, at most {} allowed",
                len, ADDRESS_HEX_LEN
            ),
        }
    }
}

impl std::error::Error for HexShapeError {}

/// Normalize a hex address to `0x` + 64 lowercase hex characters.
///
/// Accepts an optional `0x`/`0X` prefix and left-pads short bodies with zeros.
///
/// # Examples
///
/// ```
/// use sui_call_types::address::normalize_address_strict;
///
/// assert_eq!(
///     normalize_address_strict("0x2").unwrap(),
///     "0x0000000000000000000000000000000000000000000000000000000000000002"
/// );
/// assert!(normalize_address_strict("0xZZ").is_err());
/// ```
pub fn normalize_address_strict(addr: &str) -> Result<String, HexShapeError> {
    let addr = addr.trim();
    let body = addr
        .strip_prefix("0x")
        .or_else(|| addr.strip_prefix("0X"))
        .unwrap_or(addr);

    if body.is_empty() {
        return Err(HexShapeError::Empty);
    }
    if let Some((position, found)) = body.chars().enumerate().find(|(_, c)| !c.is_ascii_hexdigit())
    {
        return Err(HexShapeError::NonHex { position, found });
    }
    if body.len() > ADDRESS_HEX_LEN {
        return Err(HexShapeError::TooLong { len: body.len() });
    }

    Ok(format!(
        "0x{:0>width$}",
        body.to_ascii_lowercase(),
        width = ADDRESS_HEX_LEN
    ))
}

/// Normalize an object id. Same padding rules as addresses, and the result
/// must match `^0x[0-9a-f]{64}$` exactly.
pub fn normalize_object_id(id: &str) -> Result<String, HexShapeError> {
    let normalized = normalize_address_strict(id)?;
    if !is_canonical_id(&normalized) {
        return Err(HexShapeError::TooLong {
            len: normalized.len().saturating_sub(2),
        });
    }
    Ok(normalized)
}

/// Check the canonical `0x` + 64 lowercase hex form.
pub fn is_canonical_id(s: &str) -> bool {
    match s.strip_prefix("0x") {
        Some(body) => {
            body.len() == ADDRESS_HEX_LEN
                && body
                    .bytes()
                    .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
        }
        None => false,
    }
}

/// Convert an AccountAddress to its normalized full-form string.
pub fn address_to_string(addr: &AccountAddress) -> String {
    format!("0x{}", hex::encode(addr.as_ref()))
}
