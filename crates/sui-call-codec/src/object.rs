//! Object reference resolution.
//!
//! An object argument is first normalized like an address, then optionally
//! checked against an [`ObjectDirectory`]. Outcomes:
//! - not found: hard error
//! - found, type does not contain the declared type: valid with a warning
//!   (type tag formatting varies, so this is advisory)
//! - found and matching: valid
//!
//! Lookups are read-only and idempotent; repeating one is always safe.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use sui_call_types::address::normalize_address_strict;
use sui_call_types::{ArgumentError, ValidationOutcome};
use tracing::{debug, warn};

use crate::scalar::parse_object_id;

/// Ownership of an on-chain object, as reported by the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ObjectOwner {
    AddressOwner(String),
    ObjectOwner(String),
    Shared { initial_shared_version: u64 },
    Immutable,
}

/// Directory metadata for an existing object.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectInfo {
    pub type_tag: Option<String>,
    pub owner: Option<ObjectOwner>,
    pub version: Option<String>,
}

/// Read-only view of on-chain objects.
#[async_trait::async_trait]
pub trait ObjectDirectory: Send + Sync {
    /// Look up a normalized (`0x` + 64 hex) object id. `Ok(None)` means the
    /// object does not exist; `Err` means the directory could not answer.
    async fn lookup(&self, object_id: &str) -> Result<Option<ObjectInfo>>;
}

/// Validate an object argument and, when a directory is given, check that
/// the object exists.
pub async fn resolve_object(
    param: &str,
    text: &str,
    expected_type: Option<&str>,
    directory: Option<&dyn ObjectDirectory>,
) -> ValidationOutcome {
    let object_id = match parse_object_id(param, text) {
        Ok(id) => id,
        Err(error) => return ValidationOutcome::invalid(error),
    };

    let Some(directory) = directory else {
        return ValidationOutcome::ok(object_id);
    };

    match directory.lookup(&object_id).await {
        Ok(None) => {
            debug!(param = param, object_id = %object_id, "object not found");
            ValidationOutcome::invalid(ArgumentError::ReferenceNotFound {
                param: param.to_string(),
                object_id,
            })
        }
        Ok(Some(info)) => {
            let warning = match (expected_type, info.type_tag.as_deref()) {
                (Some(expected), Some(actual)) if !type_matches(expected, actual) => Some(format!(
                    "object type {} does not match expected {}",
                    actual, expected
                )),
                _ => None,
            };
            let outcome = ValidationOutcome::ok(object_id);
            match warning {
                Some(w) => outcome.with_warning(w),
                None => outcome,
            }
        }
        Err(e) => {
            warn!(param = param, object_id = %object_id, error = %e, "object lookup failed");
            ValidationOutcome::ok(object_id)
                .with_warning(format!("could not verify object: {}", e))
        }
    }
}

/// Whether the reported object type textually contains the expected type.
///
/// Both sides are compared after lowercasing, dropping whitespace, and
/// expanding every `0x..` address to its 64-digit form, so `0x2::coin::Coin`
/// matches `0x0000..0002::coin::Coin<0x0000..0002::sui::SUI>`.
pub fn type_matches(expected: &str, actual: &str) -> bool {
    let expected = canonical_type_tag(expected);
    if expected.is_empty() {
        return true;
    }
    canonical_type_tag(actual).contains(&expected)
}

fn canonical_type_tag(tag: &str) -> String {
    let compact: String = tag
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();

    let mut out = String::with_capacity(compact.len());
    let mut rest = compact.as_str();
    while let Some(pos) = rest.find("0x") {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 2..];
        let hex_len = after
            .find(|c: char| !c.is_ascii_hexdigit())
            .unwrap_or(after.len());
        match normalize_address_strict(&after[..hex_len]) {
            Ok(full) => out.push_str(&full),
            Err(_) => {
                out.push_str("0x");
                out.push_str(&after[..hex_len]);
            }
        }
        rest = &after[hex_len..];
    }
    out.push_str(rest);
    out
}
