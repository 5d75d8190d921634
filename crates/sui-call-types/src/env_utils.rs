//! Environment variable parsing utilities.
//!
//! Call configuration can be overridden from the environment
//! (`SUI_CALL_NETWORK`, `SUI_CALL_LOOKUP_DEBOUNCE_MS`, ...). These helpers
//! remove the repeated parse-or-default boilerplate:
//!
//! ```ignore
//! std::env::var("VAR_NAME")
//!     .ok()
//!     .and_then(|v| v.parse::<u64>().ok())
//!     .unwrap_or(default_value)
//! ```
//!
//! # Example
//!
//! ```
//! use sui_call_types::env_utils::{env_bool_or, env_var, env_var_or};
//!
//! let debounce: u64 = env_var_or("SUI_CALL_LOOKUP_DEBOUNCE_MS", 300);
//! let retries: Option<usize> = env_var("SUI_CALL_SIMULATION_RETRIES");
//! let verify = env_bool_or("SUI_CALL_VERIFY_OBJECTS", true);
//! ```

use std::str::FromStr;

/// Parse an environment variable into a type that implements `FromStr`.
///
/// Returns `None` if the variable is not set or cannot be parsed.
pub fn env_var<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Parse an environment variable with a default value.
pub fn env_var_or<T: FromStr>(key: &str, default: T) -> T {
    env_var(key).unwrap_or(default)
}

/// Read a truthy/falsy environment variable, falling back to `default` when
/// unset or unrecognized.
///
/// Truthy: "1", "true", "yes", "on". Falsy: "0", "false", "no", "off".
pub fn env_bool_or(key: &str, default: bool) -> bool {
    match std::env::var(key).ok().map(|v| v.trim().to_lowercase()) {
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => true,
        Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => false,
        _ => default,
    }
}

/// Read a non-empty string environment variable.
pub fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_parsing() {
        std::env::set_var("SUI_CALL_TEST_U64", " 42 ");
        let val: Option<u64> = env_var("SUI_CALL_TEST_U64");
        assert_eq!(val, Some(42));

        let missing: Option<u64> = env_var("SUI_CALL_TEST_MISSING_1");
        assert_eq!(missing, None);
        assert_eq!(env_var_or("SUI_CALL_TEST_MISSING_1", 7u64), 7);

        std::env::remove_var("SUI_CALL_TEST_U64");
    }

    #[test]
    fn test_env_bool_or() {
        std::env::set_var("SUI_CALL_TEST_BOOL_ON", "YES");
        std::env::set_var("SUI_CALL_TEST_BOOL_OFF", "off");
        std::env::set_var("SUI_CALL_TEST_BOOL_JUNK", "maybe");

        assert!(env_bool_or("SUI_CALL_TEST_BOOL_ON", false));
        assert!(!env_bool_or("SUI_CALL_TEST_BOOL_OFF", true));
        assert!(env_bool_or("SUI_CALL_TEST_BOOL_JUNK", true));
        assert!(!env_bool_or("SUI_CALL_TEST_MISSING_2", false));

        std::env::remove_var("SUI_CALL_TEST_BOOL_ON");
        std::env::remove_var("SUI_CALL_TEST_BOOL_OFF");
        std::env::remove_var("SUI_CALL_TEST_BOOL_JUNK");
    }

    #[test]
    fn test_env_string_skips_blank() {
        std::env::set_var("SUI_CALL_TEST_BLANK", "   ");
        assert_eq!(env_string("SUI_CALL_TEST_BLANK"), None);
        std::env::set_var("SUI_CALL_TEST_BLANK", "testnet");
        assert_eq!(env_string("SUI_CALL_TEST_BLANK"), Some("testnet".to_string()));
        std::env::remove_var("SUI_CALL_TEST_BLANK");
    }
}
