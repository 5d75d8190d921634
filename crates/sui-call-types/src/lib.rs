//! Shared types for Sui Move call construction.
//!
//! This crate holds the vocabulary the codec and the invocation layer share:
//!
//! - [`TypeDescriptor`] - classified parameter type strings
//! - [`ValidationOutcome`] / [`ArgumentError`] - per-parameter validation results
//! - [`EncodedArgument`] / [`PureValue`] - arguments ready for a signer
//! - [`address`] - address and object-id normalization
//! - [`Network`] - target network and its fallback simulation sender

pub mod address;
pub mod argument;
pub mod env_utils;
pub mod network;
pub mod outcome;
pub mod type_parsing;

pub use argument::{json_integer, EncodedArgument, PureValue, MAX_SAFE_INTEGER};
pub use network::Network;
pub use outcome::{ArgumentError, ErrorKind, RangeBound, ValidationOutcome};
pub use type_parsing::{IntWidth, TypeCategory, TypeDescriptor};

use std::time::Duration;

/// Configuration for bounded retry of read-only simulation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Number of retry attempts after the first.
    pub retries: usize,
    /// Initial backoff duration between retries.
    pub initial_backoff: Duration,
    /// Maximum backoff duration.
    pub max_backoff: Duration,
}

impl RetryConfig {
    /// Create a new RetryConfig with the specified parameters.
    pub fn new(retries: usize, initial_backoff_ms: u64, max_backoff_ms: u64) -> Self {
        Self {
            retries,
            initial_backoff: Duration::from_millis(initial_backoff_ms),
            max_backoff: Duration::from_millis(max_backoff_ms),
        }
    }

    /// Backoff before retry number `attempt` (1-based), doubling up to the cap.
    pub fn backoff_for(&self, attempt: usize) -> Duration {
        let factor = 1u32 << attempt.saturating_sub(1).min(16);
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            retries: 2,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_millis(1000),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles_and_caps() {
        let config = RetryConfig::new(2, 100, 250);
        assert_eq!(config.backoff_for(1), Duration::from_millis(100));
        assert_eq!(config.backoff_for(2), Duration::from_millis(200));
        assert_eq!(config.backoff_for(3), Duration::from_millis(250));
    }
}
