#![allow(unused_imports)]
//! Shared test utilities for integration tests.
//!
//! # Modules
//!
//! - `mocks`: in-memory object directory and transaction signer
//! - `assertions`: assertion helpers with descriptive failure messages

pub mod assertions;
pub mod mocks;

pub use assertions::{assert_error_contains, assert_ok};
pub use mocks::{normalized, InMemoryDirectory, MockSigner, SimulateBehavior};
