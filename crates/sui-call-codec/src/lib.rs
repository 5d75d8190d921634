//! Validation, encoding and decoding for Sui Move call arguments.
//!
//! The pipeline runs in two passes over the declared parameters of a target
//! function:
//!
//! 1. **Validation** ([`builder::validate_parameter`]) - synchronous, pure,
//!    re-run on every input change. Object existence is checked separately
//!    by [`object::resolve_object`].
//! 2. **Encoding** ([`builder::build_arguments`]) - turns every parameter
//!    into an [`EncodedArgument`](sui_call_types::EncodedArgument), failing
//!    fast on the first invalid one.
//!
//! Simulation output goes the other way through [`decoder`].

pub mod builder;
pub mod decoder;
pub mod numeric;
pub mod object;
pub mod scalar;
pub mod vector;

pub use builder::{
    build_arguments, encode_argument, validate_parameter, BuildContext, ParameterSpec,
};
pub use decoder::{decode_return_value, decode_simulation, DecodedValue, ReturnSlot};
pub use numeric::{parse_unsigned, validate_unsigned};
pub use object::{resolve_object, ObjectDirectory, ObjectInfo, ObjectOwner};
pub use scalar::{encode_pure_scalar, encode_scalar};
pub use vector::{encode_vector, parse_vector_values};

/// Default u64 value above which a large-amount warning is attached.
pub const LARGE_AMOUNT_WARNING: u64 = 1_000_000_000_000;

/// Tunables for validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecOptions {
    /// u64 values strictly above this get an advisory warning.
    pub large_amount_warning: u64,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            large_amount_warning: LARGE_AMOUNT_WARNING,
        }
    }
}
