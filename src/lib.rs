//! Sui Move Call
//!
//! Turns human-typed parameter strings into encoded arguments for a Move
//! function call, and runs the call:
//!
//! - **Entry functions** are submitted through a [`TransactionSigner`]
//! - **View functions** are simulated, with bounded retry and a fallback
//!   sender, and their return values decoded for display
//!
//! Argument validation and encoding live in [`sui_call_codec`]; this crate
//! adds the per-attempt state machine ([`CallInvocation`]), debounced object
//! lookups ([`LookupScheduler`]) and configuration ([`CallConfig`]).

pub mod config;
pub mod execution;
pub mod function;
pub mod invocation;
pub mod lookup;
pub mod record;
pub mod signer;

pub use config::CallConfig;
pub use execution::{sender_candidates, simulate_with_fallback};
pub use function::{CallMode, FunctionDescriptor, FunctionParameter};
pub use invocation::{
    CallInvocation, ExecutionError, ExecutionOutcome, ExecutionState, ExecutionTicket,
};
pub use lookup::{LookupRequest, LookupResult, LookupScheduler};
pub use record::ExecutionRecord;
pub use signer::{
    GasSummary, ObjectChangeKind, ObjectDelta, SignerError, SimulationResult, SubmitResult,
    TransactionSigner,
};
