//! Contract for the external transaction signer.
//!
//! The signer owns key material and the network connection. This crate
//! hands it a call target plus encoded arguments and gets back either a
//! submitted transaction summary or per-slot simulation output.

use std::fmt;

use move_core_types::account_address::AccountAddress;
use serde::{Deserialize, Serialize};
use sui_call_codec::ReturnSlot;
use sui_call_types::EncodedArgument;

/// Failure reported by the signer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignerError {
    /// The simulator could not deserialize the transaction or its result.
    /// Usually transient; simulation retries on it.
    Deserialization(String),
    /// The transaction executed and aborted, or was rejected.
    Execution(String),
    /// No wallet connected, network unreachable and the like.
    Unavailable(String),
}

impl SignerError {
    /// Whether a simulation may be retried.
    pub fn is_transient(&self) -> bool {
        matches!(self, SignerError::Deserialization(_))
    }
}

impl fmt::Display for SignerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignerError::Deserialization(msg) => write!(f, "Deserialization failed: {}", msg),
            SignerError::Execution(msg) => write!(f, "Execution failed: {}", msg),
            SignerError::Unavailable(msg) => write!(f, "Signer unavailable: {}", msg),
        }
    }
}

impl std::error::Error for SignerError {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasSummary {
    pub computation_cost: u64,
    pub storage_cost: u64,
    pub storage_rebate: u64,
}

impl GasSummary {
    /// Net gas charged; negative when the rebate exceeds the costs.
    pub fn net(&self) -> i128 {
        self.computation_cost as i128 + self.storage_cost as i128 - self.storage_rebate as i128
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ObjectChangeKind {
    Created,
    Mutated,
    Deleted,
    Wrapped,
    Unwrapped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectDelta {
    pub object_id: String,
    pub kind: ObjectChangeKind,
    pub object_type: Option<String>,
}

/// Summary of a submitted transaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResult {
    pub digest: String,
    pub gas: GasSummary,
    pub object_changes: Vec<ObjectDelta>,
    pub events: Vec<serde_json::Value>,
}

/// Raw output of a read-only simulation, one slot per declared return value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub return_values: Vec<ReturnSlot>,
}

#[async_trait::async_trait]
pub trait TransactionSigner: Send + Sync {
    /// Sign and submit a mutating call.
    async fn submit(
        &self,
        target: &str,
        args: &[EncodedArgument],
    ) -> Result<SubmitResult, SignerError>;

    /// Simulate a call as `sender` without committing it.
    async fn simulate(
        &self,
        target: &str,
        args: &[EncodedArgument],
        sender: AccountAddress,
    ) -> Result<SimulationResult, SignerError>;
}
