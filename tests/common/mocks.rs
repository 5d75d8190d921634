//! In-memory stand-ins for the object directory and the signer.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use move_core_types::account_address::AccountAddress;
use parking_lot::Mutex;
use sui_call_codec::object::{ObjectDirectory, ObjectInfo, ObjectOwner};
use sui_call_codec::ReturnSlot;
use sui_call_types::address::normalize_object_id;
use sui_call_types::EncodedArgument;
use sui_move_call::{
    GasSummary, ObjectChangeKind, ObjectDelta, SignerError, SimulationResult, SubmitResult,
    TransactionSigner,
};

/// `0x` + 64 hex form of a short id.
pub fn normalized(id: &str) -> String {
    normalize_object_id(id).unwrap()
}

/// Object directory backed by a map, counting lookups.
#[derive(Default)]
pub struct InMemoryDirectory {
    objects: HashMap<String, ObjectInfo>,
    lookups: Mutex<Vec<String>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object(mut self, id: &str, type_tag: &str) -> Self {
        self.objects.insert(
            normalized(id),
            ObjectInfo {
                type_tag: Some(type_tag.to_string()),
                owner: Some(ObjectOwner::Shared {
                    initial_shared_version: 1,
                }),
                version: Some("1".to_string()),
            },
        );
        self
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.lock().len()
    }
}

#[async_trait::async_trait]
impl ObjectDirectory for InMemoryDirectory {
    async fn lookup(&self, object_id: &str) -> anyhow::Result<Option<ObjectInfo>> {
        self.lookups.lock().push(object_id.to_string());
        Ok(self.objects.get(object_id).cloned())
    }
}

/// What [`MockSigner::simulate`] returns on success.
pub enum SimulateBehavior {
    /// Fixed return slots.
    Slots(Vec<ReturnSlot>),
    /// The BCS bytes of the first pure argument, tagged with the given type.
    EchoFirstArgument(String),
}

/// Signer recording every call it receives.
pub struct MockSigner {
    behavior: SimulateBehavior,
    simulate_failures: Mutex<VecDeque<SignerError>>,
    submit_error: Option<SignerError>,
    delay: Option<Duration>,
    submitted: Mutex<Vec<(String, Vec<EncodedArgument>)>>,
    simulated_as: Mutex<Vec<AccountAddress>>,
}

impl MockSigner {
    pub fn new(behavior: SimulateBehavior) -> Self {
        Self {
            behavior,
            simulate_failures: Mutex::new(VecDeque::new()),
            submit_error: None,
            delay: None,
            submitted: Mutex::new(Vec::new()),
            simulated_as: Mutex::new(Vec::new()),
        }
    }

    pub fn returning(slots: Vec<ReturnSlot>) -> Self {
        Self::new(SimulateBehavior::Slots(slots))
    }

    /// Fail the next simulations with these errors, in order.
    pub fn failing_simulations(self, errors: Vec<SignerError>) -> Self {
        *self.simulate_failures.lock() = errors.into();
        self
    }

    pub fn failing_submit(mut self, error: SignerError) -> Self {
        self.submit_error = Some(error);
        self
    }

    /// Sleep this long inside every submit and simulate call.
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn submitted(&self) -> Vec<(String, Vec<EncodedArgument>)> {
        self.submitted.lock().clone()
    }

    pub fn simulated_as(&self) -> Vec<AccountAddress> {
        self.simulated_as.lock().clone()
    }
}

#[async_trait::async_trait]
impl TransactionSigner for MockSigner {
    async fn submit(
        &self,
        target: &str,
        args: &[EncodedArgument],
    ) -> Result<SubmitResult, SignerError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let count = {
            let mut submitted = self.submitted.lock();
            submitted.push((target.to_string(), args.to_vec()));
            submitted.len()
        };
        if let Some(error) = &self.submit_error {
            return Err(error.clone());
        }
        Ok(SubmitResult {
            digest: format!("digest-{}", count),
            gas: GasSummary {
                computation_cost: 1_000_000,
                storage_cost: 2_000_000,
                storage_rebate: 500_000,
            },
            object_changes: vec![ObjectDelta {
                object_id: normalized("0x77"),
                kind: ObjectChangeKind::Created,
                object_type: Some("0x2::coin::Coin<0x2::sui::SUI>".to_string()),
            }],
            events: vec![serde_json::json!({ "type": "0x2::pay::Split" })],
        })
    }

    async fn simulate(
        &self,
        _target: &str,
        args: &[EncodedArgument],
        sender: AccountAddress,
    ) -> Result<SimulationResult, SignerError> {
        self.simulated_as.lock().push(sender);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(error) = self.simulate_failures.lock().pop_front() {
            return Err(error);
        }

        let return_values = match &self.behavior {
            SimulateBehavior::Slots(slots) => slots.clone(),
            SimulateBehavior::EchoFirstArgument(type_tag) => {
                let bytes = args
                    .first()
                    .and_then(|arg| arg.pure_bytes().ok().flatten())
                    .ok_or_else(|| SignerError::Execution("no pure argument".to_string()))?;
                vec![ReturnSlot::new(bytes, type_tag.clone())]
            }
        };
        Ok(SimulationResult { return_values })
    }
}
