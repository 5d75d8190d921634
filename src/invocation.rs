//! # Call invocation state machine
//!
//! A [`CallInvocation`] is one user-initiated attempt to call a function.
//!
//! ```text
//! Idle ──all inputs valid──▶ Validating ──lookups done──▶ Ready
//!   ▲                                                     │ begin_execution
//!   └──────────── input edited ── Error ◀──┐              ▼
//!                                          └─fail── Executing ──ok──▶ Success
//! ```
//!
//! - `Idle`: a parameter is empty, invalid, or a mutating call has no sender
//! - `Validating`: inputs valid but object lookups outstanding
//! - `Executing`: entered only from `Ready`; a second request is ignored
//! - `Success` is terminal; [`CallInvocation::next_attempt`] starts over
//!
//! Execution is split in three so the owner can drop its lock while the
//! signer works: [`CallInvocation::begin_execution`] hands out a ticket,
//! [`ExecutionTicket::run`] does the I/O, [`CallInvocation::complete`]
//! records the result. [`CallInvocation::execute`] chains the three. An
//! attempt whose ticket never reaches `complete` (timed out, task aborted,
//! signer panicked) is ended with [`CallInvocation::abort`], which `execute`
//! does on its own when its future is dropped.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::time::Instant;

use chrono::Utc;
use move_core_types::account_address::AccountAddress;
use serde::{Deserialize, Serialize};
use sui_call_codec::object::ObjectDirectory;
use sui_call_codec::{
    build_arguments, decode_simulation, validate_parameter, BuildContext, CodecOptions,
    DecodedValue, ParameterSpec,
};
use sui_call_types::address::address_to_string;
use sui_call_types::{ArgumentError, Network, RetryConfig, ValidationOutcome};
use tracing::{debug, trace, warn};
use uuid::Uuid;

use crate::config::CallConfig;
use crate::execution::{sender_candidates, simulate_with_fallback};
use crate::function::{CallMode, FunctionDescriptor};
use crate::lookup::{run_lookup, LookupRequest, LookupResult};
use crate::record::ExecutionRecord;
use crate::signer::{SignerError, SubmitResult, TransactionSigner};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionState {
    Idle,
    Validating,
    Ready,
    Executing,
    Success,
    Error,
}

impl fmt::Display for ExecutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExecutionState::Idle => "idle",
            ExecutionState::Validating => "validating",
            ExecutionState::Ready => "ready",
            ExecutionState::Executing => "executing",
            ExecutionState::Success => "success",
            ExecutionState::Error => "error",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    UnknownParameter(String),
    /// Inputs cannot change in this state.
    Locked(ExecutionState),
    Argument(ArgumentError),
    Signer(SignerError),
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionError::UnknownParameter(name) => write!(f, "Unknown parameter '{}'", name),
            ExecutionError::Locked(state) => {
                write!(f, "Inputs cannot be edited while the call is {}", state)
            }
            ExecutionError::Argument(e) => write!(f, "Invalid argument {}", e),
            ExecutionError::Signer(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ExecutionError {}

impl From<ArgumentError> for ExecutionError {
    fn from(e: ArgumentError) -> Self {
        ExecutionError::Argument(e)
    }
}

impl From<SignerError> for ExecutionError {
    fn from(e: SignerError) -> Self {
        ExecutionError::Signer(e)
    }
}

/// What a successful attempt produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome {
    Submitted(SubmitResult),
    Simulated {
        /// Sender the successful simulation ran as.
        sender: AccountAddress,
        values: Vec<DecodedValue>,
    },
}

#[derive(Debug, Clone)]
struct Settings {
    network: Network,
    options: CodecOptions,
    verify_objects: bool,
    retry: RetryConfig,
    fallback_sender: AccountAddress,
}

#[derive(Debug, Clone)]
pub struct CallInvocation {
    id: Uuid,
    function: FunctionDescriptor,
    target: String,
    parameters: Vec<ParameterSpec>,
    inputs: BTreeMap<String, String>,
    outcomes: BTreeMap<String, ValidationOutcome>,
    pending: BTreeSet<String>,
    sender: Option<AccountAddress>,
    settings: Settings,
    state: ExecutionState,
    in_flight: Option<Uuid>,
    error: Option<String>,
    outcome: Option<ExecutionOutcome>,
}

impl CallInvocation {
    /// Start an invocation with every input empty.
    pub fn new(function: FunctionDescriptor, config: &CallConfig) -> anyhow::Result<Self> {
        let settings = Settings {
            network: config.network,
            options: config.codec_options(),
            verify_objects: config.verify_objects,
            retry: config.retry_config(),
            fallback_sender: config.fallback_sender()?,
        };
        let parameters = function.user_parameters();
        let outcomes = parameters
            .iter()
            .map(|p| (p.name.clone(), validate_parameter(p, "", &settings.options)))
            .collect();

        let mut invocation = Self {
            id: Uuid::new_v4(),
            target: function.target(),
            function,
            parameters,
            inputs: BTreeMap::new(),
            outcomes,
            pending: BTreeSet::new(),
            sender: None,
            settings,
            state: ExecutionState::Idle,
            in_flight: None,
            error: None,
            outcome: None,
        };
        invocation.settle();
        Ok(invocation)
    }

    /// Identifies this invocation's lookups in a shared [`LookupScheduler`].
    ///
    /// [`LookupScheduler`]: crate::lookup::LookupScheduler
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn function(&self) -> &FunctionDescriptor {
        &self.function
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn network(&self) -> Network {
        self.settings.network
    }

    /// User-facing parameters, context parameters excluded.
    pub fn parameters(&self) -> &[ParameterSpec] {
        &self.parameters
    }

    pub fn state(&self) -> ExecutionState {
        self.state
    }

    pub fn input(&self, name: &str) -> Option<&str> {
        self.inputs.get(name).map(String::as_str)
    }

    pub fn inputs(&self) -> &BTreeMap<String, String> {
        &self.inputs
    }

    pub fn validation(&self, name: &str) -> Option<&ValidationOutcome> {
        self.outcomes.get(name)
    }

    pub fn sender(&self) -> Option<AccountAddress> {
        self.sender
    }

    /// Message of the last failure, set whenever the state is `Error`.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn outcome(&self) -> Option<&ExecutionOutcome> {
        self.outcome.as_ref()
    }

    /// Id of the ticket currently executing.
    pub fn in_flight(&self) -> Option<Uuid> {
        self.in_flight
    }

    /// Update one input and re-validate it.
    ///
    /// Returns a lookup request when the parameter is an object whose id is
    /// well-formed and object verification is on. Editing after a failure
    /// leaves `Error`.
    pub fn set_input(
        &mut self,
        name: &str,
        text: impl Into<String>,
    ) -> Result<Option<LookupRequest>, ExecutionError> {
        if matches!(
            self.state,
            ExecutionState::Executing | ExecutionState::Success
        ) {
            return Err(ExecutionError::Locked(self.state));
        }
        let param = self
            .parameters
            .iter()
            .find(|p| p.name == name)
            .cloned()
            .ok_or_else(|| ExecutionError::UnknownParameter(name.to_string()))?;

        let text = text.into();
        let outcome = validate_parameter(&param, &text, &self.settings.options);
        self.inputs.insert(param.name.clone(), text);
        self.pending.remove(&param.name);

        let request = match outcome.normalized() {
            Some(object_id)
                if param.descriptor.is_object()
                    && outcome.is_valid()
                    && self.settings.verify_objects =>
            {
                self.pending.insert(param.name.clone());
                Some(LookupRequest {
                    invocation: self.id,
                    param: param.name.clone(),
                    object_id: object_id.to_string(),
                    expected_type: param.descriptor.object_type().map(str::to_string),
                })
            }
            _ => None,
        };
        self.outcomes.insert(param.name, outcome);

        if self.state == ExecutionState::Error {
            self.error = None;
            self.outcome = None;
            let next = self.readiness();
            self.transition(next);
        } else {
            self.settle();
        }
        Ok(request)
    }

    /// Record the connected wallet's address, or its absence.
    pub fn set_sender(&mut self, sender: Option<AccountAddress>) {
        self.sender = sender;
        self.settle();
    }

    /// Lookups requested by inputs and not yet applied.
    pub fn pending_lookups(&self) -> Vec<LookupRequest> {
        self.pending
            .iter()
            .filter_map(|name| {
                let param = self.parameters.iter().find(|p| &p.name == name)?;
                let object_id = self.outcomes.get(name)?.normalized()?;
                Some(LookupRequest {
                    invocation: self.id,
                    param: name.clone(),
                    object_id: object_id.to_string(),
                    expected_type: param.descriptor.object_type().map(str::to_string),
                })
            })
            .collect()
    }

    /// Apply a finished lookup. Returns false when the result is stale: the
    /// input has changed, or no lookup is outstanding for it.
    pub fn apply_lookup(&mut self, result: LookupResult) -> bool {
        let current = self.pending.contains(&result.param)
            && self
                .outcomes
                .get(&result.param)
                .and_then(|o| o.normalized())
                == Some(result.object_id.as_str());
        if !current {
            trace!(
                target_fn = %self.target,
                param = %result.param,
                object_id = %result.object_id,
                "stale lookup result dropped"
            );
            return false;
        }

        self.pending.remove(&result.param);
        self.outcomes.insert(result.param, result.outcome);
        self.settle();
        true
    }

    /// Run every outstanding lookup now, concurrently, without debounce.
    pub async fn resolve_pending(&mut self, directory: &dyn ObjectDirectory) {
        let requests = self.pending_lookups();
        let results = futures::future::join_all(
            requests
                .into_iter()
                .map(|request| run_lookup(request, directory)),
        )
        .await;
        for result in results {
            self.apply_lookup(result);
        }
    }

    /// Enter `Executing`. Returns `None`, changing nothing, unless the
    /// invocation is `Ready`.
    pub fn begin_execution(&mut self) -> Option<ExecutionTicket> {
        if self.state != ExecutionState::Ready {
            debug!(
                target_fn = %self.target,
                state = %self.state,
                "execute ignored, invocation not ready"
            );
            return None;
        }

        let ticket = ExecutionTicket {
            id: Uuid::new_v4(),
            target: self.target.clone(),
            mode: self.function.mode(),
            parameters: self.parameters.clone(),
            inputs: self.inputs.clone(),
            sender: self.sender,
            settings: self.settings.clone(),
            started: Instant::now(),
        };
        self.in_flight = Some(ticket.id);
        self.transition(ExecutionState::Executing);
        Some(ticket)
    }

    /// Finish the attempt started by `ticket`.
    ///
    /// Returns `None` if `ticket` is not the one in flight.
    pub fn complete(
        &mut self,
        ticket: ExecutionTicket,
        result: Result<ExecutionOutcome, ExecutionError>,
    ) -> Option<ExecutionRecord> {
        if self.state != ExecutionState::Executing || self.in_flight != Some(ticket.id) {
            warn!(
                target_fn = %self.target,
                ticket = %ticket.id,
                state = %self.state,
                "completion for an attempt that is not in flight"
            );
            return None;
        }
        self.in_flight = None;

        let mut record = ExecutionRecord {
            id: ticket.id,
            ts: Utc::now(),
            target: ticket.target,
            network: ticket.settings.network,
            mode: ticket.mode,
            sender: ticket.sender.as_ref().map(address_to_string),
            inputs: ticket.inputs,
            duration_ms: ticket.started.elapsed().as_millis(),
            success: result.is_ok(),
            digest: None,
            return_values: None,
            error: None,
        };

        match result {
            Ok(outcome) => {
                match &outcome {
                    ExecutionOutcome::Submitted(submitted) => {
                        record.digest = Some(submitted.digest.clone());
                    }
                    ExecutionOutcome::Simulated { sender, values } => {
                        record.sender = Some(address_to_string(sender));
                        record.return_values =
                            Some(values.iter().map(DecodedValue::to_json).collect());
                    }
                }
                debug!(
                    target_fn = %self.target,
                    mode = %record.mode,
                    duration_ms = record.duration_ms as u64,
                    "call succeeded"
                );
                self.outcome = Some(outcome);
                self.transition(ExecutionState::Success);
            }
            Err(e) => {
                let message = e.to_string();
                debug!(
                    target_fn = %self.target,
                    mode = %record.mode,
                    error = %message,
                    "call failed"
                );
                record.error = Some(message.clone());
                self.error = Some(message);
                self.transition(ExecutionState::Error);
            }
        }
        Some(record)
    }

    /// End the in-flight attempt `ticket_id` without a result, moving to
    /// `Error` with `reason` as the message.
    ///
    /// Returns false if `ticket_id` is not in flight.
    pub fn abort(&mut self, ticket_id: Uuid, reason: impl Into<String>) -> bool {
        if self.state != ExecutionState::Executing || self.in_flight != Some(ticket_id) {
            return false;
        }
        let mut reason = reason.into();
        if reason.trim().is_empty() {
            reason = INTERRUPTED.to_string();
        }
        warn!(
            target_fn = %self.target,
            ticket = %ticket_id,
            reason = %reason,
            "execution aborted"
        );
        self.in_flight = None;
        self.error = Some(reason);
        self.transition(ExecutionState::Error);
        true
    }

    /// Execute if `Ready`: build arguments, then submit or simulate.
    ///
    /// Returns `None` without doing anything when not `Ready`. Dropping the
    /// returned future mid-flight aborts the attempt.
    pub async fn execute(
        &mut self,
        signer: &dyn TransactionSigner,
        directory: Option<&dyn ObjectDirectory>,
    ) -> Option<ExecutionRecord> {
        let ticket = self.begin_execution()?;
        let mut guard = AbortOnDrop {
            invocation: self,
            ticket_id: Some(ticket.id),
        };
        let result = ticket.run(signer, directory).await;
        let record = guard.invocation.complete(ticket, result);
        guard.ticket_id = None;
        record
    }

    /// A fresh invocation carrying this one's inputs and sender.
    pub fn next_attempt(&self) -> Self {
        let mut next = Self {
            id: Uuid::new_v4(),
            function: self.function.clone(),
            target: self.target.clone(),
            parameters: self.parameters.clone(),
            inputs: self.inputs.clone(),
            outcomes: self.outcomes.clone(),
            pending: self.pending.clone(),
            sender: self.sender,
            settings: self.settings.clone(),
            state: ExecutionState::Idle,
            in_flight: None,
            error: None,
            outcome: None,
        };
        next.settle();
        next
    }

    fn readiness(&self) -> ExecutionState {
        let blocked = self.parameters.iter().any(|p| {
            self.outcomes
                .get(&p.name)
                .map_or(true, |outcome| !outcome.is_valid())
        });
        if blocked {
            ExecutionState::Idle
        } else if !self.pending.is_empty() {
            ExecutionState::Validating
        } else if self.function.is_mutating && self.sender.is_none() {
            ExecutionState::Idle
        } else {
            ExecutionState::Ready
        }
    }

    /// Recompute the pre-execution state. No effect once executing or done.
    fn settle(&mut self) {
        if matches!(
            self.state,
            ExecutionState::Idle | ExecutionState::Validating | ExecutionState::Ready
        ) {
            let next = self.readiness();
            self.transition(next);
        }
    }

    fn transition(&mut self, next: ExecutionState) {
        if next != self.state {
            debug!(
                target_fn = %self.target,
                from = %self.state,
                to = %next,
                "invocation state changed"
            );
            self.state = next;
        }
    }
}

const INTERRUPTED: &str = "Execution was interrupted before it completed";

/// Aborts the in-flight attempt unless disarmed by clearing `ticket_id`.
struct AbortOnDrop<'a> {
    invocation: &'a mut CallInvocation,
    ticket_id: Option<Uuid>,
}

impl Drop for AbortOnDrop<'_> {
    fn drop(&mut self) {
        if let Some(id) = self.ticket_id.take() {
            self.invocation.abort(id, INTERRUPTED);
        }
    }
}

/// An attempt handed out by [`CallInvocation::begin_execution`].
#[derive(Debug)]
pub struct ExecutionTicket {
    id: Uuid,
    target: String,
    mode: CallMode,
    parameters: Vec<ParameterSpec>,
    inputs: BTreeMap<String, String>,
    sender: Option<AccountAddress>,
    settings: Settings,
    started: Instant,
}

impl ExecutionTicket {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn mode(&self) -> CallMode {
        self.mode
    }

    /// Build arguments and send them to the signer. Submission is attempted
    /// once; simulation retries per the configured policy.
    pub async fn run(
        &self,
        signer: &dyn TransactionSigner,
        directory: Option<&dyn ObjectDirectory>,
    ) -> Result<ExecutionOutcome, ExecutionError> {
        let mut ctx = BuildContext::new(self.settings.network).with_options(self.settings.options);
        if self.settings.verify_objects {
            if let Some(directory) = directory {
                ctx = ctx.with_directory(directory);
            }
        }
        let args = build_arguments(&self.parameters, &self.inputs, &ctx).await?;

        match self.mode {
            CallMode::Submit => {
                let submitted = signer.submit(&self.target, &args).await?;
                debug!(
                    target_fn = %self.target,
                    digest = %submitted.digest,
                    gas = %submitted.gas.net(),
                    "transaction submitted"
                );
                Ok(ExecutionOutcome::Submitted(submitted))
            }
            CallMode::Simulate => {
                let candidates = sender_candidates(
                    self.sender,
                    self.settings.fallback_sender,
                    self.settings.retry.retries,
                );
                let (result, sender) = simulate_with_fallback(
                    signer,
                    &self.target,
                    &args,
                    &candidates,
                    &self.settings.retry,
                )
                .await?;
                Ok(ExecutionOutcome::Simulated {
                    sender,
                    values: decode_simulation(&result.return_values),
                })
            }
        }
    }
}
