//! Debounced, single-flight object lookups.
//!
//! Every edit of an object parameter schedules a lookup. Each parameter of
//! each invocation keeps a generation counter, so one scheduler can serve
//! many invocations; a lookup only runs if no newer one was scheduled for
//! the same invocation and parameter during its debounce window. A lookup
//! already talking to the directory is not cancelled. Its result still
//! comes back, and [`CallInvocation::apply_lookup`] drops it if the input
//! has moved on.
//!
//! [`CallInvocation::apply_lookup`]: crate::invocation::CallInvocation::apply_lookup

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use sui_call_codec::object::{resolve_object, ObjectDirectory};
use sui_call_types::ValidationOutcome;
use tokio::task::JoinHandle;
use tracing::trace;
use uuid::Uuid;

use crate::config::CallConfig;

/// An object existence check requested by an input edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    /// [`CallInvocation::id`] of the requesting invocation.
    ///
    /// [`CallInvocation::id`]: crate::invocation::CallInvocation::id
    pub invocation: Uuid,
    pub param: String,
    /// Normalized object id.
    pub object_id: String,
    pub expected_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupResult {
    pub param: String,
    pub object_id: String,
    pub outcome: ValidationOutcome,
}

/// Run one lookup immediately.
pub async fn run_lookup(request: LookupRequest, directory: &dyn ObjectDirectory) -> LookupResult {
    let outcome = resolve_object(
        &request.param,
        &request.object_id,
        request.expected_type.as_deref(),
        Some(directory),
    )
    .await;
    LookupResult {
        param: request.param,
        object_id: request.object_id,
        outcome,
    }
}

pub struct LookupScheduler {
    directory: Arc<dyn ObjectDirectory>,
    debounce: Duration,
    generations: Arc<Mutex<HashMap<(Uuid, String), u64>>>,
}

impl LookupScheduler {
    pub fn new(directory: Arc<dyn ObjectDirectory>, debounce: Duration) -> Self {
        Self {
            directory,
            debounce,
            generations: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn from_config(directory: Arc<dyn ObjectDirectory>, config: &CallConfig) -> Self {
        Self::new(directory, config.lookup_debounce())
    }

    /// Schedule a lookup, superseding any earlier one for the same
    /// invocation and parameter that has not started yet. Resolves to
    /// `None` when superseded.
    pub fn schedule(&self, request: LookupRequest) -> JoinHandle<Option<LookupResult>> {
        let generation = {
            let mut generations = self.generations.lock();
            let counter = generations
                .entry((request.invocation, request.param.clone()))
                .or_insert(0);
            *counter += 1;
            *counter
        };
        trace!(
            invocation = %request.invocation,
            param = %request.param,
            object_id = %request.object_id,
            generation,
            "lookup scheduled"
        );

        let directory = Arc::clone(&self.directory);
        let generations = Arc::clone(&self.generations);
        let debounce = self.debounce;

        tokio::spawn(async move {
            if !debounce.is_zero() {
                tokio::time::sleep(debounce).await;
            }
            let key = (request.invocation, request.param.clone());
            let current = generations.lock().get(&key).copied();
            if current != Some(generation) {
                trace!(
                    param = %request.param,
                    generation,
                    "lookup superseded"
                );
                return None;
            }
            Some(run_lookup(request, directory.as_ref()).await)
        })
    }
}
