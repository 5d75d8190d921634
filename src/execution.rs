//! Bounded simulation retry with fallback senders.
//!
//! View calls are simulated, and simulators intermittently fail to
//! deserialize results. Retries walk an ordered list of sender candidates:
//! the user's sender first, the network fallback sender last. Submission is
//! never retried.

use move_core_types::account_address::AccountAddress;
use sui_call_types::address::address_to_string;
use sui_call_types::{EncodedArgument, RetryConfig};
use tracing::{debug, warn};

use crate::signer::{SignerError, SimulationResult, TransactionSigner};

/// Senders to try, in order. One attempt plus `retries` retries; the last
/// retry always uses `fallback`.
///
/// ```
/// use move_core_types::account_address::AccountAddress;
/// use sui_move_call::execution::sender_candidates;
///
/// let user = AccountAddress::from_hex_literal("0xa").unwrap();
/// let fallback = AccountAddress::ZERO;
/// assert_eq!(sender_candidates(Some(user), fallback, 2), vec![user, user, fallback]);
/// assert_eq!(sender_candidates(None, fallback, 0), vec![fallback]);
/// ```
pub fn sender_candidates(
    primary: Option<AccountAddress>,
    fallback: AccountAddress,
    retries: usize,
) -> Vec<AccountAddress> {
    let mut candidates = vec![primary.unwrap_or(fallback); retries + 1];
    if retries > 0 {
        if let Some(last) = candidates.last_mut() {
            *last = fallback;
        }
    }
    candidates
}

/// Simulate, retrying transient failures with the next sender candidate.
///
/// Returns the first success, or the last failure once candidates run out.
/// Non-transient failures return immediately.
pub async fn simulate_with_fallback(
    signer: &dyn TransactionSigner,
    target: &str,
    args: &[EncodedArgument],
    candidates: &[AccountAddress],
    retry: &RetryConfig,
) -> Result<(SimulationResult, AccountAddress), SignerError> {
    let mut last_error =
        SignerError::Unavailable("no sender available for simulation".to_string());

    for (attempt, sender) in candidates.iter().enumerate() {
        if attempt > 0 {
            tokio::time::sleep(retry.backoff_for(attempt)).await;
        }

        match signer.simulate(target, args, *sender).await {
            Ok(result) => {
                debug!(
                    target_fn = target,
                    sender = %address_to_string(sender),
                    attempt = attempt + 1,
                    slots = result.return_values.len(),
                    "simulation succeeded"
                );
                return Ok((result, *sender));
            }
            Err(e) if e.is_transient() && attempt + 1 < candidates.len() => {
                let next = candidates[attempt + 1];
                warn!(
                    target_fn = target,
                    attempt = attempt + 1,
                    error = %e,
                    next_sender = %address_to_string(&next),
                    fallback = next != *sender,
                    "simulation failed, retrying"
                );
                last_error = e;
            }
            Err(e) => {
                debug!(target_fn = target, attempt = attempt + 1, error = %e, "simulation failed");
                return Err(e);
            }
        }
    }

    Err(last_error)
}
