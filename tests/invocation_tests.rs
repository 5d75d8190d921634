//! Invocation lifecycle against in-memory signer and object directory.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{assert_error_contains, assert_ok, normalized, InMemoryDirectory, MockSigner, SimulateBehavior};
use move_core_types::account_address::AccountAddress;
use sui_call_codec::{DecodedValue, ReturnSlot};
use sui_call_types::{EncodedArgument, ErrorKind, PureValue};
use sui_move_call::{
    CallConfig, CallInvocation, CallMode, ExecutionOutcome, ExecutionState, FunctionDescriptor,
    LookupScheduler, SignerError,
};

const POOL_TYPE: &str = "0xabc::pool::Pool<0x2::sui::SUI>";

fn swap_function() -> FunctionDescriptor {
    FunctionDescriptor::new("0xabc::pool", "swap", true)
        .with_parameter("pool", &format!("&mut {}", POOL_TYPE))
        .with_parameter("amount", "u64")
        .with_optional_parameter("min_out", "u64")
        .with_parameter("ctx", "&mut 0x2::tx_context::TxContext")
}

fn price_function() -> FunctionDescriptor {
    FunctionDescriptor::new("0xabc::pool", "price", false)
        .with_parameter("pool", &format!("&{}", POOL_TYPE))
}

fn pool_directory() -> InMemoryDirectory {
    InMemoryDirectory::new().with_object("0x5", POOL_TYPE)
}

fn user() -> AccountAddress {
    AccountAddress::from_hex_literal("0xa11ce").unwrap()
}

fn fast_config() -> CallConfig {
    CallConfig {
        lookup_debounce_ms: 5,
        ..CallConfig::default()
    }
}

#[tokio::test]
async fn test_entry_call_submits_once_with_ordered_arguments() {
    let directory = pool_directory();
    let signer = MockSigner::returning(vec![]);
    let mut call = assert_ok(
        CallInvocation::new(swap_function(), &fast_config()),
        "create invocation",
    );
    assert_eq!(call.state(), ExecutionState::Idle);

    call.set_input("pool", "0x5").unwrap();
    call.set_input("amount", "1000").unwrap();
    call.set_sender(Some(user()));
    assert_eq!(call.state(), ExecutionState::Validating);

    call.resolve_pending(&directory).await;
    assert_eq!(call.state(), ExecutionState::Ready);

    let record = call.execute(&signer, Some(&directory)).await.unwrap();
    assert!(record.success);
    assert_eq!(record.mode, CallMode::Submit);
    assert_eq!(record.digest.as_deref(), Some("digest-1"));
    assert_eq!(call.state(), ExecutionState::Success);

    let submitted = signer.submitted();
    assert_eq!(submitted.len(), 1);
    let (target, args) = &submitted[0];
    assert_eq!(target, "0xabc::pool::swap");
    // Empty optional `min_out` and the context parameter are not sent.
    assert_eq!(
        args,
        &vec![
            EncodedArgument::Object {
                id: normalized("0x5")
            },
            EncodedArgument::Pure(PureValue::U64(1000)),
        ]
    );

    match call.outcome() {
        Some(ExecutionOutcome::Submitted(result)) => {
            assert_eq!(result.gas.net(), 2_500_000);
            assert_eq!(result.object_changes.len(), 1);
        }
        other => panic!("unexpected outcome {:?}", other),
    }
}

#[tokio::test]
async fn test_execute_is_a_noop_unless_ready() {
    let signer = MockSigner::returning(vec![]);
    let mut call = CallInvocation::new(swap_function(), &fast_config()).unwrap();

    assert!(call.execute(&signer, None).await.is_none());
    call.set_input("pool", "0x5").unwrap();
    call.set_input("amount", "1").unwrap();
    // Still validating the pool and no sender.
    assert!(call.execute(&signer, None).await.is_none());
    assert!(signer.submitted().is_empty());
}

#[tokio::test]
async fn test_double_trigger_yields_one_execution() {
    let signer = MockSigner::returning(vec![ReturnSlot::new(vec![1], "bool")]);
    let config = CallConfig {
        verify_objects: false,
        ..CallConfig::default()
    };
    let mut call = CallInvocation::new(price_function(), &config).unwrap();
    call.set_input("pool", "0x5").unwrap();
    assert_eq!(call.state(), ExecutionState::Ready);

    let first = call.begin_execution().unwrap();
    assert!(call.begin_execution().is_none());

    let result = first.run(&signer, None).await;
    call.complete(first, result).unwrap();
    assert_eq!(signer.simulated_as().len(), 1);
    assert_eq!(call.state(), ExecutionState::Success);
}

#[tokio::test]
async fn test_timed_out_execution_ends_in_error() {
    let signer = MockSigner::returning(vec![ReturnSlot::new(vec![1], "bool")])
        .delayed(Duration::from_secs(30));
    let config = CallConfig {
        verify_objects: false,
        ..CallConfig::default()
    };
    let mut call = CallInvocation::new(price_function(), &config).unwrap();
    call.set_input("pool", "0x5").unwrap();

    let timed_out =
        tokio::time::timeout(Duration::from_millis(20), call.execute(&signer, None)).await;
    assert!(timed_out.is_err());

    assert_eq!(call.state(), ExecutionState::Error);
    assert!(call.in_flight().is_none());
    assert!(!call.error_message().unwrap().is_empty());

    // The invocation is usable again after an edit.
    call.set_input("pool", "0x6").unwrap();
    assert_eq!(call.state(), ExecutionState::Ready);
    assert!(call.begin_execution().is_some());
}

#[tokio::test]
async fn test_view_call_decodes_return_slots() {
    let signer = MockSigner::returning(vec![
        ReturnSlot::new(u64::MAX.to_le_bytes().to_vec(), "u64"),
        ReturnSlot::new(vec![2], "bool"),
    ]);
    let directory = pool_directory();
    let mut call = CallInvocation::new(price_function(), &fast_config()).unwrap();
    call.set_input("pool", "5").unwrap();
    call.resolve_pending(&directory).await;

    let record = call.execute(&signer, Some(&directory)).await.unwrap();
    assert!(record.success);
    assert_eq!(
        record.return_values,
        Some(vec![
            serde_json::json!("18446744073709551615"),
            serde_json::json!({ "rawByte": 2 }),
        ])
    );
    // Without a connected wallet the fallback sender is used from the start.
    assert_eq!(signer.simulated_as(), vec![AccountAddress::ZERO]);

    match call.outcome() {
        Some(ExecutionOutcome::Simulated { values, .. }) => {
            assert_eq!(values[1], DecodedValue::RawByte(2));
        }
        other => panic!("unexpected outcome {:?}", other),
    }
}

#[tokio::test]
async fn test_simulation_retries_then_falls_back() {
    let signer = MockSigner::returning(vec![ReturnSlot::new(vec![7], "u8")]).failing_simulations(
        vec![
            SignerError::Deserialization("bad result".to_string()),
            SignerError::Deserialization("bad result".to_string()),
        ],
    );
    let config = CallConfig {
        verify_objects: false,
        ..CallConfig::default()
    };
    let mut call = CallInvocation::new(price_function(), &config).unwrap();
    call.set_input("pool", "0x5").unwrap();
    call.set_sender(Some(user()));

    let record = call.execute(&signer, None).await.unwrap();
    assert!(record.success);
    assert_eq!(
        signer.simulated_as(),
        vec![user(), user(), AccountAddress::ZERO]
    );
    assert_eq!(
        record.sender.as_deref(),
        Some(normalized("0x0").as_str())
    );
}

#[tokio::test]
async fn test_exhausted_simulation_retries_end_in_error() {
    let transient = || SignerError::Deserialization("bad result".to_string());
    let signer = MockSigner::returning(vec![])
        .failing_simulations(vec![transient(), transient(), transient()]);
    let config = CallConfig {
        verify_objects: false,
        ..CallConfig::default()
    };
    let mut call = CallInvocation::new(price_function(), &config).unwrap();
    call.set_input("pool", "0x5").unwrap();

    let record = call.execute(&signer, None).await.unwrap();
    assert!(!record.success);
    assert_eq!(signer.simulated_as().len(), 3);
    assert_eq!(call.state(), ExecutionState::Error);
    assert_error_contains(
        call.error_message().unwrap(),
        "deserialization",
        "surfaced simulation failure",
    );
}

#[tokio::test]
async fn test_submission_is_never_retried() {
    let directory = pool_directory();
    let signer = MockSigner::returning(vec![])
        .failing_submit(SignerError::Deserialization("bad tx".to_string()));
    let mut call = CallInvocation::new(swap_function(), &fast_config()).unwrap();
    call.set_input("pool", "0x5").unwrap();
    call.set_input("amount", "1").unwrap();
    call.set_sender(Some(user()));
    call.resolve_pending(&directory).await;

    let record = call.execute(&signer, Some(&directory)).await.unwrap();
    assert!(!record.success);
    assert_eq!(signer.submitted().len(), 1);
    assert_eq!(call.state(), ExecutionState::Error);

    // Editing an input leaves the error state for another try.
    call.set_input("amount", "2").unwrap();
    assert_eq!(call.state(), ExecutionState::Ready);
    let retry = call.execute(&signer, Some(&directory)).await.unwrap();
    assert!(!retry.success);
    assert_eq!(signer.submitted().len(), 2);
}

#[tokio::test]
async fn test_missing_object_blocks_ready() {
    let directory = InMemoryDirectory::new();
    let mut call = CallInvocation::new(price_function(), &fast_config()).unwrap();
    call.set_input("pool", "0x9").unwrap();
    call.resolve_pending(&directory).await;

    assert_eq!(call.state(), ExecutionState::Idle);
    let outcome = call.validation("pool").unwrap();
    assert_eq!(
        outcome.error().map(|e| e.kind()),
        Some(ErrorKind::ReferenceNotFound)
    );
}

#[tokio::test]
async fn test_type_mismatch_warns_but_allows_execution() {
    let directory = InMemoryDirectory::new().with_object("0x5", "0x2::coin::Coin<0x2::sui::SUI>");
    let mut call = CallInvocation::new(price_function(), &fast_config()).unwrap();
    call.set_input("pool", "0x5").unwrap();
    call.resolve_pending(&directory).await;

    assert_eq!(call.state(), ExecutionState::Ready);
    assert!(call.validation("pool").unwrap().warning().is_some());
}

#[tokio::test]
async fn test_scheduler_feeds_invocation() {
    let directory = Arc::new(pool_directory());
    let config = fast_config();
    let scheduler = LookupScheduler::from_config(directory.clone(), &config);
    let mut call = CallInvocation::new(price_function(), &config).unwrap();

    let stale = call.set_input("pool", "0x4").unwrap().unwrap();
    let current = call.set_input("pool", "0x5").unwrap().unwrap();
    let stale_task = scheduler.schedule(stale);
    let current_task = scheduler.schedule(current);

    assert!(stale_task.await.unwrap().is_none());
    let result = current_task.await.unwrap().unwrap();
    assert!(call.apply_lookup(result.clone()));
    assert!(!call.apply_lookup(result));
    assert_eq!(call.state(), ExecutionState::Ready);
    assert_eq!(directory.lookup_count(), 1);

    // A lookup that lands after the input moved on is ignored.
    let late = call.set_input("pool", "0x6").unwrap().unwrap();
    call.set_input("pool", "0x5").unwrap();
    let late_result = scheduler.schedule(late).await.unwrap();
    if let Some(result) = late_result {
        assert!(!call.apply_lookup(result));
    }
    assert_eq!(call.state(), ExecutionState::Validating);
}

#[tokio::test]
async fn test_shared_scheduler_keeps_invocations_apart() {
    let directory = Arc::new(pool_directory().with_object("0x6", POOL_TYPE));
    let config = fast_config();
    let scheduler = LookupScheduler::from_config(directory.clone(), &config);
    let mut left = CallInvocation::new(price_function(), &config).unwrap();
    let mut right = CallInvocation::new(price_function(), &config).unwrap();
    assert_ne!(left.id(), right.id());

    let left_task = scheduler.schedule(left.set_input("pool", "0x5").unwrap().unwrap());
    let right_task = scheduler.schedule(right.set_input("pool", "0x6").unwrap().unwrap());

    assert!(left.apply_lookup(left_task.await.unwrap().unwrap()));
    assert!(right.apply_lookup(right_task.await.unwrap().unwrap()));
    assert_eq!(left.state(), ExecutionState::Ready);
    assert_eq!(right.state(), ExecutionState::Ready);
}

#[tokio::test]
async fn test_vector_argument_round_trips_through_simulation() {
    let function = FunctionDescriptor::new("0xabc::codec", "echo", false)
        .with_parameter("bytes", "vector<u8>");
    let signer = MockSigner::new(SimulateBehavior::EchoFirstArgument("vector<u8>".to_string()));
    let mut call = CallInvocation::new(function, &CallConfig::default()).unwrap();
    call.set_input("bytes", "[1,2,3]").unwrap();

    let record = call.execute(&signer, None).await.unwrap();
    assert_eq!(record.return_values, Some(vec![serde_json::json!([1, 2, 3])]));
}

#[test]
fn test_record_serializes_as_one_json_line() {
    let config = CallConfig {
        verify_objects: false,
        ..CallConfig::default()
    };
    let mut call = CallInvocation::new(price_function(), &config).unwrap();
    call.set_input("pool", "0x5").unwrap();
    let ticket = call.begin_execution().unwrap();
    let id = ticket.id();
    let record = call
        .complete(
            ticket,
            Err(SignerError::Unavailable("wallet disconnected".to_string()).into()),
        )
        .unwrap();

    let line = record.to_json_line().unwrap();
    assert!(!line.contains('\n'));
    let value: serde_json::Value = serde_json::from_str(&line).unwrap();
    assert_eq!(value["id"], serde_json::json!(id.to_string()));
    assert_eq!(value["mode"], serde_json::json!("simulate"));
    assert_eq!(value["network"], serde_json::json!("mainnet"));
    assert_eq!(value["success"], serde_json::json!(false));
    assert!(value["error"].as_str().unwrap().contains("wallet disconnected"));
}
