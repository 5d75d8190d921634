//! Execution records for the history store.
//!
//! One record per finished attempt, written once and never read back by
//! this crate. Serializes to one JSON object per line.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sui_call_types::Network;
use uuid::Uuid;

use crate::function::CallMode;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionRecord {
    pub id: Uuid,
    pub ts: DateTime<Utc>,
    pub target: String,
    pub network: Network,
    pub mode: CallMode,
    /// Sender the call ran as. For simulations this may be the fallback.
    pub sender: Option<String>,
    pub inputs: BTreeMap<String, String>,
    pub duration_ms: u128,
    pub success: bool,
    pub digest: Option<String>,
    /// Decoded return values of a simulation.
    pub return_values: Option<Vec<Value>>,
    pub error: Option<String>,
}

impl ExecutionRecord {
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ExecutionRecord {
        ExecutionRecord {
            id: Uuid::new_v4(),
            ts: Utc::now(),
            target: "0x2::coin::value".to_string(),
            network: Network::Testnet,
            mode: CallMode::Simulate,
            sender: None,
            inputs: BTreeMap::from([("coin".to_string(), "0x5".to_string())]),
            duration_ms: 12,
            success: true,
            digest: None,
            return_values: Some(vec![serde_json::json!("18446744073709551615")]),
            error: None,
        }
    }

    #[test]
    fn test_json_line_round_trip() {
        let original = record();
        let line = original.to_json_line().unwrap();
        assert!(!line.contains('\n'));

        let parsed: ExecutionRecord = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_json_line_field_names() {
        let value: Value = serde_json::from_str(&record().to_json_line().unwrap()).unwrap();
        assert_eq!(value["network"], serde_json::json!("testnet"));
        assert_eq!(value["mode"], serde_json::json!("simulate"));
        assert_eq!(value["inputs"]["coin"], serde_json::json!("0x5"));
        assert_eq!(value["return_values"][0], serde_json::json!("18446744073709551615"));
    }
}
