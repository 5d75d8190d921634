use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Sui network a call is aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
    Devnet,
    Localnet,
}

/// Sender used for read-only simulation when the user has none. Simulation
/// never checks signatures, so the zero address works on every network.
pub const DEFAULT_FALLBACK_SENDER: &str =
    "0x0000000000000000000000000000000000000000000000000000000000000000";

impl Network {
    pub const ALL: [Network; 4] = [
        Network::Mainnet,
        Network::Testnet,
        Network::Devnet,
        Network::Localnet,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Devnet => "devnet",
            Network::Localnet => "localnet",
        }
    }

    /// Guess the network from an RPC or GraphQL endpoint.
    pub fn from_url(url: &str) -> Option<Self> {
        let lower = url.to_lowercase();
        if lower.contains("testnet") {
            Some(Network::Testnet)
        } else if lower.contains("devnet") {
            Some(Network::Devnet)
        } else if lower.contains("mainnet") {
            Some(Network::Mainnet)
        } else if lower.contains("localhost") || lower.contains("127.0.0.1") {
            Some(Network::Localnet)
        } else {
            None
        }
    }

    /// Fallback simulation sender for this network.
    pub fn fallback_sender(self) -> &'static str {
        DEFAULT_FALLBACK_SENDER
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Network::ALL
            .into_iter()
            .find(|n| n.as_str() == lower)
            .ok_or_else(|| format!("unknown network '{}'", s))
    }
}
