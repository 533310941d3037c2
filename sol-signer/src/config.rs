//! Signer configuration

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::transaction::PayloadEncoding;

/// Cluster a key is intended for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Mainnet beta
    #[default]
    Mainnet,
    /// Devnet
    Devnet,
    /// Testnet
    Testnet,
}

impl Network {
    /// Whether this is a development cluster
    pub fn is_dev(&self) -> bool {
        !matches!(self, Self::Mainnet)
    }
}

impl FromStr for Network {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" | "mainnet-beta" => Ok(Self::Mainnet),
            "devnet" => Ok(Self::Devnet),
            "testnet" => Ok(Self::Testnet),
            other => Err(Error::NotSupported(format!("network {}", other))),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Mainnet => "mainnet",
            Self::Devnet => "devnet",
            Self::Testnet => "testnet",
        };
        f.write_str(name)
    }
}

/// Configuration for [`crate::adapter::SolanaAdapter`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignerConfig {
    /// Target cluster. Derivation is identical on every cluster.
    pub network: Network,
    /// Text encoding of signed payloads
    pub payload_encoding: PayloadEncoding,
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self {
            network: Network::Mainnet,
            payload_encoding: PayloadEncoding::Base64,
        }
    }
}

impl SignerConfig {
    /// Default configuration for a development cluster
    pub fn devnet() -> Self {
        Self {
            network: Network::Devnet,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SignerConfig::default();
        assert_eq!(config.payload_encoding, PayloadEncoding::Base64);
        assert!(!config.network.is_dev());
        assert!(SignerConfig::devnet().network.is_dev());
    }

    #[test]
    fn test_partial_json() {
        let config: SignerConfig =
            serde_json::from_str(r#"{"network":"devnet","payload_encoding":"hex"}"#).unwrap();
        assert_eq!(config.network, Network::Devnet);
        assert_eq!(config.payload_encoding, PayloadEncoding::Hex);
    }

    #[test]
    fn test_network_names() {
        assert_eq!("mainnet-beta".parse::<Network>().unwrap(), Network::Mainnet);
        assert_eq!(Network::Testnet.to_string(), "testnet");
        assert!("localnet".parse::<Network>().is_err());
    }
}
