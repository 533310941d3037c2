//! Solana HD signer
//!
//! Derives Ed25519 key pairs from a seed along SLIP-10 hardened paths and
//! uses them to build, co-sign and serialize Solana legacy transactions.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the embedding application.

pub mod error;
pub mod config;
pub mod crypto;
pub mod transaction;
pub mod adapter;

// Re-export commonly used types for convenience
pub use adapter::SolanaAdapter;
pub use config::{Network, SignerConfig};
pub use crypto::keys::{DerivationPath, KeyPair};
pub use error::{Error, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
