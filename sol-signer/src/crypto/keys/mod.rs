//! Key derivation and management
//!
//! Hierarchical deterministic Ed25519 keys derived with SLIP-10 along
//! hardened-only paths.

pub mod solana;
mod derivation;

pub use derivation::*;
pub use solana::{derive_address, derive_key_pair, derive_solana_key_pair, public_key_to_address, ExtendedKey};
