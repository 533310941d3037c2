//! Cryptographic primitives and operations
//!
//! This module provides mnemonic handling and hierarchical key derivation.

pub mod mnemonic;
pub mod keys;

pub use mnemonic::*;
pub use keys::*;
