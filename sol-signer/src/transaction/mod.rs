//! Transaction functionality
//!
//! This module provides the Solana legacy wire format: instruction and
//! message compilation, signing, and binary serialization.

pub mod types;
pub mod short_vec;
pub mod message;
pub mod signer;
pub mod encoding;
mod solana;

pub use types::*;
pub use message::{CompiledInstruction, Message, MessageHeader};
pub use signer::{Signer, SignerLookup, SignerSet};
pub use encoding::PayloadEncoding;
pub use solana::*;
