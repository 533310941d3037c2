//! Error types for the sol-signer library

use thiserror::Error;

/// Custom error type for sol-signer operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid derivation path: {0}")]
    InvalidPath(String),

    #[error("Key derivation error: {0}")]
    Derivation(String),

    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Malformed transaction: {0}")]
    MalformedTransaction(String),

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Mnemonic error: {0}")]
    Mnemonic(String),

    #[error("Not supported: {0}")]
    NotSupported(String),
}

impl Error {
    /// Shorthand for a wire-format parse failure
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedTransaction(reason.into())
    }
}

/// Result type for sol-signer operations
pub type Result<T> = std::result::Result<T, Error>;
