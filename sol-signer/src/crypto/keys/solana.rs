//! Solana key derivation (SLIP-10 over Ed25519)

use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha2::Sha512;
use tracing::debug;
use zeroize::Zeroizing;

use super::derivation::{ChildIndex, DerivationPath, KeyPair, PrivateKey, PublicKey};
use crate::error::{Error, Result};

type HmacSha512 = Hmac<Sha512>;

/// HMAC key for the Ed25519 master node
const ED25519_CURVE: &[u8] = b"ed25519 seed";

/// Intermediate node of the derivation tree
pub struct ExtendedKey {
    key: Zeroizing<[u8; 32]>,
    chain_code: Zeroizing<[u8; 32]>,
}

impl ExtendedKey {
    /// Derive the master node from a seed
    pub fn master(seed: &[u8]) -> Result<Self> {
        let mut hmac = <HmacSha512 as KeyInit>::new_from_slice(ED25519_CURVE)
            .map_err(|e| Error::Derivation(format!("HMAC error: {}", e)))?;
        hmac.update(seed);
        Ok(Self::from_hmac_output(&hmac.finalize().into_bytes()))
    }

    /// Derive the hardened child at `index`
    pub fn derive_child(&self, index: ChildIndex) -> Result<Self> {
        let mut hmac = <HmacSha512 as KeyInit>::new_from_slice(&self.chain_code[..])
            .map_err(|e| Error::Derivation(format!("HMAC error: {}", e)))?;

        // 0x00 || parent key || index (big endian)
        hmac.update(&[0u8]);
        hmac.update(&self.key[..]);
        hmac.update(&index.to_bits().to_be_bytes());

        Ok(Self::from_hmac_output(&hmac.finalize().into_bytes()))
    }

    /// Walk every component of `path` starting from this node
    pub fn derive_path(&self, path: &DerivationPath) -> Result<Self> {
        let mut node = Self {
            key: self.key.clone(),
            chain_code: self.chain_code.clone(),
        };
        for component in path.components() {
            node = node.derive_child(*component)?;
        }
        Ok(node)
    }

    /// The 32-byte key material
    pub fn key(&self) -> &[u8; 32] {
        &self.key
    }

    /// The 32-byte chain code
    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    /// Turn the node's key material into an Ed25519 key pair
    pub fn to_key_pair(&self) -> KeyPair {
        KeyPair::from_private_key(PrivateKey::new(*self.key))
    }

    fn from_hmac_output(output: &[u8]) -> Self {
        let output = Zeroizing::new(output.to_vec());
        let mut key = Zeroizing::new([0u8; 32]);
        let mut chain_code = Zeroizing::new([0u8; 32]);
        key.copy_from_slice(&output[0..32]);
        chain_code.copy_from_slice(&output[32..64]);
        Self { key, chain_code }
    }
}

/// Derive a Solana key pair from a seed and a parsed derivation path
pub fn derive_key_pair(seed: &[u8], path: &DerivationPath) -> Result<KeyPair> {
    let node = ExtendedKey::master(seed)?.derive_path(path)?;
    let key_pair = node.to_key_pair();

    debug!(
        path = %path,
        depth = path.depth(),
        address = %public_key_to_address(key_pair.public_key()),
        "derived ed25519 key pair"
    );

    Ok(key_pair)
}

/// Derive a Solana key pair from a seed and a derivation path string
pub fn derive_solana_key_pair(seed: &[u8], path: &str) -> Result<KeyPair> {
    let path: DerivationPath = path.parse()?;
    derive_key_pair(seed, &path)
}

/// Derive the base58 address for `path`
pub fn derive_address(seed: &[u8], path: &str) -> Result<String> {
    let key_pair = derive_solana_key_pair(seed, path)?;
    Ok(public_key_to_address(key_pair.public_key()))
}

/// Get the Solana address from a public key
pub fn public_key_to_address(public_key: &PublicKey) -> String {
    bs58::encode(public_key.as_bytes()).into_string()
}
