//! Derivation paths and key types

use std::fmt;
use std::str::FromStr;

use ed25519_dalek::{SigningKey, VerifyingKey};
use zeroize::Zeroizing;

use crate::error::{Error, Result};
use crate::transaction::Pubkey;

/// Offset added to an index to mark it hardened
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// SLIP-44 coin type registered for Solana
pub const SOLANA_COIN_TYPE: u32 = 501;

/// A single hardened component of a derivation path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChildIndex(u32);

impl ChildIndex {
    /// Create a hardened child index from its unhardened value
    pub fn hardened(index: u32) -> Result<Self> {
        if index >= HARDENED_OFFSET {
            return Err(Error::InvalidPath(format!("index {} out of range", index)));
        }
        Ok(Self(index))
    }

    /// The index as written in the path, without the hardened bit
    pub fn index(&self) -> u32 {
        self.0
    }

    /// The index as fed to HMAC, with the hardened bit set
    pub fn to_bits(&self) -> u32 {
        HARDENED_OFFSET | self.0
    }
}

impl fmt::Display for ChildIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}'", self.0)
    }
}

/// A parsed hardened-only derivation path such as `m/44'/501'/0'/0'`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DerivationPath {
    components: Vec<ChildIndex>,
}

impl DerivationPath {
    /// Create a path from already validated components
    pub fn new(components: Vec<ChildIndex>) -> Self {
        Self { components }
    }

    /// The standard Solana BIP-44 path `m/44'/501'/account'/change'`
    pub fn solana_bip44(account: u32, change: u32) -> Result<Self> {
        Ok(Self::new(vec![
            ChildIndex::hardened(44)?,
            ChildIndex::hardened(SOLANA_COIN_TYPE)?,
            ChildIndex::hardened(account)?,
            ChildIndex::hardened(change)?,
        ]))
    }

    /// Path components in derivation order
    pub fn components(&self) -> &[ChildIndex] {
        &self.components
    }

    /// Number of derivation steps below the master node
    pub fn depth(&self) -> usize {
        self.components.len()
    }
}

impl FromStr for DerivationPath {
    type Err = Error;

    fn from_str(path: &str) -> Result<Self> {
        let mut parts = path.split('/');
        match parts.next() {
            Some("m") | Some("M") => {}
            _ => return Err(Error::InvalidPath(format!("{} must start with m/", path))),
        }

        let mut components = Vec::new();
        for component in parts {
            if component.is_empty() {
                return Err(Error::InvalidPath(format!("empty component in {}", path)));
            }

            // Ed25519 has no public-parent derivation, so an unmarked index is an error
            let digits = component
                .strip_suffix('\'')
                .or_else(|| component.strip_suffix('h'))
                .or_else(|| component.strip_suffix('H'))
                .ok_or_else(|| {
                    Error::InvalidPath(format!("component {} is not hardened", component))
                })?;

            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(Error::InvalidPath(format!("component {} is not numeric", component)));
            }
            let index = digits
                .parse::<u32>()
                .map_err(|_| Error::InvalidPath(format!("component {} out of range", component)))?;

            components.push(ChildIndex::hardened(index)?);
        }

        Ok(Self { components })
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for component in &self.components {
            write!(f, "/{}", component)?;
        }
        Ok(())
    }
}

/// A 32-byte Ed25519 private key seed
#[derive(Clone)]
pub struct PrivateKey {
    bytes: Zeroizing<[u8; 32]>,
}

impl PrivateKey {
    /// Create a private key from its 32-byte seed
    pub fn new(bytes: [u8; 32]) -> Self {
        Self { bytes: Zeroizing::new(bytes) }
    }

    /// Get the raw private key bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    /// Compute the matching public key (hash, clamp, scalar multiply)
    pub fn public_key(&self) -> PublicKey {
        let verifying_key = VerifyingKey::from(&SigningKey::from_bytes(&self.bytes));
        PublicKey::new(verifying_key.to_bytes())
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(..)")
    }
}

/// A 32-byte Ed25519 public key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey {
    bytes: [u8; 32],
}

impl PublicKey {
    /// Create a public key from bytes
    pub fn new(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    /// Get the raw public key bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    /// The on-chain account address for this key
    pub fn to_pubkey(&self) -> Pubkey {
        Pubkey::new(self.bytes)
    }
}

/// An Ed25519 key pair
#[derive(Debug, Clone)]
pub struct KeyPair {
    /// The private key
    private_key: PrivateKey,
    /// The public key
    public_key: PublicKey,
}

impl KeyPair {
    /// Create a key pair from a private key seed; the public key is always recomputed
    pub fn from_private_key(private_key: PrivateKey) -> Self {
        let public_key = private_key.public_key();
        Self { private_key, public_key }
    }

    /// Create a key pair from a 32-byte seed
    pub fn from_seed_bytes(seed: [u8; 32]) -> Self {
        Self::from_private_key(PrivateKey::new(seed))
    }

    /// Parse a key pair from raw bytes: either a 32-byte seed or the
    /// 64-byte `seed || public key` layout used by Solana wallets
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        match bytes.len() {
            32 => {
                let mut seed = [0u8; 32];
                seed.copy_from_slice(bytes);
                Ok(Self::from_seed_bytes(seed))
            }
            64 => {
                let mut seed = [0u8; 32];
                seed.copy_from_slice(&bytes[..32]);
                let key_pair = Self::from_seed_bytes(seed);
                if key_pair.public_key.as_bytes()[..] != bytes[32..] {
                    return Err(Error::InvalidPrivateKey(
                        "embedded public key does not match private key".to_string(),
                    ));
                }
                Ok(key_pair)
            }
            len => Err(Error::InvalidPrivateKey(format!("expected 32 or 64 bytes, got {}", len))),
        }
    }

    /// Parse a base58 private key (32-byte seed or 64-byte keypair)
    pub fn from_base58(text: &str) -> Result<Self> {
        let bytes = Zeroizing::new(
            bs58::decode(text)
                .into_vec()
                .map_err(|e| Error::InvalidPrivateKey(e.to_string()))?,
        );
        Self::from_bytes(&bytes)
    }

    /// The 64-byte `seed || public key` layout
    pub fn to_keypair_bytes(&self) -> Zeroizing<[u8; 64]> {
        let mut bytes = Zeroizing::new([0u8; 64]);
        bytes[..32].copy_from_slice(self.private_key.as_bytes());
        bytes[32..].copy_from_slice(self.public_key.as_bytes());
        bytes
    }

    /// Base58 of the 64-byte keypair layout
    pub fn to_base58(&self) -> String {
        bs58::encode(&self.to_keypair_bytes()[..]).into_string()
    }

    /// Get the private key
    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    /// Get the public key
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub(crate) fn signing_key(&self) -> SigningKey {
        SigningKey::from_bytes(self.private_key.as_bytes())
    }
}
