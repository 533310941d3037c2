//! Signing seam between key material and transactions

use std::collections::BTreeMap;

use ed25519_dalek::Signer as _;

use super::types::{Pubkey, Signature};
use crate::crypto::keys::KeyPair;
use crate::error::{Error, Result};

/// Something that can produce an Ed25519 signature for one account
pub trait Signer {
    /// The account this signer signs for
    fn pubkey(&self) -> Pubkey;

    /// Sign the serialized message bytes
    fn try_sign_message(&self, message: &[u8]) -> Result<Signature>;
}

impl Signer for KeyPair {
    fn pubkey(&self) -> Pubkey {
        self.public_key().to_pubkey()
    }

    fn try_sign_message(&self, message: &[u8]) -> Result<Signature> {
        let signature = self
            .signing_key()
            .try_sign(message)
            .map_err(|e| Error::Signing(e.to_string()))?;
        Ok(Signature::new(signature.to_bytes()))
    }
}

/// Resolves the signer responsible for a required signature slot
pub trait SignerLookup {
    /// The signer for `pubkey`, if this lookup holds one
    fn signer_for(&self, pubkey: &Pubkey) -> Option<&dyn Signer>;
}

/// A single key pair only answers for its own address
impl SignerLookup for KeyPair {
    fn signer_for(&self, pubkey: &Pubkey) -> Option<&dyn Signer> {
        if Signer::pubkey(self) == *pubkey {
            Some(self)
        } else {
            None
        }
    }
}

/// Key pairs indexed by the address they sign for
#[derive(Debug, Default)]
pub struct SignerSet {
    keys: BTreeMap<Pubkey, KeyPair>,
}

impl SignerSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key pair, replacing any previous one for the same address
    pub fn insert(&mut self, key_pair: KeyPair) {
        self.keys.insert(Signer::pubkey(&key_pair), key_pair);
    }

    /// Number of distinct signers held
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the set holds no signers
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl FromIterator<KeyPair> for SignerSet {
    fn from_iter<I: IntoIterator<Item = KeyPair>>(iter: I) -> Self {
        let mut set = Self::new();
        for key_pair in iter {
            set.insert(key_pair);
        }
        set
    }
}

impl SignerLookup for SignerSet {
    fn signer_for(&self, pubkey: &Pubkey) -> Option<&dyn Signer> {
        self.keys.get(pubkey).map(|k| k as &dyn Signer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signature as DalekSignature, VerifyingKey};

    #[test]
    fn test_key_pair_signature_verifies() {
        let key_pair = KeyPair::from_seed_bytes([1u8; 32]);
        let signature = key_pair.try_sign_message(b"hello").unwrap();

        let verifying_key = VerifyingKey::from_bytes(key_pair.public_key().as_bytes()).unwrap();
        verifying_key
            .verify_strict(b"hello", &DalekSignature::from_bytes(signature.as_bytes()))
            .unwrap();
    }

    #[test]
    fn test_key_pair_lookup_only_matches_itself() {
        let key_pair = KeyPair::from_seed_bytes([1u8; 32]);
        let other = KeyPair::from_seed_bytes([2u8; 32]);

        assert!(key_pair.signer_for(&Signer::pubkey(&key_pair)).is_some());
        assert!(key_pair.signer_for(&Signer::pubkey(&other)).is_none());
    }

    #[test]
    fn test_signer_set_lookup() {
        let a = KeyPair::from_seed_bytes([1u8; 32]);
        let b = KeyPair::from_seed_bytes([2u8; 32]);
        let a_key = Signer::pubkey(&a);
        let b_key = Signer::pubkey(&b);
        let set: SignerSet = vec![a, b.clone(), b].into_iter().collect();

        assert_eq!(set.len(), 2);
        assert_eq!(set.signer_for(&a_key).map(|s| s.pubkey()), Some(a_key));
        assert_eq!(set.signer_for(&b_key).map(|s| s.pubkey()), Some(b_key));
        assert!(set.signer_for(&Pubkey::default()).is_none());
    }
}
