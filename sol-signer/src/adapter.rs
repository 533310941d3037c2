//! Chain adapter exposing derivation and signing behind text interfaces

use tracing::debug;
use zeroize::Zeroizing;

use crate::config::SignerConfig;
use crate::crypto::keys::{self, DerivationPath, KeyPair, SOLANA_COIN_TYPE};
use crate::error::Result;
use crate::transaction::{self, Hash, PayloadEncoding, Pubkey, Signer};

/// Solana adapter: derives keys along SLIP-10 paths and signs transactions
#[derive(Debug, Clone, Default)]
pub struct SolanaAdapter {
    config: SignerConfig,
}

impl SolanaAdapter {
    /// Create a new adapter
    pub fn new(config: SignerConfig) -> Self {
        Self { config }
    }

    /// Get the adapter configuration
    pub fn config(&self) -> &SignerConfig {
        &self.config
    }

    /// Whether this adapter handles the SLIP-44 `coin_type`
    pub fn supports_coin_type(&self, coin_type: u32) -> bool {
        coin_type == SOLANA_COIN_TYPE
    }

    /// Derive the key pair at `path`
    pub fn derive_key_pair(&self, seed: &[u8], path: &str) -> Result<KeyPair> {
        let path: DerivationPath = path.parse()?;
        debug!(network = %self.config.network, path = %path, "deriving key pair");
        keys::derive_key_pair(seed, &path)
    }

    /// Base58 private key in the 64-byte keypair layout
    pub fn derive_private_key(&self, seed: &[u8], path: &str) -> Result<Zeroizing<String>> {
        Ok(Zeroizing::new(self.derive_key_pair(seed, path)?.to_base58()))
    }

    /// Base58 public key
    pub fn derive_public_key(&self, seed: &[u8], path: &str) -> Result<String> {
        Ok(keys::public_key_to_address(self.derive_key_pair(seed, path)?.public_key()))
    }

    /// Base58 account address; identical to the public key on Solana
    pub fn derive_address(&self, seed: &[u8], path: &str) -> Result<String> {
        self.derive_public_key(seed, path)
    }

    /// Co-sign a hex encoded unsigned transaction and return base64
    pub fn create_signed_transaction(&self, seed: &[u8], path: &str, unsigned_tx_hex: &str) -> Result<String> {
        let raw = PayloadEncoding::Hex.decode(unsigned_tx_hex)?;
        let key_pair = self.derive_key_pair(seed, path)?;
        transaction::sign_existing_transaction(&key_pair, &raw)
    }

    /// Co-sign a transaction given as `input` text and return it in the
    /// configured payload encoding
    pub fn create_signed_transaction_encoded(
        &self,
        seed: &[u8],
        path: &str,
        payload: &str,
        input: PayloadEncoding,
    ) -> Result<String> {
        let raw = input.decode(payload)?;
        let key_pair = self.derive_key_pair(seed, path)?;
        let signed = transaction::co_sign_transaction(&key_pair, &raw)?;
        Ok(self.config.payload_encoding.encode(&signed))
    }

    /// Build and sign a transfer from the key at `path` and return it in the
    /// configured payload encoding
    pub fn build_transfer(
        &self,
        seed: &[u8],
        path: &str,
        to: &str,
        lamports: u64,
        recent_blockhash: &str,
    ) -> Result<String> {
        let to: Pubkey = to.parse()?;
        let recent_blockhash: Hash = recent_blockhash.parse()?;
        let key_pair = self.derive_key_pair(seed, path)?;
        let signed = transaction::build_transfer_and_sign(
            &key_pair,
            &key_pair.pubkey(),
            &to,
            lamports,
            recent_blockhash,
        )?;
        Ok(self.config.payload_encoding.encode(&signed))
    }
}
