//! Solana transaction functionality

use ed25519_dalek::{Signature as DalekSignature, VerifyingKey};
use tracing::{debug, warn};

use super::encoding::PayloadEncoding;
use super::message::{Message, WireReader};
use super::short_vec;
use super::signer::{Signer, SignerLookup};
use super::types::{AccountMeta, Hash, Instruction, Pubkey, Signature, SIGNATURE_BYTES};
use crate::crypto::keys::KeyPair;
use crate::error::{Error, Result};

/// The native system program, all-zero address
pub const SYSTEM_PROGRAM_ID: Pubkey = Pubkey::new([0u8; 32]);

/// Discriminant byte of the transfer instruction
pub const TRANSFER_DISCRIMINANT: u8 = 2;

/// Length of transfer instruction data
pub const TRANSFER_DATA_LEN: usize = 9;

/// Build a system transfer of `lamports` from `from` to `to`
pub fn transfer(from: &Pubkey, to: &Pubkey, lamports: u64) -> Instruction {
    let mut data = Vec::with_capacity(TRANSFER_DATA_LEN);
    data.push(TRANSFER_DISCRIMINANT);
    data.extend_from_slice(&lamports.to_le_bytes());

    Instruction::new(
        SYSTEM_PROGRAM_ID,
        vec![AccountMeta::new(*from, true), AccountMeta::new(*to, false)],
        data,
    )
}

/// Decoded system transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferDetails {
    /// Debited account
    pub from: Pubkey,
    /// Credited account
    pub to: Pubkey,
    /// Amount in lamports
    pub lamports: u64,
}

impl TransferDetails {
    /// Recognize a system transfer instruction
    pub fn from_instruction(instruction: &Instruction) -> Option<Self> {
        if instruction.program_id != SYSTEM_PROGRAM_ID
            || instruction.data.len() != TRANSFER_DATA_LEN
            || instruction.data[0] != TRANSFER_DISCRIMINANT
            || instruction.accounts.len() != 2
        {
            return None;
        }
        let mut amount = [0u8; 8];
        amount.copy_from_slice(&instruction.data[1..]);
        Some(Self {
            from: instruction.accounts[0].pubkey,
            to: instruction.accounts[1].pubkey,
            lamports: u64::from_le_bytes(amount),
        })
    }
}

/// A legacy Solana transaction: signature slots followed by the message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// One slot per required signer, in account order
    pub signatures: Vec<Signature>,
    /// The signed message
    pub message: Message,
}

impl Transaction {
    /// Wrap a message with empty signature slots
    pub fn new_unsigned(message: Message) -> Self {
        let slots = usize::from(message.header.num_required_signatures);
        Self {
            signatures: vec![Signature::default(); slots],
            message,
        }
    }

    /// Compile `instructions` into an unsigned transaction paid for by `payer`
    pub fn new_with_payer(instructions: &[Instruction], payer: &Pubkey, recent_blockhash: Hash) -> Result<Self> {
        Ok(Self::new_unsigned(Message::new(instructions, payer, recent_blockhash)?))
    }

    /// The fee payer
    pub fn fee_payer(&self) -> Option<&Pubkey> {
        self.message.fee_payer()
    }

    /// The bytes every signature covers
    pub fn message_data(&self) -> Result<Vec<u8>> {
        self.message.serialize()
    }

    /// Sign every required slot; fails without touching any slot if the
    /// lookup cannot provide a signer for one of them
    pub fn sign(&mut self, signers: &dyn SignerLookup) -> Result<()> {
        if let Some(missing) = self
            .message
            .signer_keys()
            .iter()
            .find(|key| signers.signer_for(key).is_none())
        {
            return Err(Error::Signing(format!("no signer for required account {}", missing)));
        }
        self.partial_sign(signers)
    }

    /// Sign the slots the lookup has signers for, leaving the rest as they are
    pub fn partial_sign(&mut self, signers: &dyn SignerLookup) -> Result<()> {
        let message = self.message_data()?;

        let mut signed = Vec::new();
        for (slot, key) in self.message.signer_keys().iter().enumerate() {
            if let Some(signer) = signers.signer_for(key) {
                if signer.pubkey() != *key {
                    return Err(Error::Signing(format!(
                        "signer for {} reports address {}",
                        key,
                        signer.pubkey()
                    )));
                }
                signed.push((slot, signer.try_sign_message(&message)?));
            }
        }
        if signed.is_empty() {
            return Err(Error::Signing("none of the provided keys is a required signer".to_string()));
        }

        debug!(
            signed = signed.len(),
            required = self.signatures.len(),
            "attached signatures"
        );
        for (slot, signature) in signed {
            self.signatures[slot] = signature;
        }
        Ok(())
    }

    /// Whether every required slot holds a signature
    pub fn is_signed(&self) -> bool {
        self.signatures.len() == self.message.signer_keys().len()
            && self.signatures.iter().all(|s| !s.is_placeholder())
    }

    /// Verify every signature against its signer and the message bytes
    pub fn verify(&self) -> Result<()> {
        let message = self.message_data()?;
        let keys = self.message.signer_keys();
        if keys.len() != self.signatures.len() {
            return Err(Error::Signing(format!(
                "{} signatures for {} signers",
                self.signatures.len(),
                keys.len()
            )));
        }
        for (key, signature) in keys.iter().zip(&self.signatures) {
            if signature.is_placeholder() {
                return Err(Error::Signing(format!("missing signature for {}", key)));
            }
            let verifying_key = VerifyingKey::from_bytes(key.as_bytes())
                .map_err(|e| Error::InvalidPublicKey(format!("{}: {}", key, e)))?;
            verifying_key
                .verify_strict(&message, &DalekSignature::from_bytes(signature.as_bytes()))
                .map_err(|_| Error::Signing(format!("signature for {} does not verify", key)))?;
        }
        Ok(())
    }

    /// Serialize to wire bytes: compact signature count, signatures, message
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let message = self.message_data()?;
        let mut out = Vec::with_capacity(3 + self.signatures.len() * SIGNATURE_BYTES + message.len());
        short_vec::encode_length(&mut out, self.signatures.len())?;
        for signature in &self.signatures {
            out.extend_from_slice(signature.as_bytes());
        }
        out.extend_from_slice(&message);
        Ok(out)
    }

    /// Parse wire bytes, rejecting anything that would not re-serialize to
    /// exactly the same bytes
    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        let result = Self::read(bytes);
        if let Err(e) = &result {
            warn!(len = bytes.len(), error = %e, "rejected transaction bytes");
        }
        result
    }

    fn read(bytes: &[u8]) -> Result<Self> {
        let mut reader = WireReader::new(bytes);
        let count = reader.read_length()?;
        let mut signatures = Vec::with_capacity(count.min(reader.remaining() / SIGNATURE_BYTES));
        for _ in 0..count {
            signatures.push(Signature::new(reader.read_array::<SIGNATURE_BYTES>()?));
        }

        let message_start = reader.position();
        let message = Message::read(&mut reader)?;
        reader.finish()?;

        let required = usize::from(message.header.num_required_signatures);
        if signatures.len() != required {
            return Err(Error::malformed(format!(
                "{} signatures for {} required signers",
                signatures.len(),
                required
            )));
        }
        if message.serialize()? != bytes[message_start..] {
            return Err(Error::malformed("message does not re-encode to the same bytes"));
        }

        Ok(Self { signatures, message })
    }
}

/// Build a one-instruction transfer paid for by `from`, sign it with
/// `key_pair` and return the wire bytes
pub fn build_transfer_and_sign(
    key_pair: &KeyPair,
    from: &Pubkey,
    to: &Pubkey,
    lamports: u64,
    recent_blockhash: Hash,
) -> Result<Vec<u8>> {
    let instruction = transfer(from, to, lamports);
    let mut transaction = Transaction::new_with_payer(&[instruction], from, recent_blockhash)?;
    transaction.sign(key_pair)?;

    debug!(from = %from, to = %to, lamports, "signed transfer");
    transaction.serialize()
}

/// Parse `raw`, fill the slot belonging to `key_pair` and return the
/// re-serialized wire bytes
pub fn co_sign_transaction(key_pair: &KeyPair, raw: &[u8]) -> Result<Vec<u8>> {
    let mut transaction = Transaction::deserialize(raw)?;
    transaction.partial_sign(key_pair)?;
    transaction.serialize()
}

/// Co-sign an externally built transaction and return it as base64 text
pub fn sign_existing_transaction(key_pair: &KeyPair, raw: &[u8]) -> Result<String> {
    co_sign_transaction(key_pair, raw).map(|bytes| PayloadEncoding::Base64.encode(&bytes))
}
