//! Transaction message: the exact byte range covered by every signature

use super::short_vec;
use super::types::{AccountMeta, Hash, Instruction, Pubkey, HASH_BYTES, PUBKEY_BYTES};
use crate::error::{Error, Result};

/// Set on the first message byte by versioned message formats
const VERSION_PREFIX_MASK: u8 = 0x80;

/// Account counts that classify the ordered account list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessageHeader {
    /// Number of leading accounts that must sign
    pub num_required_signatures: u8,
    /// Trailing read-only accounts among the signers
    pub num_readonly_signed_accounts: u8,
    /// Trailing read-only accounts among the non-signers
    pub num_readonly_unsigned_accounts: u8,
}

/// An instruction whose keys are replaced by indices into the account list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledInstruction {
    /// Index of the program account
    pub program_id_index: u8,
    /// Indices of the instruction accounts, in order
    pub accounts: Vec<u8>,
    /// Opaque program input
    pub data: Vec<u8>,
}

/// A legacy transaction message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Account classification counts
    pub header: MessageHeader,
    /// All accounts, fee payer first
    pub account_keys: Vec<Pubkey>,
    /// Recent blockhash
    pub recent_blockhash: Hash,
    /// Compiled instructions
    pub instructions: Vec<CompiledInstruction>,
}

impl Message {
    /// Compile `instructions` into a message paid for by `payer`
    pub fn new(instructions: &[Instruction], payer: &Pubkey, recent_blockhash: Hash) -> Result<Self> {
        let mut metas: Vec<AccountMeta> = Vec::new();
        merge_account(&mut metas, AccountMeta::new(*payer, true));
        for instruction in instructions {
            for account in &instruction.accounts {
                merge_account(&mut metas, *account);
            }
            merge_account(&mut metas, AccountMeta::new_readonly(instruction.program_id, false));
        }

        // stable: the payer stays first and insertion order holds within a class
        metas.sort_by_key(|meta| match (meta.is_signer, meta.is_writable) {
            (true, true) => 0,
            (true, false) => 1,
            (false, true) => 2,
            (false, false) => 3,
        });

        if metas.len() > usize::from(u8::MAX) {
            return Err(Error::malformed(format!("{} accounts exceed the index range", metas.len())));
        }

        let count = |f: fn(&AccountMeta) -> bool| metas.iter().filter(|m| f(*m)).count() as u8;
        let header = MessageHeader {
            num_required_signatures: count(|m| m.is_signer),
            num_readonly_signed_accounts: count(|m| m.is_signer && !m.is_writable),
            num_readonly_unsigned_accounts: count(|m| !m.is_signer && !m.is_writable),
        };
        let account_keys: Vec<Pubkey> = metas.iter().map(|m| m.pubkey).collect();

        let index_of = |key: &Pubkey| -> u8 {
            // every key was merged above, and the length check bounds the index
            account_keys.iter().position(|k| k == key).unwrap_or_default() as u8
        };
        let instructions = instructions
            .iter()
            .map(|ix| CompiledInstruction {
                program_id_index: index_of(&ix.program_id),
                accounts: ix.accounts.iter().map(|a| index_of(&a.pubkey)).collect(),
                data: ix.data.clone(),
            })
            .collect();

        Ok(Self { header, account_keys, recent_blockhash, instructions })
    }

    /// The fee payer, always the first account
    pub fn fee_payer(&self) -> Option<&Pubkey> {
        self.account_keys.first()
    }

    /// Accounts whose signatures are required, in slot order
    pub fn signer_keys(&self) -> &[Pubkey] {
        let end = usize::from(self.header.num_required_signatures).min(self.account_keys.len());
        &self.account_keys[..end]
    }

    /// Whether the account at `index` must sign
    pub fn is_signer(&self, index: usize) -> bool {
        index < usize::from(self.header.num_required_signatures)
    }

    /// Whether the account at `index` may be modified
    pub fn is_writable(&self, index: usize) -> bool {
        let required = usize::from(self.header.num_required_signatures);
        if index < required {
            index < required - usize::from(self.header.num_readonly_signed_accounts)
        } else {
            index < self
                .account_keys
                .len()
                .saturating_sub(usize::from(self.header.num_readonly_unsigned_accounts))
        }
    }

    /// Expand compiled instructions back into keyed instructions
    pub fn instructions(&self) -> Vec<Instruction> {
        let meta_at = |index: u8| {
            let i = usize::from(index);
            AccountMeta {
                pubkey: self.account_keys[i],
                is_signer: self.is_signer(i),
                is_writable: self.is_writable(i),
            }
        };
        self.instructions
            .iter()
            .map(|ix| Instruction {
                program_id: self.account_keys[usize::from(ix.program_id_index)],
                accounts: ix.accounts.iter().map(|i| meta_at(*i)).collect(),
                data: ix.data.clone(),
            })
            .collect()
    }

    /// Serialize to the canonical signing payload
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(
            3 + 1 + self.account_keys.len() * PUBKEY_BYTES + HASH_BYTES + 1,
        );
        out.push(self.header.num_required_signatures);
        out.push(self.header.num_readonly_signed_accounts);
        out.push(self.header.num_readonly_unsigned_accounts);

        short_vec::encode_length(&mut out, self.account_keys.len())?;
        for key in &self.account_keys {
            out.extend_from_slice(key.as_bytes());
        }
        out.extend_from_slice(self.recent_blockhash.as_bytes());

        short_vec::encode_length(&mut out, self.instructions.len())?;
        for ix in &self.instructions {
            out.push(ix.program_id_index);
            short_vec::encode_length(&mut out, ix.accounts.len())?;
            out.extend_from_slice(&ix.accounts);
            short_vec::encode_length(&mut out, ix.data.len())?;
            out.extend_from_slice(&ix.data);
        }
        Ok(out)
    }

    /// Parse a message that occupies all of `bytes`
    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        let mut reader = WireReader::new(bytes);
        let message = Self::read(&mut reader)?;
        reader.finish()?;
        Ok(message)
    }

    pub(crate) fn read(reader: &mut WireReader<'_>) -> Result<Self> {
        let first = reader.read_u8()?;
        if first & VERSION_PREFIX_MASK != 0 {
            return Err(Error::malformed(format!(
                "versioned message (version {}) is not supported",
                first & !VERSION_PREFIX_MASK
            )));
        }
        let header = MessageHeader {
            num_required_signatures: first,
            num_readonly_signed_accounts: reader.read_u8()?,
            num_readonly_unsigned_accounts: reader.read_u8()?,
        };

        let key_count = reader.read_length()?;
        let mut account_keys = Vec::with_capacity(key_count.min(reader.remaining() / PUBKEY_BYTES));
        for _ in 0..key_count {
            account_keys.push(Pubkey::new(reader.read_array::<PUBKEY_BYTES>()?));
        }
        let recent_blockhash = Hash::new(reader.read_array::<HASH_BYTES>()?);

        let ix_count = reader.read_length()?;
        let mut instructions = Vec::with_capacity(ix_count.min(reader.remaining()));
        for _ in 0..ix_count {
            let program_id_index = reader.read_u8()?;
            let account_len = reader.read_length()?;
            let accounts = reader.read_bytes(account_len)?.to_vec();
            let data_len = reader.read_length()?;
            let data = reader.read_bytes(data_len)?.to_vec();
            instructions.push(CompiledInstruction { program_id_index, accounts, data });
        }

        let message = Self { header, account_keys, recent_blockhash, instructions };
        message.sanitize()?;
        Ok(message)
    }

    /// Check the header and every index against the account list
    pub fn sanitize(&self) -> Result<()> {
        let keys = self.account_keys.len();
        let required = usize::from(self.header.num_required_signatures);
        if required == 0 {
            return Err(Error::malformed("message has no fee payer"));
        }
        if required + usize::from(self.header.num_readonly_unsigned_accounts) > keys {
            return Err(Error::malformed(format!(
                "header claims more accounts than the {} present",
                keys
            )));
        }
        if self.header.num_readonly_signed_accounts >= self.header.num_required_signatures {
            return Err(Error::malformed("fee payer must be writable"));
        }
        for (n, ix) in self.instructions.iter().enumerate() {
            let program = usize::from(ix.program_id_index);
            if program == 0 || program >= keys {
                return Err(Error::malformed(format!(
                    "instruction {} has invalid program index {}",
                    n, program
                )));
            }
            if let Some(bad) = ix.accounts.iter().find(|i| usize::from(**i) >= keys) {
                return Err(Error::malformed(format!(
                    "instruction {} references missing account {}",
                    n, bad
                )));
            }
        }
        Ok(())
    }
}

fn merge_account(metas: &mut Vec<AccountMeta>, meta: AccountMeta) {
    match metas.iter_mut().find(|m| m.pubkey == meta.pubkey) {
        Some(existing) => {
            existing.is_signer |= meta.is_signer;
            existing.is_writable |= meta.is_writable;
        }
        None => metas.push(meta),
    }
}

/// Bounds-checked cursor over wire bytes
pub(crate) struct WireReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    pub(crate) fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    pub(crate) fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(Error::malformed(format!(
                "truncated at byte {}: need {}, have {}",
                self.pos,
                len,
                self.remaining()
            )));
        }
        let bytes = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    pub(crate) fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub(crate) fn read_length(&mut self) -> Result<usize> {
        let (len, used) = short_vec::decode_length(&self.bytes[self.pos..])?;
        self.pos += used;
        Ok(len)
    }

    pub(crate) fn finish(&self) -> Result<()> {
        if self.remaining() != 0 {
            return Err(Error::malformed(format!("{} trailing bytes", self.remaining())));
        }
        Ok(())
    }
}
