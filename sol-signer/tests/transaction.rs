//! Tests for transaction building, signing and the wire format

use quickcheck::{quickcheck, Arbitrary, Gen};
use sol_signer::crypto::keys::derive_solana_key_pair;
use sol_signer::transaction::*;
use sol_signer::{Error, KeyPair};

const SEED: &[u8] = b"12345678901234567890123456789012";
const PATH: &str = "m/44'/501'/0'/0'";

const SELF_TRANSFER_HEX: &str = "01378fb2f23fa5e5485019123270b0af5ef84ae57a7be228ee3c6c0d28a1ae05e3653af7baf02f32a2656bcfce0a6931ddb794b69264f1f89473a404f45d4f160c010001026a40f0d1b2a9a067c643a3f8cbe2712a8ba62e7e1c6347bcd7dd8bc43a79222e00000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000010102000009020100000000000000";

const TWO_PARTY_HEX: &str = "013cf6f10bf087bfbf138741a7a03f485822bbf262aef2df60f842d54b0a1b69521a0351505971ca838d041a58767a4ebb7e1564cc3c722e638e14ee0ffd392802010001036a40f0d1b2a9a067c643a3f8cbe2712a8ba62e7e1c6347bcd7dd8bc43a79222ed515c4e29981dafb7beb374a063a8c8441c7b3bdddbd16cbf71165b96f8cbbc9000000000000000000000000000000000000000000000000000000000000000007070707070707070707070707070707070707070707070707070707070707070102020001090240420f0000000000";

fn payer() -> KeyPair {
    derive_solana_key_pair(SEED, PATH).unwrap()
}

#[test]
fn test_self_transfer_golden_payload() {
    let key_pair = payer();
    let from = key_pair.pubkey();

    let bytes = build_transfer_and_sign(&key_pair, &from, &from, 1, Hash::default()).unwrap();
    assert_eq!(hex::encode(&bytes), SELF_TRANSFER_HEX);

    let tx = Transaction::deserialize(&bytes).unwrap();
    tx.verify().unwrap();

    // A is both debited and credited through the same account index
    assert_eq!(tx.message.account_keys, vec![from, SYSTEM_PROGRAM_ID]);
    assert_eq!(tx.message.instructions[0].accounts, vec![0, 0]);
    let instructions = tx.message.instructions();
    assert_eq!(instructions[0].accounts[0].pubkey, from);
    assert_eq!(instructions[0].accounts[1].pubkey, from);
    assert_eq!(
        TransferDetails::from_instruction(&instructions[0]),
        Some(TransferDetails { from, to: from, lamports: 1 })
    );
}

#[test]
fn test_two_party_golden_payload() {
    let key_pair = payer();
    let to: Pubkey = "FLo6MXpqfAEBt9wqEzhj1DFjkunfGfPeuEj8rZ9s5fvp".parse().unwrap();
    let blockhash: Hash = "US517G5965aydkZ46HS38QLi7UQiSojurfbQfKCELFx".parse().unwrap();

    let bytes = build_transfer_and_sign(&key_pair, &key_pair.pubkey(), &to, 1_000_000, blockhash).unwrap();
    assert_eq!(hex::encode(&bytes), TWO_PARTY_HEX);

    let tx = Transaction::deserialize(&bytes).unwrap();
    assert_eq!(
        tx.message.header,
        MessageHeader {
            num_required_signatures: 1,
            num_readonly_signed_accounts: 0,
            num_readonly_unsigned_accounts: 1,
        }
    );
    assert_eq!(tx.fee_payer(), Some(&key_pair.pubkey()));
}

#[test]
fn test_signature_covers_message_bytes() {
    let key_pair = payer();
    let bytes = hex::decode(SELF_TRANSFER_HEX).unwrap();
    let tx = Transaction::deserialize(&bytes).unwrap();

    let message = tx.message_data().unwrap();
    assert_eq!(&bytes[65..], &message[..]);
    assert_eq!(key_pair.try_sign_message(&message).unwrap(), tx.signatures[0]);
}

#[test]
fn test_co_sign_unsigned_payload() {
    let key_pair = payer();
    let mut unsigned = hex::decode(SELF_TRANSFER_HEX).unwrap();
    unsigned[1..65].copy_from_slice(&[0u8; 64]);

    let signed = co_sign_transaction(&key_pair, &unsigned).unwrap();
    assert_eq!(hex::encode(&signed), SELF_TRANSFER_HEX);

    // the slot is overwritten, not appended to
    let resigned = co_sign_transaction(&key_pair, &signed).unwrap();
    assert_eq!(resigned, signed);

    assert_eq!(
        sign_existing_transaction(&key_pair, &unsigned).unwrap(),
        "ATePsvI/peVIUBkSMnCwr174SuV6e+Io7jxsDSihrgXjZTr3uvAvMqJla8/OCmkx3beUtpJk8fiUc6QE9F1PFgwBAAECakDw0bKpoGfGQ6P4y+JxKoumLn4cY0e8192LxDp5Ii4AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAQECAAAJAgEAAAAAAAAA"
    );
}

#[test]
fn test_co_sign_with_wrong_key() {
    let stranger = KeyPair::from_seed_bytes([42u8; 32]);
    let bytes = hex::decode(SELF_TRANSFER_HEX).unwrap();
    assert!(matches!(
        co_sign_transaction(&stranger, &bytes),
        Err(Error::Signing(_))
    ));
}

#[test]
fn test_truncated_payload_is_malformed() {
    let key_pair = payer();
    let bytes = hex::decode(SELF_TRANSFER_HEX).unwrap();
    for len in 0..bytes.len() {
        let result = sign_existing_transaction(&key_pair, &bytes[..len]);
        assert!(
            matches!(result, Err(Error::MalformedTransaction(_))),
            "prefix of {} bytes",
            len
        );
    }
}

#[test]
fn test_trailing_bytes_are_malformed() {
    let mut bytes = hex::decode(SELF_TRANSFER_HEX).unwrap();
    bytes.push(0);
    assert!(matches!(
        Transaction::deserialize(&bytes),
        Err(Error::MalformedTransaction(_))
    ));
}

#[test]
fn test_build_rejects_foreign_fee_payer() {
    let key_pair = payer();
    let other = KeyPair::from_seed_bytes([3u8; 32]).pubkey();
    let result = build_transfer_and_sign(&key_pair, &other, &other, 1, Hash::default());
    assert!(matches!(result, Err(Error::Signing(_))));
}

/// A transaction with a random shape: payer, extra signers and instructions
#[derive(Debug, Clone)]
struct ArbitraryTransaction(Transaction);

impl Arbitrary for ArbitraryTransaction {
    fn arbitrary(g: &mut Gen) -> Self {
        let key = |g: &mut Gen| {
            let mut bytes = [0u8; 32];
            for b in bytes.iter_mut() {
                *b = u8::arbitrary(g);
            }
            Pubkey::new(bytes)
        };

        let payer = key(g);
        let instruction_count = usize::arbitrary(g) % 4;
        let mut instructions = Vec::new();
        for _ in 0..instruction_count {
            let account_count = usize::arbitrary(g) % 5;
            let accounts = (0..account_count)
                .map(|_| AccountMeta {
                    pubkey: if bool::arbitrary(g) { payer } else { key(g) },
                    is_signer: bool::arbitrary(g),
                    is_writable: bool::arbitrary(g),
                })
                .collect();
            instructions.push(Instruction::new(key(g), accounts, Vec::<u8>::arbitrary(g)));
        }

        let mut blockhash = [0u8; 32];
        for b in blockhash.iter_mut() {
            *b = u8::arbitrary(g);
        }
        let mut tx = Transaction::new_with_payer(&instructions, &payer, Hash::new(blockhash)).unwrap();
        for slot in tx.signatures.iter_mut() {
            let mut sig = [0u8; 64];
            for b in sig.iter_mut() {
                *b = u8::arbitrary(g);
            }
            *slot = Signature::new(sig);
        }
        ArbitraryTransaction(tx)
    }
}

quickcheck! {
    fn prop_wire_round_trip(tx: ArbitraryTransaction) -> bool {
        let bytes = tx.0.serialize().unwrap();
        Transaction::deserialize(&bytes).unwrap() == tx.0
    }
}
