//! Tests for key derivation

use quickcheck::quickcheck;
use sol_signer::crypto::keys::*;
use sol_signer::crypto::mnemonic::*;
use sol_signer::Error;

const SEED: &[u8] = b"12345678901234567890123456789012";
const PATH: &str = "m/44'/501'/0'/0'";

#[test]
fn test_pinned_solana_vector() {
    let key_pair = derive_solana_key_pair(SEED, PATH).unwrap();

    assert_eq!(
        hex::encode(key_pair.private_key().as_bytes()),
        "d83b45d5858b9d5b67e2c5e02bd2ba7219519d868702c1a5453e6f0a68836513"
    );
    assert_eq!(
        hex::encode(key_pair.public_key().as_bytes()),
        "6a40f0d1b2a9a067c643a3f8cbe2712a8ba62e7e1c6347bcd7dd8bc43a79222e"
    );
    assert_eq!(
        public_key_to_address(key_pair.public_key()),
        "89meh5u8AzX8wQ1p5ypua9VQ5YBa6z8dconubp7KBGkd"
    );
    assert_eq!(
        key_pair.to_base58(),
        "5Kk7acoH1ugQb6Pwhcj2uHCJXs25YJWWgBsr2qWVaurDD7JnMzVtuB58ot24TxvpYWCSKRKLKNM9NZbjbajTgUms"
    );
}

#[test]
fn test_derive_address() {
    assert_eq!(
        derive_address(SEED, "m/44'/501'/1'/0'").unwrap(),
        "FLo6MXpqfAEBt9wqEzhj1DFjkunfGfPeuEj8rZ9s5fvp"
    );
}

#[test]
fn test_public_key_matches_private_key() {
    let key_pair = derive_solana_key_pair(SEED, PATH).unwrap();
    let recomputed = key_pair.private_key().public_key();
    assert_eq!(&recomputed, key_pair.public_key());

    let reparsed = KeyPair::from_base58(&key_pair.to_base58()).unwrap();
    assert_eq!(reparsed.public_key(), key_pair.public_key());
}

#[test]
fn test_mnemonic_seed_derivation() {
    let mnemonic = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
    let seed = mnemonic_to_seed(mnemonic, None).unwrap();

    let address = derive_address(&seed, PATH).unwrap();
    assert!(address.len() == 43 || address.len() == 44);
    assert_eq!(derive_address(&seed, PATH).unwrap(), address);
}

#[test]
fn test_path_errors() {
    for path in ["", "m/44'/501'/0'/0", "n/44'", "m/44'//0'", "m/x'", "m/4294967295'"] {
        assert!(
            matches!(derive_solana_key_pair(SEED, path), Err(Error::InvalidPath(_))),
            "{}",
            path
        );
    }
}

#[test]
fn test_empty_seed_is_accepted() {
    let key_pair = derive_solana_key_pair(&[], PATH).unwrap();
    assert_ne!(key_pair.public_key().as_bytes(), &[0u8; 32]);
}

quickcheck! {
    fn prop_derivation_is_deterministic(seed: Vec<u8>, account: u32) -> bool {
        let path = DerivationPath::solana_bip44(account % HARDENED_OFFSET, 0).unwrap();
        let a = derive_key_pair(&seed, &path).unwrap();
        let b = derive_key_pair(&seed, &path).unwrap();
        a.private_key().as_bytes() == b.private_key().as_bytes() && a.public_key() == b.public_key()
    }

    fn prop_distinct_paths_give_distinct_keys(seed: Vec<u8>, a: u32, b: u32) -> bool {
        let a = a % HARDENED_OFFSET;
        let b = b % HARDENED_OFFSET;
        if a == b {
            return true;
        }
        let ka = derive_key_pair(&seed, &DerivationPath::solana_bip44(a, 0).unwrap()).unwrap();
        let kb = derive_key_pair(&seed, &DerivationPath::solana_bip44(b, 0).unwrap()).unwrap();
        ka.public_key() != kb.public_key()
    }

    fn prop_path_text_round_trips(indices: Vec<u32>) -> bool {
        let components = indices
            .iter()
            .map(|i| ChildIndex::hardened(i % HARDENED_OFFSET).unwrap())
            .collect();
        let path = DerivationPath::new(components);
        path.to_string().parse::<DerivationPath>().unwrap() == path
    }
}
