//! Deterministic keys for tests.
use alloy::primitives::{Address, B256};
use oneinch_onchain::Wallet;
use oneinch_types::PrivateKey;
use std::sync::LazyLock;

/// The key used by the published signing vectors, unprefixed hex.
pub const VECTOR_KEY_HEX: &str = "ad21c0552a3b52e94520da713455cc347e4e89628a334be24d85b8083848434f";

/// Ten keys built from the repeated bytes `[1u8; 32]` to `[10u8; 32]`.
pub static TEST_KEYS: LazyLock<[PrivateKey; 10]> = LazyLock::new(|| {
    std::array::from_fn(|i| test_key(i as u8 + 1))
});

/// Addresses of [`TEST_KEYS`].
pub static TEST_USERS: LazyLock<[Address; 10]> =
    LazyLock::new(|| std::array::from_fn(|i| TEST_KEYS[i].address()));

fn test_key(byte: u8) -> PrivateKey {
    PrivateKey::from_bytes(&B256::repeat_byte(byte)).unwrap()
}

/// A wallet over the `i`th test key.
pub fn test_wallet(i: usize, chain_id: u64) -> Wallet {
    assert!(i < 10, "only ten test keys");
    Wallet::new(test_key(i as u8 + 1), chain_id)
}

/// A wallet over [`VECTOR_KEY_HEX`].
pub fn vector_wallet(chain_id: u64) -> Wallet {
    Wallet::from_hex(VECTOR_KEY_HEX, chain_id).unwrap()
}
