use alloy::primitives::{Address, B256};
use oneinch_types::{PrivateKey, Signature65, SigningError};

/// A private key bound to the chain it signs for.
///
/// The wallet owns its key. The key is lent to signing operations by
/// reference and zeroed when the wallet is dropped.
#[derive(Debug)]
pub struct Wallet {
    key: PrivateKey,
    address: Address,
    chain_id: u64,
}

impl Wallet {
    /// Create a wallet from a key.
    pub fn new(key: PrivateKey, chain_id: u64) -> Self {
        let address = key.address();
        Self { key, address, chain_id }
    }

    /// Create a wallet from an unprefixed 64-character hex key.
    pub fn from_hex(key: &str, chain_id: u64) -> Result<Self, SigningError> {
        PrivateKey::from_hex(key).map(|key| Self::new(key, chain_id))
    }

    /// Get the address.
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Get the chain ID.
    pub const fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Borrow the key.
    pub const fn key(&self) -> &PrivateKey {
        &self.key
    }

    /// Sign a digest with the wallet's key.
    pub fn sign_digest(&self, digest: &B256) -> Result<Signature65, SigningError> {
        self.key.sign_digest(digest)
    }
}
