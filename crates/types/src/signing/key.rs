use crate::{signing::Signature65, SigningError};
use alloy::{
    primitives::{keccak256, Address, B256},
    signers::k256::ecdsa::{RecoveryId, SigningKey},
};
use std::fmt;
use zeroize::Zeroizing;

/// Length of a private key in hex characters.
const KEY_HEX_LEN: usize = 64;

/// A secp256k1 private key.
///
/// The scalar is checked to be in `[1, n)` on construction and is zeroed
/// when the key is dropped. `Debug` prints the derived address only.
pub struct PrivateKey {
    inner: SigningKey,
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey").field("address", &self.address()).finish_non_exhaustive()
    }
}

impl PrivateKey {
    /// Parse a key from exactly 64 hex characters, without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, SigningError> {
        if s.starts_with("0x") || s.starts_with("0X") {
            return Err(SigningError::InvalidKey("expected unprefixed hex"));
        }
        if s.len() != KEY_HEX_LEN {
            return Err(SigningError::InvalidKey("expected 64 hex characters"));
        }

        let mut bytes = Zeroizing::new([0u8; 32]);
        hex::decode_to_slice(s, bytes.as_mut_slice())
            .map_err(|_| SigningError::InvalidKey("non-hex characters"))?;
        Self::from_slice(bytes.as_slice())
    }

    /// Create a key from its 32-byte big-endian scalar.
    pub fn from_bytes(bytes: &B256) -> Result<Self, SigningError> {
        Self::from_slice(bytes.as_slice())
    }

    fn from_slice(bytes: &[u8]) -> Result<Self, SigningError> {
        SigningKey::from_slice(bytes)
            .map(|inner| Self { inner })
            .map_err(|_| SigningError::InvalidKey("scalar is zero or not below the curve order"))
    }

    /// The Ethereum address: the last 20 bytes of the keccak256 of the
    /// uncompressed public key without its `0x04` tag.
    pub fn address(&self) -> Address {
        let point = self.inner.verifying_key().to_encoded_point(false);
        let hash = keccak256(&point.as_bytes()[1..]);
        Address::from_slice(&hash[12..])
    }

    /// Sign a 32-byte digest.
    ///
    /// Nonces are RFC-6979 deterministic and `s` is normalized to the lower
    /// half of the curve order, so the result depends only on the digest and
    /// the key. The returned `v` is 27 or 28.
    pub fn sign_digest(&self, digest: &B256) -> Result<Signature65, SigningError> {
        let (sig, recid) = self
            .inner
            .sign_prehash_recoverable(digest.as_slice())
            .map_err(|e| SigningError::Signer(Box::new(e)))?;

        let (sig, recid) = match sig.normalize_s() {
            Some(normalized) => {
                (normalized, RecoveryId::new(!recid.is_y_odd(), recid.is_x_reduced()))
            }
            None => (sig, recid),
        };

        let (r, s) = sig.split_bytes();
        Ok(Signature65::from_parity(
            B256::from_slice(r.as_slice()),
            B256::from_slice(s.as_slice()),
            recid.is_y_odd(),
        ))
    }
}

/// Sign `digest` with `key`. See [`PrivateKey::sign_digest`].
pub fn sign(digest: &B256, key: &PrivateKey) -> Result<Signature65, SigningError> {
    key.sign_digest(digest)
}

/// Derive the address controlled by `key`.
pub fn address_of_private(key: &PrivateKey) -> Address {
    key.address()
}
