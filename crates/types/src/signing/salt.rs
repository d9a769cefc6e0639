use alloy::primitives::{keccak256, U256};
use chrono::Utc;

/// Mask of the low 160 bits of a salt.
pub const SALT_EXTENSION_MASK: U256 = U256::from_limbs([u64::MAX, u64::MAX, u32::MAX as u64, 0]);

/// A source of order salts.
///
/// The composer asks for one salt per order. Tests install a fixed source
/// to get reproducible order hashes.
pub trait SaltSource {
    /// Produce the next salt.
    fn salt(&self) -> U256;
}

/// The current UNIX time in milliseconds.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct TimestampSalt;

impl SaltSource for TimestampSalt {
    fn salt(&self) -> U256 {
        U256::from(Utc::now().timestamp_millis().max(0) as u64)
    }
}

/// The same salt every time.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct FixedSalt(pub U256);

impl SaltSource for FixedSalt {
    fn salt(&self) -> U256 {
        self.0
    }
}

impl<T: SaltSource + ?Sized> SaltSource for &T {
    fn salt(&self) -> U256 {
        (**self).salt()
    }
}

/// Bind a salt to an extension: the low 160 bits are replaced by the low
/// 160 bits of `keccak256(extension)`. An empty extension leaves the salt
/// unchanged.
pub fn salt_with_extension(base: U256, extension: &[u8]) -> U256 {
    if extension.is_empty() {
        return base;
    }
    let hash = U256::from_be_bytes(keccak256(extension).0);
    (base & !SALT_EXTENSION_MASK) | (hash & SALT_EXTENSION_MASK)
}

/// True if `salt` satisfies the extension rule for `extension`.
pub fn salt_matches_extension(salt: U256, extension: &[u8]) -> bool {
    extension.is_empty()
        || salt & SALT_EXTENSION_MASK
            == U256::from_be_bytes(keccak256(extension).0) & SALT_EXTENSION_MASK
}
