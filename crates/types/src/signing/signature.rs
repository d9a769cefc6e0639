use crate::{hex_decode, hex_encode, u256_to_padded_hex, SigningError};
use alloy::primitives::{b256, Address, Signature, B256, U256};
use std::{fmt, str::FromStr};

/// `floor(n / 2)` for the secp256k1 group order `n`.
const SECP256K1N_HALF: B256 =
    b256!("0x7fffffffffffffffffffffffffffffff5d576e7357a4501ddfe92f46681b20a0");

/// A 65-byte `r‖s‖v` ECDSA signature with `v` in `{27, 28}`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Signature65 {
    r: B256,
    s: B256,
    v: u8,
}

impl Signature65 {
    /// Create a signature from its parts. `v` must be 27 or 28.
    pub fn new(r: B256, s: B256, v: u8) -> Result<Self, SigningError> {
        match v {
            27 | 28 => Ok(Self { r, s, v }),
            v => Err(SigningError::InvalidSignature(format!("invalid v {v}"))),
        }
    }

    /// Create a signature from `r`, `s` and the recovery parity, setting
    /// `v = 27 + parity`.
    pub const fn from_parity(r: B256, s: B256, y_odd: bool) -> Self {
        Self { r, s, v: 27 + y_odd as u8 }
    }

    /// Parse 65 `r‖s‖v` bytes. A `v` of 0 or 1 is moved to 27 or 28.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, SigningError> {
        if bytes.len() != 65 {
            return Err(SigningError::InvalidSignature(format!(
                "expected 65 bytes, got {}",
                bytes.len()
            )));
        }
        let v = match bytes[64] {
            v @ (0 | 1) => v + 27,
            v => v,
        };
        Self::new(B256::from_slice(&bytes[..32]), B256::from_slice(&bytes[32..64]), v)
    }

    /// The `r` component.
    pub const fn r(&self) -> B256 {
        self.r
    }

    /// The `s` component.
    pub const fn s(&self) -> B256 {
        self.s
    }

    /// The `v` component, 27 or 28.
    pub const fn v(&self) -> u8 {
        self.v
    }

    /// The recovery parity, `v - 27`.
    pub const fn y_parity(&self) -> bool {
        self.v == 28
    }

    /// True if `s <= n/2`.
    pub fn is_low_s(&self) -> bool {
        self.s <= SECP256K1N_HALF
    }

    /// `r‖s‖v`.
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[..32].copy_from_slice(self.r.as_slice());
        out[32..64].copy_from_slice(self.s.as_slice());
        out[64] = self.v;
        out
    }

    /// `pad64(v)‖r‖s` as 192 unprefixed hex characters, the layout appended
    /// to permit payloads.
    pub fn to_vrs_hex(&self) -> String {
        let mut out = u256_to_padded_hex(U256::from(self.v));
        out.push_str(&hex::encode(self.r));
        out.push_str(&hex::encode(self.s));
        out
    }

    /// The EIP-2098 compact form `r‖yParityAndS`.
    pub fn to_compact(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out[..32].copy_from_slice(self.r.as_slice());
        out[32..].copy_from_slice(self.s.as_slice());
        if self.y_parity() {
            out[32] |= 0x80;
        }
        out
    }

    /// Convert to alloy's signature type.
    pub fn to_alloy(&self) -> Signature {
        let r = U256::from_be_bytes(self.r.0);
        let s = U256::from_be_bytes(self.s.0);
        Signature::new(r, s, self.y_parity())
    }

    /// Recover the signer's address from the digest that was signed.
    pub fn recover_address(&self, digest: &B256) -> Result<Address, SigningError> {
        self.to_alloy()
            .recover_address_from_prehash(digest)
            .map_err(|e| SigningError::InvalidSignature(e.to_string()))
    }
}

impl fmt::Display for Signature65 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex_encode(self.to_bytes()))
    }
}

impl FromStr for Signature65 {
    type Err = SigningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_slice(&hex_decode(s)?)
    }
}

impl From<Signature65> for Signature {
    fn from(sig: Signature65) -> Self {
        sig.to_alloy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIG: &str = "c8dcab9ab2ce2055e61c0718117f8d77a56cd0a8b8370d8f5e16932a60d21a3e\
                       0eb0214dcbe4e7c5131cc45fd552e12f5bcef3b9c7fcb47ace9d4f694a496d471b";

    #[test]
    fn parse_and_display() {
        let sig: Signature65 = SIG.parse().unwrap();
        assert_eq!(sig.v(), 27);
        assert!(!sig.y_parity());
        assert_eq!(sig.to_string(), format!("0x{SIG}"));
        assert_eq!(format!("0x{SIG}").parse::<Signature65>().unwrap(), sig);
    }

    #[test]
    fn raw_parity_is_moved_to_27() {
        let mut bytes = hex_decode(SIG).unwrap();
        bytes[64] = 1;
        assert_eq!(Signature65::from_slice(&bytes).unwrap().v(), 28);
        bytes[64] = 2;
        assert_eq!(Signature65::from_slice(&bytes).unwrap_err().code(), "invalid_signature");
        assert!(Signature65::from_slice(&bytes[..64]).is_err());
    }

    #[test]
    fn vrs_layout() {
        let sig: Signature65 = SIG.parse().unwrap();
        assert_eq!(sig.to_vrs_hex(), crate::convert_sig_rs_to_vrs(SIG).unwrap());
    }

    #[test]
    fn compact_form() {
        let sig: Signature65 = SIG.parse().unwrap();
        let compact = sig.to_compact();
        assert_eq!(&compact[..32], sig.r().as_slice());
        assert_eq!(&compact[32..], sig.s().as_slice());

        let odd = Signature65::new(sig.r(), sig.s(), 28).unwrap();
        assert_eq!(odd.to_compact()[32] & 0x80, 0x80);
    }

    #[test]
    fn out_of_range_v_is_rejected() {
        let sig: Signature65 = SIG.parse().unwrap();
        for v in [0, 1, 26, 29, 35] {
            let err = Signature65::new(sig.r(), sig.s(), v).unwrap_err();
            assert_eq!(err.code(), "invalid_signature");
        }
        assert_eq!(Signature65::new(sig.r(), sig.s(), 27).unwrap(), sig);
    }
}
