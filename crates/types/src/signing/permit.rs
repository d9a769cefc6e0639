use crate::{
    eip712::{signing_digest, TypedDataDomain, TypedMessage, PERMIT},
    pad_left, u256_to_padded_hex,
    signing::{PrivateKey, Signature65},
    SigningError,
};
use alloy::primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of a permit payload: `0x`, four 64-nibble words, then the
/// 192-nibble `v‖r‖s` signature.
pub const PERMIT_PAYLOAD_LEN: usize = 2 + 7 * 64;

/// An ERC-20 (EIP-2612) permit message.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermitMessage {
    /// Token holder granting the allowance.
    pub owner: Address,
    /// Address allowed to spend.
    pub spender: Address,
    /// Allowance granted.
    pub value: U256,
    /// The token's current `nonces(owner)`.
    pub nonce: U256,
    /// UNIX timestamp, in seconds, after which the permit is void.
    pub deadline: U256,
}

impl PermitMessage {
    /// Create a new permit message.
    pub const fn new(
        owner: Address,
        spender: Address,
        value: U256,
        nonce: U256,
        deadline: U256,
    ) -> Self {
        Self { owner, spender, value, nonce, deadline }
    }

    /// The message as values of the `Permit` schema.
    pub fn to_typed_message(&self) -> TypedMessage {
        TypedMessage::new()
            .with("owner", self.owner)
            .with("spender", self.spender)
            .with("value", self.value)
            .with("nonce", self.nonce)
            .with("deadline", self.deadline)
    }

    /// The EIP-712 digest of this permit under `domain`.
    pub fn signing_hash(&self, domain: &TypedDataDomain) -> Result<B256, SigningError> {
        signing_digest(domain, &PERMIT, &self.to_typed_message())
    }

    /// Sign the permit.
    pub fn sign(
        &self,
        domain: &TypedDataDomain,
        key: &PrivateKey,
    ) -> Result<Signature65, SigningError> {
        key.sign_digest(&self.signing_hash(domain)?)
    }

    /// Assemble the router calldata blob for this permit and its signature.
    pub fn payload(&self, signature: &Signature65) -> Result<PermitPayload, SigningError> {
        assemble_permit_payload(self.owner, self.spender, self.value, self.deadline, signature)
    }
}

/// A permit calldata blob:
/// `0x ‖ pad64(owner) ‖ pad64(spender) ‖ pad64(value) ‖ pad64(deadline) ‖ pad64(v) ‖ r ‖ s`.
///
/// Always exactly [`PERMIT_PAYLOAD_LEN`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermitPayload(String);

impl PermitPayload {
    /// The payload as a `0x`-prefixed hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the payload, returning the string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for PermitPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PermitPayload {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Assemble a permit calldata blob. The signature is reordered from
/// `r‖s‖v` to `pad64(v)‖r‖s`.
pub fn assemble_permit_payload(
    owner: Address,
    spender: Address,
    value: U256,
    deadline: U256,
    signature: &Signature65,
) -> Result<PermitPayload, SigningError> {
    let mut out = String::with_capacity(PERMIT_PAYLOAD_LEN);
    out.push_str("0x");
    out.push_str(&pad_left(&hex::encode(owner), 64));
    out.push_str(&pad_left(&hex::encode(spender), 64));
    out.push_str(&u256_to_padded_hex(value));
    out.push_str(&u256_to_padded_hex(deadline));
    out.push_str(&signature.to_vrs_hex());

    if out.len() != PERMIT_PAYLOAD_LEN {
        return Err(SigningError::PermitPayloadLength {
            expected: PERMIT_PAYLOAD_LEN,
            actual: out.len(),
        });
    }
    Ok(PermitPayload(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;
    use proptest::prelude::*;

    const ROUTER: Address = address!("0x1111111254eeb25477b68fb85ed929f73a960582");

    #[test]
    fn frax_permit_signature() {
        let frax = address!("0x45c32fA6DF82ead1e2EF74d17b76547EDdFaFF89");
        let owner = address!("0x2a250893f86Dc8497E131508f680338ac647B498");
        let key = PrivateKey::from_hex(
            "ad21c0552a3b52e94520da713455cc347e4e89628a334be24d85b8083848434f",
        )
        .unwrap();

        let domain = TypedDataDomain::permit("Frax", 137, frax);
        let permit =
            PermitMessage::new(owner, ROUTER, U256::MAX, U256::ZERO, U256::from(1704250835u64));
        let sig = permit.sign(&domain, &key).unwrap();

        assert_eq!(
            sig.to_string(),
            "0x0d95c0246c1356df4653606e586e97447a516c937b5dd758fa0e56f2f8dd1f95\
             2b222c24a337e89dfbe20a8e112a7c6d004a3170598b9d4941aa38126920c9ed1b"
        );
        let digest = permit.signing_hash(&domain).unwrap();
        assert_eq!(sig.recover_address(&digest).unwrap(), key.address());
    }

    #[test]
    fn payload_assembly() {
        let owner = address!("0x50c5df26654b5efbdd0c54a062dfa6012933defe");
        let sig: Signature65 = "c8dcab9ab2ce2055e61c0718117f8d77a56cd0a8b8370d8f5e16932a60d21a3e\
                                0eb0214dcbe4e7c5131cc45fd552e12f5bcef3b9c7fcb47ace9d4f694a496d471b"
            .parse()
            .unwrap();

        let payload =
            assemble_permit_payload(owner, ROUTER, U256::MAX, U256::from(0x6594cdd3u64), &sig)
                .unwrap();

        let expected = "0x\
            00000000000000000000000050c5df26654b5efbdd0c54a062dfa6012933defe\
            0000000000000000000000001111111254eeb25477b68fb85ed929f73a960582\
            ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff\
            000000000000000000000000000000000000000000000000000000006594cdd3\
            000000000000000000000000000000000000000000000000000000000000001b\
            c8dcab9ab2ce2055e61c0718117f8d77a56cd0a8b8370d8f5e16932a60d21a3e\
            0eb0214dcbe4e7c5131cc45fd552e12f5bcef3b9c7fcb47ace9d4f694a496d47";
        assert_eq!(payload.as_str(), expected);
        assert_eq!(payload.as_str().len(), 450);
    }

    proptest! {
        #[test]
        fn payload_has_fixed_length(
            owner in any::<[u8; 20]>(),
            spender in any::<[u8; 20]>(),
            value in any::<[u8; 32]>(),
            deadline in any::<u64>(),
            r in any::<[u8; 32]>(),
            s in any::<[u8; 32]>(),
            odd in any::<bool>(),
        ) {
            let sig = Signature65::from_parity(r.into(), s.into(), odd);
            let payload = assemble_permit_payload(
                owner.into(),
                spender.into(),
                U256::from_be_bytes(value),
                U256::from(deadline),
                &sig,
            )
            .unwrap();
            prop_assert_eq!(payload.as_str().len(), PERMIT_PAYLOAD_LEN);
            prop_assert_eq!(PERMIT_PAYLOAD_LEN, 450);
            prop_assert!(payload.as_str().starts_with("0x"));
        }
    }
}
