//! EIP-712 typed-data hashing.
//!
//! The hasher is driven by [`TypeSchema`] values rather than generated
//! structs: a schema lists a type name and its fields in declaration order,
//! and a [`TypedMessage`] supplies the values. Values given as text are
//! coerced to the declared field type while encoding.

mod domain;
pub use domain::{TypedDataDomain, DEFAULT_PERMIT_VERSION};

mod schema;
pub use schema::{TypeSchema, TypedField, EIP712_DOMAIN, ORDER_V5, ORDER_V6, PERMIT};

mod value;
pub use value::{FieldValue, TypedMessage};

use crate::SigningError;
use alloy::primitives::{keccak256, B256};

/// `keccak256(0x19 ‖ 0x01 ‖ domainSeparator ‖ structHash)`.
pub fn digest_from_parts(domain_separator: B256, struct_hash: B256) -> B256 {
    let mut buf = [0u8; 66];
    buf[0] = 0x19;
    buf[1] = 0x01;
    buf[2..34].copy_from_slice(domain_separator.as_slice());
    buf[34..].copy_from_slice(struct_hash.as_slice());
    keccak256(buf)
}

/// The 32-byte digest to sign for `message` of type `schema` under `domain`.
pub fn signing_digest(
    domain: &TypedDataDomain,
    schema: &TypeSchema,
    message: &TypedMessage,
) -> Result<B256, SigningError> {
    Ok(digest_from_parts(domain.separator(), schema.hash_struct(message)?))
}
