//! Core types for the 1inch SDK: hex and ABI primitives, EIP-712 typed-data
//! hashing, secp256k1 signing, EIP-2612 permits and limit orders.
//!
//! Nothing in this crate performs I/O. Reading chain state and sending
//! transactions lives in `oneinch-onchain`, talking to the aggregator lives
//! in `oneinch-api`.

#![warn(
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    clippy::missing_const_for_fn,
    rustdoc::all
)]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![deny(unused_must_use, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub mod eip712;

mod primitives;
pub use primitives::{
    convert_sig_rs_to_vrs, convert_sig_vrs_to_rs, decode_single, encode_params, hex_decode,
    hex_encode, pack, pad_left, parse_address, parse_u256, selector, strip_prefix,
    u256_to_padded_hex, unpack, AbiType, AbiValue, Erc20Method, PrimitiveError,
};

mod signing;
pub use signing::{
    address_of_private, assemble_permit_payload, salt_matches_extension, salt_with_extension, sign,
    FixedSalt, Interactions, LimitOrderParams, LimitOrderPayload, MakerTraits, OrderComposer,
    OrderData, OrderRecord, PermitMessage, PermitPayload, PrivateKey, SaltSource, Signature65,
    SignedLimitOrder, SigningError, TimestampSalt, UnsignedLimitOrder, PERMIT_PAYLOAD_LEN,
    SALT_EXTENSION_MASK,
};
