//! 1inch SDK constants.
//!
//! This crate contains the chain identifiers supported by the aggregation
//! service, the aggregation router deployments and their EIP-712 domain
//! parameters, and the per-chain fee-mode mapping used when building
//! transactions.
//!

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
#![cfg_attr(docsrs, feature(doc_cfg))]

mod chains;
pub use chains::{ids, routers};

mod types;
pub use types::{
    ChainError, FeeMode, FeeModeConfig, KnownChains, ParseChainError, RouterConstants,
    RouterVersion, DEFAULT_LEGACY_CHAINS,
};

use alloy::primitives::{b256, Address, B256};

/// Placeholder address for the native token of the current chain. By convention this is `0xee...`.
pub const NATIVE_TOKEN_ADDRESS: Address = Address::repeat_byte(0xee);

/// Base URL of the aggregation service HTTPS API.
pub const DEFAULT_API_URL: &str = "https://api.1inch.dev";

/// `keccak256("Permit(address owner,address spender,uint256 value,uint256 nonce,uint256 deadline)")`.
///
/// Tokens whose `PERMIT_TYPEHASH()` returns this value implement the
/// EIP-2612 permit flow.
pub const EIP2612_PERMIT_TYPEHASH: B256 =
    b256!("0x6e71edae12b1b97f4d1f60370fef10105fa2faae0126114a169c64845d6126c9");

/// Chains on which the permit flow is offered to swap callers.
pub const PERMIT_CHAINS: &[u64] = &[ids::ETHEREUM, ids::POLYGON];
