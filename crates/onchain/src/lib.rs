//! On-chain access for the 1inch SDK.
//!
//! [`OnchainReader`] wraps an alloy [`Provider`] with typed ERC-20 reads and
//! the chain parameters needed to fill a transaction. [`TxBuilder`] resolves
//! a transaction against the reader, [`Wallet`] signs it, and the reader
//! broadcasts it and polls for the receipt. Every call is raced against the
//! reader's [`IoGuard`].
//!
//! [`Provider`]: alloy::providers::Provider

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

mod broadcast;
pub use broadcast::RECEIPT_POLL_INTERVAL;

mod builder;
pub use builder::{SignedTx, TxBuilder, UnsignedTx};

mod error;
pub use error::OnchainError;

mod guard;
pub use guard::IoGuard;

mod permit;
pub use permit::{build_token_permit, should_use_permit, SignedPermit};

mod reader;
pub use reader::OnchainReader;

mod wallet;
pub use wallet::Wallet;
