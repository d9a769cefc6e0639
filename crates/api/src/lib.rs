//! Client for the 1inch aggregation and orderbook HTTPS API.
//!
//! [`AggregatorClient`] issues authenticated requests to the swap, approve,
//! gas-price, transaction-gateway and orderbook endpoints. Response bodies
//! that describe a failure are decoded into [`ApiError::Remote`], which
//! keeps the server's request ID.
//!
//! [`OrderSender`] composes and signs limit orders, then hands them to any
//! [`OrderSubmitter`], of which the client is one.

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

mod client;
pub use client::AggregatorClient;

mod config;
pub use config::{
    load_api_key, load_node_url, load_private_key, ClientConfig, ConfigError, API_KEY_ENV,
    NODE_URL_ENV, WALLET_KEY_ENV,
};

mod error;
pub use error::{ApiError, ErrorMeta, ErrorResponse};

mod normalize;
pub use normalize::{expand_scientific_notation, is_scientific_notation, query_pairs};

mod order_sender;
pub use order_sender::{OrderSender, OrderSenderError, OrderSource, OrderSubmitter};

/// Request and response bodies.
pub mod types;
