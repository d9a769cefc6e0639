//! Common utilities for testing 1inch SDK components.

pub mod orders;
pub mod rpc;
pub mod users;
