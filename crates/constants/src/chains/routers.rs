//! Aggregation router deployments and their EIP-712 domain parameters.

use crate::{RouterConstants, RouterVersion};
use alloy::primitives::{address, Address};
use std::borrow::Cow;

/// EIP-712 domain name shared by every aggregation router release.
pub const ROUTER_DOMAIN_NAME: &str = "1inch Aggregation Router";

/// Aggregation router v5 address on every supported chain except zkSync Era.
pub const ROUTER_V5: Address = address!("0x1111111254eeb25477b68fb85ed929f73a960582");
/// Aggregation router v5 address on zkSync Era.
pub const ROUTER_V5_ZKSYNC: Address = address!("0x6e2B76966cbD9cF4cC2Fa0D76d24d5241E0ABC2F");
/// EIP-712 domain version of router v5.
pub const ROUTER_V5_VERSION: &str = "5";

/// Aggregation router v6 address on every supported chain except zkSync Era.
pub const ROUTER_V6: Address = address!("0x111111125421cA6dc452d289314280a0f8842A65");
/// Aggregation router v6 address on zkSync Era.
pub const ROUTER_V6_ZKSYNC: Address = address!("0x6fd4383cB451173D5f9304F041C7BCBf27d561fF");
/// EIP-712 domain version of router v6.
pub const ROUTER_V6_VERSION: &str = "6";

/// Router v5 constants for the common deployment.
pub const V5: RouterConstants = RouterConstants::new(
    ROUTER_V5,
    Cow::Borrowed(ROUTER_DOMAIN_NAME),
    Cow::Borrowed(ROUTER_V5_VERSION),
    RouterVersion::V5,
);

/// Router v5 constants for zkSync Era.
pub const V5_ZKSYNC: RouterConstants = RouterConstants::new(
    ROUTER_V5_ZKSYNC,
    Cow::Borrowed(ROUTER_DOMAIN_NAME),
    Cow::Borrowed(ROUTER_V5_VERSION),
    RouterVersion::V5,
);

/// Router v6 constants for the common deployment.
pub const V6: RouterConstants = RouterConstants::new(
    ROUTER_V6,
    Cow::Borrowed(ROUTER_DOMAIN_NAME),
    Cow::Borrowed(ROUTER_V6_VERSION),
    RouterVersion::V6,
);

/// Router v6 constants for zkSync Era.
pub const V6_ZKSYNC: RouterConstants = RouterConstants::new(
    ROUTER_V6_ZKSYNC,
    Cow::Borrowed(ROUTER_DOMAIN_NAME),
    Cow::Borrowed(ROUTER_V6_VERSION),
    RouterVersion::V6,
);
