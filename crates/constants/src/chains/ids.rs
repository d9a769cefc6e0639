//! Chain identifiers.

/// Ethereum mainnet.
pub const ETHEREUM: u64 = 1;
/// OP Mainnet.
pub const OPTIMISM: u64 = 10;
/// BNB Smart Chain.
pub const BSC: u64 = 56;
/// Gnosis chain.
pub const GNOSIS: u64 = 100;
/// Polygon PoS.
pub const POLYGON: u64 = 137;
/// Fantom Opera.
pub const FANTOM: u64 = 250;
/// zkSync Era.
pub const ZKSYNC_ERA: u64 = 324;
/// Klaytn.
pub const KLAYTN: u64 = 8217;
/// Base.
pub const BASE: u64 = 8453;
/// Arbitrum One.
pub const ARBITRUM: u64 = 42161;
/// Avalanche C-Chain.
pub const AVALANCHE: u64 = 43114;
/// Aurora.
pub const AURORA: u64 = 1313161554;
