use crate::{ids, ChainError, RouterConstants, RouterVersion};
use std::{fmt, str::FromStr};

/// The list of known chains as a string.
const KNOWN_CHAINS: &str = "ethereum, optimism, bsc, gnosis, polygon, fantom, zksync, klaytn, \
                            base, arbitrum, avalanche, aurora";

/// Error type for parsing struct from a chain name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseChainError {
    /// The chain name is not supported.
    #[error("chain name {0} is not parseable. supported chains: {KNOWN_CHAINS}")]
    ChainNotSupported(String),
}

/// Chains supported by the aggregation service.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum KnownChains {
    /// Ethereum mainnet.
    Ethereum,
    /// OP Mainnet.
    Optimism,
    /// BNB Smart Chain.
    Bsc,
    /// Gnosis chain.
    Gnosis,
    /// Polygon PoS.
    Polygon,
    /// Fantom Opera.
    Fantom,
    /// zkSync Era.
    ZkSyncEra,
    /// Klaytn.
    Klaytn,
    /// Base.
    Base,
    /// Arbitrum One.
    Arbitrum,
    /// Avalanche C-Chain.
    Avalanche,
    /// Aurora.
    Aurora,
}

impl KnownChains {
    /// Every known chain.
    pub const ALL: [Self; 12] = [
        Self::Ethereum,
        Self::Optimism,
        Self::Bsc,
        Self::Gnosis,
        Self::Polygon,
        Self::Fantom,
        Self::ZkSyncEra,
        Self::Klaytn,
        Self::Base,
        Self::Arbitrum,
        Self::Avalanche,
        Self::Aurora,
    ];

    /// The EIP-155 chain ID.
    pub const fn chain_id(self) -> u64 {
        match self {
            Self::Ethereum => ids::ETHEREUM,
            Self::Optimism => ids::OPTIMISM,
            Self::Bsc => ids::BSC,
            Self::Gnosis => ids::GNOSIS,
            Self::Polygon => ids::POLYGON,
            Self::Fantom => ids::FANTOM,
            Self::ZkSyncEra => ids::ZKSYNC_ERA,
            Self::Klaytn => ids::KLAYTN,
            Self::Base => ids::BASE,
            Self::Arbitrum => ids::ARBITRUM,
            Self::Avalanche => ids::AVALANCHE,
            Self::Aurora => ids::AURORA,
        }
    }

    /// Look up a chain by its EIP-155 chain ID.
    pub const fn from_chain_id(chain_id: u64) -> Option<Self> {
        let mut i = 0;
        while i < Self::ALL.len() {
            if Self::ALL[i].chain_id() == chain_id {
                return Some(Self::ALL[i]);
            }
            i += 1;
        }
        None
    }

    /// The lowercase name used when parsing.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ethereum => "ethereum",
            Self::Optimism => "optimism",
            Self::Bsc => "bsc",
            Self::Gnosis => "gnosis",
            Self::Polygon => "polygon",
            Self::Fantom => "fantom",
            Self::ZkSyncEra => "zksync",
            Self::Klaytn => "klaytn",
            Self::Base => "base",
            Self::Arbitrum => "arbitrum",
            Self::Avalanche => "avalanche",
            Self::Aurora => "aurora",
        }
    }

    /// The aggregation router deployment of the given release on this chain.
    pub const fn router(self, version: RouterVersion) -> RouterConstants {
        use crate::routers;
        match (self, version) {
            (Self::ZkSyncEra, RouterVersion::V5) => routers::V5_ZKSYNC,
            (Self::ZkSyncEra, RouterVersion::V6) => routers::V6_ZKSYNC,
            (_, RouterVersion::V5) => routers::V5,
            (_, RouterVersion::V6) => routers::V6,
        }
    }
}

impl fmt::Display for KnownChains {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KnownChains {
    type Err = ParseChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        match s.as_str() {
            "ethereum" | "mainnet" => Ok(Self::Ethereum),
            "optimism" => Ok(Self::Optimism),
            "bsc" | "bnb" => Ok(Self::Bsc),
            "gnosis" | "xdai" => Ok(Self::Gnosis),
            "polygon" | "matic" => Ok(Self::Polygon),
            "fantom" => Ok(Self::Fantom),
            "zksync" | "zksync-era" => Ok(Self::ZkSyncEra),
            "klaytn" => Ok(Self::Klaytn),
            "base" => Ok(Self::Base),
            "arbitrum" => Ok(Self::Arbitrum),
            "avalanche" => Ok(Self::Avalanche),
            "aurora" => Ok(Self::Aurora),
            _ => Err(ParseChainError::ChainNotSupported(s)),
        }
    }
}

impl TryFrom<u64> for KnownChains {
    type Error = ChainError;

    fn try_from(chain_id: u64) -> Result<Self, Self::Error> {
        Self::from_chain_id(chain_id).ok_or(ChainError::Unsupported(chain_id))
    }
}
