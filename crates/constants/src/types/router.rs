use crate::{ChainError, KnownChains};
use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Aggregation router release.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RouterVersion {
    /// Router v5, limit orders carry interactions inline.
    #[default]
    V5,
    /// Router v6, limit orders carry packed maker traits and an extension.
    V6,
}

/// An aggregation router deployment and the EIP-712 domain it signs under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterConstants {
    address: Address,
    name: Cow<'static, str>,
    version: Cow<'static, str>,
    release: RouterVersion,
}

impl RouterConstants {
    /// Create a new set of router constants.
    pub const fn new(
        address: Address,
        name: Cow<'static, str>,
        version: Cow<'static, str>,
        release: RouterVersion,
    ) -> Self {
        Self { address, name, version, release }
    }

    /// Look up the router deployment for a chain ID.
    pub fn for_chain(chain_id: u64, release: RouterVersion) -> Result<Self, ChainError> {
        KnownChains::try_from(chain_id).map(|chain| chain.router(release))
    }

    /// Router contract address. This is the EIP-712 verifying contract.
    pub const fn address(&self) -> Address {
        self.address
    }

    /// EIP-712 domain name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// EIP-712 domain version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Router release.
    pub const fn release(&self) -> RouterVersion {
        self.release
    }
}
