use crate::ids;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Chains that only accept legacy (`gasPrice`) transactions by default.
pub const DEFAULT_LEGACY_CHAINS: &[u64] = &[ids::BSC, ids::AURORA, ids::ZKSYNC_ERA, ids::FANTOM];

/// Fee model of a transaction.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeeMode {
    /// EIP-1559 dynamic fee transaction.
    #[default]
    Eip1559,
    /// Legacy transaction with a single gas price, signed per EIP-155.
    Legacy,
}

/// Mapping from chain ID to [`FeeMode`].
///
/// Chains in the legacy set use [`FeeMode::Legacy`], every other chain uses
/// [`FeeMode::Eip1559`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeModeConfig {
    legacy_chains: Cow<'static, [u64]>,
}

impl Default for FeeModeConfig {
    fn default() -> Self {
        Self::new(Cow::Borrowed(DEFAULT_LEGACY_CHAINS))
    }
}

impl FeeModeConfig {
    /// Create a new fee-mode mapping from a legacy chain set.
    pub const fn new(legacy_chains: Cow<'static, [u64]>) -> Self {
        Self { legacy_chains }
    }

    /// Add a chain to the legacy set.
    pub fn with_legacy_chain(self, chain_id: u64) -> Self {
        if self.is_legacy(chain_id) {
            return self;
        }
        let mut legacy_chains = self.legacy_chains.into_owned();
        legacy_chains.push(chain_id);
        Self { legacy_chains: Cow::Owned(legacy_chains) }
    }

    /// Get the legacy chain set.
    pub fn legacy_chains(&self) -> &[u64] {
        &self.legacy_chains
    }

    /// True if the chain uses legacy transactions.
    pub fn is_legacy(&self, chain_id: u64) -> bool {
        self.legacy_chains.contains(&chain_id)
    }

    /// The fee mode to use on a chain.
    pub fn fee_mode(&self, chain_id: u64) -> FeeMode {
        if self.is_legacy(chain_id) {
            FeeMode::Legacy
        } else {
            FeeMode::Eip1559
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_legacy_set() {
        let config = FeeModeConfig::default();
        for chain_id in [56, 1313161554, 324, 250] {
            assert_eq!(config.fee_mode(chain_id), FeeMode::Legacy);
        }
        assert_eq!(config.fee_mode(1), FeeMode::Eip1559);
        assert_eq!(config.fee_mode(137), FeeMode::Eip1559);
        // unknown chains
        assert_eq!(config.fee_mode(999_999), FeeMode::Eip1559);
    }

    #[test]
    fn extend_legacy_set() {
        let config = FeeModeConfig::default().with_legacy_chain(137).with_legacy_chain(137);
        assert_eq!(config.fee_mode(137), FeeMode::Legacy);
        assert_eq!(config.legacy_chains().len(), DEFAULT_LEGACY_CHAINS.len() + 1);
    }

    #[test]
    fn deserialize_from_config_data() {
        let config: FeeModeConfig = serde_json::from_str(r#"{"legacyChains":[10]}"#).unwrap();
        assert_eq!(config.fee_mode(10), FeeMode::Legacy);
        assert_eq!(config.fee_mode(56), FeeMode::Eip1559);
    }
}
