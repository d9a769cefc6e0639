use crate::SigningError;
use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

const NO_PARTIAL_FILLS: usize = 255;
const ALLOW_MULTIPLE_FILLS: usize = 254;
const NEED_PRE_INTERACTION: usize = 252;
const NEED_POST_INTERACTION: usize = 251;
const NEED_EPOCH_CHECK: usize = 250;
const HAS_EXTENSION: usize = 249;
const USE_PERMIT2: usize = 248;
const UNWRAP_WETH: usize = 247;

const ALLOWED_SENDER_BITS: usize = 80;
const EXPIRY_SHIFT: usize = 80;
const NONCE_SHIFT: usize = 120;
const SERIES_SHIFT: usize = 160;
/// Expiry, nonce and series are 40-bit lanes.
const LANE_MAX: u64 = (1 << 40) - 1;

/// Packed per-order flags and limits for router v6 limit orders.
///
/// Multiple fills are always allowed.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MakerTraits {
    allowed_sender: Address,
    expiry: u64,
    nonce: u64,
    series: u64,
    no_partial_fills: bool,
    need_pre_interaction: bool,
    need_post_interaction: bool,
    need_epoch_check: bool,
    has_extension: bool,
    use_permit2: bool,
    unwrap_weth: bool,
}

impl MakerTraits {
    /// Traits with no restrictions.
    pub const fn new() -> Self {
        Self {
            allowed_sender: Address::ZERO,
            expiry: 0,
            nonce: 0,
            series: 0,
            no_partial_fills: false,
            need_pre_interaction: false,
            need_post_interaction: false,
            need_epoch_check: false,
            has_extension: false,
            use_permit2: false,
            unwrap_weth: false,
        }
    }

    /// Only this taker may fill. Only the low 80 bits of the address are kept.
    pub const fn with_allowed_sender(self, allowed_sender: Address) -> Self {
        Self { allowed_sender, ..self }
    }

    /// UNIX timestamp after which the order cannot be filled. Zero means never.
    pub const fn with_expiry(self, expiry: u64) -> Self {
        Self { expiry, ..self }
    }

    /// Nonce or epoch.
    pub const fn with_nonce(self, nonce: u64) -> Self {
        Self { nonce, ..self }
    }

    /// Series for epoch checks.
    pub const fn with_series(self, series: u64) -> Self {
        Self { series, ..self }
    }

    /// Disallow partial fills.
    pub const fn with_no_partial_fills(self) -> Self {
        Self { no_partial_fills: true, ..self }
    }

    /// Require the pre-interaction to run.
    pub const fn with_pre_interaction(self) -> Self {
        Self { need_pre_interaction: true, ..self }
    }

    /// Require the post-interaction to run.
    pub const fn with_post_interaction(self) -> Self {
        Self { need_post_interaction: true, ..self }
    }

    /// Check the maker's epoch for `series` against `nonce`.
    pub const fn with_epoch_check(self) -> Self {
        Self { need_epoch_check: true, ..self }
    }

    /// Mark the order as carrying an extension.
    pub const fn with_extension(self) -> Self {
        Self { has_extension: true, ..self }
    }

    /// Move the maker asset through Permit2.
    pub const fn with_permit2(self) -> Self {
        Self { use_permit2: true, ..self }
    }

    /// Unwrap WETH before sending to the maker.
    pub const fn with_unwrap_weth(self) -> Self {
        Self { unwrap_weth: true, ..self }
    }

    /// True if the extension flag is set.
    pub const fn has_extension(&self) -> bool {
        self.has_extension
    }

    /// Pack into the on-chain `uint256` representation.
    pub fn encode(&self) -> Result<U256, SigningError> {
        let lanes = [("expiry", self.expiry), ("nonce", self.nonce), ("series", self.series)];
        for (name, lane) in lanes {
            if lane > LANE_MAX {
                return Err(SigningError::InvalidOrder(format!("{name} {lane} exceeds 40 bits")));
            }
        }

        let mut traits = U256::from_be_slice(&self.allowed_sender[20 - ALLOWED_SENDER_BITS / 8..]);
        traits |= U256::from(self.expiry) << EXPIRY_SHIFT;
        traits |= U256::from(self.nonce) << NONCE_SHIFT;
        traits |= U256::from(self.series) << SERIES_SHIFT;

        for (bit, set) in [
            (NO_PARTIAL_FILLS, self.no_partial_fills),
            (ALLOW_MULTIPLE_FILLS, true),
            (NEED_PRE_INTERACTION, self.need_pre_interaction),
            (NEED_POST_INTERACTION, self.need_post_interaction),
            (NEED_EPOCH_CHECK, self.need_epoch_check),
            (HAS_EXTENSION, self.has_extension),
            (USE_PERMIT2, self.use_permit2),
            (UNWRAP_WETH, self.unwrap_weth),
        ] {
            if set {
                traits.set_bit(bit, true);
            }
        }
        Ok(traits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    #[test]
    fn default_allows_multiple_fills_only() {
        let traits = MakerTraits::new().encode().unwrap();
        assert_eq!(traits, U256::from(1u8) << 254);
    }

    #[test]
    fn packs_lanes_and_flags() {
        let sender = address!("0x00000000000000000000ffffffffffffffffffff");
        let traits = MakerTraits::new()
            .with_allowed_sender(sender)
            .with_expiry(0x01)
            .with_nonce(0x02)
            .with_series(0x03)
            .with_no_partial_fills()
            .with_extension()
            .encode()
            .unwrap();

        let low_80 = (U256::from(1u8) << 80) - U256::from(1u8);
        assert_eq!(traits & low_80, low_80);
        assert_eq!((traits >> 80) & U256::from(LANE_MAX), U256::from(1u8));
        assert_eq!((traits >> 120) & U256::from(LANE_MAX), U256::from(2u8));
        assert_eq!((traits >> 160) & U256::from(LANE_MAX), U256::from(3u8));
        assert!(traits.bit(255));
        assert!(traits.bit(254));
        assert!(traits.bit(249));
        assert!(!traits.bit(248));
    }

    #[test]
    fn lane_overflow() {
        let err = MakerTraits::new().with_expiry(1 << 40).encode().unwrap_err();
        assert_eq!(err.code(), "invalid_order");
    }
}
