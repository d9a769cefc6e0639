use alloy::primitives::{Bytes, U256};
use serde::{Deserialize, Serialize};

/// The eight optional interaction fields of a limit order.
///
/// Router v5 signs their concatenation as `interactions` together with the
/// packed `offsets`. Router v6 moves both into the order extension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interactions {
    /// Appended to the maker asset transfer call.
    pub maker_asset_suffix: Bytes,
    /// Appended to the taker asset transfer call.
    pub taker_asset_suffix: Bytes,
    /// Custom making amount getter.
    pub making_amount_getter: Bytes,
    /// Custom taking amount getter.
    pub taking_amount_getter: Bytes,
    /// Fill predicate.
    pub predicate: Bytes,
    /// Maker permit, prefixed with the maker asset address.
    pub permit: Bytes,
    /// Called before the maker asset transfer.
    pub pre_interaction: Bytes,
    /// Called after the taker asset transfer.
    pub post_interaction: Bytes,
}

impl Interactions {
    fn parts(&self) -> [&Bytes; 8] {
        [
            &self.maker_asset_suffix,
            &self.taker_asset_suffix,
            &self.making_amount_getter,
            &self.taking_amount_getter,
            &self.predicate,
            &self.permit,
            &self.pre_interaction,
            &self.post_interaction,
        ]
    }

    /// True if every field is empty.
    pub fn is_empty(&self) -> bool {
        self.parts().iter().all(|p| p.is_empty())
    }

    /// Cumulative end offsets of each field, packed as 32-bit lanes with
    /// field `i` in bits `32 * i ..`.
    pub fn offsets(&self) -> U256 {
        let mut cumulative = 0u64;
        self.parts().iter().enumerate().fold(U256::ZERO, |acc, (i, part)| {
            cumulative += part.len() as u64;
            acc | (U256::from(cumulative) << (32 * i))
        })
    }

    /// The fields concatenated in order.
    pub fn concat(&self) -> Bytes {
        self.parts().iter().flat_map(|p| p.iter().copied()).collect::<Vec<u8>>().into()
    }

    /// `offsets ‖ concat`, or empty bytes when there are no interactions.
    pub fn extension(&self) -> Bytes {
        if self.is_empty() {
            return Bytes::new();
        }
        let mut ext = self.offsets().to_be_bytes::<32>().to_vec();
        ext.extend(self.parts().iter().flat_map(|p| p.iter().copied()));
        ext.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_interactions() {
        let interactions = Interactions::default();
        assert!(interactions.is_empty());
        assert_eq!(interactions.offsets(), U256::ZERO);
        assert!(interactions.concat().is_empty());
        assert!(interactions.extension().is_empty());
    }

    #[test]
    fn cumulative_offsets() {
        let interactions = Interactions {
            predicate: Bytes::from_static(&[1, 2, 3]),
            permit: Bytes::from_static(&[4, 5]),
            ..Default::default()
        };

        // fields 0..=3 end at 0, predicate ends at 3, every later field at 5
        let expected: U256 = (U256::from(3u8) << 128)
            | (U256::from(5u8) << 160)
            | (U256::from(5u8) << 192)
            | (U256::from(5u8) << 224);
        assert_eq!(interactions.offsets(), expected);
        assert_eq!(interactions.concat(), Bytes::from_static(&[1, 2, 3, 4, 5]));

        let ext = interactions.extension();
        assert_eq!(ext.len(), 32 + 5);
        assert_eq!(&ext[..32], &expected.to_be_bytes::<32>());
        assert_eq!(&ext[32..], &[1, 2, 3, 4, 5]);
    }
}
