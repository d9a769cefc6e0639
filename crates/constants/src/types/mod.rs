mod chains;
pub use chains::{KnownChains, ParseChainError};

mod error;
pub use error::ChainError;

mod fees;
pub use fees::{FeeMode, FeeModeConfig, DEFAULT_LEGACY_CHAINS};

mod router;
pub use router::{RouterConstants, RouterVersion};
