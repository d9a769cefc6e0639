/// Error type for chain lookups that require a known mapping.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainError {
    /// The chain ID has no mapping where one is required.
    #[error("chain {0} is not supported")]
    Unsupported(u64),
}

impl ChainError {
    /// Machine-stable error code.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Unsupported(_) => "chain_unsupported",
        }
    }
}
