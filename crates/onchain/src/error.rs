use alloy::{
    primitives::{Address, B256},
    transports::{RpcError, TransportErrorKind},
};
use oneinch_constants::ChainError;
use oneinch_types::{PrimitiveError, SigningError};
use std::time::Duration;

/// Errors returned by on-chain reads, transaction building and broadcast.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum OnchainError {
    /// The node answered with a JSON-RPC error object.
    #[error("rpc error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code.
        code: i64,
        /// JSON-RPC error message.
        message: String,
    },
    /// The node could not be reached, or its response could not be read.
    #[error("network error: {0}")]
    Network(#[source] Box<dyn core::error::Error + Send + Sync>),
    /// The call did not finish within the configured timeout.
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    /// The caller's cancellation token fired.
    #[error("cancelled")]
    Cancelled,
    /// The token has no `PERMIT_TYPEHASH`.
    #[error("token {0} does not support permit")]
    PermitUnsupported(Address),
    /// The chain has no known router deployment.
    #[error(transparent)]
    ChainUnsupported(#[from] ChainError),
    /// A transaction could not be built from the given fields.
    #[error("transaction build error: {0}")]
    TxBuild(String),
    /// A mined transaction has a failed status.
    #[error("transaction {0} reverted")]
    TxReverted(B256),
    /// Return data or input could not be decoded.
    #[error(transparent)]
    Primitive(#[from] PrimitiveError),
    /// Signing failed.
    #[error(transparent)]
    Signing(#[from] SigningError),
}

impl OnchainError {
    /// Machine-stable error code.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Rpc { .. } => "rpc",
            Self::Network(_) => "network",
            Self::Timeout(_) => "timeout",
            Self::Cancelled => "cancelled",
            Self::PermitUnsupported(_) => "permit_unsupported",
            Self::ChainUnsupported(_) => "chain_unsupported",
            Self::TxBuild(_) => "tx_build",
            Self::TxReverted(_) => "tx_reverted",
            Self::Primitive(e) => e.code(),
            Self::Signing(e) => e.code(),
        }
    }

    /// True for errors a caller may retry with backoff.
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout(_) | Self::Cancelled)
    }
}

impl From<RpcError<TransportErrorKind>> for OnchainError {
    fn from(err: RpcError<TransportErrorKind>) -> Self {
        match err {
            RpcError::ErrorResp(payload) => {
                Self::Rpc { code: payload.code, message: payload.message.into_owned() }
            }
            other => Self::Network(Box::new(other)),
        }
    }
}
