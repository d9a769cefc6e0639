use oneinch_constants::ChainError;
use oneinch_onchain::OnchainError;
use oneinch_types::{PrimitiveError, SigningError};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One entry of the `meta` list in an error body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorMeta {
    /// The offending value.
    pub value: String,
    /// What the value is, e.g. the parameter name.
    #[serde(rename = "type")]
    pub kind: String,
}

/// The error body returned by the aggregation API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ErrorResponse {
    /// Short error name, e.g. `Bad Request`.
    pub error: String,
    /// Human readable description.
    pub description: String,
    /// HTTP status the server reported.
    pub status_code: u16,
    /// Server-side request ID, quoted when contacting support.
    pub request_id: String,
    /// Additional details.
    pub meta: Vec<ErrorMeta>,
}

impl ErrorResponse {
    /// True if the body carries anything beyond defaults.
    pub fn is_populated(&self) -> bool {
        !self.error.is_empty() || !self.description.is_empty() || !self.request_id.is_empty()
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.status_code, self.error, self.description)?;
        if !self.request_id.is_empty() {
            write!(f, " (request {})", self.request_id)?;
        }
        Ok(())
    }
}

/// Errors returned by the [`AggregatorClient`].
///
/// [`AggregatorClient`]: crate::AggregatorClient
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ApiError {
    /// The API answered with an error body.
    #[error("api error: {0}")]
    Remote(ErrorResponse),
    /// The API answered with a failure status and a body that is not an
    /// error body.
    #[error("http {status}: {body}")]
    Http {
        /// Response status.
        status: StatusCode,
        /// Raw response body.
        body: String,
    },
    /// The request could not be completed.
    #[error("error contacting the aggregation API: {0}")]
    Network(#[source] reqwest::Error),
    /// A successful response could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
    /// An endpoint URL could not be built.
    #[error(transparent)]
    Url(#[from] url::ParseError),
    /// A request parameter was rejected before sending.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParam {
        /// Parameter name as sent on the wire.
        name: &'static str,
        /// Why it was rejected.
        reason: String,
    },
    /// A value in a response could not be parsed.
    #[error(transparent)]
    Primitive(#[from] PrimitiveError),
    /// Signing failed.
    #[error(transparent)]
    Signing(#[from] SigningError),
    /// An on-chain call failed.
    #[error(transparent)]
    Onchain(#[from] OnchainError),
    /// The chain has no router deployment.
    #[error(transparent)]
    Chain(#[from] ChainError),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err)
    }
}

impl ApiError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParam { name, reason: reason.into() }
    }

    /// A short, stable identifier for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Remote(_) | Self::Http { .. } => "api",
            Self::Network(e) if e.is_timeout() => "timeout",
            Self::Network(_) => "network",
            Self::Decode(_) => "decode",
            Self::Url(_) => "invalid_url",
            Self::InvalidParam { .. } => "invalid_param",
            Self::Primitive(e) => e.code(),
            Self::Signing(e) => e.code(),
            Self::Onchain(e) => e.code(),
            Self::Chain(e) => e.code(),
        }
    }

    /// The server's request ID, if the API returned an error body.
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Self::Remote(body) if !body.request_id.is_empty() => Some(&body.request_id),
            _ => None,
        }
    }

    /// The HTTP status of a failed response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Remote(body) => StatusCode::from_u16(body.status_code).ok(),
            Self::Http { status, .. } => Some(*status),
            Self::Network(e) => e.status(),
            _ => None,
        }
    }
}
