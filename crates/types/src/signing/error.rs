use crate::PrimitiveError;

/// An error that can occur while hashing typed data or signing permits,
/// orders and digests.
#[derive(Debug, thiserror::Error)]
pub enum SigningError {
    /// The private key is not 64 hex characters, or the scalar is zero or not
    /// below the curve order.
    #[error("invalid private key: {0}")]
    InvalidKey(&'static str),
    /// The underlying curve arithmetic failed.
    #[error("signing failed: {0}")]
    Signer(#[source] Box<dyn core::error::Error + Send + Sync>),
    /// A signature could not be parsed or recovered.
    #[error("invalid signature: {0}")]
    InvalidSignature(String),
    /// A typed-data field is missing or cannot be coerced to its declared type.
    #[error("typed data field {field} of {schema}: {reason}")]
    TypedDataFieldMismatch {
        /// Schema type name.
        schema: String,
        /// Field name.
        field: String,
        /// What went wrong.
        reason: String,
    },
    /// An order is missing a required value, or one is out of range.
    #[error("invalid order: {0}")]
    InvalidOrder(String),
    /// An assembled permit payload has the wrong length.
    #[error("permit payload must be {expected} characters, got {actual}")]
    PermitPayloadLength {
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },
    /// Hex, number or address parsing failed.
    #[error(transparent)]
    Primitive(#[from] PrimitiveError),
}

impl SigningError {
    /// Machine-stable error code.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidKey(_) => "invalid_key",
            Self::Signer(_) => "signing",
            Self::InvalidSignature(_) => "invalid_signature",
            Self::TypedDataFieldMismatch { .. } => "typed_data_field_mismatch",
            Self::InvalidOrder(_) => "invalid_order",
            Self::PermitPayloadLength { .. } => "permit_payload_length",
            Self::Primitive(e) => e.code(),
        }
    }
}
