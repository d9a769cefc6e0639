/// Errors produced while decoding hex, parsing numbers and addresses, or
/// encoding and decoding ABI data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PrimitiveError {
    /// Odd length or non-hex characters.
    #[error("malformed hex string: {0:?}")]
    MalformedHex(String),
    /// Not a 20-byte hex address.
    #[error("invalid address: {0:?}")]
    InvalidAddress(String),
    /// The value exceeds `2^256 - 1`, or the width of its declared type.
    #[error("value overflows its type: {0}")]
    Overflow(String),
    /// Neither a decimal nor a `0x`-prefixed hex number.
    #[error("invalid number: {0:?}")]
    InvalidNumber(String),
    /// Arguments do not match the method's declared inputs.
    #[error("abi encode error: {0}")]
    AbiEncode(String),
    /// Return data does not match the method's declared output.
    #[error("abi decode error: {0}")]
    AbiDecode(String),
}

impl PrimitiveError {
    /// Machine-stable error code.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MalformedHex(_) => "malformed_hex",
            Self::InvalidAddress(_) => "invalid_address",
            Self::Overflow(_) => "overflow",
            Self::InvalidNumber(_) => "invalid_number",
            Self::AbiEncode(_) => "abi_encode",
            Self::AbiDecode(_) => "abi_decode",
        }
    }
}
