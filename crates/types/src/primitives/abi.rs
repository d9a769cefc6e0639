//! A minimal ABI codec for the ERC-20 calls the SDK makes.

use crate::PrimitiveError;
use alloy::primitives::{keccak256, Address, Bytes, B256, U256};
use std::{fmt, str::FromStr};

const WORD: usize = 32;

/// First four bytes of `keccak256(signature)`.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// An ABI parameter type.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum AbiType {
    /// `address`
    Address,
    /// `uintN`, with the bit width.
    Uint(u16),
    /// `bool`
    Bool,
    /// `bytes32`
    Bytes32,
    /// Dynamic `bytes`.
    Bytes,
    /// Dynamic `string`.
    String,
}

impl AbiType {
    /// True for `bytes` and `string`.
    pub const fn is_dynamic(self) -> bool {
        matches!(self, Self::Bytes | Self::String)
    }
}

impl fmt::Display for AbiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address => f.write_str("address"),
            Self::Uint(bits) => write!(f, "uint{bits}"),
            Self::Bool => f.write_str("bool"),
            Self::Bytes32 => f.write_str("bytes32"),
            Self::Bytes => f.write_str("bytes"),
            Self::String => f.write_str("string"),
        }
    }
}

/// An ABI value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiValue {
    /// `address`
    Address(Address),
    /// Any `uintN`.
    Uint(U256),
    /// `bool`
    Bool(bool),
    /// `bytes32`
    Bytes32(B256),
    /// Dynamic `bytes`.
    Bytes(Bytes),
    /// Dynamic `string`.
    String(String),
}

impl AbiValue {
    /// True if the value can be encoded as `ty`.
    pub fn matches(&self, ty: AbiType) -> bool {
        match (self, ty) {
            (Self::Uint(v), AbiType::Uint(bits)) => v.bit_len() <= bits as usize,
            (Self::Address(_), AbiType::Address)
            | (Self::Bool(_), AbiType::Bool)
            | (Self::Bytes32(_), AbiType::Bytes32)
            | (Self::Bytes(_), AbiType::Bytes)
            | (Self::String(_), AbiType::String) => true,
            _ => false,
        }
    }

    /// Unwrap a decoded `string`.
    pub fn try_into_string(self) -> Result<String, PrimitiveError> {
        match self {
            Self::String(s) => Ok(s),
            other => Err(unexpected("string", &other)),
        }
    }

    /// Unwrap a decoded `uintN`.
    pub fn try_into_uint(self) -> Result<U256, PrimitiveError> {
        match self {
            Self::Uint(v) => Ok(v),
            other => Err(unexpected("uint", &other)),
        }
    }

    /// Unwrap a decoded `bytes32`.
    pub fn try_into_bytes32(self) -> Result<B256, PrimitiveError> {
        match self {
            Self::Bytes32(v) => Ok(v),
            other => Err(unexpected("bytes32", &other)),
        }
    }

    fn head_word(&self) -> [u8; WORD] {
        let mut word = [0u8; WORD];
        match self {
            Self::Address(a) => word[12..].copy_from_slice(a.as_slice()),
            Self::Uint(v) => word = v.to_be_bytes::<32>(),
            Self::Bool(b) => word[31] = *b as u8,
            Self::Bytes32(b) => word = b.0,
            Self::Bytes(_) | Self::String(_) => {}
        }
        word
    }

    fn tail(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b.as_ref()),
            Self::String(s) => Some(s.as_bytes()),
            _ => None,
        }
    }
}

fn unexpected(expected: &str, got: &AbiValue) -> PrimitiveError {
    PrimitiveError::AbiDecode(format!("expected {expected}, got {got:?}"))
}

/// The ERC-20 methods the SDK calls.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Erc20Method {
    /// `name() returns (string)`
    Name,
    /// `symbol() returns (string)`
    Symbol,
    /// `decimals() returns (uint8)`
    Decimals,
    /// `nonces(address) returns (uint256)`
    Nonces,
    /// `allowance(address,address) returns (uint256)`
    Allowance,
    /// `approve(address,uint256) returns (bool)`
    Approve,
    /// `PERMIT_TYPEHASH() returns (bytes32)`
    PermitTypehash,
}

impl Erc20Method {
    /// Canonical signature used to derive the selector.
    pub const fn signature(self) -> &'static str {
        match self {
            Self::Name => "name()",
            Self::Symbol => "symbol()",
            Self::Decimals => "decimals()",
            Self::Nonces => "nonces(address)",
            Self::Allowance => "allowance(address,address)",
            Self::Approve => "approve(address,uint256)",
            Self::PermitTypehash => "PERMIT_TYPEHASH()",
        }
    }

    /// Declared input types.
    pub const fn inputs(self) -> &'static [AbiType] {
        match self {
            Self::Name | Self::Symbol | Self::Decimals | Self::PermitTypehash => &[],
            Self::Nonces => &[AbiType::Address],
            Self::Allowance => &[AbiType::Address, AbiType::Address],
            Self::Approve => &[AbiType::Address, AbiType::Uint(256)],
        }
    }

    /// Declared return type.
    pub const fn output(self) -> AbiType {
        match self {
            Self::Name | Self::Symbol => AbiType::String,
            Self::Decimals => AbiType::Uint(8),
            Self::Nonces | Self::Allowance => AbiType::Uint(256),
            Self::Approve => AbiType::Bool,
            Self::PermitTypehash => AbiType::Bytes32,
        }
    }

    /// Four-byte function selector.
    pub fn selector(self) -> [u8; 4] {
        selector(self.signature())
    }
}

impl FromStr for Erc20Method {
    type Err = PrimitiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "symbol" => Ok(Self::Symbol),
            "decimals" => Ok(Self::Decimals),
            "nonces" => Ok(Self::Nonces),
            "allowance" => Ok(Self::Allowance),
            "approve" => Ok(Self::Approve),
            "PERMIT_TYPEHASH" => Ok(Self::PermitTypehash),
            _ => Err(PrimitiveError::AbiEncode(format!("unknown method {s}"))),
        }
    }
}

/// ABI-encode a parameter list with head/tail layout.
pub fn encode_params(values: &[AbiValue]) -> Vec<u8> {
    let head_len = values.len() * WORD;
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();

    for value in values {
        match value.tail() {
            Some(data) => {
                let offset = U256::from(head_len + tail.len());
                head.extend_from_slice(&offset.to_be_bytes::<32>());
                tail.extend_from_slice(&U256::from(data.len()).to_be_bytes::<32>());
                tail.extend_from_slice(data);
                let padding = (WORD - data.len() % WORD) % WORD;
                tail.resize(tail.len() + padding, 0);
            }
            None => head.extend_from_slice(&value.head_word()),
        }
    }

    head.extend_from_slice(&tail);
    head
}

/// Build calldata: `selector ‖ encoded args` in declaration order.
pub fn pack(method: Erc20Method, args: &[AbiValue]) -> Result<Bytes, PrimitiveError> {
    let inputs = method.inputs();
    if inputs.len() != args.len() {
        return Err(PrimitiveError::AbiEncode(format!(
            "{} takes {} arguments, got {}",
            method.signature(),
            inputs.len(),
            args.len()
        )));
    }
    if let Some((ty, arg)) = inputs.iter().zip(args).find(|(ty, arg)| !arg.matches(**ty)) {
        return Err(PrimitiveError::AbiEncode(format!(
            "{} expects {ty}, got {arg:?}",
            method.signature()
        )));
    }

    let mut calldata = method.selector().to_vec();
    calldata.extend(encode_params(args));
    Ok(calldata.into())
}

/// Decode the single return value of a read-only method.
pub fn unpack(method: Erc20Method, data: &[u8]) -> Result<AbiValue, PrimitiveError> {
    decode_single(method.output(), data)
}

fn word_at(data: &[u8], offset: usize) -> Result<&[u8], PrimitiveError> {
    offset
        .checked_add(WORD)
        .and_then(|end| data.get(offset..end))
        .ok_or_else(|| {
            PrimitiveError::AbiDecode(format!("need a word at {offset}, have {} bytes", data.len()))
        })
}

fn usize_at(data: &[u8], offset: usize) -> Result<usize, PrimitiveError> {
    let value = U256::from_be_slice(word_at(data, offset)?);
    usize::try_from(value)
        .map_err(|_| PrimitiveError::AbiDecode(format!("offset {value} too large")))
}

/// Decode one value of type `ty` from return data.
pub fn decode_single(ty: AbiType, data: &[u8]) -> Result<AbiValue, PrimitiveError> {
    if data.is_empty() {
        return Err(PrimitiveError::AbiDecode("empty return data".to_owned()));
    }

    let word = word_at(data, 0)?;
    match ty {
        AbiType::Address => {
            if word[..12].iter().any(|b| *b != 0) {
                return Err(PrimitiveError::AbiDecode("dirty address padding".to_owned()));
            }
            Ok(AbiValue::Address(Address::from_slice(&word[12..])))
        }
        AbiType::Uint(bits) => {
            let value = U256::from_be_slice(word);
            if value.bit_len() > bits as usize {
                let reason = format!("{value} does not fit in uint{bits}");
                return Err(PrimitiveError::AbiDecode(reason));
            }
            Ok(AbiValue::Uint(value))
        }
        AbiType::Bool => match U256::from_be_slice(word) {
            v if v.is_zero() => Ok(AbiValue::Bool(false)),
            v if v == U256::from(1u8) => Ok(AbiValue::Bool(true)),
            v => Err(PrimitiveError::AbiDecode(format!("{v} is not a bool"))),
        },
        AbiType::Bytes32 => Ok(AbiValue::Bytes32(B256::from_slice(word))),
        AbiType::Bytes | AbiType::String => {
            let offset = usize_at(data, 0)?;
            let len = usize_at(data, offset)?;
            let start = offset + WORD;
            let bytes = start
                .checked_add(len)
                .and_then(|end| data.get(start..end))
                .ok_or_else(|| PrimitiveError::AbiDecode(format!("{ty} runs past end of data")))?;

            if ty == AbiType::Bytes {
                return Ok(AbiValue::Bytes(Bytes::copy_from_slice(bytes)));
            }
            String::from_utf8(bytes.to_vec())
                .map(AbiValue::String)
                .map_err(|_| PrimitiveError::AbiDecode("string is not utf-8".to_owned()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex_decode;
    use alloy::{
        primitives::address,
        sol_types::{sol_data, SolType},
    };

    #[test]
    fn known_selectors() {
        assert_eq!(Erc20Method::Name.selector(), [0x06, 0xfd, 0xde, 0x03]);
        assert_eq!(Erc20Method::Decimals.selector(), [0x31, 0x3c, 0xe5, 0x67]);
        assert_eq!(Erc20Method::Nonces.selector(), [0x7e, 0xce, 0xbe, 0x00]);
        assert_eq!(Erc20Method::Allowance.selector(), [0xdd, 0x62, 0xed, 0x3e]);
        assert_eq!(Erc20Method::Approve.selector(), [0x09, 0x5e, 0xa7, 0xb3]);
        assert_eq!(Erc20Method::PermitTypehash.selector(), [0x30, 0xad, 0xf8, 0x1f]);
    }

    #[test]
    fn pack_approve() {
        let spender = address!("0x1111111254eeb25477b68fb85ed929f73a960582");
        let calldata = pack(
            Erc20Method::Approve,
            &[AbiValue::Address(spender), AbiValue::Uint(U256::MAX)],
        )
        .unwrap();

        assert_eq!(calldata.len(), 4 + 64);
        assert_eq!(&calldata[..4], &[0x09, 0x5e, 0xa7, 0xb3]);
        assert_eq!(&calldata[16..36], spender.as_slice());
        assert!(calldata[36..].iter().all(|b| *b == 0xff));
    }

    #[test]
    fn pack_checks_arguments() {
        let err = pack(Erc20Method::Nonces, &[]).unwrap_err();
        assert_eq!(err.code(), "abi_encode");
        let err = pack(Erc20Method::Nonces, &[AbiValue::Uint(U256::ZERO)]).unwrap_err();
        assert_eq!(err.code(), "abi_encode");
        assert_eq!("approve".parse::<Erc20Method>().unwrap(), Erc20Method::Approve);
        assert!("transfer".parse::<Erc20Method>().is_err());
    }

    #[test]
    fn dynamic_encoding_matches_alloy() {
        let payload = Bytes::from_static(&[0xaa; 33]);
        let ours = encode_params(&[
            AbiValue::Uint(U256::from(7u8)),
            AbiValue::Bytes(payload.clone()),
            AbiValue::String("Frax".to_owned()),
        ]);
        let theirs = <(sol_data::Uint<256>, sol_data::Bytes, sol_data::String)>::abi_encode_params(
            &(U256::from(7u8), payload, "Frax".to_owned()),
        );
        assert_eq!(ours, theirs);
    }

    #[test]
    fn unpack_string() {
        let data = <sol_data::String>::abi_encode(&"Frax".to_owned());
        assert_eq!(unpack(Erc20Method::Name, &data).unwrap(), AbiValue::String("Frax".to_owned()));
    }

    #[test]
    fn unpack_decimals() {
        let data = U256::from(18u8).to_be_bytes::<32>();
        assert_eq!(unpack(Erc20Method::Decimals, &data).unwrap(), AbiValue::Uint(U256::from(18u8)));

        let too_wide = U256::from(256u16).to_be_bytes::<32>();
        assert_eq!(unpack(Erc20Method::Decimals, &too_wide).unwrap_err().code(), "abi_decode");
    }

    #[test]
    fn unpack_errors() {
        assert_eq!(unpack(Erc20Method::Nonces, &[]).unwrap_err().code(), "abi_decode");
        assert_eq!(unpack(Erc20Method::Nonces, &[0u8; 31]).unwrap_err().code(), "abi_decode");

        // offset points past the end
        let data = hex_decode(&format!("{:064x}", 64)).unwrap();
        assert_eq!(unpack(Erc20Method::Symbol, &data).unwrap_err().code(), "abi_decode");
    }

    #[test]
    fn unpack_address() {
        let owner = address!("0x2a250893f86Dc8497E131508f680338ac647B498");
        let data = encode_params(&[AbiValue::Address(owner)]);
        assert_eq!(decode_single(AbiType::Address, &data).unwrap(), AbiValue::Address(owner));
    }
}
