use crate::{
    eip712::TypedField, hex_decode, parse_address, parse_u256, AbiType, SigningError,
};
use alloy::primitives::{keccak256, Address, Bytes, B256, U256};
use std::collections::BTreeMap;

/// A typed-data field value.
///
/// [`FieldValue::Text`] holds unparsed input. It is coerced to the
/// field's declared type when hashed, so numbers may arrive as decimal or
/// hex strings and addresses with or without a `0x` prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// An address.
    Address(Address),
    /// An unsigned integer.
    Uint(U256),
    /// A boolean.
    Bool(bool),
    /// A 32-byte word.
    Bytes32(B256),
    /// Raw bytes.
    Bytes(Bytes),
    /// Text, either a `string` value or input to be parsed.
    Text(String),
}

macro_rules! uint_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for FieldValue {
                fn from(value: $t) -> Self {
                    Self::Uint(U256::from(value))
                }
            }
        )*
    };
}

uint_from!(u8, u16, u32, u64, u128, U256);

impl From<Address> for FieldValue {
    fn from(value: Address) -> Self {
        Self::Address(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<B256> for FieldValue {
    fn from(value: B256) -> Self {
        Self::Bytes32(value)
    }
}

impl From<Bytes> for FieldValue {
    fn from(value: Bytes) -> Self {
        Self::Bytes(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl FieldValue {
    /// Encode as a 32-byte word for a field of type `ty`.
    fn encode_as(&self, ty: AbiType) -> Result<B256, String> {
        match (ty, self) {
            (AbiType::Address, Self::Address(a)) => Ok(a.into_word()),
            (AbiType::Address, Self::Text(s)) => {
                parse_address(s).map(|a| a.into_word()).map_err(|e| e.to_string())
            }
            (AbiType::Uint(bits), Self::Uint(v)) => uint_word(*v, bits),
            (AbiType::Uint(bits), Self::Text(s)) => {
                parse_u256(s).map_err(|e| e.to_string()).and_then(|v| uint_word(v, bits))
            }
            (AbiType::Bool, Self::Bool(b)) => uint_word(U256::from(*b as u8), 8),
            (AbiType::Bool, Self::Text(s)) => match s.as_str() {
                "true" => uint_word(U256::from(1u8), 8),
                "false" => Ok(B256::ZERO),
                other => Err(format!("{other:?} is not a bool")),
            },
            (AbiType::Bytes32, Self::Bytes32(b)) => Ok(*b),
            (AbiType::Bytes32, Self::Bytes(b)) => bytes32(b),
            (AbiType::Bytes32, Self::Text(s)) => {
                hex_decode(s).map_err(|e| e.to_string()).and_then(|b| bytes32(&b))
            }
            (AbiType::Bytes, Self::Bytes(b)) => Ok(keccak256(b)),
            (AbiType::Bytes, Self::Text(s)) => {
                hex_decode(s).map(keccak256).map_err(|e| e.to_string())
            }
            (AbiType::String, Self::Text(s)) => Ok(keccak256(s.as_bytes())),
            (ty, value) => Err(format!("cannot encode {value:?} as {ty}")),
        }
    }
}

fn uint_word(value: U256, bits: u16) -> Result<B256, String> {
    if value.bit_len() > bits as usize {
        return Err(format!("{value} does not fit in uint{bits}"));
    }
    Ok(value.into())
}

fn bytes32(bytes: &[u8]) -> Result<B256, String> {
    if bytes.len() != 32 {
        return Err(format!("expected 32 bytes, got {}", bytes.len()));
    }
    Ok(B256::from_slice(bytes))
}

/// Encode one field of `schema` for `encodeData`.
pub(crate) fn encode_field(
    schema: &str,
    field: &TypedField,
    value: Option<&FieldValue>,
) -> Result<B256, SigningError> {
    let mismatch = |reason: String| SigningError::TypedDataFieldMismatch {
        schema: schema.to_owned(),
        field: field.name().to_owned(),
        reason,
    };
    value.ok_or_else(|| mismatch("missing".to_owned()))?.encode_as(field.ty()).map_err(mismatch)
}

/// Field values of a typed-data message, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypedMessage {
    values: BTreeMap<String, FieldValue>,
}

impl TypedMessage {
    /// Create an empty message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, returning the message.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Set a field.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// Get a field.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Number of fields set.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if no fields are set.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for TypedMessage
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self { values: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }
}
