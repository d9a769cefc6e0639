use crate::{
    eip712::{value::encode_field, TypedMessage},
    AbiType, SigningError,
};
use alloy::primitives::{keccak256, B256};
use std::{borrow::Cow, fmt::Write};

/// A named, typed member of a struct schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypedField {
    name: Cow<'static, str>,
    ty: AbiType,
}

impl TypedField {
    /// Create a field with a static name.
    pub const fn new(name: &'static str, ty: AbiType) -> Self {
        Self { name: Cow::Borrowed(name), ty }
    }

    /// Create a field with an owned name.
    pub fn owned(name: impl Into<String>, ty: AbiType) -> Self {
        Self { name: Cow::Owned(name.into()), ty }
    }

    /// The field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared type.
    pub const fn ty(&self) -> AbiType {
        self.ty
    }
}

/// A struct schema: type name plus fields in declaration order.
///
/// Schemas are plain data, so new primary types can be hashed without
/// touching the hasher.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeSchema {
    name: Cow<'static, str>,
    fields: Cow<'static, [TypedField]>,
}

impl TypeSchema {
    /// Create a schema from static parts.
    pub const fn new(name: &'static str, fields: &'static [TypedField]) -> Self {
        Self { name: Cow::Borrowed(name), fields: Cow::Borrowed(fields) }
    }

    /// Create a schema from owned parts.
    pub fn from_parts(name: impl Into<String>, fields: Vec<TypedField>) -> Self {
        Self { name: Cow::Owned(name.into()), fields: Cow::Owned(fields) }
    }

    /// The type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The fields in declaration order.
    pub fn fields(&self) -> &[TypedField] {
        &self.fields
    }

    /// Canonical encoding, e.g. `Permit(address owner,address spender,...)`.
    pub fn encode_type(&self) -> String {
        let mut out = String::with_capacity(self.name.len() + self.fields.len() * 24);
        out.push_str(&self.name);
        out.push('(');
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            // writing to a String cannot fail
            let _ = write!(out, "{} {}", field.ty, field.name);
        }
        out.push(')');
        out
    }

    /// `keccak256(encode_type())`.
    pub fn type_hash(&self) -> B256 {
        keccak256(self.encode_type())
    }

    /// `typeHash ‖ enc(field_1) ‖ ... ‖ enc(field_n)`.
    pub fn encode_data(&self, message: &TypedMessage) -> Result<Vec<u8>, SigningError> {
        let mut buf = Vec::with_capacity(32 * (self.fields.len() + 1));
        buf.extend_from_slice(self.type_hash().as_slice());
        for field in self.fields.iter() {
            let word = encode_field(&self.name, field, message.get(field.name()))?;
            buf.extend_from_slice(word.as_slice());
        }
        Ok(buf)
    }

    /// `keccak256(encode_data(message))`.
    pub fn hash_struct(&self, message: &TypedMessage) -> Result<B256, SigningError> {
        self.encode_data(message).map(keccak256)
    }
}

/// `EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)`
pub static EIP712_DOMAIN: TypeSchema = TypeSchema::new("EIP712Domain", EIP712_DOMAIN_FIELDS);

const EIP712_DOMAIN_FIELDS: &[TypedField] = &[
    TypedField::new("name", AbiType::String),
    TypedField::new("version", AbiType::String),
    TypedField::new("chainId", AbiType::Uint(256)),
    TypedField::new("verifyingContract", AbiType::Address),
];

/// ERC-20 (EIP-2612) `Permit`.
pub static PERMIT: TypeSchema = TypeSchema::new("Permit", PERMIT_FIELDS);

const PERMIT_FIELDS: &[TypedField] = &[
    TypedField::new("owner", AbiType::Address),
    TypedField::new("spender", AbiType::Address),
    TypedField::new("value", AbiType::Uint(256)),
    TypedField::new("nonce", AbiType::Uint(256)),
    TypedField::new("deadline", AbiType::Uint(256)),
];

/// Limit order as signed for aggregation router v5.
pub static ORDER_V5: TypeSchema = TypeSchema::new("Order", ORDER_V5_FIELDS);

const ORDER_V5_FIELDS: &[TypedField] = &[
    TypedField::new("salt", AbiType::Uint(256)),
    TypedField::new("makerAsset", AbiType::Address),
    TypedField::new("takerAsset", AbiType::Address),
    TypedField::new("maker", AbiType::Address),
    TypedField::new("receiver", AbiType::Address),
    TypedField::new("allowedSender", AbiType::Address),
    TypedField::new("makingAmount", AbiType::Uint(256)),
    TypedField::new("takingAmount", AbiType::Uint(256)),
    TypedField::new("offsets", AbiType::Uint(256)),
    TypedField::new("interactions", AbiType::Bytes),
];

/// Limit order as signed for aggregation router v6.
pub static ORDER_V6: TypeSchema = TypeSchema::new("Order", ORDER_V6_FIELDS);

const ORDER_V6_FIELDS: &[TypedField] = &[
    TypedField::new("salt", AbiType::Uint(256)),
    TypedField::new("maker", AbiType::Address),
    TypedField::new("receiver", AbiType::Address),
    TypedField::new("makerAsset", AbiType::Address),
    TypedField::new("takerAsset", AbiType::Address),
    TypedField::new("makingAmount", AbiType::Uint(256)),
    TypedField::new("takingAmount", AbiType::Uint(256)),
    TypedField::new("makerTraits", AbiType::Uint(256)),
];
