use crate::eip712::{TypedMessage, EIP712_DOMAIN};
use alloy::primitives::{keccak256, Address, B256, U256};
use oneinch_constants::RouterConstants;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Domain version used by ERC-20 permit domains unless the token says
/// otherwise.
pub const DEFAULT_PERMIT_VERSION: &str = "1";

/// An EIP-712 domain with the four members the aggregator's contracts use.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedDataDomain {
    name: Cow<'static, str>,
    version: Cow<'static, str>,
    chain_id: U256,
    verifying_contract: Address,
}

impl TypedDataDomain {
    /// Create a new domain.
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        version: impl Into<Cow<'static, str>>,
        chain_id: U256,
        verifying_contract: Address,
    ) -> Self {
        Self { name: name.into(), version: version.into(), chain_id, verifying_contract }
    }

    /// The permit domain of an ERC-20 token: the token's `name()`, version
    /// `"1"`, and the token itself as verifying contract.
    pub fn permit(token_name: impl Into<Cow<'static, str>>, chain_id: u64, token: Address) -> Self {
        Self::new(token_name, DEFAULT_PERMIT_VERSION, U256::from(chain_id), token)
    }

    /// The order domain of an aggregation router deployment.
    pub fn router(router: &RouterConstants, chain_id: u64) -> Self {
        Self::new(
            router.name().to_owned(),
            router.version().to_owned(),
            U256::from(chain_id),
            router.address(),
        )
    }

    /// Replace the version.
    pub fn with_version(self, version: impl Into<Cow<'static, str>>) -> Self {
        Self { version: version.into(), ..self }
    }

    /// The domain name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The domain version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The chain ID.
    pub const fn chain_id(&self) -> U256 {
        self.chain_id
    }

    /// The verifying contract.
    pub const fn verifying_contract(&self) -> Address {
        self.verifying_contract
    }

    /// The domain as a message of the `EIP712Domain` schema.
    pub fn to_message(&self) -> TypedMessage {
        TypedMessage::new()
            .with("name", self.name.as_ref())
            .with("version", self.version.as_ref())
            .with("chainId", self.chain_id)
            .with("verifyingContract", self.verifying_contract)
    }

    /// `hashStruct(EIP712Domain, domain)`.
    pub fn separator(&self) -> B256 {
        let mut buf = [0u8; 32 * 5];
        buf[..32].copy_from_slice(EIP712_DOMAIN.type_hash().as_slice());
        buf[32..64].copy_from_slice(keccak256(self.name.as_bytes()).as_slice());
        buf[64..96].copy_from_slice(keccak256(self.version.as_bytes()).as_slice());
        buf[96..128].copy_from_slice(&self.chain_id.to_be_bytes::<32>());
        buf[128..].copy_from_slice(self.verifying_contract.into_word().as_slice());
        keccak256(buf)
    }
}
