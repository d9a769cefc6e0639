use crate::{OnchainError, OnchainReader, Wallet};
use alloy::{
    consensus::{SignableTransaction, TxEip1559, TxEnvelope, TxLegacy},
    eips::eip2718::Encodable2718,
    network::TransactionBuilder,
    primitives::{Address, Bytes, TxKind, B256, U256},
    providers::Provider,
    rpc::types::TransactionRequest,
};
use oneinch_constants::{FeeMode, FeeModeConfig};
use oneinch_types::{hex_encode, pack, AbiValue, Erc20Method, SigningError};
use tracing::{debug, instrument};

/// Build a transaction field by field, then resolve what was left unset
/// from the node.
///
/// The builder is single use: [`TxBuilder::build`] consumes it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TxBuilder {
    to: Option<Address>,
    data: Bytes,
    value: Option<U256>,
    gas: Option<u64>,
    nonce: Option<u64>,
    chain_id: Option<u64>,
    gas_price: Option<U256>,
    max_fee_per_gas: Option<U256>,
    max_priority_fee_per_gas: Option<U256>,
}

impl TxBuilder {
    /// Get a new, empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// An ERC-20 `approve(spender, amount)` call on `token`.
    pub fn erc20_approve(
        token: Address,
        spender: Address,
        amount: U256,
    ) -> Result<Self, OnchainError> {
        let args = [AbiValue::Address(spender), AbiValue::Uint(amount)];
        let data = pack(Erc20Method::Approve, &args)?;
        Ok(Self::new().with_to(token).with_data(data))
    }

    /// Set the recipient.
    pub fn with_to(self, to: Address) -> Self {
        Self { to: Some(to), ..self }
    }

    /// Set the calldata.
    pub fn with_data(self, data: impl Into<Bytes>) -> Self {
        Self { data: data.into(), ..self }
    }

    /// Set the value in wei.
    pub fn with_value(self, value: U256) -> Self {
        Self { value: Some(value), ..self }
    }

    /// Set the gas limit, used verbatim.
    pub fn with_gas(self, gas: u64) -> Self {
        Self { gas: Some(gas), ..self }
    }

    /// Set the nonce.
    pub fn with_nonce(self, nonce: u64) -> Self {
        Self { nonce: Some(nonce), ..self }
    }

    /// Set the chain ID.
    pub fn with_chain_id(self, chain_id: u64) -> Self {
        Self { chain_id: Some(chain_id), ..self }
    }

    /// Set the gas price of a legacy transaction.
    pub fn with_gas_price(self, gas_price: U256) -> Self {
        Self { gas_price: Some(gas_price), ..self }
    }

    /// Set the fee cap of an EIP-1559 transaction.
    pub fn with_max_fee_per_gas(self, max_fee_per_gas: U256) -> Self {
        Self { max_fee_per_gas: Some(max_fee_per_gas), ..self }
    }

    /// Set the tip cap of an EIP-1559 transaction.
    pub fn with_max_priority_fee_per_gas(self, max_priority_fee_per_gas: U256) -> Self {
        Self { max_priority_fee_per_gas: Some(max_priority_fee_per_gas), ..self }
    }

    /// Get the recipient, if set.
    pub const fn to(&self) -> Option<Address> {
        self.to
    }

    /// Get the calldata.
    pub const fn data(&self) -> &Bytes {
        &self.data
    }

    /// Resolve unset fields and validate.
    ///
    /// Resolution order is chain ID, nonce, gas, then fees. An estimated gas
    /// limit is raised by a quarter. The fee mode comes from `fees`; a gas
    /// price set on an EIP-1559 chain, or a fee cap set on a legacy chain,
    /// is ignored.
    #[instrument(skip_all, fields(%from))]
    pub async fn build<P: Provider>(
        self,
        reader: &OnchainReader<P>,
        from: Address,
        fees: &FeeModeConfig,
    ) -> Result<UnsignedTx, OnchainError> {
        let to = self.to.ok_or_else(|| OnchainError::TxBuild("missing `to` address".into()))?;

        let chain_id = match self.chain_id {
            Some(chain_id) => chain_id,
            None => reader.chain_id().await?,
        };
        let nonce = match self.nonce {
            Some(nonce) => nonce,
            None => reader.pending_nonce(from).await?,
        };
        let value = self.value.unwrap_or_default();

        let gas = match self.gas {
            Some(gas) => gas,
            None => {
                let call = TransactionRequest::default()
                    .with_from(from)
                    .with_to(to)
                    .with_value(value)
                    .with_input(self.data.clone());
                let estimate = reader.estimate_gas(call).await?;
                estimate.saturating_add(estimate / 4)
            }
        };
        if gas == 0 {
            return Err(OnchainError::TxBuild("gas limit must be positive".into()));
        }

        let mode = fees.fee_mode(chain_id);
        debug!(chain_id, nonce, gas, ?mode, "resolved transaction fields");

        let tx = match mode {
            FeeMode::Eip1559 => {
                let tip = match self.max_priority_fee_per_gas {
                    Some(tip) => tip,
                    None => reader.suggest_gas_tip_cap().await?,
                };
                let fee_cap = match self.max_fee_per_gas {
                    Some(fee_cap) => fee_cap,
                    None => reader.suggest_gas_price().await?,
                };
                if fee_cap < tip {
                    return Err(OnchainError::TxBuild(format!(
                        "max fee per gas {fee_cap} is below max priority fee per gas {tip}"
                    )));
                }
                UnsignedTx::Eip1559(TxEip1559 {
                    chain_id,
                    nonce,
                    gas_limit: gas,
                    max_fee_per_gas: to_u128("max fee per gas", fee_cap)?,
                    max_priority_fee_per_gas: to_u128("max priority fee per gas", tip)?,
                    to: TxKind::Call(to),
                    value,
                    access_list: Default::default(),
                    input: self.data,
                })
            }
            FeeMode::Legacy => {
                let gas_price = match self.gas_price {
                    Some(gas_price) => gas_price,
                    None => reader.suggest_gas_price().await?,
                };
                UnsignedTx::Legacy(TxLegacy {
                    chain_id: Some(chain_id),
                    nonce,
                    gas_price: to_u128("gas price", gas_price)?,
                    gas_limit: gas,
                    to: TxKind::Call(to),
                    value,
                    input: self.data,
                })
            }
        };
        Ok(tx)
    }
}

fn to_u128(name: &str, value: U256) -> Result<u128, OnchainError> {
    u128::try_from(value).map_err(|_| OnchainError::TxBuild(format!("{name} {value} exceeds u128")))
}

/// A fully resolved transaction, ready to sign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnsignedTx {
    /// EIP-1559 dynamic fee transaction.
    Eip1559(TxEip1559),
    /// Legacy transaction, signed per EIP-155.
    Legacy(TxLegacy),
}

impl UnsignedTx {
    /// The fee mode.
    pub const fn fee_mode(&self) -> FeeMode {
        match self {
            Self::Eip1559(_) => FeeMode::Eip1559,
            Self::Legacy(_) => FeeMode::Legacy,
        }
    }

    /// The chain ID.
    pub fn chain_id(&self) -> u64 {
        match self {
            Self::Eip1559(tx) => tx.chain_id,
            Self::Legacy(tx) => tx.chain_id.unwrap_or_default(),
        }
    }

    /// The nonce.
    pub const fn nonce(&self) -> u64 {
        match self {
            Self::Eip1559(tx) => tx.nonce,
            Self::Legacy(tx) => tx.nonce,
        }
    }

    /// The gas limit.
    pub const fn gas_limit(&self) -> u64 {
        match self {
            Self::Eip1559(tx) => tx.gas_limit,
            Self::Legacy(tx) => tx.gas_limit,
        }
    }

    /// The recipient.
    pub fn to(&self) -> Option<Address> {
        match self {
            Self::Eip1559(tx) => tx.to.to().copied(),
            Self::Legacy(tx) => tx.to.to().copied(),
        }
    }

    /// The value in wei.
    pub const fn value(&self) -> U256 {
        match self {
            Self::Eip1559(tx) => tx.value,
            Self::Legacy(tx) => tx.value,
        }
    }

    /// The calldata.
    pub const fn input(&self) -> &Bytes {
        match self {
            Self::Eip1559(tx) => &tx.input,
            Self::Legacy(tx) => &tx.input,
        }
    }

    /// The hash to sign: keccak256 of the EIP-2718 signing payload.
    pub fn signature_hash(&self) -> B256 {
        match self {
            Self::Eip1559(tx) => tx.signature_hash(),
            Self::Legacy(tx) => tx.signature_hash(),
        }
    }

    /// Sign with the wallet's key.
    ///
    /// The wallet must be bound to the transaction's chain.
    pub fn sign(self, wallet: &Wallet) -> Result<SignedTx, OnchainError> {
        if self.chain_id() != wallet.chain_id() {
            return Err(OnchainError::TxBuild(format!(
                "transaction is for chain {} but the wallet signs for chain {}",
                self.chain_id(),
                wallet.chain_id()
            )));
        }

        let hash = self.signature_hash();
        let signature = wallet.sign_digest(&hash)?;
        let sender = signature.recover_address(&hash)?;
        if sender != wallet.address() {
            return Err(SigningError::InvalidSignature(format!(
                "recovered {sender}, expected {}",
                wallet.address()
            ))
            .into());
        }

        let envelope = match self {
            Self::Eip1559(tx) => TxEnvelope::from(tx.into_signed(signature.to_alloy())),
            Self::Legacy(tx) => TxEnvelope::from(tx.into_signed(signature.to_alloy())),
        };
        Ok(SignedTx { envelope, sender })
    }
}

/// A signed transaction and the address that signed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTx {
    envelope: TxEnvelope,
    sender: Address,
}

impl SignedTx {
    /// The transaction hash.
    pub fn hash(&self) -> B256 {
        *self.envelope.tx_hash()
    }

    /// The signer.
    pub const fn sender(&self) -> Address {
        self.sender
    }

    /// The signed envelope.
    pub const fn envelope(&self) -> &TxEnvelope {
        &self.envelope
    }

    /// The EIP-2718 encoding sent to `eth_sendRawTransaction`.
    pub fn encoded(&self) -> Bytes {
        self.envelope.encoded_2718().into()
    }

    /// [`Self::encoded`] as `0x` hex.
    pub fn raw_hex(&self) -> String {
        hex_encode(self.envelope.encoded_2718())
    }

    /// Consume, returning the envelope.
    pub fn into_envelope(self) -> TxEnvelope {
        self.envelope
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::{
        eips::eip2718::Decodable2718,
        primitives::address,
        providers::ProviderBuilder,
        transports::mock::Asserter,
    };
    use oneinch_constants::routers;

    const KEY: &str = "ad21c0552a3b52e94520da713455cc347e4e89628a334be24d85b8083848434f";
    const TOKEN: Address = address!("0x45c32fA6DF82ead1e2EF74d17b76547EDdFaFF89");

    fn reader() -> (OnchainReader<impl Provider>, Asserter) {
        let asserter = Asserter::new();
        let provider = ProviderBuilder::new()
            .disable_recommended_fillers()
            .connect_mocked_client(asserter.clone());
        (OnchainReader::new(provider), asserter)
    }

    #[tokio::test]
    async fn eip1559_defaults_from_node() {
        let (reader, asserter) = reader();
        let wallet = Wallet::from_hex(KEY, 137).unwrap();
        asserter.push_success(&"0x89");
        asserter.push_success(&"0x7");
        asserter.push_success(&"0xc350");
        asserter.push_success(&"0x3b9aca00");
        asserter.push_success(&"0x77359400");

        let tx = TxBuilder::erc20_approve(TOKEN, routers::ROUTER_V5, U256::MAX)
            .unwrap()
            .build(&reader, wallet.address(), &FeeModeConfig::default())
            .await
            .unwrap();

        let UnsignedTx::Eip1559(inner) = &tx else { panic!("expected an EIP-1559 transaction") };
        assert_eq!(inner.chain_id, 137);
        assert_eq!(inner.nonce, 7);
        assert_eq!(inner.gas_limit, 62_500);
        assert_eq!(inner.max_priority_fee_per_gas, 1_000_000_000);
        assert_eq!(inner.max_fee_per_gas, 2_000_000_000);
        assert_eq!(tx.value(), U256::ZERO);
        assert_eq!(tx.to(), Some(TOKEN));
        assert_eq!(&tx.input()[..4], &Erc20Method::Approve.selector());

        let signed = tx.sign(&wallet).unwrap();
        assert_eq!(signed.sender(), wallet.address());
        let encoded = signed.encoded();
        assert_eq!(encoded[0], 0x02);
        assert!(signed.raw_hex().starts_with("0x02"));
        let decoded = TxEnvelope::decode_2718(&mut encoded.as_ref()).unwrap();
        assert_eq!(&decoded, signed.envelope());
        assert_eq!(*decoded.tx_hash(), signed.hash());
    }

    #[tokio::test]
    async fn legacy_chain_uses_gas_price() {
        let (reader, asserter) = reader();
        let wallet = Wallet::from_hex(KEY, 56).unwrap();
        asserter.push_success(&"0x38");
        asserter.push_success(&"0x0");
        asserter.push_success(&"0x5208");
        asserter.push_success(&"0xb2d05e00");

        let tx = TxBuilder::new()
            .with_to(TOKEN)
            .with_value(U256::from(1u8))
            .build(&reader, wallet.address(), &FeeModeConfig::default())
            .await
            .unwrap();

        assert_eq!(tx.fee_mode(), FeeMode::Legacy);
        let UnsignedTx::Legacy(inner) = &tx else { panic!("expected a legacy transaction") };
        assert_eq!(inner.chain_id, Some(56));
        assert_eq!(inner.gas_price, 3_000_000_000);
        assert_eq!(inner.gas_limit, 26_250);

        let signed = tx.sign(&wallet).unwrap();
        assert!(signed.encoded()[0] >= 0xc0);
        assert!(matches!(signed.envelope(), TxEnvelope::Legacy(_)));
    }

    #[tokio::test]
    async fn supplied_fields_skip_the_node() {
        let (reader, _asserter) = reader();
        let wallet = Wallet::from_hex(KEY, 1).unwrap();
        let tx = TxBuilder::new()
            .with_to(TOKEN)
            .with_chain_id(1)
            .with_nonce(4)
            .with_gas(100_000)
            .with_max_fee_per_gas(U256::from(30u8))
            .with_max_priority_fee_per_gas(U256::from(2u8))
            .build(&reader, wallet.address(), &FeeModeConfig::default())
            .await
            .unwrap();
        assert_eq!(tx.nonce(), 4);
        assert_eq!(tx.gas_limit(), 100_000);
        assert_eq!(tx.chain_id(), 1);
    }

    #[tokio::test]
    async fn validation_failures() {
        let (reader, _asserter) = reader();
        let from = Address::repeat_byte(0x11);
        let fees = FeeModeConfig::default();
        let base = TxBuilder::new().with_chain_id(1).with_nonce(0);

        let err = base.clone().with_gas(1).build(&reader, from, &fees).await.unwrap_err();
        assert_eq!(err.code(), "tx_build");

        let err = base.clone().with_to(TOKEN).with_gas(0).build(&reader, from, &fees).await;
        assert_eq!(err.unwrap_err().code(), "tx_build");

        let err = base
            .clone()
            .with_to(TOKEN)
            .with_gas(21_000)
            .with_max_fee_per_gas(U256::from(1u8))
            .with_max_priority_fee_per_gas(U256::from(2u8))
            .build(&reader, from, &fees)
            .await;
        assert_eq!(err.unwrap_err().code(), "tx_build");

        let err = base
            .with_to(TOKEN)
            .with_gas(21_000)
            .with_max_fee_per_gas(U256::MAX)
            .with_max_priority_fee_per_gas(U256::from(2u8))
            .build(&reader, from, &fees)
            .await;
        assert_eq!(err.unwrap_err().code(), "tx_build");
    }

    #[tokio::test]
    async fn wallet_must_match_chain() {
        let (reader, _asserter) = reader();
        let wallet = Wallet::from_hex(KEY, 137).unwrap();
        let tx = TxBuilder::new()
            .with_to(TOKEN)
            .with_chain_id(1)
            .with_nonce(0)
            .with_gas(21_000)
            .with_max_fee_per_gas(U256::from(2u8))
            .with_max_priority_fee_per_gas(U256::from(1u8))
            .build(&reader, wallet.address(), &FeeModeConfig::default())
            .await
            .unwrap();
        assert_eq!(tx.sign(&wallet).unwrap_err().code(), "tx_build");
    }
}
