use crate::{
    eip712::{signing_digest, TypeSchema, TypedDataDomain, TypedMessage, ORDER_V5, ORDER_V6},
    hex_encode, parse_address, parse_u256,
    signing::{
        salt_matches_extension, salt_with_extension, Interactions, MakerTraits, PrivateKey,
        SaltSource, Signature65, TimestampSalt,
    },
    SigningError,
};
use alloy::primitives::{Address, Bytes, B256, U256};
use oneinch_constants::{ChainError, RouterConstants, RouterVersion};
use serde::{Deserialize, Serialize};

/// Order inputs before a salt is chosen and defaults are filled.
///
/// Users can do:
/// `UnsignedLimitOrder::new().with_maker(maker).with_assets(dai, weth).with_amounts(x, y)`
/// and hand the result to an [`OrderComposer`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsignedLimitOrder {
    maker: Address,
    maker_asset: Address,
    taker_asset: Address,
    making_amount: U256,
    taking_amount: U256,
    receiver: Address,
    allowed_sender: Address,
    salt: Option<U256>,
    interactions: Interactions,
    maker_traits: MakerTraits,
}

impl UnsignedLimitOrder {
    /// Get a new, empty order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maker.
    pub fn with_maker(self, maker: Address) -> Self {
        Self { maker, ..self }
    }

    /// Set the maker and taker assets.
    pub fn with_assets(self, maker_asset: Address, taker_asset: Address) -> Self {
        Self { maker_asset, taker_asset, ..self }
    }

    /// Set the making and taking amounts.
    pub fn with_amounts(self, making_amount: U256, taking_amount: U256) -> Self {
        Self { making_amount, taking_amount, ..self }
    }

    /// Set the receiver of the taker asset. Zero means the maker.
    pub fn with_receiver(self, receiver: Address) -> Self {
        Self { receiver, ..self }
    }

    /// Restrict filling to one taker. Zero means anyone.
    pub fn with_allowed_sender(self, allowed_sender: Address) -> Self {
        Self { allowed_sender, ..self }
    }

    /// Use this salt instead of asking the composer's salt source.
    pub fn with_salt(self, salt: U256) -> Self {
        Self { salt: Some(salt), ..self }
    }

    /// Attach interactions.
    pub fn with_interactions(self, interactions: Interactions) -> Self {
        Self { interactions, ..self }
    }

    /// Set the v6 maker traits.
    pub fn with_maker_traits(self, maker_traits: MakerTraits) -> Self {
        Self { maker_traits, ..self }
    }

    /// Get the maker.
    pub const fn maker(&self) -> Address {
        self.maker
    }

    /// Get the interactions.
    pub const fn interactions(&self) -> &Interactions {
        &self.interactions
    }

    fn validate(&self) -> Result<(), SigningError> {
        for (name, address) in [
            ("maker", self.maker),
            ("makerAsset", self.maker_asset),
            ("takerAsset", self.taker_asset),
        ] {
            if address.is_zero() {
                return Err(SigningError::InvalidOrder(format!("{name} is the zero address")));
            }
        }
        if self.making_amount.is_zero() {
            return Err(SigningError::InvalidOrder("makingAmount must be positive".to_owned()));
        }
        if self.taking_amount.is_zero() {
            return Err(SigningError::InvalidOrder("takingAmount must be positive".to_owned()));
        }
        Ok(())
    }
}

/// Order inputs as text, the way they arrive from a caller or a config
/// file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitOrderParams {
    /// Maker address.
    pub maker: String,
    /// Token the maker sells.
    pub maker_asset: String,
    /// Token the maker buys.
    pub taker_asset: String,
    /// Amount of maker asset, decimal or `0x` hex.
    pub making_amount: String,
    /// Amount of taker asset, decimal or `0x` hex.
    pub taking_amount: String,
    /// Receiver, defaults to zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
    /// Allowed sender, defaults to zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_sender: Option<String>,
}

impl TryFrom<&LimitOrderParams> for UnsignedLimitOrder {
    type Error = SigningError;

    fn try_from(params: &LimitOrderParams) -> Result<Self, Self::Error> {
        let address = |name: &str, value: &str| {
            parse_address(value).map_err(|e| SigningError::InvalidOrder(format!("{name}: {e}")))
        };
        let amount = |name: &str, value: &str| {
            parse_u256(value).map_err(|e| SigningError::InvalidOrder(format!("{name}: {e}")))
        };
        let optional = |name: &str, value: &Option<String>| {
            value.as_deref().map_or(Ok(Address::ZERO), |v| address(name, v))
        };

        Ok(Self::new()
            .with_maker(address("maker", &params.maker)?)
            .with_assets(
                address("makerAsset", &params.maker_asset)?,
                address("takerAsset", &params.taker_asset)?,
            )
            .with_amounts(
                amount("makingAmount", &params.making_amount)?,
                amount("takingAmount", &params.taking_amount)?,
            )
            .with_receiver(optional("receiver", &params.receiver)?)
            .with_allowed_sender(optional("allowedSender", &params.allowed_sender)?))
    }
}

/// A canonical limit order, with salt chosen and defaults filled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    salt: U256,
    maker: Address,
    receiver: Address,
    maker_asset: Address,
    taker_asset: Address,
    making_amount: U256,
    taking_amount: U256,
    maker_traits: U256,
    extension: Bytes,
    allowed_sender: Address,
    offsets: U256,
    interactions: Bytes,
}

impl OrderRecord {
    /// The salt.
    pub const fn salt(&self) -> U256 {
        self.salt
    }

    /// The maker.
    pub const fn maker(&self) -> Address {
        self.maker
    }

    /// The receiver.
    pub const fn receiver(&self) -> Address {
        self.receiver
    }

    /// The maker asset.
    pub const fn maker_asset(&self) -> Address {
        self.maker_asset
    }

    /// The taker asset.
    pub const fn taker_asset(&self) -> Address {
        self.taker_asset
    }

    /// The making amount.
    pub const fn making_amount(&self) -> U256 {
        self.making_amount
    }

    /// The taking amount.
    pub const fn taking_amount(&self) -> U256 {
        self.taking_amount
    }

    /// The packed v6 maker traits.
    pub const fn maker_traits(&self) -> U256 {
        self.maker_traits
    }

    /// The extension bytes. Empty when there are no interactions.
    pub const fn extension(&self) -> &Bytes {
        &self.extension
    }

    /// The allowed sender.
    pub const fn allowed_sender(&self) -> Address {
        self.allowed_sender
    }

    /// The packed interaction offsets.
    pub const fn offsets(&self) -> U256 {
        self.offsets
    }

    /// The concatenated interactions.
    pub const fn interactions(&self) -> &Bytes {
        &self.interactions
    }

    /// The schema this order is signed under.
    pub fn schema(version: RouterVersion) -> &'static TypeSchema {
        match version {
            RouterVersion::V5 => &ORDER_V5,
            RouterVersion::V6 => &ORDER_V6,
        }
    }

    /// The order as values of the `Order` schema of `version`.
    pub fn to_typed_message(&self, version: RouterVersion) -> TypedMessage {
        let message = TypedMessage::new()
            .with("salt", self.salt)
            .with("maker", self.maker)
            .with("receiver", self.receiver)
            .with("makerAsset", self.maker_asset)
            .with("takerAsset", self.taker_asset)
            .with("makingAmount", self.making_amount)
            .with("takingAmount", self.taking_amount);

        match version {
            RouterVersion::V5 => message
                .with("allowedSender", self.allowed_sender)
                .with("offsets", self.offsets)
                .with("interactions", self.interactions.clone()),
            RouterVersion::V6 => message.with("makerTraits", self.maker_traits),
        }
    }

    /// The wire form of the order for `version`.
    pub fn to_data(&self, version: RouterVersion) -> OrderData {
        let v5 = version == RouterVersion::V5;
        let v6 = !v5;
        OrderData {
            salt: self.salt.to_string(),
            maker_asset: hex_encode(self.maker_asset),
            taker_asset: hex_encode(self.taker_asset),
            maker: hex_encode(self.maker),
            receiver: hex_encode(self.receiver),
            allowed_sender: v5.then(|| hex_encode(self.allowed_sender)),
            making_amount: self.making_amount.to_string(),
            taking_amount: self.taking_amount.to_string(),
            offsets: v5.then(|| self.offsets.to_string()),
            interactions: v5.then(|| hex_encode(&self.interactions)),
            maker_traits: v6.then(|| self.maker_traits.to_string()),
            extension: v6.then(|| hex_encode(&self.extension)),
        }
    }
}

/// Order fields as sent to the orderbook. Amounts and salt are decimal
/// strings, addresses and bytes are `0x` hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderData {
    /// Salt.
    pub salt: String,
    /// Maker asset.
    pub maker_asset: String,
    /// Taker asset.
    pub taker_asset: String,
    /// Maker.
    pub maker: String,
    /// Receiver.
    pub receiver: String,
    /// Allowed sender (v5).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_sender: Option<String>,
    /// Making amount.
    pub making_amount: String,
    /// Taking amount.
    pub taking_amount: String,
    /// Interaction offsets (v5).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offsets: Option<String>,
    /// Interactions (v5).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interactions: Option<String>,
    /// Maker traits (v6).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maker_traits: Option<String>,
    /// Extension (v6).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
}

/// A composed and signed limit order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "LimitOrderPayload")]
pub struct SignedLimitOrder {
    order_hash: B256,
    signature: Signature65,
    record: OrderRecord,
    version: RouterVersion,
}

impl SignedLimitOrder {
    /// The EIP-712 digest of the order.
    pub const fn order_hash(&self) -> B256 {
        self.order_hash
    }

    /// The maker's signature over [`Self::order_hash`].
    pub const fn signature(&self) -> &Signature65 {
        &self.signature
    }

    /// The order.
    pub const fn record(&self) -> &OrderRecord {
        &self.record
    }

    /// The router release the order was signed for.
    pub const fn version(&self) -> RouterVersion {
        self.version
    }

    /// Recover the address that signed the order.
    pub fn recover_signer(&self) -> Result<Address, SigningError> {
        self.signature.recover_address(&self.order_hash)
    }

    /// The request body for the orderbook.
    pub fn to_payload(&self) -> LimitOrderPayload {
        LimitOrderPayload {
            order_hash: self.order_hash,
            signature: self.signature.to_string(),
            data: self.record.to_data(self.version),
        }
    }
}

/// The orderbook request body: `{orderHash, signature, data}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitOrderPayload {
    /// The EIP-712 digest of the order.
    pub order_hash: B256,
    /// `0x`-prefixed `r‖s‖v` signature, `v` in `{27, 28}`.
    pub signature: String,
    /// The order fields.
    pub data: OrderData,
}

impl From<SignedLimitOrder> for LimitOrderPayload {
    fn from(order: SignedLimitOrder) -> Self {
        order.to_payload()
    }
}

/// Composes, hashes and signs limit orders for one chain and router.
#[derive(Debug, Clone)]
pub struct OrderComposer<S = TimestampSalt> {
    chain_id: u64,
    router: RouterConstants,
    salt_source: S,
}

impl OrderComposer {
    /// Create a composer that salts orders with the current time.
    pub const fn new(chain_id: u64, router: RouterConstants) -> Self {
        Self { chain_id, router, salt_source: TimestampSalt }
    }

    /// Create a composer for the router deployment of a known chain.
    pub fn for_chain(chain_id: u64, version: RouterVersion) -> Result<Self, ChainError> {
        RouterConstants::for_chain(chain_id, version).map(|router| Self::new(chain_id, router))
    }
}

impl<S> OrderComposer<S> {
    /// Replace the salt source.
    pub fn with_salt_source<T: SaltSource>(self, salt_source: T) -> OrderComposer<T> {
        OrderComposer { chain_id: self.chain_id, router: self.router, salt_source }
    }

    /// Get the chain ID.
    pub const fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Get the router constants.
    pub const fn router(&self) -> &RouterConstants {
        &self.router
    }

    /// The EIP-712 domain orders are signed under.
    pub fn domain(&self) -> TypedDataDomain {
        TypedDataDomain::router(&self.router, self.chain_id)
    }
}

impl<S: SaltSource> OrderComposer<S> {
    /// Fill defaults and choose a salt.
    ///
    /// With a non-empty extension the low 160 bits of the salt are taken
    /// from `keccak256(extension)`. A salt supplied on the order must
    /// already satisfy that rule.
    pub fn record(&self, order: &UnsignedLimitOrder) -> Result<OrderRecord, SigningError> {
        order.validate()?;

        let extension = order.interactions.extension();
        let salt = match order.salt {
            Some(salt) if !salt_matches_extension(salt, &extension) => {
                return Err(SigningError::InvalidOrder(
                    "salt does not match keccak256(extension)".to_owned(),
                ));
            }
            Some(salt) => salt,
            None => salt_with_extension(self.salt_source.salt(), &extension),
        };

        // a zero allowed sender on the order keeps whatever the traits carry
        let mut traits = order.maker_traits;
        if !order.allowed_sender.is_zero() {
            traits = traits.with_allowed_sender(order.allowed_sender);
        }
        if !extension.is_empty() {
            traits = traits.with_extension();
        }
        if !order.interactions.pre_interaction.is_empty() {
            traits = traits.with_pre_interaction();
        }
        if !order.interactions.post_interaction.is_empty() {
            traits = traits.with_post_interaction();
        }

        Ok(OrderRecord {
            salt,
            maker: order.maker,
            receiver: order.receiver,
            maker_asset: order.maker_asset,
            taker_asset: order.taker_asset,
            making_amount: order.making_amount,
            taking_amount: order.taking_amount,
            maker_traits: traits.encode()?,
            extension,
            allowed_sender: order.allowed_sender,
            offsets: order.interactions.offsets(),
            interactions: order.interactions.concat(),
        })
    }

    /// The EIP-712 digest of `record`.
    pub fn order_hash(&self, record: &OrderRecord) -> Result<B256, SigningError> {
        let version = self.router.release();
        let message = record.to_typed_message(version);
        signing_digest(&self.domain(), OrderRecord::schema(version), &message)
    }

    /// Compose, hash and sign an order.
    pub fn compose(
        &self,
        order: &UnsignedLimitOrder,
        key: &PrivateKey,
    ) -> Result<SignedLimitOrder, SigningError> {
        let record = self.record(order)?;
        let order_hash = self.order_hash(&record)?;
        let signature = key.sign_digest(&order_hash)?;
        Ok(SignedLimitOrder { order_hash, signature, record, version: self.router.release() })
    }
}
