use crate::ApiError;
use alloy::primitives::{Address, Bytes, B256, U256};
use oneinch_onchain::TxBuilder;
use oneinch_types::{parse_u256, OrderData, PrimitiveError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Gas limit used for approval transactions returned by the API, which do
/// not carry one.
pub const ERC20_APPROVE_GAS: u64 = 60_000;

/// Largest slippage, in percent, the API accepts.
pub const MAX_SLIPPAGE: f64 = 50.0;

/// Smallest non-zero slippage, in percent, the API accepts.
pub const MIN_SLIPPAGE: f64 = 0.01;

fn check_pair(src: Address, dst: Address, amount: &str) -> Result<(), ApiError> {
    if src == dst {
        return Err(ApiError::invalid("dst", "src and dst tokens must be different"));
    }
    if amount.trim().is_empty() {
        return Err(ApiError::invalid("amount", "amount is required"));
    }
    Ok(())
}

/// Parameters of `GET /swap/v5.2/{chain}/quote`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteParams {
    /// Token to sell.
    pub src: Address,
    /// Token to buy.
    pub dst: Address,
    /// Amount of `src` in base units, as a decimal string.
    pub amount: String,
    /// Comma separated liquidity sources to route through.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocols: Option<String>,
    /// Partner fee, in percent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<f64>,
    /// Gas price in wei, as a decimal string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<String>,
    /// Tokens the route may pass through.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub connector_tokens: Vec<Address>,
    /// Include token metadata in the response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_tokens_info: Option<bool>,
    /// Include the route in the response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_protocols: Option<bool>,
    /// Include the gas estimate in the response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_gas: Option<bool>,
}

impl QuoteParams {
    /// Quote selling `amount` of `src` for `dst`.
    pub fn new(src: Address, dst: Address, amount: impl Into<String>) -> Self {
        Self { src, dst, amount: amount.into(), ..Default::default() }
    }

    /// Set the liquidity sources.
    pub fn with_protocols(self, protocols: impl Into<String>) -> Self {
        Self { protocols: Some(protocols.into()), ..self }
    }

    /// Set the gas price.
    pub fn with_gas_price(self, gas_price: U256) -> Self {
        Self { gas_price: Some(gas_price.to_string()), ..self }
    }

    /// Ask for token metadata, route and gas in the response.
    pub fn with_details(self) -> Self {
        Self {
            include_tokens_info: Some(true),
            include_protocols: Some(true),
            include_gas: Some(true),
            ..self
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ApiError> {
        check_pair(self.src, self.dst, &self.amount)
    }
}

/// Parameters of `GET /swap/v5.2/{chain}/swap`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapParams {
    /// Token to sell.
    pub src: Address,
    /// Token to buy.
    pub dst: Address,
    /// Amount of `src` in base units, as a decimal string.
    pub amount: String,
    /// The address that sends the swap transaction.
    pub from: Address,
    /// Maximum slippage, in percent.
    pub slippage: f64,
    /// Comma separated liquidity sources to route through.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocols: Option<String>,
    /// Partner fee, in percent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<f64>,
    /// Gas price in wei, as a decimal string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<String>,
    /// Tokens the route may pass through.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub connector_tokens: Vec<Address>,
    /// A permit blob authorizing the router to pull `src`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permit: Option<String>,
    /// Recipient of `dst`, if not `from`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver: Option<Address>,
    /// Partner fee recipient.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referrer: Option<Address>,
    /// Skip on-chain simulation of the swap.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_estimate: Option<bool>,
    /// Allow the swap to fill partially.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_partial_fill: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) include_tokens_info: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) include_protocols: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) include_gas: Option<bool>,
}

impl SwapParams {
    /// Swap `amount` of `src` for `dst`, sent from `from`.
    pub fn new(
        src: Address,
        dst: Address,
        amount: impl Into<String>,
        from: Address,
        slippage: f64,
    ) -> Self {
        Self { src, dst, amount: amount.into(), from, slippage, ..Default::default() }
    }

    /// Attach a permit blob.
    pub fn with_permit(self, permit: impl Into<String>) -> Self {
        Self { permit: Some(permit.into()), ..self }
    }

    /// Send the bought tokens to `receiver`.
    pub fn with_receiver(self, receiver: Address) -> Self {
        Self { receiver: Some(receiver), ..self }
    }

    /// Skip simulation. The response then carries no gas estimate.
    pub fn with_disable_estimate(self) -> Self {
        Self { disable_estimate: Some(true), ..self }
    }

    /// Set the liquidity sources.
    pub fn with_protocols(self, protocols: impl Into<String>) -> Self {
        Self { protocols: Some(protocols.into()), ..self }
    }

    /// The swap endpoint always returns token metadata, route and gas.
    pub(crate) fn with_details(self) -> Self {
        Self {
            include_tokens_info: Some(true),
            include_protocols: Some(true),
            include_gas: Some(true),
            ..self
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ApiError> {
        check_pair(self.src, self.dst, &self.amount)?;
        if !(MIN_SLIPPAGE..=MAX_SLIPPAGE).contains(&self.slippage) {
            return Err(ApiError::invalid(
                "slippage",
                format!("{} is outside {MIN_SLIPPAGE}-{MAX_SLIPPAGE}", self.slippage),
            ));
        }
        if let Some(permit) = &self.permit {
            let body = permit.strip_prefix("0x").unwrap_or_default();
            if body.is_empty() || !body.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(ApiError::invalid("permit", "expected 0x-prefixed hex"));
            }
        }
        Ok(())
    }
}

/// Parameters of `GET /swap/v5.2/{chain}/approve/transaction`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveTransactionParams {
    /// Token to approve.
    pub token_address: Address,
    /// Amount to approve, as a decimal string. Unlimited if absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
}

/// Parameters of `GET /swap/v5.2/{chain}/approve/allowance`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowanceParams {
    /// Token to check.
    pub token_address: Address,
    /// Owner of the tokens.
    pub wallet_address: Address,
}

/// Token metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfo {
    /// Contract address.
    pub address: Address,
    /// Ticker.
    pub symbol: String,
    /// Name.
    pub name: String,
    /// Decimals.
    pub decimals: u8,
    /// Logo URL.
    #[serde(rename = "logoURI", default)]
    pub logo_uri: Option<String>,
    /// Labels such as `tokens` or `native`.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Response of the quote endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    /// Metadata of the sold token, when requested.
    #[serde(default)]
    pub from_token: Option<TokenInfo>,
    /// Metadata of the bought token, when requested.
    #[serde(default)]
    pub to_token: Option<TokenInfo>,
    /// Expected amount of the bought token, as a decimal string.
    pub to_amount: String,
    /// The route, when requested.
    #[serde(default)]
    pub protocols: Option<serde_json::Value>,
    /// Estimated gas, when requested.
    #[serde(default)]
    pub gas: Option<u64>,
}

impl QuoteResponse {
    /// The expected amount of the bought token.
    pub fn to_amount(&self) -> Result<U256, PrimitiveError> {
        parse_u256(&self.to_amount)
    }
}

/// The transaction to send for a swap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapTx {
    /// Sender.
    pub from: Address,
    /// Router address.
    pub to: Address,
    /// Router calldata.
    pub data: Bytes,
    /// Native value in wei, as a decimal string.
    pub value: String,
    /// Gas limit. Zero when estimation was disabled.
    #[serde(default)]
    pub gas: u64,
    /// Gas price in wei, as a decimal string.
    pub gas_price: String,
}

impl SwapTx {
    /// The native value.
    pub fn value(&self) -> Result<U256, PrimitiveError> {
        parse_u256(&self.value)
    }

    /// The gas price.
    pub fn gas_price(&self) -> Result<U256, PrimitiveError> {
        parse_u256(&self.gas_price)
    }

    /// A builder for this transaction.
    ///
    /// A zero gas limit is left for the builder to estimate. The gas price
    /// only applies on legacy chains.
    pub fn to_tx_builder(&self) -> Result<TxBuilder, PrimitiveError> {
        let builder = TxBuilder::new()
            .with_to(self.to)
            .with_data(self.data.clone())
            .with_value(self.value()?)
            .with_gas_price(self.gas_price()?);
        Ok(if self.gas > 0 { builder.with_gas(self.gas) } else { builder })
    }
}

/// Response of the swap endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapResponse {
    /// Metadata of the sold token.
    #[serde(default)]
    pub from_token: Option<TokenInfo>,
    /// Metadata of the bought token.
    #[serde(default)]
    pub to_token: Option<TokenInfo>,
    /// Expected amount of the bought token, as a decimal string.
    pub to_amount: String,
    /// The route.
    #[serde(default)]
    pub protocols: Option<serde_json::Value>,
    /// The transaction to send.
    pub tx: SwapTx,
}

/// Response of the allowance endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceResponse {
    /// Allowance, as a decimal string.
    pub allowance: String,
}

impl AllowanceResponse {
    /// The allowance.
    pub fn allowance(&self) -> Result<U256, PrimitiveError> {
        parse_u256(&self.allowance)
    }
}

/// Response of the spender endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpenderResponse {
    /// The router address that must be approved.
    pub address: Address,
}

/// Response of the approve transaction endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveCallData {
    /// Token address.
    pub to: Address,
    /// `approve` calldata.
    pub data: Bytes,
    /// Native value, as a decimal string. Always zero.
    pub value: String,
    /// Gas price in wei, as a decimal string.
    pub gas_price: String,
}

impl ApproveCallData {
    /// A builder for the approval, with [`ERC20_APPROVE_GAS`] as its limit.
    pub fn to_tx_builder(&self) -> Result<TxBuilder, PrimitiveError> {
        Ok(TxBuilder::new()
            .with_to(self.to)
            .with_data(self.data.clone())
            .with_value(parse_u256(&self.value)?)
            .with_gas_price(parse_u256(&self.gas_price)?)
            .with_gas(ERC20_APPROVE_GAS))
    }
}

/// Response of the tokens endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokensResponse {
    /// Tokens keyed by address.
    pub tokens: HashMap<Address, TokenInfo>,
}

/// A liquidity source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolInfo {
    /// Identifier accepted by the `protocols` parameter.
    pub id: String,
    /// Display name.
    pub title: String,
    /// Logo URL.
    #[serde(default)]
    pub img: Option<String>,
}

/// Response of the liquidity sources endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquiditySourcesResponse {
    /// Sources.
    pub protocols: Vec<ProtocolInfo>,
}

/// Fee caps for one speed tier of an EIP-1559 chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeTier {
    /// Tip, in wei.
    pub max_priority_fee_per_gas: String,
    /// Fee cap, in wei.
    pub max_fee_per_gas: String,
}

impl FeeTier {
    /// Apply the tier to a builder.
    pub fn apply(&self, tx: TxBuilder) -> Result<TxBuilder, PrimitiveError> {
        Ok(tx
            .with_max_priority_fee_per_gas(parse_u256(&self.max_priority_fee_per_gas)?)
            .with_max_fee_per_gas(parse_u256(&self.max_fee_per_gas)?))
    }
}

/// Response of the gas price endpoint. Its shape depends on the chain's
/// fee mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GasPriceResponse {
    /// An EIP-1559 chain.
    #[serde(rename_all = "camelCase")]
    Eip1559 {
        /// Base fee of the pending block, in wei.
        base_fee: String,
        /// Slow tier.
        low: FeeTier,
        /// Normal tier.
        medium: FeeTier,
        /// Fast tier.
        high: FeeTier,
        /// Fastest tier.
        instant: FeeTier,
    },
    /// A legacy chain. Prices in wei.
    Legacy {
        /// Normal price.
        standard: String,
        /// Fast price.
        fast: String,
        /// Fastest price.
        instant: String,
    },
}

/// Body of `POST /tx-gateway/v1.1/{chain}/broadcast`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastRequest {
    /// The `0x`-prefixed EIP-2718 encoding.
    pub raw_transaction: String,
}

/// Response of the broadcast endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastResponse {
    /// Hash of the accepted transaction.
    pub transaction_hash: B256,
}

/// An order returned by the orderbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderbookOrder {
    /// EIP-712 digest of the order.
    pub order_hash: B256,
    /// Maker signature.
    pub signature: String,
    /// Order fields.
    pub data: OrderData,
    /// Creation time, ISO 8601.
    #[serde(default)]
    pub create_date_time: Option<String>,
    /// Unfilled amount of the maker asset, as a decimal string.
    #[serde(default)]
    pub remaining_maker_amount: Option<String>,
    /// Maker balance of the maker asset, as a decimal string.
    #[serde(default)]
    pub maker_balance: Option<String>,
    /// Maker allowance to the router, as a decimal string.
    #[serde(default)]
    pub maker_allowance: Option<String>,
}
