use crate::{
    query_pairs,
    types::{
        AllowanceParams, AllowanceResponse, ApproveCallData, ApproveTransactionParams,
        BroadcastRequest, BroadcastResponse, GasPriceResponse, LiquiditySourcesResponse,
        OrderbookOrder, QuoteParams, QuoteResponse, SpenderResponse, SwapParams, SwapResponse,
        TokensResponse,
    },
    ApiError, ClientConfig, ErrorResponse,
};
use alloy::primitives::{Address, B256};
use oneinch_constants::RouterVersion;
use oneinch_onchain::SignedTx;
use oneinch_types::SignedLimitOrder;
use reqwest::{header, RequestBuilder};
use serde::{de::DeserializeOwned, de::IgnoredAny, Serialize};
use tracing::{debug, instrument, warn};
use url::Url;

/// Value of the `User-Agent` header.
const USER_AGENT: &str = concat!("oneinch-sdk-rs/", env!("CARGO_PKG_VERSION"));

/// Path prefix of the swap endpoints.
const SWAP: &str = "swap/v5.2";
/// Path prefix of the gas price endpoint.
const GAS_PRICE: &str = "gas-price/v1.5";
/// Path prefix of the transaction gateway.
const TX_GATEWAY: &str = "tx-gateway/v1.1";
/// Orderbook accepting router v5 orders.
const ORDERBOOK_V3: &str = "orderbook/v3.0";
/// Orderbook accepting router v6 orders.
const ORDERBOOK_V4: &str = "orderbook/v4.0";

/// Client for the aggregation API of one chain.
///
/// Every request carries `Authorization: Bearer <api key>`. Failure
/// statuses are decoded into [`ApiError::Remote`] when the body is an
/// error body.
#[derive(Clone)]
pub struct AggregatorClient {
    /// Base URL of the API.
    url: Url,
    /// Bearer token.
    api_key: String,
    /// Chain whose endpoints are addressed.
    chain_id: u64,
    /// The reqwest client used to send requests.
    client: reqwest::Client,
}

impl core::fmt::Debug for AggregatorClient {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AggregatorClient")
            .field("url", &self.url.as_str())
            .field("chain_id", &self.chain_id)
            .finish_non_exhaustive()
    }
}

impl AggregatorClient {
    /// Create a client with the given URL and reqwest client.
    ///
    /// A path on the base URL, e.g. a proxy at `https://host/1inch`, is
    /// kept in front of every endpoint.
    pub fn new_with_client(
        mut url: Url,
        api_key: impl Into<String>,
        chain_id: u64,
        client: reqwest::Client,
    ) -> Self {
        // relative joins replace the last path segment unless it ends in `/`
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Self { url, api_key: api_key.into(), chain_id, client }
    }

    /// Create a client with the given URL and a new reqwest client.
    pub fn new(url: Url, api_key: impl Into<String>, chain_id: u64) -> Self {
        Self::new_with_client(url, api_key, chain_id, reqwest::Client::new())
    }

    /// Create a client from a config.
    pub fn from_config(config: &ClientConfig) -> Self {
        config.client()
    }

    /// Get the base URL.
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Get the chain ID.
    pub const fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Get the client used to send requests.
    pub const fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Join `prefix/{chain}/path` onto the base URL.
    fn endpoint(&self, prefix: &str, path: &str) -> Result<Url, ApiError> {
        let joined = if path.is_empty() {
            format!("{prefix}/{}", self.chain_id)
        } else {
            format!("{prefix}/{}/{path}", self.chain_id)
        };
        self.url
            .join(&joined)
            .inspect_err(|e| warn!(%e, "Failed to join URL. Not sending request."))
            .map_err(Into::into)
    }

    async fn send<R: DeserializeOwned>(&self, request: RequestBuilder) -> Result<R, ApiError> {
        let response = request
            .bearer_auth(&self.api_key)
            .header(header::USER_AGENT, USER_AGENT)
            .send()
            .await
            .inspect_err(|e| warn!(%e, "Failed to contact the aggregation API"))?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let err = match serde_json::from_slice::<ErrorResponse>(&body) {
                Ok(mut resp) if resp.is_populated() => {
                    if resp.status_code == 0 {
                        resp.status_code = status.as_u16();
                    }
                    ApiError::Remote(resp)
                }
                _ => ApiError::Http { status, body: String::from_utf8_lossy(&body).into_owned() },
            };
            warn!(%status, request_id = err.request_id(), "Aggregation API returned an error");
            return Err(err);
        }

        // An empty body is a success without content.
        let body: &[u8] = if body.is_empty() { b"null" } else { &body };
        serde_json::from_slice(body)
            .inspect_err(|e| warn!(%e, "Failed to parse response from the aggregation API"))
            .map_err(Into::into)
    }

    async fn get_inner<Q, R>(&self, url: Url, query: Option<&Q>) -> Result<R, ApiError>
    where
        Q: Serialize,
        R: DeserializeOwned,
    {
        let mut request = self.client.get(url);
        if let Some(query) = query {
            request = request.query(&query_pairs(query)?);
        }
        self.send(request).await
    }

    async fn post_inner<T, R>(&self, url: Url, body: &T) -> Result<R, ApiError>
    where
        T: Serialize,
        R: DeserializeOwned,
    {
        self.send(self.client.post(url).json(body)).await
    }

    /// Quote a swap.
    #[instrument(skip_all, fields(chain_id = self.chain_id, src = %params.src, dst = %params.dst))]
    pub async fn quote(&self, params: &QuoteParams) -> Result<QuoteResponse, ApiError> {
        params.validate()?;
        self.get_inner(self.endpoint(SWAP, "quote")?, Some(params)).await
    }

    /// Get the transaction for a swap. Token metadata, route and gas are
    /// always requested.
    #[instrument(skip_all, fields(chain_id = self.chain_id, src = %params.src, dst = %params.dst))]
    pub async fn swap(&self, params: SwapParams) -> Result<SwapResponse, ApiError> {
        params.validate()?;
        let params = params.with_details();
        self.get_inner(self.endpoint(SWAP, "swap")?, Some(&params)).await
    }

    /// Get the router address that must be approved to spend tokens.
    #[instrument(skip_all, fields(chain_id = self.chain_id))]
    pub async fn approve_spender(&self) -> Result<Address, ApiError> {
        let resp: SpenderResponse =
            self.get_inner::<(), _>(self.endpoint(SWAP, "approve/spender")?, None).await?;
        Ok(resp.address)
    }

    /// Get the router's allowance over a wallet's tokens.
    #[instrument(skip_all, fields(chain_id = self.chain_id, token = %params.token_address))]
    pub async fn approve_allowance(
        &self,
        params: &AllowanceParams,
    ) -> Result<AllowanceResponse, ApiError> {
        self.get_inner(self.endpoint(SWAP, "approve/allowance")?, Some(params)).await
    }

    /// Get the calldata approving the router to spend a token.
    #[instrument(skip_all, fields(chain_id = self.chain_id, token = %params.token_address))]
    pub async fn approve_transaction(
        &self,
        params: &ApproveTransactionParams,
    ) -> Result<ApproveCallData, ApiError> {
        self.get_inner(self.endpoint(SWAP, "approve/transaction")?, Some(params)).await
    }

    /// List the tokens the aggregator routes.
    #[instrument(skip_all, fields(chain_id = self.chain_id))]
    pub async fn tokens(&self) -> Result<TokensResponse, ApiError> {
        self.get_inner::<(), _>(self.endpoint(SWAP, "tokens")?, None).await
    }

    /// List the liquidity sources the aggregator routes through.
    #[instrument(skip_all, fields(chain_id = self.chain_id))]
    pub async fn liquidity_sources(&self) -> Result<LiquiditySourcesResponse, ApiError> {
        self.get_inner::<(), _>(self.endpoint(SWAP, "liquidity-sources")?, None).await
    }

    /// Get current gas prices.
    #[instrument(skip_all, fields(chain_id = self.chain_id))]
    pub async fn gas_price(&self) -> Result<GasPriceResponse, ApiError> {
        self.get_inner::<(), _>(self.endpoint(GAS_PRICE, "")?, None).await
    }

    /// Send a signed transaction through the transaction gateway.
    #[instrument(skip_all, fields(chain_id = self.chain_id, hash = %tx.hash()))]
    pub async fn broadcast_transaction(&self, tx: &SignedTx) -> Result<B256, ApiError> {
        let body = BroadcastRequest { raw_transaction: tx.raw_hex() };
        let resp: BroadcastResponse =
            self.post_inner(self.endpoint(TX_GATEWAY, "broadcast")?, &body).await?;
        if resp.transaction_hash != tx.hash() {
            warn!(returned = %resp.transaction_hash, "Gateway returned a different hash");
        }
        Ok(resp.transaction_hash)
    }

    /// Submit a signed limit order to the orderbook matching its router
    /// version.
    #[instrument(skip_all, fields(chain_id = self.chain_id, order_hash = %order.order_hash()))]
    pub async fn submit_limit_order(&self, order: &SignedLimitOrder) -> Result<(), ApiError> {
        let prefix = match order.version() {
            RouterVersion::V5 => ORDERBOOK_V3,
            RouterVersion::V6 => ORDERBOOK_V4,
        };
        let _: IgnoredAny = self.post_inner(self.endpoint(prefix, "")?, &order.to_payload()).await?;
        debug!("order accepted");
        Ok(())
    }

    /// Get one page of a maker's orders. Pages start at 1.
    #[instrument(skip_all, fields(chain_id = self.chain_id, %maker, page, limit))]
    pub async fn orders_by_maker_page(
        &self,
        maker: Address,
        page: u32,
        limit: u32,
    ) -> Result<Vec<OrderbookOrder>, ApiError> {
        if page == 0 || limit == 0 {
            return Err(ApiError::invalid("page", "page and limit start at 1"));
        }
        let url = self.endpoint(ORDERBOOK_V3, &format!("address/{maker}"))?;
        let query = [("page", page), ("limit", limit)];
        self.send(self.client.get(url).query(&query)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> AggregatorClient {
        AggregatorClient::new(Url::parse(base).unwrap(), "token", 137)
    }

    #[test]
    fn endpoints() {
        let client = client("https://api.1inch.dev");
        assert_eq!(
            client.endpoint(SWAP, "quote").unwrap().as_str(),
            "https://api.1inch.dev/swap/v5.2/137/quote"
        );
        assert_eq!(
            client.endpoint(ORDERBOOK_V3, "").unwrap().as_str(),
            "https://api.1inch.dev/orderbook/v3.0/137"
        );
        assert_eq!(
            client.endpoint(GAS_PRICE, "").unwrap().as_str(),
            "https://api.1inch.dev/gas-price/v1.5/137"
        );
    }

    #[test]
    fn base_path_is_kept() {
        for base in ["https://proxy.example/1inch", "https://proxy.example/1inch/"] {
            let client = client(base);
            assert_eq!(client.url().as_str(), "https://proxy.example/1inch/");
            assert_eq!(
                client.endpoint(SWAP, "approve/spender").unwrap().as_str(),
                "https://proxy.example/1inch/swap/v5.2/137/approve/spender"
            );
        }
    }

    #[test]
    fn debug_hides_key() {
        let client = client("https://api.1inch.dev");
        assert!(!format!("{client:?}").contains("token"));
    }
}
