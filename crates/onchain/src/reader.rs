use crate::{IoGuard, OnchainError};
use alloy::{
    network::TransactionBuilder,
    primitives::{Address, Bytes, B256, U256},
    providers::Provider,
    rpc::types::{TransactionReceipt, TransactionRequest},
    transports::TransportResult,
};
use oneinch_types::{pack, unpack, AbiValue, Erc20Method, PrimitiveError};
use std::future::IntoFuture;
use tracing::{debug, instrument, warn};

/// Typed read-only calls against a JSON-RPC node.
///
/// Every call goes through the reader's [`IoGuard`], so it can be cancelled
/// and timed out by the caller. Nothing is cached and nothing is retried.
#[derive(Debug, Clone)]
pub struct OnchainReader<P> {
    provider: P,
    guard: IoGuard,
}

impl<P> OnchainReader<P> {
    /// Create a reader with a default guard.
    pub fn new(provider: P) -> Self {
        Self { provider, guard: IoGuard::default() }
    }

    /// Replace the guard.
    pub fn with_guard(self, guard: IoGuard) -> Self {
        Self { guard, ..self }
    }

    /// Get the provider.
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Get the guard.
    pub const fn guard(&self) -> &IoGuard {
        &self.guard
    }
}

impl<P: Provider> OnchainReader<P> {
    async fn guarded<T, F>(&self, call: F) -> Result<T, OnchainError>
    where
        F: IntoFuture<Output = TransportResult<T>>,
    {
        self.guard.run(async { call.await.map_err(Into::into) }).await
    }

    async fn call_erc20(
        &self,
        token: Address,
        method: Erc20Method,
        args: &[AbiValue],
    ) -> Result<Bytes, OnchainError> {
        let tx = TransactionRequest::default().with_to(token).with_input(pack(method, args)?);
        self.guarded(self.provider.call(tx)).await
    }

    async fn read_erc20(
        &self,
        token: Address,
        method: Erc20Method,
        args: &[AbiValue],
    ) -> Result<AbiValue, OnchainError> {
        let data = self.call_erc20(token, method, args).await?;
        unpack(method, &data)
            .inspect_err(|e| warn!(%e, method = method.signature(), "failed to decode return data"))
            .map_err(Into::into)
    }

    /// Read the token's `name()`.
    #[instrument(skip_all, fields(%token))]
    pub async fn read_name(&self, token: Address) -> Result<String, OnchainError> {
        Ok(self.read_erc20(token, Erc20Method::Name, &[]).await?.try_into_string()?)
    }

    /// Read the token's `symbol()`.
    #[instrument(skip_all, fields(%token))]
    pub async fn read_symbol(&self, token: Address) -> Result<String, OnchainError> {
        Ok(self.read_erc20(token, Erc20Method::Symbol, &[]).await?.try_into_string()?)
    }

    /// Read the token's `decimals()`.
    #[instrument(skip_all, fields(%token))]
    pub async fn read_decimals(&self, token: Address) -> Result<u8, OnchainError> {
        let value = self.read_erc20(token, Erc20Method::Decimals, &[]).await?.try_into_uint()?;
        u8::try_from(value)
            .map_err(|_| PrimitiveError::AbiDecode(format!("{value} does not fit in uint8")).into())
    }

    /// Read the token's `nonces(owner)`, the next permit nonce.
    #[instrument(skip_all, fields(%token, %owner))]
    pub async fn read_nonce(&self, token: Address, owner: Address) -> Result<U256, OnchainError> {
        let args = [AbiValue::Address(owner)];
        Ok(self.read_erc20(token, Erc20Method::Nonces, &args).await?.try_into_uint()?)
    }

    /// Read `allowance(owner, spender)`.
    #[instrument(skip_all, fields(%token, %owner, %spender))]
    pub async fn read_allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256, OnchainError> {
        let args = [AbiValue::Address(owner), AbiValue::Address(spender)];
        Ok(self.read_erc20(token, Erc20Method::Allowance, &args).await?.try_into_uint()?)
    }

    /// Read the token's `PERMIT_TYPEHASH()`.
    ///
    /// A token without the constant answers with empty or all-zero data,
    /// which is reported as [`OnchainError::PermitUnsupported`].
    #[instrument(skip_all, fields(%token))]
    pub async fn read_permit_typehash(&self, token: Address) -> Result<B256, OnchainError> {
        let data = self.call_erc20(token, Erc20Method::PermitTypehash, &[]).await?;
        if data.iter().all(|b| *b == 0) {
            return Err(OnchainError::PermitUnsupported(token));
        }
        Ok(unpack(Erc20Method::PermitTypehash, &data)?.try_into_bytes32()?)
    }

    /// `eth_maxPriorityFeePerGas`.
    #[instrument(skip_all)]
    pub async fn suggest_gas_tip_cap(&self) -> Result<U256, OnchainError> {
        self.guarded(self.provider.get_max_priority_fee_per_gas()).await.map(U256::from)
    }

    /// `eth_gasPrice`.
    #[instrument(skip_all)]
    pub async fn suggest_gas_price(&self) -> Result<U256, OnchainError> {
        self.guarded(self.provider.get_gas_price()).await.map(U256::from)
    }

    /// `eth_getTransactionCount` at the pending block.
    #[instrument(skip_all, fields(%owner))]
    pub async fn pending_nonce(&self, owner: Address) -> Result<u64, OnchainError> {
        self.guarded(self.provider.get_transaction_count(owner).pending()).await
    }

    /// `eth_chainId`.
    #[instrument(skip_all)]
    pub async fn chain_id(&self) -> Result<u64, OnchainError> {
        self.guarded(self.provider.get_chain_id()).await
    }

    /// `eth_estimateGas`.
    #[instrument(skip_all)]
    pub async fn estimate_gas(&self, call: TransactionRequest) -> Result<u64, OnchainError> {
        self.guarded(self.provider.estimate_gas(call)).await
    }

    /// `eth_getTransactionReceipt`. `None` while the transaction is pending.
    #[instrument(skip_all, fields(%hash))]
    pub async fn transaction_receipt(
        &self,
        hash: B256,
    ) -> Result<Option<TransactionReceipt>, OnchainError> {
        self.guarded(self.provider.get_transaction_receipt(hash)).await
    }

    /// `eth_sendRawTransaction`, returning the transaction hash.
    #[instrument(skip_all)]
    pub async fn send_raw_transaction(&self, encoded: &[u8]) -> Result<B256, OnchainError> {
        let pending = self.guarded(self.provider.send_raw_transaction(encoded)).await?;
        let hash = *pending.tx_hash();
        debug!(%hash, "transaction sent");
        Ok(hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::{
        primitives::{address, b256},
        providers::ProviderBuilder,
        rpc::json_rpc::ErrorPayload,
        transports::mock::Asserter,
    };
    use oneinch_constants::EIP2612_PERMIT_TYPEHASH;
    use oneinch_types::encode_params;

    const TOKEN: Address = address!("0x45c32fA6DF82ead1e2EF74d17b76547EDdFaFF89");
    const OWNER: Address = address!("0x2a250893f86Dc8497E131508f680338ac647B498");

    fn reader() -> (OnchainReader<impl Provider>, Asserter) {
        let asserter = Asserter::new();
        let provider = ProviderBuilder::new()
            .disable_recommended_fillers()
            .connect_mocked_client(asserter.clone());
        (OnchainReader::new(provider), asserter)
    }

    fn returns(values: &[AbiValue]) -> Bytes {
        encode_params(values).into()
    }

    #[tokio::test]
    async fn reads_erc20_metadata() {
        let (reader, asserter) = reader();
        asserter.push_success(&returns(&[AbiValue::String("Frax".into())]));
        asserter.push_success(&returns(&[AbiValue::String("FRAX".into())]));
        asserter.push_success(&returns(&[AbiValue::Uint(U256::from(18u8))]));
        asserter.push_success(&returns(&[AbiValue::Uint(U256::from(3u8))]));
        asserter.push_success(&returns(&[AbiValue::Uint(U256::MAX)]));

        assert_eq!(reader.read_name(TOKEN).await.unwrap(), "Frax");
        assert_eq!(reader.read_symbol(TOKEN).await.unwrap(), "FRAX");
        assert_eq!(reader.read_decimals(TOKEN).await.unwrap(), 18);
        assert_eq!(reader.read_nonce(TOKEN, OWNER).await.unwrap(), U256::from(3u8));
        assert_eq!(reader.read_allowance(TOKEN, OWNER, OWNER).await.unwrap(), U256::MAX);
    }

    #[tokio::test]
    async fn zero_typehash_is_unsupported() {
        let (reader, asserter) = reader();
        asserter.push_success(&B256::ZERO);
        asserter.push_success(&Bytes::new());
        asserter.push_success(&EIP2612_PERMIT_TYPEHASH);

        let err = reader.read_permit_typehash(TOKEN).await.unwrap_err();
        assert!(matches!(err, OnchainError::PermitUnsupported(t) if t == TOKEN));
        assert_eq!(err.code(), "permit_unsupported");
        let err = reader.read_permit_typehash(TOKEN).await.unwrap_err();
        assert_eq!(err.code(), "permit_unsupported");
        assert_eq!(reader.read_permit_typehash(TOKEN).await.unwrap(), EIP2612_PERMIT_TYPEHASH);
    }

    #[tokio::test]
    async fn short_return_data_fails_to_decode() {
        let (reader, asserter) = reader();
        asserter.push_success(&Bytes::from_static(&[0x12]));
        assert_eq!(reader.read_decimals(TOKEN).await.unwrap_err().code(), "abi_decode");
    }

    #[tokio::test]
    async fn chain_params() {
        let (reader, asserter) = reader();
        asserter.push_success(&"0x89");
        asserter.push_success(&"0x3b9aca00");
        asserter.push_success(&"0x77359400");
        asserter.push_success(&"0x7");
        asserter.push_success(&"0x5208");

        assert_eq!(reader.chain_id().await.unwrap(), 137);
        assert_eq!(reader.suggest_gas_tip_cap().await.unwrap(), U256::from(1_000_000_000u64));
        assert_eq!(reader.suggest_gas_price().await.unwrap(), U256::from(2_000_000_000u64));
        assert_eq!(reader.pending_nonce(OWNER).await.unwrap(), 7);
        let call = TransactionRequest::default().with_from(OWNER).with_to(TOKEN);
        assert_eq!(reader.estimate_gas(call).await.unwrap(), 21_000);
    }

    #[tokio::test]
    async fn rpc_errors_surface_verbatim() {
        let (reader, asserter) = reader();
        asserter.push_failure(ErrorPayload {
            code: 3,
            message: "execution reverted".into(),
            data: None,
        });
        let err = reader.read_name(TOKEN).await.unwrap_err();
        assert!(matches!(
            err,
            OnchainError::Rpc { code: 3, ref message } if message == "execution reverted"
        ));
    }

    #[tokio::test]
    async fn pending_receipt_is_none() {
        let (reader, asserter) = reader();
        asserter.push_success(&serde_json::Value::Null);
        let hash = b256!("0x1111111111111111111111111111111111111111111111111111111111111111");
        assert!(reader.transaction_receipt(hash).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn send_raw_returns_hash() {
        let (reader, asserter) = reader();
        let hash = b256!("0x2222222222222222222222222222222222222222222222222222222222222222");
        asserter.push_success(&hash);
        assert_eq!(reader.send_raw_transaction(&[0x02, 0xc0]).await.unwrap(), hash);
    }

    #[tokio::test]
    async fn cancelled_reader_does_no_io() {
        let (reader, _asserter) = reader();
        let reader = reader.with_guard(IoGuard::new());
        reader.guard().token().cancel();
        assert_eq!(reader.chain_id().await.unwrap_err().code(), "cancelled");
    }
}
