use crate::{OnchainError, OnchainReader, SignedTx, TxBuilder, Wallet};
use alloy::{
    network::ReceiptResponse, primitives::B256, providers::Provider,
    rpc::types::TransactionReceipt,
};
use oneinch_constants::FeeModeConfig;
use std::time::Duration;
use tracing::{debug, info, instrument, trace};

/// Interval between receipt polls.
pub const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(1);

impl<P: Provider> OnchainReader<P> {
    /// Send a signed transaction, returning its hash.
    #[instrument(skip_all, fields(hash = %tx.hash()))]
    pub async fn broadcast(&self, tx: &SignedTx) -> Result<B256, OnchainError> {
        self.send_raw_transaction(&tx.encoded()).await
    }

    /// Poll for the receipt of `hash` every [`RECEIPT_POLL_INTERVAL`] until
    /// one is returned or the guard's token is cancelled.
    ///
    /// A receipt with a failed status is reported as
    /// [`OnchainError::TxReverted`].
    #[instrument(skip_all, fields(%hash))]
    pub async fn wait_for_receipt(&self, hash: B256) -> Result<TransactionReceipt, OnchainError> {
        let mut polls = 0u64;
        loop {
            if let Some(receipt) = self.transaction_receipt(hash).await? {
                debug!(polls, block = ?receipt.block_number, "receipt found");
                if !ReceiptResponse::status(&receipt) {
                    return Err(OnchainError::TxReverted(hash));
                }
                return Ok(receipt);
            }
            polls += 1;
            trace!(polls, "transaction pending");
            self.guard().sleep(RECEIPT_POLL_INTERVAL).await?;
        }
    }

    /// Broadcast and wait for the receipt.
    pub async fn send_and_wait(&self, tx: &SignedTx) -> Result<TransactionReceipt, OnchainError> {
        let hash = self.broadcast(tx).await?;
        self.wait_for_receipt(hash).await
    }
}

impl Wallet {
    /// Build, sign, broadcast and wait for a transaction from this wallet.
    #[instrument(skip_all, fields(from = %self.address(), chain_id = self.chain_id()))]
    pub async fn execute<P: Provider>(
        &self,
        reader: &OnchainReader<P>,
        fees: &FeeModeConfig,
        tx: TxBuilder,
    ) -> Result<TransactionReceipt, OnchainError> {
        let signed = tx.build(reader, self.address(), fees).await?.sign(self)?;
        let receipt = reader.send_and_wait(&signed).await?;
        info!(hash = %signed.hash(), "transaction confirmed");
        Ok(receipt)
    }
}
