//! Integration tests for broadcasting and receipt polling.
use alloy::{
    network::ReceiptResponse,
    primitives::{address, Address, B256, U256},
};
use oneinch_constants::FeeModeConfig;
use oneinch_onchain::{IoGuard, OnchainError, OnchainReader, SignedTx, TxBuilder, Wallet};
use oneinch_test_utils::{
    rpc::{mocked_reader, receipt_json},
    users::test_wallet,
};
use serde_json::Value;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

const ROUTER: Address = address!("0x1111111254eeb25477b68fb85ed929f73a960582");

/// A transaction with every field supplied, so building needs no node.
fn resolved_tx() -> TxBuilder {
    TxBuilder::new()
        .with_to(ROUTER)
        .with_chain_id(137)
        .with_nonce(4)
        .with_gas(21_000)
        .with_max_priority_fee_per_gas(U256::from(1_000_000_000u64))
        .with_max_fee_per_gas(U256::from(2_000_000_000u64))
}

async fn signed(wallet: &Wallet) -> SignedTx {
    let (reader, _asserter) = mocked_reader();
    resolved_tx()
        .build(&reader, wallet.address(), &FeeModeConfig::default())
        .await
        .unwrap()
        .sign(wallet)
        .unwrap()
}

#[tokio::test(start_paused = true)]
async fn polls_until_receipt() {
    let wallet = test_wallet(0, 137);
    let tx = signed(&wallet).await;
    let (reader, asserter) = mocked_reader();

    asserter.push_success(&tx.hash());
    asserter.push_success(&Value::Null);
    asserter.push_success(&Value::Null);
    asserter.push_success(&receipt_json(tx.hash(), wallet.address(), ROUTER, true));

    let start = Instant::now();
    let receipt = reader.send_and_wait(&tx).await.unwrap();

    assert_eq!(receipt.transaction_hash, tx.hash());
    assert!(ReceiptResponse::status(&receipt));
    assert_eq!(start.elapsed(), Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn failed_status_is_reverted() {
    let wallet = test_wallet(1, 137);
    let tx = signed(&wallet).await;
    let (reader, asserter) = mocked_reader();

    asserter.push_success(&receipt_json(tx.hash(), wallet.address(), ROUTER, false));
    let err = reader.wait_for_receipt(tx.hash()).await.unwrap_err();
    assert!(matches!(err, OnchainError::TxReverted(hash) if hash == tx.hash()));
    assert_eq!(err.code(), "tx_reverted");
}

#[tokio::test(start_paused = true)]
async fn cancellation_stops_polling() {
    let token = CancellationToken::new();
    let (reader, asserter) = mocked_reader();
    let reader = reader.with_guard(IoGuard::new().with_token(token.clone()));
    for _ in 0..10 {
        asserter.push_success(&Value::Null);
    }

    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(2_500)).await;
        token.cancel();
    });

    let start = Instant::now();
    let err = reader.wait_for_receipt(B256::repeat_byte(0x33)).await.unwrap_err();
    assert!(matches!(err, OnchainError::Cancelled));
    assert!(err.is_transient());
    assert_eq!(start.elapsed(), Duration::from_millis(2_500));
    canceller.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn transport_failure_within_timeout() {
    let (reader, _asserter) = mocked_reader();
    let guard = IoGuard::new().with_timeout(Duration::from_secs(5));
    let reader: OnchainReader<_> = reader.with_guard(guard);

    // Nothing queued: the mocked transport fails instead of hanging, so the
    // call returns before the timeout with a transport error.
    let err = reader.chain_id().await.unwrap_err();
    assert_eq!(err.code(), "network");
}

#[tokio::test(start_paused = true)]
async fn execute_builds_signs_and_waits() {
    let wallet = test_wallet(2, 137);
    let expected = signed(&wallet).await;
    let (reader, asserter) = mocked_reader();

    asserter.push_success(&expected.hash());
    asserter.push_success(&receipt_json(expected.hash(), wallet.address(), ROUTER, true));

    let receipt =
        wallet.execute(&reader, &FeeModeConfig::default(), resolved_tx()).await.unwrap();
    assert_eq!(receipt.transaction_hash, expected.hash());
    assert_eq!(receipt.from, wallet.address());
}

#[tokio::test]
async fn broadcast_surfaces_node_rejection() {
    let wallet = test_wallet(3, 137);
    let tx = signed(&wallet).await;
    let (reader, asserter) = mocked_reader();
    asserter.push_failure_msg("nonce too low");

    let err = reader.broadcast(&tx).await.unwrap_err();
    assert!(matches!(err, OnchainError::Rpc { ref message, .. } if message == "nonce too low"));
}
