//! Mocked JSON-RPC access.
use alloy::{
    primitives::{Address, Bytes, B256},
    providers::{Provider, ProviderBuilder},
    transports::mock::Asserter,
};
use oneinch_onchain::OnchainReader;
use oneinch_types::{encode_params, AbiValue};
use serde_json::{json, Value};

/// A reader over a mocked provider, and the [`Asserter`] that feeds it.
///
/// Responses are consumed in the order they are pushed, one per JSON-RPC
/// request.
pub fn mocked_reader() -> (OnchainReader<impl Provider + Clone>, Asserter) {
    let asserter = Asserter::new();
    let provider = ProviderBuilder::new()
        .disable_recommended_fillers()
        .connect_mocked_client(asserter.clone());
    (OnchainReader::new(provider), asserter)
}

/// Queue the ABI-encoded `values` as the result of the next `eth_call`.
pub fn push_abi_return(asserter: &Asserter, values: &[AbiValue]) {
    asserter.push_success(&Bytes::from(encode_params(values)));
}

/// A minimal EIP-1559 receipt, successful when `status` is true.
pub fn receipt_json(hash: B256, from: Address, to: Address, status: bool) -> Value {
    json!({
        "type": "0x2",
        "status": if status { "0x1" } else { "0x0" },
        "cumulativeGasUsed": "0x5208",
        "logs": [],
        "logsBloom": format!("0x{}", "00".repeat(256)),
        "transactionHash": hash,
        "transactionIndex": "0x0",
        "blockHash": B256::repeat_byte(0x11),
        "blockNumber": "0x10",
        "gasUsed": "0x5208",
        "effectiveGasPrice": "0x77359400",
        "from": from,
        "to": to,
        "contractAddress": null
    })
}
