//! Swap DAI for WETH on Polygon, attaching a permit when the allowance is
//! too low and the token supports one.
//!
//! Reads `DEV_PORTAL_TOKEN`, `NODE_URL` and `WALLET_KEY`.
use alloy::{
    primitives::{address, Address, U256},
    providers::ProviderBuilder,
};
use chrono::Utc;
use oneinch_api::{
    types::{AllowanceParams, SwapParams},
    ClientConfig,
};
use oneinch_constants::{ids, FeeModeConfig};
use oneinch_onchain::{build_token_permit, should_use_permit, OnchainReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DAI: Address = address!("0x8f3Cf7ad23Cd3CaDbD9735AFf958023239c6A063");
const WETH: Address = address!("0x7ceB23fD6bC0adD59E62ac25578270cFf1b9f619");

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = ClientConfig::from_env(ids::POLYGON)?;
    let client = config.client();
    let wallet = config.wallet()?;
    let provider = ProviderBuilder::new()
        .disable_recommended_fillers()
        .connect_http(config.require_node_url()?.clone());
    let reader = OnchainReader::new(provider);

    let amount = U256::from(10u64).pow(U256::from(18u64));
    let allowance_params = AllowanceParams { token_address: DAI, wallet_address: wallet.address() };
    let allowance = client.approve_allowance(&allowance_params).await?.allowance()?;

    let mut params = SwapParams::new(DAI, WETH, amount.to_string(), wallet.address(), 1.0);
    if allowance < amount && should_use_permit(&reader, wallet.chain_id(), DAI).await? {
        let spender = client.approve_spender().await?;
        let deadline = U256::from((Utc::now().timestamp() + 2 * 24 * 60 * 60) as u64);
        let permit = build_token_permit(&reader, &wallet, DAI, spender, amount, deadline).await?;
        info!(payload = %permit.payload, "attaching permit");
        params = params.with_permit(permit.payload.into_string());
    }

    let swap = client.swap(params).await?;
    info!(to_amount = %swap.to_amount, "received swap transaction");

    let tx = swap.tx.to_tx_builder()?;
    let receipt = wallet.execute(&reader, &FeeModeConfig::default(), tx).await?;
    info!("swap complete: https://polygonscan.com/tx/{}", receipt.transaction_hash);
    Ok(())
}
