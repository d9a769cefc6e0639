//! Sign a limit order selling DAI for WETH on Polygon and post it to the
//! orderbook.
//!
//! Reads `DEV_PORTAL_TOKEN` and `WALLET_KEY`.
use alloy::primitives::{address, Address, U256};
use oneinch_api::{ClientConfig, OrderSender};
use oneinch_constants::{ids, RouterVersion};
use oneinch_types::{OrderComposer, UnsignedLimitOrder};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DAI: Address = address!("0x8f3Cf7ad23Cd3CaDbD9735AFf958023239c6A063");
const WETH: Address = address!("0x7ceB23fD6bC0adD59E62ac25578270cFf1b9f619");

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = ClientConfig::from_env(ids::POLYGON)?;
    let composer = OrderComposer::for_chain(ids::POLYGON, RouterVersion::V5)?;
    let sender = OrderSender::new(config.wallet()?, composer, config.client())?;

    let order = UnsignedLimitOrder::new()
        .with_assets(DAI, WETH)
        .with_amounts(U256::from(10u64.pow(18)), U256::from(4 * 10u64.pow(14)));
    let signed = sender.sign_and_send_order(order).await?;

    info!(order_hash = %signed.order_hash(), "order posted");
    Ok(())
}
