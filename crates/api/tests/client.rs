//! Integration tests for [`AggregatorClient`] against a local server.
use alloy::primitives::{address, Address, U256};
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use futures_util::{StreamExt, TryStreamExt};
use oneinch_api::{
    types::{AllowanceParams, QuoteParams, SwapParams},
    AggregatorClient, ApiError, OrderSource, OrderSubmitter,
};
use oneinch_constants::routers;
use oneinch_test_utils::users::vector_wallet;
use oneinch_types::{FixedSalt, OrderComposer, UnsignedLimitOrder};
use serde_json::{json, Value};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};
use url::Url;

const DAI: Address = address!("0x8f3Cf7ad23Cd3CaDbD9735AFf958023239c6A063");
const WETH: Address = address!("0x7ceB23fD6bC0adD59E62ac25578270cFf1b9f619");
const MAKER: Address = address!("0x2c9b2DBdbA8A9c969Ac24153f5C1c23CB0e63914");
const REQUEST_ID: &str = "0f8fad5b-d9cb-469f-a165-70867728950e";

type Posted = Arc<Mutex<Vec<Value>>>;

fn authorized(headers: &HeaderMap) -> bool {
    headers.get("authorization").and_then(|v| v.to_str().ok()) == Some("Bearer token")
        && headers
            .get("user-agent")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ua| ua.starts_with("oneinch-sdk-rs/"))
}

fn error_body(status: StatusCode, description: &str) -> Response {
    let body = json!({
        "error": status.canonical_reason(),
        "description": description,
        "statusCode": status.as_u16(),
        "requestId": REQUEST_ID,
        "meta": [{"value": "src", "type": "param"}],
    });
    (status, Json(body)).into_response()
}

async fn quote(headers: HeaderMap, Query(q): Query<HashMap<String, String>>) -> Response {
    if !authorized(&headers) {
        return error_body(StatusCode::UNAUTHORIZED, "missing api key");
    }
    // Echo the amount so the caller can check normalization.
    Json(json!({ "toAmount": q.get("amount"), "gas": 150000 })).into_response()
}

async fn swap(Query(q): Query<HashMap<String, String>>) -> Response {
    let details = ["includeTokensInfo", "includeProtocols", "includeGas"]
        .iter()
        .all(|k| q.get(*k).map(String::as_str) == Some("true"));
    if !details {
        return error_body(StatusCode::BAD_REQUEST, "details not requested");
    }
    Json(json!({
        "toAmount": "5",
        "tx": {
            "from": q.get("from"),
            "to": "0x1111111254eeb25477b68fb85ed929f73a960582",
            "data": "0x12aa3caf",
            "value": "0",
            "gas": 180000,
            "gasPrice": "30000000000",
        }
    }))
    .into_response()
}

async fn allowance(Query(q): Query<HashMap<String, String>>) -> Response {
    if q.contains_key("tokenAddress") && q.contains_key("walletAddress") {
        Json(json!({ "allowance": U256::MAX.to_string() })).into_response()
    } else {
        error_body(StatusCode::BAD_REQUEST, "missing params")
    }
}

async fn spender() -> Response {
    Json(json!({ "address": "0x1111111254eeb25477b68fb85ed929f73a960582" })).into_response()
}

async fn liquidity() -> Response {
    (StatusCode::BAD_GATEWAY, "upstream unavailable").into_response()
}

async fn submit(State(posted): State<Posted>, Json(body): Json<Value>) -> StatusCode {
    posted.lock().unwrap().push(body);
    StatusCode::CREATED
}

fn order_json(i: usize) -> Value {
    json!({
        "orderHash": format!("0x{i:064x}"),
        "signature": "0x00",
        "createDateTime": "2024-01-01T00:00:00.000Z",
        "data": {
            "salt": i.to_string(),
            "makerAsset": "0x8f3cf7ad23cd3cadbd9735aff958023239c6a063",
            "takerAsset": "0x7ceb23fd6bc0add59e62ac25578270cff1b9f619",
            "maker": "0x2c9b2dbdba8a9c969ac24153f5c1c23cb0e63914",
            "receiver": "0x0000000000000000000000000000000000000000",
            "allowedSender": "0x0000000000000000000000000000000000000000",
            "makingAmount": "1",
            "takingAmount": "2",
            "offsets": "0",
            "interactions": "0x"
        }
    })
}

async fn orders(
    Path(maker): Path<String>,
    Query(q): Query<HashMap<String, String>>,
) -> Response {
    if maker.to_lowercase() != "0x2c9b2dbdba8a9c969ac24153f5c1c23cb0e63914" {
        return error_body(StatusCode::NOT_FOUND, "unknown maker");
    }
    let page: usize = q.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let limit: usize = q.get("limit").and_then(|p| p.parse().ok()).unwrap_or(100);
    // 150 orders in total.
    let start = (page - 1) * limit;
    let end = (start + limit).min(150);
    let items: Vec<_> = (start..end).map(order_json).collect();
    Json(Value::Array(items)).into_response()
}

async fn serve(posted: Posted) -> Url {
    let router = Router::new()
        .route("/swap/v5.2/137/quote", get(quote))
        .route("/swap/v5.2/137/swap", get(swap))
        .route("/swap/v5.2/137/approve/allowance", get(allowance))
        .route("/swap/v5.2/137/approve/spender", get(spender))
        .route("/swap/v5.2/137/liquidity-sources", get(liquidity))
        .route("/orderbook/v3.0/137", post(submit))
        .route("/orderbook/v3.0/137/address/{maker}", get(orders))
        .with_state(posted);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
    Url::parse(&format!("http://{addr}")).unwrap()
}

async fn client() -> (AggregatorClient, Posted) {
    let posted = Posted::default();
    let url = serve(posted.clone()).await;
    (AggregatorClient::new(url, "token", 137), posted)
}

#[tokio::test]
async fn quote_expands_scientific_amounts() {
    let (client, _) = client().await;
    let resp = client.quote(&QuoteParams::new(DAI, WETH, "1e+18")).await.unwrap();
    assert_eq!(resp.to_amount, "1000000000000000000");
    assert_eq!(resp.gas, Some(150_000));
}

#[tokio::test]
async fn error_body_carries_request_id() {
    let (client, _) = client().await;
    let unauthorized = AggregatorClient::new(client.url().clone(), "wrong", 137);
    let err = unauthorized.quote(&QuoteParams::new(DAI, WETH, "1")).await.unwrap_err();

    assert_eq!(err.code(), "api");
    assert_eq!(err.request_id(), Some(REQUEST_ID));
    assert_eq!(err.status(), Some(reqwest::StatusCode::UNAUTHORIZED));
    let ApiError::Remote(body) = err else { panic!("expected an error body") };
    assert_eq!(body.description, "missing api key");
    assert_eq!(body.meta.len(), 1);
}

#[tokio::test]
async fn non_json_failure_is_http_error() {
    let (client, _) = client().await;
    let err = client.liquidity_sources().await.unwrap_err();
    assert!(matches!(
        err,
        ApiError::Http { status, ref body }
            if status == reqwest::StatusCode::BAD_GATEWAY && body == "upstream unavailable"
    ));
    assert_eq!(err.request_id(), None);
}

#[tokio::test]
async fn swap_requests_details_and_builds_tx() {
    let (client, _) = client().await;
    let resp = client.swap(SwapParams::new(DAI, WETH, "1000", MAKER, 1.0)).await.unwrap();
    assert_eq!(resp.tx.from, MAKER);
    let builder = resp.tx.to_tx_builder().unwrap();
    assert_eq!(builder.to(), Some(routers::ROUTER_V5));
}

#[tokio::test]
async fn invalid_params_never_reach_the_server() {
    let (client, _) = client().await;
    let err = client.swap(SwapParams::new(DAI, WETH, "1000", MAKER, 75.0)).await.unwrap_err();
    assert_eq!(err.code(), "invalid_param");
}

#[tokio::test]
async fn approve_endpoints() {
    let (client, _) = client().await;
    assert_eq!(client.approve_spender().await.unwrap(), routers::ROUTER_V5);

    let params = AllowanceParams { token_address: DAI, wallet_address: MAKER };
    let allowance = client.approve_allowance(&params).await.unwrap();
    assert_eq!(allowance.allowance().unwrap(), U256::MAX);
}

#[tokio::test]
async fn submits_order_payload() {
    let (client, posted) = client().await;
    let composer = OrderComposer::new(137, routers::V5)
        .with_salt_source(FixedSalt(U256::from(100_000_000u64)));
    let wallet = vector_wallet(137);
    let order = UnsignedLimitOrder::new()
        .with_maker(wallet.address())
        .with_assets(DAI, WETH)
        .with_amounts(U256::from(1_000_000u64), U256::from(1_000_000_000u64));
    let signed = composer.compose(&order, wallet.key()).unwrap();

    // The server answers with an empty body.
    client.submit_order(signed.clone()).await.unwrap();

    let posted = posted.lock().unwrap().clone();
    assert_eq!(posted.len(), 1);
    assert_eq!(posted[0], serde_json::to_value(signed.to_payload()).unwrap());
    assert_eq!(posted[0]["data"]["salt"], "100000000");
}

#[tokio::test]
async fn streams_all_pages() {
    let (client, _) = client().await;
    let orders: Vec<_> = client.orders_by_maker(MAKER).try_collect().await.unwrap();
    assert_eq!(orders.len(), 150);
    assert_eq!(orders[149].data.salt, "149");
}

#[tokio::test]
async fn stream_ends_after_error() {
    let (client, _) = client().await;
    let stranger = address!("0x0000000000000000000000000000000000000001");
    let results: Vec<_> = client.orders_by_maker(stranger).collect().await;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].as_ref().unwrap_err().request_id(), Some(REQUEST_ID));
}
