//! Integration Tests - Façade Fan-out over Mock Marketplaces
//!
//! Tests the aggregation façade against mock adapters: per-marketplace
//! response isolation, registry-order fan-out, fail-fast routing for
//! take/cancel, and validation short-circuits. Uses mockall for trait
//! mocking and tokio::test for async tests.

use std::sync::Arc;

use alloy::primitives::{Address, TxHash, U256, address};
use mockall::mock;

use nft_trade_aggregator::config::AggregatorConfig;
use nft_trade_aggregator::domain::asset::Asset;
use nft_trade_aggregator::domain::native::{
    NativeOrder, NftStandard, TradeDirection, ZeroExNftOrder,
};
use nft_trade_aggregator::domain::order::{
    MakeOrderParams, MarketplaceId, MarketplaceResponse, NormalizedOrder, OrderFilter, OrderSide,
};
use nft_trade_aggregator::error::TradeError;
use nft_trade_aggregator::ports::chain::TxHandle;
use nft_trade_aggregator::usecases::MarketplaceAggregator;

// ---- Mock Definitions ----

mock! {
    pub Market {}

    #[async_trait::async_trait]
    impl nft_trade_aggregator::ports::marketplace::Marketplace for Market {
        fn id(&self) -> MarketplaceId;
        async fn make_order(&self, params: &MakeOrderParams) -> anyhow::Result<NormalizedOrder>;
        async fn get_orders(&self, filter: &OrderFilter) -> anyhow::Result<Vec<NormalizedOrder>>;
        async fn take_order(&self, order: &NormalizedOrder) -> anyhow::Result<TxHandle>;
        async fn cancel_order(&self, order: &NormalizedOrder) -> anyhow::Result<TxHandle>;
    }
}

// ---- Fixtures ----

const WETH: Address = address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");
const PUNKS: Address = address!("b47e3cd837dDF8e4c57F05d70Ab865de6e193BBB");

fn normalized_order(id: &str, marketplace: MarketplaceId) -> NormalizedOrder {
    let native_order = ZeroExNftOrder {
        direction: TradeDirection::SellNft,
        maker: Address::ZERO,
        taker: Address::ZERO,
        expiry: U256::from(1_800_000_000u64),
        nonce: U256::from(1u64),
        erc20_token: WETH,
        erc20_token_amount: U256::from(1_000_000u64),
        fees: vec![],
        nft_standard: NftStandard::Erc721,
        nft_token: PUNKS,
        nft_token_id: U256::from(7u64),
        nft_token_amount: U256::from(1u64),
        signature: None,
    };
    NormalizedOrder {
        id: id.to_string(),
        maker: Address::ZERO,
        side: OrderSide::Sell,
        maker_assets: vec![Asset::erc721(PUNKS, U256::from(7u64))],
        taker_assets: vec![Asset::erc20(WETH, U256::from(1_000_000u64))],
        expiration_time: None,
        native: match marketplace {
            MarketplaceId::Trader => NativeOrder::Trader(native_order),
            _ => NativeOrder::ZeroEx(native_order),
        },
    }
}

fn listing_params() -> MakeOrderParams {
    MakeOrderParams::new(
        vec![Asset::erc721(PUNKS, U256::from(7u64))],
        vec![Asset::erc20(WETH, U256::from(1_000_000u64))],
    )
}

fn mock_with_id(id: MarketplaceId) -> MockMarket {
    let mut market = MockMarket::new();
    market.expect_id().returning(move || id);
    market
}

/// Route façade logs through the test harness's captured output.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("nft_trade_aggregator=debug")
        .with_test_writer()
        .try_init();
}

fn aggregator(adapters: Vec<Arc<MockMarket>>) -> MarketplaceAggregator {
    init_tracing();
    let adapters = adapters
        .into_iter()
        .map(|a| a as Arc<dyn nft_trade_aggregator::ports::marketplace::Marketplace>)
        .collect();
    MarketplaceAggregator::with_adapters(adapters, 1, AggregatorConfig::default())
}

// ---- make_order ----

#[tokio::test]
async fn make_order_isolates_marketplace_failures() {
    let mut opensea = mock_with_id(MarketplaceId::OpenSea);
    opensea
        .expect_make_order()
        .times(1)
        .returning(|_| Ok(normalized_order("os-1", MarketplaceId::OpenSea)));

    let mut zeroex = mock_with_id(MarketplaceId::ZeroEx);
    zeroex
        .expect_make_order()
        .times(1)
        .returning(|_| Err(anyhow::anyhow!("rate limited")));

    let facade = aggregator(vec![Arc::new(opensea), Arc::new(zeroex)]);
    let responses = facade.make_order(&listing_params()).await.unwrap();

    assert_eq!(responses.len(), 2);
    // Registry order: OpenSea before ZeroEx.
    assert_eq!(responses[0].marketplace, MarketplaceId::OpenSea);
    assert_eq!(responses[0].data().unwrap().id, "os-1");
    assert_eq!(responses[1].marketplace, MarketplaceId::ZeroEx);
    assert_eq!(responses[1].error().unwrap().message, "rate limited");
}

#[tokio::test]
async fn make_order_respects_marketplace_subset() {
    let mut opensea = mock_with_id(MarketplaceId::OpenSea);
    opensea.expect_make_order().never();

    let mut zeroex = mock_with_id(MarketplaceId::ZeroEx);
    zeroex
        .expect_make_order()
        .times(1)
        .returning(|_| Ok(normalized_order("zx-1", MarketplaceId::ZeroEx)));

    let facade = aggregator(vec![Arc::new(opensea), Arc::new(zeroex)]);
    let params = MakeOrderParams {
        marketplaces: Some(vec![MarketplaceId::ZeroEx]),
        ..listing_params()
    };
    let responses = facade.make_order(&params).await.unwrap();

    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].marketplace, MarketplaceId::ZeroEx);
}

#[tokio::test]
async fn validation_failure_reaches_no_adapter() {
    let mut opensea = mock_with_id(MarketplaceId::OpenSea);
    opensea.expect_make_order().never();

    let facade = aggregator(vec![Arc::new(opensea)]);
    let params = MakeOrderParams::new(
        vec![Asset::erc20(WETH, U256::from(1u64))],
        vec![Asset::erc20(WETH, U256::from(2u64))],
    );
    let err = facade.make_order(&params).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "trading a fungible asset for a fungible asset is not supported"
    );
}

#[tokio::test]
async fn sell_and_buy_conveniences_build_the_right_legs() {
    let mut zeroex = mock_with_id(MarketplaceId::ZeroEx);
    zeroex
        .expect_make_order()
        .withf(|params: &MakeOrderParams| {
            params.maker_assets[0].is_non_fungible() && params.taker_assets[0].is_fungible()
        })
        .times(1)
        .returning(|_| Ok(normalized_order("sell-1", MarketplaceId::ZeroEx)));
    zeroex
        .expect_make_order()
        .withf(|params: &MakeOrderParams| {
            params.maker_assets[0].is_fungible() && params.taker_assets[0].is_non_fungible()
        })
        .times(1)
        .returning(|_| Ok(normalized_order("buy-1", MarketplaceId::ZeroEx)));

    let facade = aggregator(vec![Arc::new(zeroex)]);
    let nft = Asset::erc721(PUNKS, U256::from(7u64));
    let price = nft_trade_aggregator::domain::order::FungibleToken::new(
        WETH,
        U256::from(1_000_000u64),
    );

    let sold = facade
        .make_sell_order(nft.clone(), price.clone())
        .await
        .unwrap();
    assert!(sold[0].is_ok());

    let bought = facade.make_buy_order(nft, price).await.unwrap();
    assert!(bought[0].is_ok());
}

// ---- get_orders ----

#[tokio::test]
async fn get_orders_flattens_lists_into_tagged_entries() {
    let mut opensea = mock_with_id(MarketplaceId::OpenSea);
    opensea.expect_get_orders().times(1).returning(|_| {
        Ok(vec![
            normalized_order("os-1", MarketplaceId::OpenSea),
            normalized_order("os-2", MarketplaceId::OpenSea),
        ])
    });

    let mut trader = mock_with_id(MarketplaceId::Trader);
    trader
        .expect_get_orders()
        .times(1)
        .returning(|_| Err(anyhow::anyhow!("book unavailable")));

    let facade = aggregator(vec![Arc::new(opensea), Arc::new(trader)]);
    let responses = facade.get_orders(&OrderFilter::default()).await;

    // Two orders from OpenSea plus one error entry for the failed book.
    assert_eq!(responses.len(), 3);
    assert_eq!(responses[0].marketplace, MarketplaceId::OpenSea);
    assert_eq!(responses[0].data().unwrap().id, "os-1");
    assert_eq!(responses[1].data().unwrap().id, "os-2");
    assert_eq!(responses[2].marketplace, MarketplaceId::Trader);
    assert_eq!(responses[2].error().unwrap().message, "book unavailable");
}

// ---- take_order / cancel_order ----

#[tokio::test]
async fn take_routes_to_the_originating_marketplace() {
    let mut zeroex = mock_with_id(MarketplaceId::ZeroEx);
    zeroex
        .expect_take_order()
        .times(1)
        .returning(|_| Ok(TxHandle::new(TxHash::ZERO)));

    let mut trader = mock_with_id(MarketplaceId::Trader);
    trader.expect_take_order().never();

    let facade = aggregator(vec![Arc::new(zeroex), Arc::new(trader)]);
    let response = MarketplaceResponse::ok(
        MarketplaceId::ZeroEx,
        normalized_order("zx-1", MarketplaceId::ZeroEx),
    );
    let outcome = facade.take_order(&response).await.unwrap();
    assert_eq!(outcome.marketplace, MarketplaceId::ZeroEx);
    assert!(outcome.is_ok());
}

#[tokio::test]
async fn take_fails_fast_for_unregistered_marketplace() {
    let mut zeroex = mock_with_id(MarketplaceId::ZeroEx);
    zeroex.expect_take_order().never();

    let facade = aggregator(vec![Arc::new(zeroex)]);
    let response = MarketplaceResponse::ok(
        MarketplaceId::OpenSea,
        normalized_order("os-1", MarketplaceId::OpenSea),
    );
    let err = facade.take_order(&response).await.unwrap_err();
    assert!(matches!(
        err,
        TradeError::UnknownMarketplace(MarketplaceId::OpenSea)
    ));
}

#[tokio::test]
async fn cancel_requires_a_successful_response_entry() {
    let mut zeroex = mock_with_id(MarketplaceId::ZeroEx);
    zeroex.expect_cancel_order().never();

    let facade = aggregator(vec![Arc::new(zeroex)]);
    let response = MarketplaceResponse::<NormalizedOrder>::err(
        MarketplaceId::ZeroEx,
        nft_trade_aggregator::error::MarketplaceError::msg("upstream failure"),
    );
    let err = facade.cancel_order(&response).await.unwrap_err();
    assert!(matches!(
        err,
        TradeError::MissingOrderData(MarketplaceId::ZeroEx)
    ));
}

#[tokio::test]
async fn cancel_surfaces_marketplace_failure_in_the_response() {
    let mut zeroex = mock_with_id(MarketplaceId::ZeroEx);
    zeroex
        .expect_cancel_order()
        .times(1)
        .returning(|_| Err(anyhow::anyhow!("nonce already cancelled")));

    let facade = aggregator(vec![Arc::new(zeroex)]);
    let response = MarketplaceResponse::ok(
        MarketplaceId::ZeroEx,
        normalized_order("zx-1", MarketplaceId::ZeroEx),
    );
    let outcome = facade.cancel_order(&response).await.unwrap();
    assert_eq!(
        outcome.error().unwrap().message,
        "nonce already cancelled"
    );
}
