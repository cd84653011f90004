//! Marketplace aggregation façade.
//!
//! One uniform surface over every registered marketplace adapter.
//! Multi-target operations (make, get) validate once, fail fast on
//! structural errors, then fan out concurrently; each marketplace's
//! outcome lands in its own response entry, so one outage never hides
//! another marketplace's result. Single-target operations (take,
//! cancel) route to the originating adapter.

use std::sync::Arc;

use alloy::primitives::Address;
use futures_util::future::join_all;
use tracing::{info, instrument, warn};

use crate::adapters::opensea::OpenSeaMarketplace;
use crate::adapters::trader::RestOrderBook;
use crate::adapters::zeroex::ProtocolMarketplace;
use crate::config::AggregatorConfig;
use crate::domain::asset::Asset;
use crate::domain::order::{
    FungibleToken, MakeOrderParams, MarketplaceId, MarketplaceResponse, NormalizedOrder,
    OrderFilter,
};
use crate::domain::validate::validate_make_order;
use crate::error::TradeError;
use crate::ports::chain::{ChainClient, TxHandle};
use crate::ports::marketplace::Marketplace;

/// Fixed-slot adapter registry plus per-slot diagnostics.
pub struct MarketplaceAggregator {
    adapters: [Option<Arc<dyn Marketplace>>; MarketplaceId::COUNT],
    /// Marketplaces that did not register, with the reason.
    disabled: Vec<(MarketplaceId, String)>,
    chain_id: u64,
    config: AggregatorConfig,
}

impl MarketplaceAggregator {
    /// Build the registry for `chain`'s chain id.
    ///
    /// A marketplace that is disabled by configuration, does not support
    /// the chain, or fails to construct is skipped with a warning and
    /// recorded in `disabled_marketplaces`; the façade still serves the
    /// rest.
    pub fn new(chain: Arc<dyn ChainClient>, config: AggregatorConfig) -> Self {
        let chain_id = chain.chain_id();
        let mut aggregator = Self {
            adapters: [None, None, None],
            disabled: Vec::new(),
            chain_id,
            config,
        };

        let config = aggregator.config.clone();

        if let Some(reason) = registration_block(
            config.opensea.enabled,
            &config.opensea.supported_chains,
            chain_id,
        ) {
            aggregator.disable(MarketplaceId::OpenSea, reason);
        } else {
            match OpenSeaMarketplace::new(
                Arc::clone(&chain),
                &config.opensea,
                config.default_expiry_seconds,
            ) {
                Ok(adapter) => aggregator.register(Arc::new(adapter)),
                Err(e) => aggregator.disable(MarketplaceId::OpenSea, format!("{e:#}")),
            }
        }

        if let Some(reason) = registration_block(
            config.zeroex.enabled,
            &config.zeroex.supported_chains,
            chain_id,
        ) {
            aggregator.disable(MarketplaceId::ZeroEx, reason);
        } else {
            aggregator.register(Arc::new(ProtocolMarketplace::local(
                Arc::clone(&chain),
                &config.zeroex,
                config.default_expiry_seconds,
                None,
            )));
        }

        if let Some(reason) = registration_block(
            config.trader.enabled,
            &config.trader.supported_chains,
            chain_id,
        ) {
            aggregator.disable(MarketplaceId::Trader, reason);
        } else {
            match RestOrderBook::new(&config.trader) {
                Ok(book) => aggregator.register(Arc::new(ProtocolMarketplace::hosted(
                    Arc::clone(&chain),
                    &config.trader,
                    config.default_expiry_seconds,
                    Arc::new(book),
                ))),
                Err(e) => aggregator.disable(MarketplaceId::Trader, format!("{e:#}")),
            }
        }

        info!(
            chain_id,
            registered = ?aggregator.registered_marketplaces(),
            "Aggregator ready"
        );
        aggregator
    }

    /// Registry built from pre-constructed adapters. Intended for tests
    /// and custom adapter wiring.
    pub fn with_adapters(
        adapters: Vec<Arc<dyn Marketplace>>,
        chain_id: u64,
        config: AggregatorConfig,
    ) -> Self {
        let mut aggregator = Self {
            adapters: [None, None, None],
            disabled: Vec::new(),
            chain_id,
            config,
        };
        for adapter in adapters {
            aggregator.register(adapter);
        }
        aggregator
    }

    fn register(&mut self, adapter: Arc<dyn Marketplace>) {
        let slot = adapter.id().index();
        self.adapters[slot] = Some(adapter);
    }

    fn disable(&mut self, id: MarketplaceId, reason: String) {
        warn!(marketplace = %id, reason = %reason, "Marketplace not registered");
        self.disabled.push((id, reason));
    }

    fn adapter(&self, id: MarketplaceId) -> Option<&Arc<dyn Marketplace>> {
        self.adapters[id.index()].as_ref()
    }

    /// Registered marketplaces, in registry order.
    pub fn registered_marketplaces(&self) -> Vec<MarketplaceId> {
        MarketplaceId::ALL
            .into_iter()
            .filter(|id| self.adapter(*id).is_some())
            .collect()
    }

    /// Marketplaces that failed to register, with reasons.
    pub fn disabled_marketplaces(&self) -> &[(MarketplaceId, String)] {
        &self.disabled
    }

    /// Wrapped-native-token address for the registry's chain, if
    /// configured. Callers bidding with native currency wrap it first.
    pub fn wrapped_native_token(&self) -> Option<Address> {
        self.config.wrapped_native_for(self.chain_id)
    }

    /// Create an order on every targeted marketplace.
    ///
    /// Validation failures abort before any adapter is consulted. After
    /// that, every targeted adapter runs concurrently and reports its
    /// own success or failure entry, in registry order.
    #[instrument(skip(self, params))]
    pub async fn make_order(
        &self,
        params: &MakeOrderParams,
    ) -> Result<Vec<MarketplaceResponse<NormalizedOrder>>, TradeError> {
        validate_make_order(params)?;

        let targets: Vec<&Arc<dyn Marketplace>> = MarketplaceId::ALL
            .into_iter()
            .filter(|id| params.targets(*id))
            .filter_map(|id| self.adapter(id))
            .collect();

        let responses = join_all(targets.into_iter().map(|adapter| {
            let id = adapter.id();
            async move {
                match adapter.make_order(params).await {
                    Ok(order) => MarketplaceResponse::ok(id, order),
                    Err(e) => MarketplaceResponse::err(id, e.into()),
                }
            }
        }))
        .await;

        Ok(responses)
    }

    /// List a non-fungible asset at a fungible price.
    pub async fn make_sell_order(
        &self,
        asset: Asset,
        price: FungibleToken,
    ) -> Result<Vec<MarketplaceResponse<NormalizedOrder>>, TradeError> {
        let params = MakeOrderParams::new(
            vec![asset],
            vec![Asset::erc20(price.contract_address, price.amount)],
        );
        self.make_order(&params).await
    }

    /// Bid a fungible amount for a non-fungible asset.
    pub async fn make_buy_order(
        &self,
        asset: Asset,
        price: FungibleToken,
    ) -> Result<Vec<MarketplaceResponse<NormalizedOrder>>, TradeError> {
        let params = MakeOrderParams::new(
            vec![Asset::erc20(price.contract_address, price.amount)],
            vec![asset],
        );
        self.make_order(&params).await
    }

    /// Query every registered marketplace's order book.
    ///
    /// Per-marketplace match lists are flattened: every order becomes
    /// one tagged entry, and a failed marketplace contributes a single
    /// error entry alongside the others' results. Entries can be passed
    /// straight to [`take_order`](Self::take_order).
    #[instrument(skip(self, filter))]
    pub async fn get_orders(
        &self,
        filter: &OrderFilter,
    ) -> Vec<MarketplaceResponse<NormalizedOrder>> {
        let targets: Vec<&Arc<dyn Marketplace>> = MarketplaceId::ALL
            .into_iter()
            .filter_map(|id| self.adapter(id))
            .collect();

        let per_marketplace = join_all(targets.into_iter().map(|adapter| {
            let id = adapter.id();
            async move { (id, adapter.get_orders(filter).await) }
        }))
        .await;

        let mut entries = Vec::new();
        for (id, result) in per_marketplace {
            match result {
                Ok(orders) => {
                    entries.extend(orders.into_iter().map(|o| MarketplaceResponse::ok(id, o)));
                }
                Err(e) => entries.push(MarketplaceResponse::err(id, e.into())),
            }
        }
        entries
    }

    /// Fill the order carried by a `make_order`/`get_orders` response
    /// entry, on its originating marketplace.
    ///
    /// # Errors
    /// Fails fast with `TradeError` when the entry carries no order or
    /// its marketplace has no registered adapter; marketplace-side
    /// failures land in the returned response entry.
    #[instrument(skip(self, response), fields(marketplace = %response.marketplace))]
    pub async fn take_order(
        &self,
        response: &MarketplaceResponse<NormalizedOrder>,
    ) -> Result<MarketplaceResponse<TxHandle>, TradeError> {
        let id = response.marketplace;
        let order = response
            .data()
            .ok_or(TradeError::MissingOrderData(id))?;
        let adapter = self
            .adapter(id)
            .ok_or(TradeError::UnknownMarketplace(id))?;

        Ok(match adapter.take_order(order).await {
            Ok(handle) => MarketplaceResponse::ok(id, handle),
            Err(e) => MarketplaceResponse::err(id, e.into()),
        })
    }

    /// Cancel the order carried by a response entry, on its originating
    /// marketplace.
    ///
    /// # Errors
    /// Same fail-fast conditions as `take_order`.
    #[instrument(skip(self, response), fields(marketplace = %response.marketplace))]
    pub async fn cancel_order(
        &self,
        response: &MarketplaceResponse<NormalizedOrder>,
    ) -> Result<MarketplaceResponse<TxHandle>, TradeError> {
        let id = response.marketplace;
        let order = response
            .data()
            .ok_or(TradeError::MissingOrderData(id))?;
        let adapter = self
            .adapter(id)
            .ok_or(TradeError::UnknownMarketplace(id))?;

        Ok(match adapter.cancel_order(order).await {
            Ok(handle) => MarketplaceResponse::ok(id, handle),
            Err(e) => MarketplaceResponse::err(id, e.into()),
        })
    }
}

/// Reason a marketplace must not register, if any.
fn registration_block(enabled: bool, supported_chains: &[u64], chain_id: u64) -> Option<String> {
    if !enabled {
        return Some("disabled by configuration".to_string());
    }
    if !supported_chains.contains(&chain_id) {
        return Some(format!("chain {chain_id} not supported"));
    }
    None
}
