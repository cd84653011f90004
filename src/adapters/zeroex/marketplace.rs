//! Protocol marketplace adapter.
//!
//! One `Marketplace` implementation shared by two registry slots: the
//! local 0x v4 adapter (in-process or caller-supplied book) and the
//! Trader.xyz adapter (hosted REST book). Order construction, signing,
//! fill/cancel encoding, and normalization are identical; only the book
//! backend and the registry tag differ.

use std::sync::Arc;

use alloy::primitives::{Address, Bytes, U256};
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use tracing::{info, instrument};

use super::book::InMemoryOrderBook;
use super::builder::OrderBuilder;
use super::encode::{cancel_calldata, ensure_fillable, fill_calldata};
use super::normalize::normalize_order;
use crate::adapters::chain::approvals::ensure_asset_approval;
use crate::config::{TraderConfig, ZeroExConfig};
use crate::domain::asset::Asset;
use crate::domain::native::{NativeOrder, NftStandard, TradeDirection, ZeroExNftOrder};
use crate::domain::order::{MakeOrderParams, MarketplaceId, NormalizedOrder, OrderFilter, OrderSide};
use crate::ports::chain::{ChainClient, TxHandle};
use crate::ports::marketplace::Marketplace;
use crate::ports::orderbook::{OrderBook, OrderBookQuery};

/// 0x v4 protocol adapter over a pluggable order book.
pub struct ProtocolMarketplace {
    id: MarketplaceId,
    chain: Arc<dyn ChainClient>,
    book: Arc<dyn OrderBook>,
    builder: OrderBuilder,
    exchange_proxy: Address,
    supported_chains: Vec<u64>,
}

impl ProtocolMarketplace {
    /// Local-book variant: orders live in the supplied book, or an
    /// in-process one when none is given.
    pub fn local(
        chain: Arc<dyn ChainClient>,
        config: &ZeroExConfig,
        default_expiry_seconds: u64,
        book: Option<Arc<dyn OrderBook>>,
    ) -> Self {
        let builder = OrderBuilder::new(
            Arc::clone(&chain),
            config.exchange_proxy,
            config.fees.clone(),
            default_expiry_seconds,
        );
        Self {
            id: MarketplaceId::ZeroEx,
            chain,
            book: book.unwrap_or_else(|| Arc::new(InMemoryOrderBook::new())),
            builder,
            exchange_proxy: config.exchange_proxy,
            supported_chains: config.supported_chains.clone(),
        }
    }

    /// Hosted-book variant: same protocol semantics, orders persisted to
    /// an external REST book.
    pub fn hosted(
        chain: Arc<dyn ChainClient>,
        config: &TraderConfig,
        default_expiry_seconds: u64,
        book: Arc<dyn OrderBook>,
    ) -> Self {
        let builder = OrderBuilder::new(
            Arc::clone(&chain),
            config.exchange_proxy,
            config.fees.clone(),
            default_expiry_seconds,
        );
        Self {
            id: MarketplaceId::Trader,
            chain,
            book,
            builder,
            exchange_proxy: config.exchange_proxy,
            supported_chains: config.supported_chains.clone(),
        }
    }

    pub fn supports_chain_id(&self, chain_id: u64) -> bool {
        self.supported_chains.contains(&chain_id)
    }

    /// The native payload, if `order` originated from this adapter.
    fn native_order<'a>(&self, order: &'a NormalizedOrder) -> Result<&'a ZeroExNftOrder> {
        match (&order.native, self.id) {
            (NativeOrder::ZeroEx(native), MarketplaceId::ZeroEx)
            | (NativeOrder::Trader(native), MarketplaceId::Trader) => Ok(native),
            _ => bail!(
                "order '{}' was not produced by marketplace '{}'",
                order.id,
                self.id
            ),
        }
    }

    /// The asset the taker gives up when filling `native`.
    fn taker_side_asset(native: &ZeroExNftOrder) -> Asset {
        match native.direction {
            // Filling a listing costs the fungible total including fees.
            TradeDirection::SellNft => {
                Asset::erc20(native.erc20_token, native.erc20_total_with_fees())
            }
            // Filling a bid surrenders the NFT.
            TradeDirection::BuyNft => match native.nft_standard {
                NftStandard::Erc721 => Asset::erc721(native.nft_token, native.nft_token_id),
                NftStandard::Erc1155 => Asset::erc1155(
                    native.nft_token,
                    native.nft_token_id,
                    native.nft_token_amount,
                ),
            },
        }
    }

    fn book_query(&self, filter: &OrderFilter) -> OrderBookQuery {
        let mut query = OrderBookQuery::for_chain(self.chain.chain_id());
        query.maker = filter.maker;
        query.taker = filter.taker;
        if let Some(nft) = filter.non_fungible_filter() {
            query.nft_token = Some(nft.contract_address());
            query.nft_token_id = nft.token_id();
        }
        if let Some(fungible) = filter.fungible_filter() {
            query.erc20_token = Some(fungible.contract_address());
        }
        query.direction = filter.implied_side().map(|side| match side {
            OrderSide::Sell => TradeDirection::SellNft,
            OrderSide::Buy => TradeDirection::BuyNft,
        });
        query
    }
}

#[async_trait]
impl Marketplace for ProtocolMarketplace {
    fn id(&self) -> MarketplaceId {
        self.id
    }

    #[instrument(skip(self, params), fields(marketplace = %self.id))]
    async fn make_order(&self, params: &MakeOrderParams) -> Result<NormalizedOrder> {
        let order = self.builder.build_signed_order(params, self.id).await?;
        let posted = self
            .book
            .post_order(self.chain.chain_id(), &order)
            .await
            .context("Posting order to book failed")?;

        info!(id = %posted.id, "Order created");
        Ok(normalize_order(&posted, self.id))
    }

    async fn get_orders(&self, filter: &OrderFilter) -> Result<Vec<NormalizedOrder>> {
        let posted = self.book.get_orders(&self.book_query(filter)).await?;
        Ok(posted
            .iter()
            .map(|p| normalize_order(p, self.id))
            .collect())
    }

    #[instrument(skip(self, order), fields(marketplace = %self.id, order_id = %order.id))]
    async fn take_order(&self, order: &NormalizedOrder) -> Result<TxHandle> {
        let native = self.native_order(order)?;
        ensure_fillable(native)?;

        // Approve before encoding the fill: the fill transaction fails
        // on chain if the proxy cannot pull the taker's asset.
        let taker_asset = Self::taker_side_asset(native);
        ensure_asset_approval(self.chain.as_ref(), &taker_asset, self.exchange_proxy)
            .await
            .context("Taker-side approval failed")?;

        let calldata = fill_calldata(native)?;
        let handle = self
            .chain
            .send_transaction(self.exchange_proxy, Bytes::from(calldata), U256::ZERO)
            .await?;

        info!(tx_hash = %handle.tx_hash, "Fill submitted");
        Ok(handle)
    }

    #[instrument(skip(self, order), fields(marketplace = %self.id, order_id = %order.id))]
    async fn cancel_order(&self, order: &NormalizedOrder) -> Result<TxHandle> {
        let native = self.native_order(order)?;

        let calldata = cancel_calldata(native);
        let handle = self
            .chain
            .send_transaction(self.exchange_proxy, Bytes::from(calldata), U256::ZERO)
            .await?;

        // On-chain nonce invalidation is authoritative; dropping the
        // book entry just keeps queries clean.
        self.book
            .remove_order(self.chain.chain_id(), &order.id)
            .await
            .context("Removing cancelled order from book failed")?;

        info!(tx_hash = %handle.tx_hash, "Cancel submitted");
        Ok(handle)
    }
}
