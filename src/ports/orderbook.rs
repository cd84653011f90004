//! Order Book Port - Pluggable Storage for Protocol Orders
//!
//! The 0x v4 protocol does not prescribe where signed orders live. The
//! protocol-based adapters accept any backend conforming to this
//! contract: an in-process store (the default for the local adapter), a
//! hosted REST endpoint (Trader.xyz), or anything else keyed by chain id
//! and maker/contract/token-id filters.

use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::native::{TradeDirection, ZeroExNftOrder};

/// A signed order as persisted by a book, with its book-assigned id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostedOrder {
    /// Book-assigned order identifier (hash or UUID, backend-specific).
    pub id: String,
    pub order: ZeroExNftOrder,
}

/// Filter for querying a book. All fields are conjunctive.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderBookQuery {
    pub chain_id: u64,
    #[serde(default)]
    pub maker: Option<Address>,
    /// Matches orders restricted to this taker address.
    #[serde(default)]
    pub taker: Option<Address>,
    #[serde(default)]
    pub nft_token: Option<Address>,
    #[serde(default, with = "crate::domain::native::serde_u256::option")]
    pub nft_token_id: Option<U256>,
    #[serde(default)]
    pub erc20_token: Option<Address>,
    /// Restrict to listings (`SellNft`) or bids (`BuyNft`).
    #[serde(default)]
    pub direction: Option<TradeDirection>,
}

impl OrderBookQuery {
    pub fn for_chain(chain_id: u64) -> Self {
        Self {
            chain_id,
            ..Self::default()
        }
    }
}

/// Trait for order storage backends used by protocol-based adapters.
#[async_trait]
pub trait OrderBook: Send + Sync {
    /// Persist a signed order; returns it with the book-assigned id.
    async fn post_order(
        &self,
        chain_id: u64,
        order: &ZeroExNftOrder,
    ) -> anyhow::Result<PostedOrder>;

    /// Query persisted orders matching `query`.
    async fn get_orders(&self, query: &OrderBookQuery) -> anyhow::Result<Vec<PostedOrder>>;

    /// Drop an order from the book after cancellation.
    ///
    /// Hosted books observe on-chain nonce cancellation themselves; the
    /// default is therefore a no-op.
    async fn remove_order(&self, _chain_id: u64, _id: &str) -> anyhow::Result<()> {
        Ok(())
    }
}
