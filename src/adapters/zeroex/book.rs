//! In-process order book.
//!
//! Default `OrderBook` backend for the protocol adapter: signed orders
//! held in memory, keyed by chain id, with UUID-assigned order ids.
//! Suitable for tests and for flows where the maker distributes signed
//! orders out-of-band.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::domain::native::ZeroExNftOrder;
use crate::ports::orderbook::{OrderBook, OrderBookQuery, PostedOrder};

/// In-memory `OrderBook` backend.
#[derive(Default)]
pub struct InMemoryOrderBook {
    orders: RwLock<HashMap<u64, Vec<PostedOrder>>>,
}

impl InMemoryOrderBook {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches(query: &OrderBookQuery, order: &ZeroExNftOrder) -> bool {
    if query.maker.is_some_and(|m| m != order.maker) {
        return false;
    }
    if query.taker.is_some_and(|t| t != order.taker) {
        return false;
    }
    if query.nft_token.is_some_and(|t| t != order.nft_token) {
        return false;
    }
    if query.nft_token_id.is_some_and(|id| id != order.nft_token_id) {
        return false;
    }
    if query.erc20_token.is_some_and(|t| t != order.erc20_token) {
        return false;
    }
    if query.direction.is_some_and(|d| d != order.direction) {
        return false;
    }
    true
}

#[async_trait]
impl OrderBook for InMemoryOrderBook {
    async fn post_order(
        &self,
        chain_id: u64,
        order: &ZeroExNftOrder,
    ) -> anyhow::Result<PostedOrder> {
        let posted = PostedOrder {
            id: Uuid::new_v4().to_string(),
            order: order.clone(),
        };
        let mut orders = self.orders.write().await;
        orders.entry(chain_id).or_default().push(posted.clone());
        debug!(chain_id, id = %posted.id, "Order posted to in-memory book");
        Ok(posted)
    }

    async fn get_orders(&self, query: &OrderBookQuery) -> anyhow::Result<Vec<PostedOrder>> {
        let orders = self.orders.read().await;
        Ok(orders
            .get(&query.chain_id)
            .map(|chain_orders| {
                chain_orders
                    .iter()
                    .filter(|p| matches(query, &p.order))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn remove_order(&self, chain_id: u64, id: &str) -> anyhow::Result<()> {
        let mut orders = self.orders.write().await;
        if let Some(chain_orders) = orders.get_mut(&chain_id) {
            chain_orders.retain(|p| p.id != id);
        }
        Ok(())
    }
}
