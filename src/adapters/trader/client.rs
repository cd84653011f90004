//! Hosted REST order book.
//!
//! `OrderBook` backend over the Trader.xyz-style REST API. Orders are
//! posted and queried as JSON with decimal-string integers; removal is
//! left to the host, which drops orders when it observes the on-chain
//! nonce cancellation.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::adapters::http::{RestClient, RestClientConfig};
use crate::config::TraderConfig;
use crate::domain::native::{TradeDirection, ZeroExNftOrder};
use crate::ports::orderbook::{OrderBook, OrderBookQuery, PostedOrder};

#[derive(Debug, Deserialize)]
struct ApiPostedOrder {
    id: String,
    order: ZeroExNftOrder,
}

#[derive(Debug, Deserialize)]
struct OrdersEnvelope {
    orders: Vec<ApiPostedOrder>,
}

impl From<ApiPostedOrder> for PostedOrder {
    fn from(api: ApiPostedOrder) -> Self {
        Self {
            id: api.id,
            order: api.order,
        }
    }
}

/// `OrderBook` backend over a hosted REST API.
pub struct RestOrderBook {
    rest: RestClient,
}

impl RestOrderBook {
    pub fn new(config: &TraderConfig) -> Result<Self> {
        let rest = RestClient::new(RestClientConfig::new(
            config.base_url.clone(),
            config.api_key.clone(),
        ))?;
        Ok(Self { rest })
    }

    fn query_path(query: &OrderBookQuery) -> String {
        let mut params = vec![format!("chainId={}", query.chain_id)];
        if let Some(maker) = query.maker {
            params.push(format!("maker={maker}"));
        }
        if let Some(taker) = query.taker {
            params.push(format!("taker={taker}"));
        }
        if let Some(token) = query.nft_token {
            params.push(format!("nftToken={token}"));
        }
        if let Some(token_id) = &query.nft_token_id {
            params.push(format!("nftTokenId={token_id}"));
        }
        if let Some(token) = query.erc20_token {
            params.push(format!("erc20Token={token}"));
        }
        if let Some(direction) = query.direction {
            let side = match direction {
                TradeDirection::SellNft => "sell",
                TradeDirection::BuyNft => "buy",
            };
            params.push(format!("sellOrBuyNft={side}"));
        }
        format!("/orders?{}", params.join("&"))
    }
}

#[async_trait]
impl OrderBook for RestOrderBook {
    async fn post_order(
        &self,
        chain_id: u64,
        order: &ZeroExNftOrder,
    ) -> Result<PostedOrder> {
        let body = json!({
            "chainId": chain_id.to_string(),
            "order": order,
        });
        let posted: ApiPostedOrder = self
            .rest
            .post_json("/orders", &body)
            .await
            .context("Posting order to hosted book failed")?;
        debug!(id = %posted.id, "Order accepted by hosted book");
        Ok(posted.into())
    }

    async fn get_orders(&self, query: &OrderBookQuery) -> Result<Vec<PostedOrder>> {
        let envelope: OrdersEnvelope = self
            .rest
            .get_json(&Self::query_path(query))
            .await
            .context("Querying hosted book failed")?;
        Ok(envelope.orders.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{U256, address};

    #[test]
    fn test_query_path_rendering() {
        let bare = OrderBookQuery::for_chain(137);
        assert_eq!(RestOrderBook::query_path(&bare), "/orders?chainId=137");

        let query = OrderBookQuery {
            maker: Some(address!("1111111111111111111111111111111111111111")),
            taker: Some(address!("2222222222222222222222222222222222222222")),
            nft_token_id: Some(U256::from(7804u64)),
            direction: Some(TradeDirection::SellNft),
            ..OrderBookQuery::for_chain(1)
        };
        let path = RestOrderBook::query_path(&query);
        assert!(path.starts_with("/orders?chainId=1&"));
        assert!(path.contains("taker=0x2222"));
        assert!(path.contains("nftTokenId=7804"));
        assert!(path.contains("sellOrBuyNft=sell"));
    }
}
