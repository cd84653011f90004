//! OpenSea REST API surface.
//!
//! Thin typed layer over the shared REST client: order submission and
//! retrieval per chain, and the fulfillment/cancellation endpoints that
//! return ready-to-submit transaction payloads.

use alloy::primitives::{Address, Bytes, U256};
use anyhow::{Result, bail};
use serde::Deserialize;
use serde_json::json;

use crate::adapters::http::RestClient;
use crate::domain::native::serde_u256;
use crate::domain::order::OrderSide;

/// API chain slug for a chain id.
pub fn chain_slug(chain_id: u64) -> Result<&'static str> {
    match chain_id {
        1 => Ok("ethereum"),
        137 => Ok("matic"),
        other => bail!("no chain slug for chain id {other}"),
    }
}

/// One order as the API reports it. Offer/consideration items live
/// inside `protocol_data` and are parsed out during normalization.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiOrder {
    pub order_hash: String,
    pub protocol_address: Address,
    pub side: ApiSide,
    #[serde(with = "serde_u256")]
    pub current_price: U256,
    #[serde(default)]
    pub expiration_time: Option<i64>,
    pub maker: ApiAccount,
    pub protocol_data: serde_json::Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiSide {
    /// A listing.
    Ask,
    /// An offer.
    Bid,
}

impl From<ApiSide> for OrderSide {
    fn from(side: ApiSide) -> Self {
        match side {
            ApiSide::Ask => Self::Sell,
            ApiSide::Bid => Self::Buy,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiAccount {
    pub address: Address,
}

#[derive(Debug, Deserialize)]
struct OrdersEnvelope {
    orders: Vec<ApiOrder>,
}

#[derive(Debug, Deserialize)]
struct OrderEnvelope {
    order: ApiOrder,
}

/// A transaction the API asks the caller to submit verbatim.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionPayload {
    pub to: Address,
    #[serde(with = "serde_u256")]
    pub value: U256,
    pub input_data: Bytes,
}

#[derive(Debug, Deserialize)]
struct FulfillmentEnvelope {
    fulfillment_transaction: TransactionPayload,
}

#[derive(Debug, Deserialize)]
struct CancellationEnvelope {
    cancellation_transaction: TransactionPayload,
}

/// Optional filters for order retrieval, rendered into the query string.
#[derive(Debug, Clone, Default)]
pub struct OrderQuery {
    pub maker: Option<Address>,
    pub taker: Option<Address>,
    pub asset_contract_address: Option<Address>,
    pub token_id: Option<U256>,
    pub payment_token: Option<Address>,
}

impl OrderQuery {
    fn to_query_string(&self) -> String {
        let mut params = Vec::new();
        if let Some(maker) = self.maker {
            params.push(format!("maker={maker}"));
        }
        if let Some(taker) = self.taker {
            params.push(format!("taker={taker}"));
        }
        if let Some(contract) = self.asset_contract_address {
            params.push(format!("asset_contract_address={contract}"));
        }
        if let Some(token_id) = &self.token_id {
            params.push(format!("token_ids={token_id}"));
        }
        if let Some(token) = self.payment_token {
            params.push(format!("payment_token_address={token}"));
        }
        if params.is_empty() {
            String::new()
        } else {
            format!("?{}", params.join("&"))
        }
    }
}

/// Typed endpoint surface over the OpenSea REST API.
pub struct OpenSeaApi {
    rest: RestClient,
}

impl OpenSeaApi {
    pub fn new(rest: RestClient) -> Self {
        Self { rest }
    }

    fn side_path(side: OrderSide) -> &'static str {
        match side {
            OrderSide::Sell => "listings",
            OrderSide::Buy => "offers",
        }
    }

    /// Retrieve listings or offers for a chain, filtered.
    pub async fn get_orders(
        &self,
        chain_id: u64,
        side: OrderSide,
        query: &OrderQuery,
    ) -> Result<Vec<ApiOrder>> {
        let slug = chain_slug(chain_id)?;
        let path = format!(
            "/orders/{slug}/seaport/{}{}",
            Self::side_path(side),
            query.to_query_string()
        );
        let envelope: OrdersEnvelope = self.rest.get_json(&path).await?;
        Ok(envelope.orders)
    }

    /// Submit a signed Seaport order as a listing or offer.
    pub async fn post_order(
        &self,
        chain_id: u64,
        side: OrderSide,
        parameters: &serde_json::Value,
        signature: &Bytes,
        protocol_address: Address,
    ) -> Result<ApiOrder> {
        let slug = chain_slug(chain_id)?;
        let path = format!("/orders/{slug}/seaport/{}", Self::side_path(side));
        let body = json!({
            "parameters": parameters,
            "signature": signature,
            "protocol_address": protocol_address,
        });
        let envelope: OrderEnvelope = self.rest.post_json(&path, &body).await?;
        Ok(envelope.order)
    }

    /// Transaction payload that fills an order for `fulfiller`.
    pub async fn fulfillment_data(
        &self,
        chain_id: u64,
        side: OrderSide,
        order_hash: &str,
        protocol_address: Address,
        fulfiller: Address,
    ) -> Result<TransactionPayload> {
        let slug = chain_slug(chain_id)?;
        let path = format!("/{}/fulfillment_data", Self::side_path(side));
        let body = json!({
            "order": { "hash": order_hash, "chain": slug, "protocol_address": protocol_address },
            "fulfiller": { "address": fulfiller },
        });
        let envelope: FulfillmentEnvelope = self.rest.post_json(&path, &body).await?;
        Ok(envelope.fulfillment_transaction)
    }

    /// Transaction payload that cancels an order on chain.
    pub async fn cancellation_data(
        &self,
        chain_id: u64,
        order_hash: &str,
        protocol_address: Address,
        offerer: Address,
    ) -> Result<TransactionPayload> {
        let slug = chain_slug(chain_id)?;
        let path = format!("/orders/chain/{slug}/protocol/{protocol_address}/{order_hash}/cancel");
        let body = json!({ "offerer": offerer });
        let envelope: CancellationEnvelope = self.rest.post_json(&path, &body).await?;
        Ok(envelope.cancellation_transaction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    #[test]
    fn test_chain_slugs() {
        assert_eq!(chain_slug(1).unwrap(), "ethereum");
        assert_eq!(chain_slug(137).unwrap(), "matic");
        assert!(chain_slug(42).is_err());
    }

    #[test]
    fn test_query_string_rendering() {
        let empty = OrderQuery::default();
        assert_eq!(empty.to_query_string(), "");

        let query = OrderQuery {
            maker: Some(address!("1111111111111111111111111111111111111111")),
            taker: Some(address!("2222222222222222222222222222222222222222")),
            token_id: Some(U256::from(7u64)),
            ..OrderQuery::default()
        };
        let rendered = query.to_query_string();
        assert!(rendered.starts_with('?'));
        assert!(rendered.contains("token_ids=7"));
        assert!(rendered.contains("maker=0x1111"));
        assert!(rendered.contains("taker=0x2222"));
    }

    #[test]
    fn test_api_order_wire_shape() {
        let raw = serde_json::json!({
            "order_hash": "0xabc",
            "protocol_address": "0x00000000000000ADc04C56Bf30aC9d3c0aAF14dC",
            "side": "ask",
            "current_price": "1000000",
            "expiration_time": 1_800_000_000i64,
            "maker": { "address": "0x1111111111111111111111111111111111111111" },
            "protocol_data": { "parameters": {} },
        });
        let order: ApiOrder = serde_json::from_value(raw).unwrap();
        assert_eq!(order.side, ApiSide::Ask);
        assert_eq!(order.current_price, U256::from(1_000_000u64));
    }
}
