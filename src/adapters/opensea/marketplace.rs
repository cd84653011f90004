//! OpenSea marketplace adapter.
//!
//! Orders are Seaport orders hosted by the OpenSea API. Creation signs
//! locally and submits; fills and cancels request ready-made transaction
//! payloads from the API and submit them through the chain client.

use std::sync::Arc;

use alloy::primitives::Address;
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use tracing::{info, instrument};

use super::builder::build_order_draft;
use super::client::{OpenSeaApi, OrderQuery, TransactionPayload};
use super::normalize::{item_to_asset, normalize_order, to_seaport_order};
use crate::adapters::chain::approvals::ensure_asset_approval;
use crate::adapters::http::{RestClient, RestClientConfig};
use crate::config::OpenSeaConfig;
use crate::domain::asset::Asset;
use crate::domain::fees::Fee;
use crate::domain::native::{NativeOrder, SeaportOrder};
use crate::domain::order::{MakeOrderParams, MarketplaceId, NormalizedOrder, OrderFilter, OrderSide};
use crate::ports::chain::{ChainClient, TxHandle};
use crate::ports::marketplace::Marketplace;

/// OpenSea (Seaport) adapter over the hosted REST API.
pub struct OpenSeaMarketplace {
    chain: Arc<dyn ChainClient>,
    api: OpenSeaApi,
    protocol_address: Address,
    default_fees: Vec<Fee>,
    default_expiry_seconds: u64,
    supported_chains: Vec<u64>,
}

impl OpenSeaMarketplace {
    pub fn new(
        chain: Arc<dyn ChainClient>,
        config: &OpenSeaConfig,
        default_expiry_seconds: u64,
    ) -> Result<Self> {
        let rest = RestClient::new(RestClientConfig::new(
            config.base_url.clone(),
            config.api_key.clone(),
        ))?;
        Ok(Self {
            chain,
            api: OpenSeaApi::new(rest),
            protocol_address: config.protocol_address,
            default_fees: config.fees.clone(),
            default_expiry_seconds,
            supported_chains: config.supported_chains.clone(),
        })
    }

    pub fn supports_chain_id(&self, chain_id: u64) -> bool {
        self.supported_chains.contains(&chain_id)
    }

    fn native_order<'a>(order: &'a NormalizedOrder) -> Result<&'a SeaportOrder> {
        match &order.native {
            NativeOrder::OpenSea(native) => Ok(native),
            _ => bail!(
                "order '{}' was not produced by marketplace 'opensea'",
                order.id
            ),
        }
    }

    /// The asset the taker gives up when filling `native`.
    fn taker_side_asset(native: &SeaportOrder) -> Result<Asset> {
        match native.side {
            OrderSide::Sell => {
                let payment = native
                    .consideration
                    .iter()
                    .map(|i| item_to_asset(i))
                    .find(Asset::is_fungible)
                    .context("listing carries no fungible consideration")?;
                Ok(Asset::erc20(payment.contract_address(), native.current_price))
            }
            OrderSide::Buy => native
                .consideration
                .iter()
                .map(|i| item_to_asset(i))
                .find(Asset::is_non_fungible)
                .context("bid carries no non-fungible consideration"),
        }
    }

    async fn submit_payload(&self, payload: &TransactionPayload) -> Result<TxHandle> {
        self.chain
            .send_transaction(payload.to, payload.input_data.clone(), payload.value)
            .await
    }
}

#[async_trait]
impl Marketplace for OpenSeaMarketplace {
    fn id(&self) -> MarketplaceId {
        MarketplaceId::OpenSea
    }

    #[instrument(skip(self, params), fields(marketplace = "opensea"))]
    async fn make_order(&self, params: &MakeOrderParams) -> Result<NormalizedOrder> {
        // Seaport pulls the maker asset directly; approve it first.
        ensure_asset_approval(
            self.chain.as_ref(),
            &params.maker_assets[0],
            self.protocol_address,
        )
        .await
        .context("Maker-side approval failed")?;

        let fees = params
            .config_for(MarketplaceId::OpenSea)
            .map_or(self.default_fees.as_slice(), |c| c.fees.as_slice());
        let draft = build_order_draft(
            self.chain.address(),
            params,
            fees,
            self.protocol_address,
            self.chain.chain_id(),
            self.default_expiry_seconds,
        )?;

        let signature = self
            .chain
            .sign_typed_data(&draft.typed_data)
            .await
            .context("Order signing failed")?;

        let api_order = self
            .api
            .post_order(
                self.chain.chain_id(),
                draft.side,
                &draft.parameters,
                &signature,
                self.protocol_address,
            )
            .await?;

        let seaport = to_seaport_order(&api_order)?;
        info!(order_hash = %seaport.order_hash, "Order created");
        Ok(normalize_order(&seaport))
    }

    async fn get_orders(&self, filter: &OrderFilter) -> Result<Vec<NormalizedOrder>> {
        let mut query = OrderQuery {
            maker: filter.maker,
            taker: filter.taker,
            ..OrderQuery::default()
        };
        if let Some(nft) = filter.non_fungible_filter() {
            query.asset_contract_address = Some(nft.contract_address());
            query.token_id = nft.token_id();
        }
        if let Some(fungible) = filter.fungible_filter() {
            query.payment_token = Some(fungible.contract_address());
        }

        // Without an implied side, both books are consulted.
        let sides: &[OrderSide] = match filter.implied_side() {
            Some(OrderSide::Sell) => &[OrderSide::Sell],
            Some(OrderSide::Buy) => &[OrderSide::Buy],
            None => &[OrderSide::Sell, OrderSide::Buy],
        };

        let mut normalized = Vec::new();
        for side in sides {
            let api_orders = self
                .api
                .get_orders(self.chain.chain_id(), *side, &query)
                .await?;
            for api_order in &api_orders {
                normalized.push(normalize_order(&to_seaport_order(api_order)?));
            }
        }
        Ok(normalized)
    }

    #[instrument(skip(self, order), fields(marketplace = "opensea", order_id = %order.id))]
    async fn take_order(&self, order: &NormalizedOrder) -> Result<TxHandle> {
        let native = Self::native_order(order)?;

        let taker_asset = Self::taker_side_asset(native)?;
        // Native-currency payments need no approval; the value rides on
        // the fulfillment transaction itself.
        if taker_asset.contract_address() != Address::ZERO {
            ensure_asset_approval(self.chain.as_ref(), &taker_asset, native.protocol_address)
                .await
                .context("Taker-side approval failed")?;
        }

        let payload = self
            .api
            .fulfillment_data(
                self.chain.chain_id(),
                native.side,
                &native.order_hash,
                native.protocol_address,
                self.chain.address(),
            )
            .await?;
        let handle = self.submit_payload(&payload).await?;

        info!(tx_hash = %handle.tx_hash, "Fill submitted");
        Ok(handle)
    }

    #[instrument(skip(self, order), fields(marketplace = "opensea", order_id = %order.id))]
    async fn cancel_order(&self, order: &NormalizedOrder) -> Result<TxHandle> {
        let native = Self::native_order(order)?;

        let payload = self
            .api
            .cancellation_data(
                self.chain.chain_id(),
                &native.order_hash,
                native.protocol_address,
                self.chain.address(),
            )
            .await?;
        let handle = self.submit_payload(&payload).await?;

        info!(tx_hash = %handle.tx_hash, "Cancel submitted");
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::native::SeaportItem;
    use alloy::primitives::{U256 as U, address};

    const WETH: Address = address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");
    const PUNKS: Address = address!("b47e3cd837dDF8e4c57F05d70Ab865de6e193BBB");

    fn item(item_type: u8, token: Address, identifier: u64, amount: u64) -> SeaportItem {
        SeaportItem {
            item_type,
            token,
            identifier_or_criteria: U::from(identifier),
            start_amount: U::from(amount),
        }
    }

    #[test]
    fn test_taker_asset_for_listing_is_full_price() {
        let listing = SeaportOrder {
            order_hash: "0xhash".into(),
            protocol_address: address!("00000000000000ADc04C56Bf30aC9d3c0aAF14dC"),
            maker: Address::ZERO,
            side: OrderSide::Sell,
            offer: vec![item(2, PUNKS, 1, 1)],
            consideration: vec![item(1, WETH, 0, 975_000), item(1, WETH, 0, 25_000)],
            current_price: U::from(1_000_000u64),
            expiration_time: None,
            protocol_data: serde_json::Value::Null,
        };
        let asset = OpenSeaMarketplace::taker_side_asset(&listing).unwrap();
        assert_eq!(asset, Asset::erc20(WETH, U::from(1_000_000u64)));
    }

    #[test]
    fn test_taker_asset_for_bid_is_the_nft() {
        let bid = SeaportOrder {
            order_hash: "0xhash".into(),
            protocol_address: address!("00000000000000ADc04C56Bf30aC9d3c0aAF14dC"),
            maker: Address::ZERO,
            side: OrderSide::Buy,
            offer: vec![item(1, WETH, 0, 1_000_000)],
            consideration: vec![item(2, PUNKS, 7, 1), item(1, WETH, 0, 25_000)],
            current_price: U::from(1_000_000u64),
            expiration_time: None,
            protocol_data: serde_json::Value::Null,
        };
        let asset = OpenSeaMarketplace::taker_side_asset(&bid).unwrap();
        assert_eq!(asset, Asset::erc721(PUNKS, U::from(7u64)));
    }
}
