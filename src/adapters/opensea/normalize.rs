//! Seaport order normalization.
//!
//! Maps API order envelopes into the canonical order shape. The
//! fungible leg is priced at `current_price`, which already aggregates
//! fee consideration items; per-recipient fee items are therefore not
//! surfaced as separate assets.

use anyhow::{Context, Result};
use chrono::DateTime;

use super::client::ApiOrder;
use crate::domain::asset::Asset;
use crate::domain::native::{NativeOrder, SeaportItem, SeaportOrder};
use crate::domain::order::{NormalizedOrder, OrderSide};

/// Seaport `ItemType` mapped onto the asset model. Criteria-based and
/// future item types degrade to `Unknown` rather than failing the whole
/// order page.
pub fn item_to_asset(item: &SeaportItem) -> Asset {
    match item.item_type {
        // Native currency rides as a zero-address fungible.
        0 | 1 => Asset::erc20(item.token, item.start_amount),
        2 => Asset::erc721(item.token, item.identifier_or_criteria),
        3 => Asset::erc1155(item.token, item.identifier_or_criteria, item.start_amount),
        _ => Asset::Unknown {
            contract_address: item.token,
            token_id: Some(item.identifier_or_criteria),
            amount: Some(item.start_amount),
        },
    }
}

/// Parse the typed Seaport envelope out of a raw API order.
pub fn to_seaport_order(api: &ApiOrder) -> Result<SeaportOrder> {
    let parameters = api
        .protocol_data
        .get("parameters")
        .context("order protocol_data carries no parameters")?;

    let offer: Vec<SeaportItem> = parameters
        .get("offer")
        .cloned()
        .map(serde_json::from_value)
        .transpose()
        .context("malformed offer items")?
        .unwrap_or_default();
    let consideration: Vec<SeaportItem> = parameters
        .get("consideration")
        .cloned()
        .map(serde_json::from_value)
        .transpose()
        .context("malformed consideration items")?
        .unwrap_or_default();

    Ok(SeaportOrder {
        order_hash: api.order_hash.clone(),
        protocol_address: api.protocol_address,
        maker: api.maker.address,
        side: api.side.into(),
        offer,
        consideration,
        current_price: api.current_price,
        expiration_time: api.expiration_time,
        protocol_data: api.protocol_data.clone(),
    })
}

/// Normalize a Seaport order into the canonical shape.
pub fn normalize_order(order: &SeaportOrder) -> NormalizedOrder {
    let (maker_assets, taker_assets) = match order.side {
        OrderSide::Sell => {
            let maker_assets = order.offer.iter().map(item_to_asset).collect();
            // The taker pays the aggregate price in the payment token.
            let payment_token = order
                .consideration
                .iter()
                .map(item_to_asset)
                .find(|a| a.is_fungible());
            let taker_assets = match payment_token {
                Some(asset) => vec![Asset::erc20(asset.contract_address(), order.current_price)],
                None => order.consideration.iter().map(item_to_asset).collect(),
            };
            (maker_assets, taker_assets)
        }
        OrderSide::Buy => {
            let bid_token = order
                .offer
                .iter()
                .map(item_to_asset)
                .find(|a| a.is_fungible());
            let maker_assets = match bid_token {
                Some(asset) => vec![Asset::erc20(asset.contract_address(), order.current_price)],
                None => order.offer.iter().map(item_to_asset).collect(),
            };
            // Fungible consideration entries are fee payouts, not assets
            // the taker surrenders.
            let taker_assets = order
                .consideration
                .iter()
                .map(item_to_asset)
                .filter(|a| !a.is_fungible())
                .collect();
            (maker_assets, taker_assets)
        }
    };

    NormalizedOrder {
        id: order.order_hash.clone(),
        maker: order.maker,
        side: order.side,
        maker_assets,
        taker_assets,
        expiration_time: order
            .expiration_time
            .and_then(|secs| DateTime::from_timestamp(secs, 0)),
        native: NativeOrder::OpenSea(order.clone()),
    }
}
