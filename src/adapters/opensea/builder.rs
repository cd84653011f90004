//! Seaport order construction.
//!
//! Builds the order parameters the API expects and the matching
//! EIP-712 payload for signing. Listings put the NFT in the offer and
//! split the price into a net consideration to the offerer plus one
//! consideration item per fee recipient; bids offer the fungible amount
//! and take the NFT as consideration.

use alloy::primitives::{Address, U256};
use anyhow::{Context, Result};
use chrono::Utc;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::domain::asset::Asset;
use crate::domain::fees::{Fee, compute_fee_schedule};
use crate::domain::order::{MakeOrderParams, OrderSide};
use crate::error::TradeError;

const ZERO_BYTES32: &str =
    "0x0000000000000000000000000000000000000000000000000000000000000000";

/// Seaport `ItemType` code for an asset.
fn item_type(asset: &Asset) -> Result<u8> {
    match asset {
        Asset::Erc20 { .. } => Ok(1),
        Asset::Erc721 { .. } => Ok(2),
        Asset::Erc1155 { .. } => Ok(3),
        Asset::Unknown {
            contract_address, ..
        } => Err(TradeError::UnsupportedOperation(format!(
            "cannot build an order around unknown asset at {contract_address}"
        ))
        .into()),
    }
}

fn offer_item(asset: &Asset) -> Result<Value> {
    Ok(json!({
        "itemType": item_type(asset)?,
        "token": asset.contract_address(),
        "identifierOrCriteria": asset.token_id().unwrap_or(U256::ZERO).to_string(),
        "startAmount": asset.amount().to_string(),
        "endAmount": asset.amount().to_string(),
    }))
}

fn consideration_item(asset: &Asset, amount: U256, recipient: Address) -> Result<Value> {
    Ok(json!({
        "itemType": item_type(asset)?,
        "token": asset.contract_address(),
        "identifierOrCriteria": asset.token_id().unwrap_or(U256::ZERO).to_string(),
        "startAmount": amount.to_string(),
        "endAmount": amount.to_string(),
        "recipient": recipient,
    }))
}

/// A built but unsigned Seaport order.
pub struct SeaportOrderDraft {
    pub side: OrderSide,
    /// Order parameters in the API's submission shape.
    pub parameters: Value,
    /// EIP-712 payload whose signature accompanies the submission.
    pub typed_data: Value,
}

/// Build an unsigned Seaport order from validated params.
pub fn build_order_draft(
    offerer: Address,
    params: &MakeOrderParams,
    fees: &[Fee],
    protocol_address: Address,
    chain_id: u64,
    default_expiry_seconds: u64,
) -> Result<SeaportOrderDraft> {
    let maker = &params.maker_assets[0];
    let taker = &params.taker_assets[0];

    let (side, fungible, non_fungible) = if maker.is_non_fungible() && taker.is_fungible() {
        (OrderSide::Sell, taker, maker)
    } else if maker.is_fungible() && taker.is_non_fungible() {
        (OrderSide::Buy, maker, taker)
    } else {
        return Err(TradeError::UnsupportedOperation(format!(
            "no fungible/non-fungible split between {maker} and {taker}"
        ))
        .into());
    };

    let base = fungible.amount();
    let schedule = compute_fee_schedule(fees, base)?;

    let (offer, mut consideration) = match side {
        OrderSide::Sell => (
            vec![offer_item(non_fungible)?],
            vec![consideration_item(fungible, schedule.net_amount(base), offerer)?],
        ),
        OrderSide::Buy => (
            vec![offer_item(fungible)?],
            vec![consideration_item(
                non_fungible,
                non_fungible.amount(),
                offerer,
            )?],
        ),
    };
    for fee in &schedule.fees {
        consideration.push(consideration_item(fungible, fee.amount, fee.recipient)?);
    }

    let start_time = Utc::now().timestamp();
    let end_time = params.expiration_time.map_or_else(
        || start_time + i64::try_from(default_expiry_seconds).unwrap_or(0),
        |t| t.timestamp(),
    );
    let salt = Uuid::new_v4().as_u128().to_string();

    let message = json!({
        "offerer": offerer,
        "zone": Address::ZERO,
        "offer": offer,
        "consideration": consideration,
        "orderType": 0,
        "startTime": start_time.to_string(),
        "endTime": end_time.to_string(),
        "zoneHash": ZERO_BYTES32,
        "salt": salt,
        "conduitKey": ZERO_BYTES32,
        "counter": "0",
    });

    let mut parameters = message.clone();
    parameters
        .as_object_mut()
        .context("order parameters are always an object")?
        .insert(
            "totalOriginalConsiderationItems".into(),
            json!(consideration.len()),
        );

    let typed_data = json!({
        "types": {
            "EIP712Domain": [
                { "name": "name", "type": "string" },
                { "name": "version", "type": "string" },
                { "name": "chainId", "type": "uint256" },
                { "name": "verifyingContract", "type": "address" },
            ],
            "OrderComponents": [
                { "name": "offerer", "type": "address" },
                { "name": "zone", "type": "address" },
                { "name": "offer", "type": "OfferItem[]" },
                { "name": "consideration", "type": "ConsiderationItem[]" },
                { "name": "orderType", "type": "uint8" },
                { "name": "startTime", "type": "uint256" },
                { "name": "endTime", "type": "uint256" },
                { "name": "zoneHash", "type": "bytes32" },
                { "name": "salt", "type": "uint256" },
                { "name": "conduitKey", "type": "bytes32" },
                { "name": "counter", "type": "uint256" },
            ],
            "OfferItem": [
                { "name": "itemType", "type": "uint8" },
                { "name": "token", "type": "address" },
                { "name": "identifierOrCriteria", "type": "uint256" },
                { "name": "startAmount", "type": "uint256" },
                { "name": "endAmount", "type": "uint256" },
            ],
            "ConsiderationItem": [
                { "name": "itemType", "type": "uint8" },
                { "name": "token", "type": "address" },
                { "name": "identifierOrCriteria", "type": "uint256" },
                { "name": "startAmount", "type": "uint256" },
                { "name": "endAmount", "type": "uint256" },
                { "name": "recipient", "type": "address" },
            ],
        },
        "primaryType": "OrderComponents",
        "domain": {
            "name": "Seaport",
            "version": "1.5",
            "chainId": chain_id,
            "verifyingContract": protocol_address,
        },
        "message": message,
    });

    Ok(SeaportOrderDraft {
        side,
        parameters,
        typed_data,
    })
}
