//! 0x v4 order construction and signing.
//!
//! Turns validated `MakeOrderParams` into a signed `ZeroExNftOrder`:
//! 1. classify the two legs into direction + standards,
//! 2. apportion fees out of the fungible amount,
//! 3. ensure the maker's asset is approved for the exchange proxy
//!    (blocking prerequisite — the order is only meaningful once the
//!    proxy can move the asset),
//! 4. sign the EIP-712 order digest through the chain client.

use std::sync::Arc;

use alloy::primitives::{Address, U256};
use anyhow::{Context, Result};
use chrono::Utc;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use crate::adapters::chain::approvals::ensure_asset_approval;
use crate::domain::asset::Asset;
use crate::domain::fees::{Fee, compute_fee_schedule};
use crate::domain::native::{NativeOrderFee, NftStandard, TradeDirection, ZeroExNftOrder};
use crate::domain::order::{MakeOrderParams, MarketplaceId};
use crate::error::TradeError;
use crate::ports::chain::ChainClient;

/// Shared order construction for the protocol-based adapters.
pub struct OrderBuilder {
    chain: Arc<dyn ChainClient>,
    exchange_proxy: Address,
    /// Fees applied when the caller's params carry none.
    default_fees: Vec<Fee>,
    default_expiry_seconds: u64,
}

/// Classified legs of a swap: the fungible side, the non-fungible side,
/// and which direction the order takes from the maker's perspective.
#[derive(Debug)]
struct ClassifiedSwap<'a> {
    direction: TradeDirection,
    fungible: &'a Asset,
    non_fungible: &'a Asset,
}

impl OrderBuilder {
    pub fn new(
        chain: Arc<dyn ChainClient>,
        exchange_proxy: Address,
        default_fees: Vec<Fee>,
        default_expiry_seconds: u64,
    ) -> Self {
        Self {
            chain,
            exchange_proxy,
            default_fees,
            default_expiry_seconds,
        }
    }

    pub fn exchange_proxy(&self) -> Address {
        self.exchange_proxy
    }

    /// Build, approve, and sign a protocol order from validated params.
    ///
    /// `marketplace` selects which per-marketplace fee config applies.
    pub async fn build_signed_order(
        &self,
        params: &MakeOrderParams,
        marketplace: MarketplaceId,
    ) -> Result<ZeroExNftOrder> {
        // Everything fallible-but-pure runs first, so a rejected order
        // never leaves an on-chain approval behind.
        let swap = classify(&params.maker_assets[0], &params.taker_assets[0])?;

        let fees = params
            .config_for(marketplace)
            .map_or(self.default_fees.as_slice(), |c| c.fees.as_slice());
        let base = swap.fungible.amount();
        let schedule = compute_fee_schedule(fees, base)?;

        let (nft_standard, nft_token_amount) = match swap.non_fungible {
            Asset::Erc721 { .. } => (NftStandard::Erc721, U256::from(1)),
            Asset::Erc1155 { amount, .. } => (NftStandard::Erc1155, *amount),
            other => {
                return Err(TradeError::UnsupportedOperation(format!(
                    "protocol orders cannot carry asset {other}"
                ))
                .into());
            }
        };

        // Approval must settle before the order exists: a signed order
        // whose maker asset the proxy cannot move is unfillable.
        ensure_asset_approval(self.chain.as_ref(), &params.maker_assets[0], self.exchange_proxy)
            .await
            .context("Maker-side approval failed")?;

        let expiry = params
            .expiration_time
            .map_or_else(
                || Utc::now().timestamp() + i64::try_from(self.default_expiry_seconds).unwrap_or(0),
                |t| t.timestamp(),
            );

        let mut order = ZeroExNftOrder {
            direction: swap.direction,
            maker: self.chain.address(),
            taker: params.taker.unwrap_or(Address::ZERO),
            expiry: U256::from(u64::try_from(expiry.max(0)).unwrap_or(0)),
            nonce: U256::from(Uuid::new_v4().as_u128()),
            erc20_token: swap.fungible.contract_address(),
            erc20_token_amount: schedule.net_amount(base),
            fees: schedule
                .fees
                .iter()
                .map(|f| NativeOrderFee {
                    recipient: f.recipient,
                    amount: f.amount,
                })
                .collect(),
            nft_standard,
            nft_token: swap.non_fungible.contract_address(),
            nft_token_id: swap.non_fungible.token_id().unwrap_or(U256::ZERO),
            nft_token_amount,
            signature: None,
        };

        let typed_data = order_typed_data(&order, self.chain.chain_id(), self.exchange_proxy);
        let signature = self
            .chain
            .sign_typed_data(&typed_data)
            .await
            .context("Order signing failed")?;
        order.signature = Some(signature);

        debug!(
            direction = ?order.direction,
            nonce = %order.nonce,
            net_amount = %order.erc20_token_amount,
            fee_total = %schedule.total,
            "Built signed protocol order"
        );

        Ok(order)
    }
}

/// Classify a validated maker/taker pair into a protocol swap.
///
/// Validation guarantees at most one fungible and one non-fungible leg;
/// anything involving `Unknown` is structurally fine but inexpressible
/// in this protocol's pricing model.
fn classify<'a>(maker: &'a Asset, taker: &'a Asset) -> Result<ClassifiedSwap<'a>> {
    if maker.is_non_fungible() && taker.is_fungible() {
        return Ok(ClassifiedSwap {
            direction: TradeDirection::SellNft,
            fungible: taker,
            non_fungible: maker,
        });
    }
    if maker.is_fungible() && taker.is_non_fungible() {
        return Ok(ClassifiedSwap {
            direction: TradeDirection::BuyNft,
            fungible: maker,
            non_fungible: taker,
        });
    }
    Err(TradeError::UnsupportedOperation(format!(
        "no fungible/non-fungible split between {maker} and {taker}"
    ))
    .into())
}

/// EIP-712 payload for a protocol order, as the exchange proxy hashes it.
pub fn order_typed_data(
    order: &ZeroExNftOrder,
    chain_id: u64,
    verifying_contract: Address,
) -> serde_json::Value {
    let (primary, token_field, fields_extra) = match order.nft_standard {
        NftStandard::Erc721 => ("ERC721Order", "erc721Token", json!([])),
        NftStandard::Erc1155 => (
            "ERC1155Order",
            "erc1155Token",
            json!([{ "name": "erc1155TokenAmount", "type": "uint128" }]),
        ),
    };

    let mut order_fields = vec![
        json!({ "name": "direction", "type": "uint8" }),
        json!({ "name": "maker", "type": "address" }),
        json!({ "name": "taker", "type": "address" }),
        json!({ "name": "expiry", "type": "uint256" }),
        json!({ "name": "nonce", "type": "uint256" }),
        json!({ "name": "erc20Token", "type": "address" }),
        json!({ "name": "erc20TokenAmount", "type": "uint256" }),
        json!({ "name": "fees", "type": "Fee[]" }),
        json!({ "name": token_field, "type": "address" }),
        json!({ "name": format!("{token_field}Id"), "type": "uint256" }),
    ];
    if let Some(extra) = fields_extra.as_array() {
        order_fields.extend(extra.iter().cloned());
    }

    let mut message = serde_json::Map::new();
    message.insert("direction".into(), json!(direction_code(order.direction)));
    message.insert("maker".into(), json!(order.maker));
    message.insert("taker".into(), json!(order.taker));
    message.insert("expiry".into(), json!(order.expiry.to_string()));
    message.insert("nonce".into(), json!(order.nonce.to_string()));
    message.insert("erc20Token".into(), json!(order.erc20_token));
    message.insert(
        "erc20TokenAmount".into(),
        json!(order.erc20_token_amount.to_string()),
    );
    message.insert(
        "fees".into(),
        json!(
            order
                .fees
                .iter()
                .map(|f| json!({
                    "recipient": f.recipient,
                    "amount": f.amount.to_string(),
                    "feeData": "0x",
                }))
                .collect::<Vec<_>>()
        ),
    );
    message.insert(token_field.into(), json!(order.nft_token));
    message.insert(
        format!("{token_field}Id"),
        json!(order.nft_token_id.to_string()),
    );
    if order.nft_standard == NftStandard::Erc1155 {
        message.insert(
            "erc1155TokenAmount".into(),
            json!(order.nft_token_amount.to_string()),
        );
    }
    let message = serde_json::Value::Object(message);

    json!({
        "types": {
            "EIP712Domain": [
                { "name": "name", "type": "string" },
                { "name": "version", "type": "string" },
                { "name": "chainId", "type": "uint256" },
                { "name": "verifyingContract", "type": "address" },
            ],
            "Fee": [
                { "name": "recipient", "type": "address" },
                { "name": "amount", "type": "uint256" },
                { "name": "feeData", "type": "bytes" },
            ],
            primary: order_fields,
        },
        "primaryType": primary,
        "domain": {
            "name": "ZeroEx",
            "version": "1.0.0",
            "chainId": chain_id,
            "verifyingContract": verifying_contract,
        },
        "message": message,
    })
}

/// On-chain numeric encoding of the direction flag.
pub const fn direction_code(direction: TradeDirection) -> u8 {
    match direction {
        TradeDirection::SellNft => 0,
        TradeDirection::BuyNft => 1,
    }
}
