//! Protocol order normalization.
//!
//! Maps a book-persisted 0x v4 order into the canonical order shape. The
//! fungible leg is priced at the order amount plus embedded fees, since
//! that is what a filler actually transfers.

use chrono::{DateTime, Utc};

use crate::domain::asset::Asset;
use crate::domain::native::{NativeOrder, NftStandard, TradeDirection};
use crate::domain::order::{MarketplaceId, NormalizedOrder, OrderSide};
use crate::ports::orderbook::PostedOrder;

/// Normalize a posted protocol order under `marketplace`'s tag.
///
/// Only the protocol-backed marketplaces route through this normalizer.
pub fn normalize_order(posted: &PostedOrder, marketplace: MarketplaceId) -> NormalizedOrder {
    let order = &posted.order;

    let nft = match order.nft_standard {
        NftStandard::Erc721 => Asset::erc721(order.nft_token, order.nft_token_id),
        NftStandard::Erc1155 => {
            Asset::erc1155(order.nft_token, order.nft_token_id, order.nft_token_amount)
        }
    };
    let fungible = Asset::erc20(order.erc20_token, order.erc20_total_with_fees());

    let (side, maker_assets, taker_assets) = match order.direction {
        TradeDirection::SellNft => (OrderSide::Sell, vec![nft], vec![fungible]),
        TradeDirection::BuyNft => (OrderSide::Buy, vec![fungible], vec![nft]),
    };

    let expiration_time = i64::try_from(order.expiry)
        .ok()
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0));

    let native = match marketplace {
        MarketplaceId::Trader => NativeOrder::Trader(order.clone()),
        _ => NativeOrder::ZeroEx(order.clone()),
    };

    NormalizedOrder {
        id: posted.id.clone(),
        maker: order.maker,
        side,
        maker_assets,
        taker_assets,
        expiration_time,
        native,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::native::{NativeOrderFee, ZeroExNftOrder};
    use alloy::primitives::{Address, U256, address};

    const WETH: Address = address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");
    const PUNKS: Address = address!("b47e3cd837dDF8e4c57F05d70Ab865de6e193BBB");

    fn posted(direction: TradeDirection) -> PostedOrder {
        PostedOrder {
            id: "abc".into(),
            order: ZeroExNftOrder {
                direction,
                maker: address!("1111111111111111111111111111111111111111"),
                taker: Address::ZERO,
                expiry: U256::from(1_800_000_000u64),
                nonce: U256::from(1u64),
                erc20_token: WETH,
                erc20_token_amount: U256::from(975_000u64),
                fees: vec![NativeOrderFee {
                    recipient: address!("2222222222222222222222222222222222222222"),
                    amount: U256::from(25_000u64),
                }],
                nft_standard: NftStandard::Erc721,
                nft_token: PUNKS,
                nft_token_id: U256::from(7804u64),
                nft_token_amount: U256::from(1u64),
                signature: None,
            },
        }
    }

    #[test]
    fn test_listing_normalizes_to_sell_with_fee_inclusive_price() {
        let normalized = normalize_order(&posted(TradeDirection::SellNft), MarketplaceId::ZeroEx);
        assert_eq!(normalized.side, OrderSide::Sell);
        assert_eq!(
            normalized.maker_assets,
            vec![Asset::erc721(PUNKS, U256::from(7804u64))]
        );
        // Price is what a filler pays: order amount plus fees.
        assert_eq!(
            normalized.taker_assets,
            vec![Asset::erc20(WETH, U256::from(1_000_000u64))]
        );
        assert!(matches!(normalized.native, NativeOrder::ZeroEx(_)));
        assert!(normalized.expiration_time.is_some());
    }

    #[test]
    fn test_bid_swaps_sides_and_keeps_marketplace_tag() {
        let normalized = normalize_order(&posted(TradeDirection::BuyNft), MarketplaceId::Trader);
        assert_eq!(normalized.side, OrderSide::Buy);
        assert!(normalized.maker_assets[0].is_fungible());
        assert!(normalized.taker_assets[0].is_non_fungible());
        assert!(matches!(normalized.native, NativeOrder::Trader(_)));
    }
}
