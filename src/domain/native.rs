//! Marketplace-native order payloads.
//!
//! Each marketplace has its own order wire shape. The canonical
//! `NormalizedOrder` preserves the native payload verbatim so that
//! `take_order`/`cancel_order` receive everything the originating adapter
//! needs without re-deriving it. The payloads are carried as a tagged
//! union keyed by marketplace, so adapters pattern-match back to their own
//! type instead of downcasting an opaque blob.
//!
//! Big-integer fields crossing a JSON wire are encoded as decimal strings
//! (the hosted order books reject hex or numeric forms).

use alloy::primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

use super::order::OrderSide;

/// Decimal-string codec for `U256` JSON fields.
pub mod serde_u256 {
    use alloy::primitives::U256;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse::<U256>()
            .map_err(|e| D::Error::custom(format!("invalid decimal U256 '{raw}': {e}")))
    }

    /// Same codec for `Option<U256>` fields.
    pub mod option {
        use alloy::primitives::U256;
        use serde::{Deserialize, Deserializer, Serializer, de::Error};

        pub fn serialize<S: Serializer>(
            value: &Option<U256>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(v) => serializer.serialize_some(&v.to_string()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<U256>, D::Error> {
            let raw = Option::<String>::deserialize(deserializer)?;
            raw.map(|s| {
                s.parse::<U256>()
                    .map_err(|e| D::Error::custom(format!("invalid decimal U256 '{s}': {e}")))
            })
            .transpose()
        }
    }
}

/// Whether a 0x v4 order sells or buys the non-fungible leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TradeDirection {
    /// Maker gives the NFT, asks for the fungible token (a listing).
    SellNft,
    /// Maker gives the fungible token, asks for the NFT (a bid).
    BuyNft,
}

/// Non-fungible standard of the 0x v4 order's NFT leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NftStandard {
    Erc721,
    Erc1155,
}

/// A fee entry embedded in a 0x v4 order, paid by the taker on top of the
/// fungible amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeOrderFee {
    pub recipient: Address,
    #[serde(with = "serde_u256")]
    pub amount: U256,
}

/// A 0x v4 NFT protocol order, shared by the on-chain/local-book adapter
/// and the Trader.xyz hosted-book adapter.
///
/// Field names and decimal-string encoding follow the protocol's JSON
/// convention so the struct round-trips through hosted order books
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZeroExNftOrder {
    pub direction: TradeDirection,
    pub maker: Address,
    /// Zero address means anyone may fill.
    pub taker: Address,
    /// Unix seconds after which the order is void.
    #[serde(with = "serde_u256")]
    pub expiry: U256,
    /// Maker-scoped uniqueness + cancellation handle.
    #[serde(with = "serde_u256")]
    pub nonce: U256,
    pub erc20_token: Address,
    /// Net fungible amount (fees already apportioned out).
    #[serde(with = "serde_u256")]
    pub erc20_token_amount: U256,
    pub fees: Vec<NativeOrderFee>,
    pub nft_standard: NftStandard,
    pub nft_token: Address,
    #[serde(with = "serde_u256")]
    pub nft_token_id: U256,
    /// 1 for ERC721; the unit count for ERC1155.
    #[serde(with = "serde_u256")]
    pub nft_token_amount: U256,
    /// EIP-712 signature, absent until the maker has signed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<Bytes>,
}

impl ZeroExNftOrder {
    /// Total fungible amount a filler transfers: order amount plus fees.
    pub fn erc20_total_with_fees(&self) -> U256 {
        self.fees
            .iter()
            .fold(self.erc20_token_amount, |acc, f| acc + f.amount)
    }
}

/// A single Seaport offer or consideration item, as OpenSea reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeaportItem {
    /// Seaport ItemType: 0=native, 1=ERC20, 2=ERC721, 3=ERC1155,
    /// 4/5=criteria-based. Anything else is unclassifiable.
    pub item_type: u8,
    pub token: Address,
    #[serde(with = "serde_u256")]
    pub identifier_or_criteria: U256,
    #[serde(with = "serde_u256")]
    pub start_amount: U256,
}

/// An OpenSea (Seaport) order envelope.
///
/// Typed fields cover what normalization and fulfillment need; the full
/// marketplace payload rides along verbatim in `protocol_data` so the
/// fulfillment call can echo it back without information loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeaportOrder {
    pub order_hash: String,
    pub protocol_address: Address,
    pub maker: Address,
    /// `Sell` for listings (asks), `Buy` for offers (bids).
    pub side: OrderSide,
    pub offer: Vec<SeaportItem>,
    pub consideration: Vec<SeaportItem>,
    /// Total fungible price across consideration/offer, base units.
    #[serde(with = "serde_u256")]
    pub current_price: U256,
    /// Unix seconds; `None` for open-ended listings.
    pub expiration_time: Option<i64>,
    /// Verbatim marketplace payload, echoed into fulfillment requests.
    pub protocol_data: serde_json::Value,
}

/// Native payload of a normalized order, keyed by originating marketplace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "marketplace", content = "order", rename_all = "camelCase")]
pub enum NativeOrder {
    OpenSea(SeaportOrder),
    /// Local/pluggable-book 0x v4 order.
    ZeroEx(ZeroExNftOrder),
    /// Trader.xyz-hosted 0x v4 order.
    Trader(ZeroExNftOrder),
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    #[test]
    fn test_zeroex_order_decimal_string_wire_format() {
        let order = ZeroExNftOrder {
            direction: TradeDirection::SellNft,
            maker: address!("1111111111111111111111111111111111111111"),
            taker: Address::ZERO,
            expiry: U256::from(1_800_000_000u64),
            nonce: U256::from(7u64),
            erc20_token: address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"),
            erc20_token_amount: U256::from(975_000u64),
            fees: vec![NativeOrderFee {
                recipient: address!("2222222222222222222222222222222222222222"),
                amount: U256::from(25_000u64),
            }],
            nft_standard: NftStandard::Erc721,
            nft_token: address!("b47e3cd837dDF8e4c57F05d70Ab865de6e193BBB"),
            nft_token_id: U256::from(7804u64),
            nft_token_amount: U256::from(1u64),
            signature: None,
        };

        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["erc20TokenAmount"], "975000");
        assert_eq!(json["nonce"], "7");
        assert_eq!(json["fees"][0]["amount"], "25000");
        assert!(json.get("signature").is_none());

        let back: ZeroExNftOrder = serde_json::from_value(json).unwrap();
        assert_eq!(back, order);
        assert_eq!(back.erc20_total_with_fees(), U256::from(1_000_000u64));
    }
}
