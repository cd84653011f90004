//! Canonical order model shared by every marketplace adapter.
//!
//! Defines the marketplace identifier enumeration, the caller-facing
//! order parameters and filters, the marketplace-agnostic
//! `NormalizedOrder`, and the per-marketplace response envelope used by
//! every façade operation.

use std::collections::HashMap;
use std::str::FromStr;

use alloy::primitives::{Address, U256};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::asset::Asset;
use super::fees::Fee;
use super::native::NativeOrder;
use crate::error::MarketplaceError;

/// Closed enumeration of supported marketplaces.
///
/// The façade registry is a fixed-size table indexed by this enum; there
/// is deliberately no string-keyed dynamic registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketplaceId {
    /// Fixed-price order-book market behind the OpenSea REST API.
    OpenSea,
    /// 0x v4 NFT protocol with a pluggable (default in-process) book.
    ZeroEx,
    /// 0x v4 orders persisted to the Trader.xyz hosted order book.
    Trader,
}

impl MarketplaceId {
    /// Every supported marketplace, in registry iteration order.
    pub const ALL: [Self; 3] = [Self::OpenSea, Self::ZeroEx, Self::Trader];

    /// Number of registry slots.
    pub const COUNT: usize = Self::ALL.len();

    /// Stable slot index into the façade registry.
    pub const fn index(self) -> usize {
        match self {
            Self::OpenSea => 0,
            Self::ZeroEx => 1,
            Self::Trader => 2,
        }
    }
}

impl std::fmt::Display for MarketplaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OpenSea => write!(f, "opensea"),
            Self::ZeroEx => write!(f, "zeroex"),
            Self::Trader => write!(f, "trader"),
        }
    }
}

impl FromStr for MarketplaceId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "opensea" => Ok(Self::OpenSea),
            "zeroex" | "0x" => Ok(Self::ZeroEx),
            "trader" => Ok(Self::Trader),
            other => Err(format!("unknown marketplace '{other}'")),
        }
    }
}

/// Which role the fungible leg plays in an order.
///
/// `Sell` lists a non-fungible asset for a fungible price; `Buy` bids a
/// fungible amount for a non-fungible asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Sell,
    Buy,
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sell => write!(f, "sell"),
            Self::Buy => write!(f, "buy"),
        }
    }
}

/// A fungible-asset specification used by the sell/buy conveniences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FungibleToken {
    pub contract_address: Address,
    #[serde(with = "super::native::serde_u256")]
    pub amount: U256,
}

impl FungibleToken {
    pub fn new(contract_address: Address, amount: U256) -> Self {
        Self {
            contract_address,
            amount,
        }
    }
}

/// Per-marketplace options for one `make_order` call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderConfig {
    /// Third-party fees the order's price must absorb.
    #[serde(default)]
    pub fees: Vec<Fee>,
}

/// Caller input for creating an order across selected marketplaces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MakeOrderParams {
    /// Assets the maker gives. Exactly one, enforced by validation.
    pub maker_assets: Vec<Asset>,
    /// Assets the maker wants. Exactly one, enforced by validation.
    pub taker_assets: Vec<Asset>,
    /// Restricts who may fill the order. `None` means anyone.
    #[serde(default)]
    pub taker: Option<Address>,
    /// Absolute expiration. `None` falls back to the configured default.
    #[serde(default)]
    pub expiration_time: Option<DateTime<Utc>>,
    /// Marketplace subset to dispatch to. `None` means every registered one.
    #[serde(default)]
    pub marketplaces: Option<Vec<MarketplaceId>>,
    /// Per-marketplace order options (fee schedules etc.).
    #[serde(default)]
    pub marketplace_config: HashMap<MarketplaceId, OrderConfig>,
}

impl MakeOrderParams {
    /// A plain one-for-one swap with no restrictions.
    pub fn new(maker_assets: Vec<Asset>, taker_assets: Vec<Asset>) -> Self {
        Self {
            maker_assets,
            taker_assets,
            taker: None,
            expiration_time: None,
            marketplaces: None,
            marketplace_config: HashMap::new(),
        }
    }

    /// Order options for one marketplace, if the caller supplied any.
    pub fn config_for(&self, id: MarketplaceId) -> Option<&OrderConfig> {
        self.marketplace_config.get(&id)
    }

    /// Whether the caller's marketplace subset includes `id`.
    pub fn targets(&self, id: MarketplaceId) -> bool {
        self.marketplaces
            .as_ref()
            .is_none_or(|subset| subset.contains(&id))
    }
}

/// Query for existing orders, applied independently by every adapter.
///
/// An `Asset` filter on either side also derives the order side: a
/// fungible taker asset selects sell listings, a fungible maker asset
/// selects buy bids. One asset per side is meaningful since bundles are
/// unsupported.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderFilter {
    #[serde(default)]
    pub maker: Option<Address>,
    #[serde(default)]
    pub taker: Option<Address>,
    #[serde(default)]
    pub maker_asset: Option<Asset>,
    #[serde(default)]
    pub taker_asset: Option<Asset>,
}

impl OrderFilter {
    pub fn by_maker(maker: Address) -> Self {
        Self {
            maker: Some(maker),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_maker_asset(mut self, asset: Asset) -> Self {
        self.maker_asset = Some(asset);
        self
    }

    #[must_use]
    pub fn with_taker_asset(mut self, asset: Asset) -> Self {
        self.taker_asset = Some(asset);
        self
    }

    /// Order side implied by the asset filters, if any.
    pub fn implied_side(&self) -> Option<OrderSide> {
        match (&self.maker_asset, &self.taker_asset) {
            (Some(m), _) if m.is_fungible() => Some(OrderSide::Buy),
            (_, Some(t)) if t.is_fungible() => Some(OrderSide::Sell),
            (Some(m), _) if m.is_non_fungible() => Some(OrderSide::Sell),
            (_, Some(t)) if t.is_non_fungible() => Some(OrderSide::Buy),
            _ => None,
        }
    }

    /// The non-fungible asset filter, whichever side it sits on.
    pub fn non_fungible_filter(&self) -> Option<&Asset> {
        self.maker_asset
            .iter()
            .chain(self.taker_asset.iter())
            .find(|a| a.is_non_fungible())
    }

    /// The fungible asset filter, whichever side it sits on.
    pub fn fungible_filter(&self) -> Option<&Asset> {
        self.maker_asset
            .iter()
            .chain(self.taker_asset.iter())
            .find(|a| a.is_fungible())
    }
}

/// The canonical, marketplace-agnostic order shape.
///
/// Produced by an adapter's normalizer at make/get time and passed back
/// unmodified into take/cancel. The fungible leg's amount is the computed
/// price of the order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedOrder {
    /// Marketplace-native order identifier.
    pub id: String,
    pub maker: Address,
    pub side: OrderSide,
    pub maker_assets: Vec<Asset>,
    pub taker_assets: Vec<Asset>,
    #[serde(default)]
    pub expiration_time: Option<DateTime<Utc>>,
    /// Verbatim native payload for take/cancel round-trips.
    pub native: NativeOrder,
}

impl NormalizedOrder {
    /// The fungible leg, whichever side it sits on.
    pub fn fungible_asset(&self) -> Option<&Asset> {
        self.maker_assets
            .iter()
            .chain(self.taker_assets.iter())
            .find(|a| a.is_fungible())
    }

    /// The non-fungible leg, whichever side it sits on.
    pub fn non_fungible_asset(&self) -> Option<&Asset> {
        self.maker_assets
            .iter()
            .chain(self.taker_assets.iter())
            .find(|a| a.is_non_fungible())
    }

    /// Price per non-fungible unit, for cross-marketplace comparison.
    ///
    /// `None` if either leg is missing or the magnitudes exceed decimal
    /// range (96-bit mantissa).
    pub fn unit_price(&self) -> Option<Decimal> {
        let price = Decimal::from_str(&self.fungible_asset()?.amount().to_string()).ok()?;
        let units = Decimal::from_str(&self.non_fungible_asset()?.amount().to_string()).ok()?;
        if units.is_zero() {
            return None;
        }
        price.checked_div(units)
    }
}

/// Per-marketplace outcome of a façade operation.
///
/// Exactly one of data/error, guaranteed by `Result`. One marketplace's
/// failure never affects another's entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketplaceResponse<D> {
    pub marketplace: MarketplaceId,
    pub result: Result<D, MarketplaceError>,
}

impl<D> MarketplaceResponse<D> {
    pub fn ok(marketplace: MarketplaceId, data: D) -> Self {
        Self {
            marketplace,
            result: Ok(data),
        }
    }

    pub fn err(marketplace: MarketplaceId, error: MarketplaceError) -> Self {
        Self {
            marketplace,
            result: Err(error),
        }
    }

    /// Successful payload, if any.
    pub fn data(&self) -> Option<&D> {
        self.result.as_ref().ok()
    }

    /// Failure payload, if any.
    pub fn error(&self) -> Option<&MarketplaceError> {
        self.result.as_ref().err()
    }

    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::native::{NftStandard, TradeDirection, ZeroExNftOrder};
    use alloy::primitives::address;
    use rust_decimal_macros::dec;

    const WETH: Address = address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");
    const PUNKS: Address = address!("b47e3cd837dDF8e4c57F05d70Ab865de6e193BBB");

    fn native_fixture() -> NativeOrder {
        NativeOrder::ZeroEx(ZeroExNftOrder {
            direction: TradeDirection::SellNft,
            maker: Address::ZERO,
            taker: Address::ZERO,
            expiry: U256::ZERO,
            nonce: U256::ZERO,
            erc20_token: WETH,
            erc20_token_amount: U256::from(1000u64),
            fees: vec![],
            nft_standard: NftStandard::Erc1155,
            nft_token: PUNKS,
            nft_token_id: U256::from(1u64),
            nft_token_amount: U256::from(4u64),
            signature: None,
        })
    }

    #[test]
    fn test_marketplace_id_roundtrip() {
        for id in MarketplaceId::ALL {
            assert_eq!(id.to_string().parse::<MarketplaceId>(), Ok(id));
        }
        assert!("looksrare".parse::<MarketplaceId>().is_err());
    }

    #[test]
    fn test_registry_indices_are_dense() {
        let mut seen = [false; MarketplaceId::COUNT];
        for id in MarketplaceId::ALL {
            assert!(!seen[id.index()]);
            seen[id.index()] = true;
        }
    }

    #[test]
    fn test_targets_defaults_to_all() {
        let params = MakeOrderParams::new(vec![], vec![]);
        assert!(params.targets(MarketplaceId::OpenSea));

        let subset = MakeOrderParams {
            marketplaces: Some(vec![MarketplaceId::Trader]),
            ..MakeOrderParams::new(vec![], vec![])
        };
        assert!(subset.targets(MarketplaceId::Trader));
        assert!(!subset.targets(MarketplaceId::OpenSea));
    }

    #[test]
    fn test_filter_implied_side() {
        let fungible = Asset::erc20(WETH, U256::from(100u64));
        let nft = Asset::erc721(PUNKS, U256::from(1u64));

        let sell = OrderFilter::default().with_taker_asset(fungible.clone());
        assert_eq!(sell.implied_side(), Some(OrderSide::Sell));

        let buy = OrderFilter::default().with_maker_asset(fungible);
        assert_eq!(buy.implied_side(), Some(OrderSide::Buy));

        let sell_by_nft = OrderFilter::default().with_maker_asset(nft);
        assert_eq!(sell_by_nft.implied_side(), Some(OrderSide::Sell));

        assert_eq!(OrderFilter::default().implied_side(), None);
    }

    #[test]
    fn test_unit_price_divides_by_quantity() {
        let order = NormalizedOrder {
            id: "1".into(),
            maker: Address::ZERO,
            side: OrderSide::Sell,
            maker_assets: vec![Asset::erc1155(PUNKS, U256::from(1u64), U256::from(4u64))],
            taker_assets: vec![Asset::erc20(WETH, U256::from(1000u64))],
            expiration_time: None,
            native: native_fixture(),
        };
        assert_eq!(order.unit_price(), Some(dec!(250)));
    }

    #[test]
    fn test_response_is_exclusive() {
        let ok = MarketplaceResponse::ok(MarketplaceId::OpenSea, 1u32);
        assert!(ok.data().is_some());
        assert!(ok.error().is_none());

        let err: MarketplaceResponse<u32> = MarketplaceResponse::err(
            MarketplaceId::Trader,
            crate::error::MarketplaceError::msg("boom"),
        );
        assert!(err.data().is_none());
        assert_eq!(err.error().unwrap().message, "boom");
    }
}
