//! NFT Trade Aggregator — Library Root
//!
//! A uniform façade over API-incompatible NFT marketplaces: express a
//! trade as "asset bundle A for asset bundle B" once and create, query,
//! fill, or cancel it on every registered marketplace.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod usecases;

pub use config::AggregatorConfig;
pub use domain::asset::Asset;
pub use domain::order::{
    FungibleToken, MakeOrderParams, MarketplaceId, MarketplaceResponse, NormalizedOrder,
    OrderFilter, OrderSide,
};
pub use error::{MarketplaceError, TradeError, ValidationError};
pub use usecases::MarketplaceAggregator;
