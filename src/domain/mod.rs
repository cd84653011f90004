//! Domain layer - Core data model and pure logic.
//!
//! Contains the canonical asset/order model, the structural validators,
//! and the fee-apportionment algorithm. No I/O here (hexagonal
//! architecture inner ring); everything is serializable and testable in
//! isolation.

pub mod asset;
pub mod fees;
pub mod native;
pub mod order;
pub mod validate;

// Re-export core types for convenience
pub use asset::Asset;
pub use fees::{ComputedFee, Fee, FeeSchedule, compute_fee_schedule};
pub use native::{NativeOrder, SeaportItem, SeaportOrder, ZeroExNftOrder};
pub use order::{
    FungibleToken, MakeOrderParams, MarketplaceId, MarketplaceResponse, NormalizedOrder,
    OrderConfig, OrderFilter, OrderSide,
};
pub use validate::validate_make_order;
