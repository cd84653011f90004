//! Use Cases Layer - Aggregation Façade
//!
//! The caller-facing orchestration over the marketplace adapters.

pub mod aggregator;

pub use aggregator::MarketplaceAggregator;
