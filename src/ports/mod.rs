//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the traits the aggregation façade requires from the outside
//! world. Adapters implement these traits.
//!
//! Port categories:
//! - `Marketplace`: the four-operation capability contract every
//!   marketplace adapter implements (make/get/take/cancel)
//! - `ChainClient`: provider/signer access (approvals, transactions,
//!   typed-data signatures), injected at façade construction
//! - `OrderBook`: pluggable order storage for protocol-based adapters

pub mod chain;
pub mod marketplace;
pub mod orderbook;

pub use chain::{ChainClient, TxHandle};
pub use marketplace::Marketplace;
pub use orderbook::{OrderBook, OrderBookQuery, PostedOrder};
