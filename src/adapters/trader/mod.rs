//! Trader.xyz Adapter
//!
//! The hosted-order-book variant of the 0x v4 protocol: identical order
//! semantics, signing, and fills, with persistence delegated to a REST
//! API. The adapter itself is `ProtocolMarketplace` composed with this
//! module's `RestOrderBook`.

pub mod client;

pub use client::RestOrderBook;
