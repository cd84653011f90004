//! 0x v4 NFT Protocol Adapter
//!
//! The RFQ/limit-order protocol marketplace: orders are EIP-712 signed
//! structs filled on-chain through the exchange proxy. Order storage is
//! pluggable behind the `OrderBook` port; the default here is an
//! in-process store. The Trader adapter reuses this module's builder,
//! encoding, and normalizer against a hosted REST book.

pub mod book;
pub mod builder;
pub mod encode;
pub mod marketplace;
pub mod normalize;

pub use book::InMemoryOrderBook;
pub use marketplace::ProtocolMarketplace;
