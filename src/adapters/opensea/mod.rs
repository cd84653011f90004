//! OpenSea Adapter
//!
//! Fixed-price order-book marketplace behind the OpenSea REST API.
//! Orders follow the Seaport protocol: created locally (build, approve,
//! sign) and hosted by the API; fills and cancels are executed with
//! transaction payloads the API hands back.

pub mod builder;
pub mod client;
pub mod marketplace;
pub mod normalize;

pub use marketplace::OpenSeaMarketplace;
