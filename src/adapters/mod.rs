//! Adapters Layer - Concrete Port Implementations
//!
//! One module per external system: the EVM chain client, the shared
//! REST plumbing, and the three marketplace adapters. Everything here
//! implements a port from `crate::ports`; nothing above this layer
//! touches an external API directly.

pub mod chain;
pub mod http;
pub mod opensea;
pub mod trader;
pub mod zeroex;
