//! Error taxonomy.
//!
//! Three families with distinct propagation rules:
//! - `ValidationError` — structural problems with caller input, raised
//!   before any marketplace call and surfaced directly.
//! - `TradeError` — fail-fast façade errors (validation, unsupported
//!   operations, take/cancel lookup failures).
//! - `MarketplaceError` — any failure from a marketplace adapter, always
//!   converted to data inside a `MarketplaceResponse` for fan-out calls
//!   so one marketplace's outage never aborts the others.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::order::MarketplaceId;

/// Structural problem with caller input, detected before dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{side} assets cannot be empty")]
    EmptyAssets { side: &'static str },

    #[error("bundled assets are not supported")]
    BundledAssets,

    #[error("trading a fungible asset for a fungible asset is not supported")]
    FungibleForFungible,

    #[error("trading a non-fungible asset for a non-fungible asset is not supported")]
    NonFungibleForNonFungible,

    #[error("flat fee of {amount} must be less than the trade amount {base}")]
    FeeExceedsAmount { amount: String, base: String },

    #[error("fee basis points {basis_points} must be in [1, 9999]")]
    InvalidBasisPoints { basis_points: u32 },

    #[error("total fees of {total} must be less than the trade amount {base}")]
    TotalFeesExceedAmount { total: String, base: String },
}

/// Fail-fast façade error. Never produced by fan-out branches.
#[derive(Debug, Error)]
pub enum TradeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Structurally valid input that no pricing model can express.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// take/cancel target marketplace has no registered adapter.
    #[error("no adapter registered for marketplace '{0}'")]
    UnknownMarketplace(MarketplaceId),

    /// take/cancel was given a response without a successful payload.
    #[error("order response for marketplace '{0}' carries no order data")]
    MissingOrderData(MarketplaceId),
}

/// A marketplace adapter failure, normalized to message + cause.
///
/// `message` is the failure's display string; `cause` retains the full
/// error chain for diagnostics. The cause does not survive serialization.
#[derive(Debug, Clone, Serialize, Deserialize, Error)]
#[error("{message}")]
pub struct MarketplaceError {
    pub message: String,
    #[serde(skip)]
    pub cause: Option<Arc<anyhow::Error>>,
}

impl MarketplaceError {
    /// A bare-message error with no underlying cause.
    pub fn msg(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }
}

impl From<anyhow::Error> for MarketplaceError {
    fn from(err: anyhow::Error) -> Self {
        Self {
            message: err.to_string(),
            cause: Some(Arc::new(err)),
        }
    }
}

impl PartialEq for MarketplaceError {
    fn eq(&self, other: &Self) -> bool {
        self.message == other.message
    }
}
