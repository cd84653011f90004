//! Marketplace Port - The Adapter Capability Contract
//!
//! One implementation per marketplace. Each adapter owns its connection
//! to that marketplace's external API/contracts and exposes the four
//! logical operations the façade fans out over.
//!
//! Errors returned from these methods are caught at the façade's
//! fan-out boundary and converted to `MarketplaceResponse` error entries
//! for make/get; take/cancel outcomes are single-target and wrapped into
//! one response.

use async_trait::async_trait;

use super::chain::TxHandle;
use crate::domain::order::{MakeOrderParams, MarketplaceId, NormalizedOrder, OrderFilter};

/// Capability contract for one external marketplace.
///
/// Concrete adapters additionally expose an inherent
/// `supports_chain_id(id) -> bool`, consulted once at façade
/// construction to decide registry membership. An adapter is never
/// instantiated for a chain it does not support.
#[async_trait]
pub trait Marketplace: Send + Sync {
    /// Which registry slot this adapter occupies.
    fn id(&self) -> MarketplaceId;

    /// Build, sign, and persist a marketplace-native order.
    ///
    /// Performs the maker-side allowance/approval side effect first if
    /// the maker's asset is not yet approved for this marketplace's
    /// transfer mechanism; order construction may depend on the
    /// resulting approval state, so the two steps never overlap.
    ///
    /// # Errors
    /// Fails on unsupported asset combinations, fee-schedule violations,
    /// or any marketplace API/contract failure.
    async fn make_order(&self, params: &MakeOrderParams) -> anyhow::Result<NormalizedOrder>;

    /// Query this marketplace's order book, normalized.
    async fn get_orders(&self, filter: &OrderFilter) -> anyhow::Result<Vec<NormalizedOrder>>;

    /// Fill an existing order, approving the taking side if needed.
    ///
    /// The order must have been produced by this same adapter; its
    /// native payload carries everything the fill needs.
    async fn take_order(&self, order: &NormalizedOrder) -> anyhow::Result<TxHandle>;

    /// Invalidate an existing order via this marketplace's cancellation
    /// mechanism.
    async fn cancel_order(&self, order: &NormalizedOrder) -> anyhow::Result<TxHandle>;
}
