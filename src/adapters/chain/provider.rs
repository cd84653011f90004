//! EVM RPC Provider - alloy-rs 0.9 Connection Management
//!
//! Manages the connection to an EVM chain via alloy-rs. Validates RPC
//! connectivity at construction and exposes a shared provider instance
//! for all on-chain operations.
//!
//! In alloy 0.9, `ProviderBuilder::new().on_http()` returns a complex
//! filler type over the HTTP transport. We erase it to
//! `dyn Provider<Http<Client>>` to keep the API clean across the
//! adapter layer.

use std::sync::Arc;

use alloy::network::EthereumWallet;
use alloy::providers::{Provider, ProviderBuilder};
use alloy::transports::http::{Client, Http};
use anyhow::{Context, Result};
use tracing::{info, instrument};

/// Shared EVM RPC provider backed by alloy-rs 0.9.
///
/// All marketplace adapters share a single provider instance to avoid
/// redundant connections and enable connection pooling. The wallet
/// filler is attached at build time so `send_transaction` signs and
/// submits through the same erased handle.
pub struct EvmProvider {
    /// The alloy HTTP provider (type-erased).
    provider: Arc<dyn Provider<Http<Client>> + Send + Sync>,
    /// Chain id reported by the RPC at construction.
    chain_id: u64,
}

impl EvmProvider {
    /// Connect to an RPC endpoint with a signing wallet attached.
    ///
    /// Queries the chain id once and pins it for the lifetime of the
    /// provider; adapters rely on it never changing.
    #[instrument(skip_all, fields(rpc_url))]
    pub async fn connect(rpc_url: &str, wallet: EthereumWallet) -> Result<Self> {
        let provider = ProviderBuilder::new()
            .wallet(wallet)
            .on_http(rpc_url.parse().context("Invalid RPC URL")?);

        let provider: Arc<dyn Provider<Http<Client>> + Send + Sync> = Arc::new(provider);

        let chain_id = provider
            .get_chain_id()
            .await
            .context("Failed to query chain ID")?;

        info!(chain_id, "Connected to EVM RPC");

        Ok(Self { provider, chain_id })
    }

    /// Get a shared reference to the alloy provider (type-erased).
    pub fn inner(&self) -> Arc<dyn Provider<Http<Client>> + Send + Sync> {
        Arc::clone(&self.provider)
    }

    /// Chain id pinned at connection time.
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }
}
