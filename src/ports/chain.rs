//! Chain Client Port - Provider/Signer Access
//!
//! The façade receives a provider/signer bundle at construction and
//! never talks to a chain transport directly. This port covers the
//! operations adapters need: identity, approval state, approval and
//! arbitrary-call transactions, and EIP-712 typed-data signatures.
//!
//! Approval checks are not cached or coordinated across adapters: two
//! marketplaces needing approval on the same token issue two independent
//! transactions, possibly concurrently. Their targets are different
//! operator contracts, so neither invalidates the other.

use alloy::primitives::{Address, Bytes, TxHash, U256};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Opaque handle to a submitted transaction.
///
/// Chain-specific receipt detail stays with the caller's own provider;
/// this core only forwards the hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxHandle {
    pub tx_hash: TxHash,
}

impl TxHandle {
    pub fn new(tx_hash: TxHash) -> Self {
        Self { tx_hash }
    }
}

/// Trait for provider/signer bundles injected at façade construction.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// The signing account's address (the maker/taker identity).
    fn address(&self) -> Address;

    /// Chain identifier, fixed for the lifetime of the client.
    fn chain_id(&self) -> u64;

    /// Current ERC-20 allowance granted by `address()` to `operator`.
    async fn erc20_allowance(&self, token: Address, operator: Address) -> anyhow::Result<U256>;

    /// Whether `operator` is approved for all of `address()`'s tokens in
    /// `collection` (ERC-721/1155 `isApprovedForAll`).
    async fn is_approved_for_all(
        &self,
        collection: Address,
        operator: Address,
    ) -> anyhow::Result<bool>;

    /// Submit an unbounded ERC-20 `approve(operator, uint256.max)`.
    async fn approve_erc20(&self, token: Address, operator: Address) -> anyhow::Result<TxHandle>;

    /// Submit `setApprovalForAll(operator, true)` on a collection.
    async fn set_approval_for_all(
        &self,
        collection: Address,
        operator: Address,
    ) -> anyhow::Result<TxHandle>;

    /// Sign and submit an arbitrary contract call (fills, cancels).
    async fn send_transaction(
        &self,
        to: Address,
        calldata: Bytes,
        value: U256,
    ) -> anyhow::Result<TxHandle>;

    /// Produce an EIP-712 signature over a typed-data payload.
    async fn sign_typed_data(&self, typed_data: &serde_json::Value) -> anyhow::Result<Bytes>;
}
