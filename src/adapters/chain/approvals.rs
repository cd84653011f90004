//! Asset approval sequencing.
//!
//! Before an order can be made or taken, the relevant side's asset must
//! be approved for the marketplace's transfer mechanism. The check runs
//! through the `ChainClient` port and only submits an approval when the
//! current state is insufficient.
//!
//! Approvals are per-operator: each marketplace adapter calls this with
//! its own operator contract, and nothing is coordinated across
//! adapters. ERC-20 approvals use max uint256 to avoid repeated
//! transactions.

use alloy::primitives::{Address, U256};
use anyhow::{Result, bail};
use tracing::{debug, info};

use crate::domain::asset::Asset;
use crate::ports::chain::{ChainClient, TxHandle};

/// Ensure `operator` may transfer `asset` on behalf of the signer.
///
/// Returns the approval transaction handle if one was submitted, `None`
/// if the existing state already suffices. This is a blocking
/// prerequisite of order construction: callers must await it before
/// building the order.
pub async fn ensure_asset_approval(
    chain: &dyn ChainClient,
    asset: &Asset,
    operator: Address,
) -> Result<Option<TxHandle>> {
    match asset {
        Asset::Erc20 {
            contract_address,
            amount,
        } => {
            let current = chain.erc20_allowance(*contract_address, operator).await?;
            if current >= *amount {
                debug!(token = %contract_address, %operator, "ERC20 allowance sufficient");
                return Ok(None);
            }
            info!(
                token = %contract_address,
                %operator,
                current = %current,
                required = %amount,
                "Submitting max ERC20 approval"
            );
            let handle = chain.approve_erc20(*contract_address, operator).await?;
            Ok(Some(handle))
        }
        Asset::Erc721 {
            contract_address, ..
        }
        | Asset::Erc1155 {
            contract_address, ..
        } => {
            if chain
                .is_approved_for_all(*contract_address, operator)
                .await?
            {
                debug!(collection = %contract_address, %operator, "Operator already approved");
                return Ok(None);
            }
            info!(collection = %contract_address, %operator, "Submitting setApprovalForAll");
            let handle = chain
                .set_approval_for_all(*contract_address, operator)
                .await?;
            Ok(Some(handle))
        }
        Asset::Unknown {
            contract_address, ..
        } => {
            bail!("cannot determine approval mechanism for unknown asset at {contract_address}")
        }
    }
}

/// Unbounded allowance value used for ERC-20 approvals.
pub const MAX_ALLOWANCE: U256 = U256::MAX;
