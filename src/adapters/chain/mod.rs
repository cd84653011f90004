//! Chain Adapter - alloy-backed `ChainClient`
//!
//! Implements the `ChainClient` port against a real EVM RPC endpoint:
//! read calls (allowance, operator approval) via hand-built calldata,
//! write calls through the provider's wallet filler, and EIP-712
//! typed-data signatures through a local signer.

pub mod approvals;
pub mod calldata;
pub mod provider;

use alloy::dyn_abi::TypedData;
use alloy::network::EthereumWallet;
use alloy::primitives::{Address, Bytes, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::Signer;
use alloy::signers::local::PrivateKeySigner;
use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, instrument};

use self::calldata::{address_word, bool_word, encode_call, u256_word};
use self::provider::EvmProvider;
use crate::ports::chain::{ChainClient, TxHandle};

/// `ChainClient` implementation over alloy provider + local signer.
pub struct AlloyChainClient {
    provider: EvmProvider,
    signer: PrivateKeySigner,
    wallet: Address,
    /// Gas limit override for write transactions, from config.
    gas_limit: Option<u64>,
}

impl AlloyChainClient {
    /// Connect to an RPC endpoint with the given signing key.
    ///
    /// The signer is attached to the provider as a wallet filler, so
    /// every write call is signed and submitted in one step.
    pub async fn connect(
        rpc_url: &str,
        signer: PrivateKeySigner,
        gas_limit: Option<u64>,
    ) -> Result<Self> {
        let wallet = signer.address();
        let provider = EvmProvider::connect(rpc_url, EthereumWallet::from(signer.clone())).await?;

        Ok(Self {
            provider,
            signer,
            wallet,
            gas_limit,
        })
    }

    /// Read-only contract call returning the raw ABI words.
    async fn call(&self, to: Address, calldata: Vec<u8>) -> Result<Bytes> {
        let tx = TransactionRequest::default()
            .to(to)
            .input(Bytes::from(calldata).into());

        self.provider
            .inner()
            .call(&tx)
            .await
            .context("Contract read call failed")
    }
}

#[async_trait]
impl ChainClient for AlloyChainClient {
    fn address(&self) -> Address {
        self.wallet
    }

    fn chain_id(&self) -> u64 {
        self.provider.chain_id()
    }

    async fn erc20_allowance(&self, token: Address, operator: Address) -> Result<U256> {
        let calldata = encode_call(
            "allowance(address,address)",
            &[address_word(self.wallet), address_word(operator)],
        );
        let result = self.call(token, calldata).await?;
        Ok(U256::from_be_slice(&result))
    }

    async fn is_approved_for_all(&self, collection: Address, operator: Address) -> Result<bool> {
        let calldata = encode_call(
            "isApprovedForAll(address,address)",
            &[address_word(self.wallet), address_word(operator)],
        );
        let result = self.call(collection, calldata).await?;
        Ok(result.last().copied() == Some(1))
    }

    async fn approve_erc20(&self, token: Address, operator: Address) -> Result<TxHandle> {
        let calldata = encode_call(
            "approve(address,uint256)",
            &[address_word(operator), u256_word(approvals::MAX_ALLOWANCE)],
        );
        self.send_transaction(token, Bytes::from(calldata), U256::ZERO)
            .await
    }

    async fn set_approval_for_all(
        &self,
        collection: Address,
        operator: Address,
    ) -> Result<TxHandle> {
        let calldata = encode_call(
            "setApprovalForAll(address,bool)",
            &[address_word(operator), bool_word(true)],
        );
        self.send_transaction(collection, Bytes::from(calldata), U256::ZERO)
            .await
    }

    #[instrument(skip(self, calldata), fields(to = %to))]
    async fn send_transaction(
        &self,
        to: Address,
        calldata: Bytes,
        value: U256,
    ) -> Result<TxHandle> {
        let mut tx = TransactionRequest::default()
            .to(to)
            .input(calldata.into())
            .value(value);

        if let Some(limit) = self.gas_limit {
            tx = tx.gas_limit(limit);
        }

        let pending = self
            .provider
            .inner()
            .send_transaction(tx)
            .await
            .context("Transaction submission failed")?;

        let tx_hash = *pending.tx_hash();
        debug!(%tx_hash, "Transaction submitted");
        Ok(TxHandle::new(tx_hash))
    }

    async fn sign_typed_data(&self, typed_data: &serde_json::Value) -> Result<Bytes> {
        let typed: TypedData =
            serde_json::from_value(typed_data.clone()).context("Malformed EIP-712 payload")?;

        let signature = self
            .signer
            .sign_dynamic_typed_data(&typed)
            .await
            .context("Typed-data signing failed")?;

        Ok(Bytes::from(signature.as_bytes().to_vec()))
    }
}
