//! Canonical asset model.
//!
//! A tagged union over the token standards every supported marketplace
//! understands, plus an `Unknown` escape hatch for marketplace-specific
//! item schemes (criteria offers, legacy standards) that must normalize
//! best-effort instead of failing.

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use super::native::serde_u256;

/// A fungible or non-fungible holding.
///
/// Exactly one variant per value. `amount` is always non-negative by
/// construction (`U256`); an `Erc721` holding has an implicit amount of 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Asset {
    /// Fungible token quantified by amount. Never carries a token id.
    Erc20 {
        contract_address: Address,
        #[serde(with = "serde_u256")]
        amount: U256,
    },
    /// Unique token identified by id, implicit amount of 1.
    Erc721 {
        contract_address: Address,
        #[serde(with = "serde_u256")]
        token_id: U256,
    },
    /// Semi-fungible token: unique id with a per-id quantity.
    Erc1155 {
        contract_address: Address,
        #[serde(with = "serde_u256")]
        token_id: U256,
        #[serde(with = "serde_u256")]
        amount: U256,
    },
    /// Item scheme this core cannot classify. Fields preserved best-effort.
    Unknown {
        contract_address: Address,
        #[serde(default, with = "serde_u256::option")]
        token_id: Option<U256>,
        #[serde(default, with = "serde_u256::option")]
        amount: Option<U256>,
    },
}

impl Asset {
    /// Convenience constructor for a fungible leg.
    pub fn erc20(contract_address: Address, amount: U256) -> Self {
        Self::Erc20 {
            contract_address,
            amount,
        }
    }

    /// Convenience constructor for a unique token leg.
    pub fn erc721(contract_address: Address, token_id: U256) -> Self {
        Self::Erc721 {
            contract_address,
            token_id,
        }
    }

    /// Convenience constructor for a semi-fungible leg.
    pub fn erc1155(contract_address: Address, token_id: U256, amount: U256) -> Self {
        Self::Erc1155 {
            contract_address,
            token_id,
            amount,
        }
    }

    /// The contract/collection address, present on every variant.
    pub fn contract_address(&self) -> Address {
        match self {
            Self::Erc20 {
                contract_address, ..
            }
            | Self::Erc721 {
                contract_address, ..
            }
            | Self::Erc1155 {
                contract_address, ..
            }
            | Self::Unknown {
                contract_address, ..
            } => *contract_address,
        }
    }

    /// Token identifier, if the variant carries one.
    pub fn token_id(&self) -> Option<U256> {
        match self {
            Self::Erc20 { .. } => None,
            Self::Erc721 { token_id, .. } | Self::Erc1155 { token_id, .. } => Some(*token_id),
            Self::Unknown { token_id, .. } => *token_id,
        }
    }

    /// Effective magnitude of the holding. `Erc721` is implicitly 1.
    pub fn amount(&self) -> U256 {
        match self {
            Self::Erc20 { amount, .. } | Self::Erc1155 { amount, .. } => *amount,
            Self::Erc721 { .. } => U256::from(1),
            Self::Unknown { amount, .. } => amount.unwrap_or(U256::ZERO),
        }
    }

    /// Whether units of this asset are interchangeable (ERC20-like).
    pub fn is_fungible(&self) -> bool {
        matches!(self, Self::Erc20 { .. })
    }

    /// Whether this asset is identified by a unique token id.
    ///
    /// `Unknown` is neither fungible nor non-fungible: validators accept
    /// it structurally and adapters decide whether they can price it.
    pub fn is_non_fungible(&self) -> bool {
        matches!(self, Self::Erc721 { .. } | Self::Erc1155 { .. })
    }
}

impl std::fmt::Display for Asset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Erc20 {
                contract_address,
                amount,
            } => write!(f, "ERC20({contract_address}, amount={amount})"),
            Self::Erc721 {
                contract_address,
                token_id,
            } => write!(f, "ERC721({contract_address}, id={token_id})"),
            Self::Erc1155 {
                contract_address,
                token_id,
                amount,
            } => write!(
                f,
                "ERC1155({contract_address}, id={token_id}, amount={amount})"
            ),
            Self::Unknown {
                contract_address, ..
            } => write!(f, "UNKNOWN({contract_address})"),
        }
    }
}
