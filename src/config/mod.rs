//! Configuration Module - Aggregator Configuration
//!
//! In-memory configuration passed at façade construction, optionally
//! loaded from TOML with environment-independent defaults. Contract
//! addresses and chain tables are externalized here - nothing is
//! hardcoded in the domain layer, and there is no process-wide lookup
//! state: the wrapped-native map is injected through this config.

pub mod loader;

use std::collections::HashMap;

use alloy::primitives::{Address, address};
use serde::Deserialize;

use crate::domain::fees::Fee;

/// Top-level aggregator configuration.
///
/// Every field has a working default; `AggregatorConfig::default()` is a
/// fully usable mainnet/Polygon setup.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AggregatorConfig {
    /// OpenSea adapter configuration.
    pub opensea: OpenSeaConfig,
    /// 0x v4 protocol adapter configuration.
    pub zeroex: ZeroExConfig,
    /// Trader.xyz hosted-book adapter configuration.
    pub trader: TraderConfig,
    /// Wrapped-native-currency address per chain id (TOML keys are
    /// strings, hence the string-keyed map).
    pub wrapped_native: HashMap<String, Address>,
    /// Order lifetime applied when the caller supplies no expiration.
    pub default_expiry_seconds: u64,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            opensea: OpenSeaConfig::default(),
            zeroex: ZeroExConfig::default(),
            trader: TraderConfig::default(),
            wrapped_native: default_wrapped_native(),
            default_expiry_seconds: default_expiry_seconds(),
        }
    }
}

impl AggregatorConfig {
    /// Wrapped-native-token address for a chain, if configured.
    pub fn wrapped_native_for(&self, chain_id: u64) -> Option<Address> {
        self.wrapped_native.get(&chain_id.to_string()).copied()
    }
}

/// OpenSea adapter configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OpenSeaConfig {
    /// Disables the adapter outright, regardless of chain support.
    pub enabled: bool,
    /// OpenSea API key. Requests run unauthenticated (and throttled)
    /// without one.
    pub api_key: Option<String>,
    /// REST base URL override.
    pub base_url: String,
    /// Seaport protocol address (identical across supported chains).
    pub protocol_address: Address,
    /// Chain ids the adapter registers on.
    pub supported_chains: Vec<u64>,
    /// Default fee schedule applied to orders without a per-call one.
    pub fees: Vec<Fee>,
}

impl Default for OpenSeaConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            base_url: default_opensea_url(),
            protocol_address: default_seaport_address(),
            supported_chains: default_chains(),
            fees: Vec::new(),
        }
    }
}

/// 0x v4 protocol adapter configuration (local/pluggable order book).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ZeroExConfig {
    pub enabled: bool,
    /// 0x exchange proxy address (identical across supported chains).
    pub exchange_proxy: Address,
    /// Gas limit override for fill/cancel transactions.
    pub gas_limit: Option<u64>,
    pub supported_chains: Vec<u64>,
    pub fees: Vec<Fee>,
}

impl Default for ZeroExConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            exchange_proxy: default_exchange_proxy(),
            gas_limit: None,
            supported_chains: default_chains(),
            fees: Vec::new(),
        }
    }
}

/// Trader.xyz hosted order-book adapter configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TraderConfig {
    pub enabled: bool,
    pub api_key: Option<String>,
    /// Hosted order-book base URL override.
    pub base_url: String,
    /// Exchange proxy used for fills/cancels of hosted orders.
    pub exchange_proxy: Address,
    pub supported_chains: Vec<u64>,
    pub fees: Vec<Fee>,
}

impl Default for TraderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            base_url: default_trader_url(),
            exchange_proxy: default_exchange_proxy(),
            supported_chains: default_chains(),
            fees: Vec::new(),
        }
    }
}

// Default value functions for serde

fn default_expiry_seconds() -> u64 {
    // 30 days
    2_592_000
}

fn default_chains() -> Vec<u64> {
    vec![1, 137]
}

fn default_opensea_url() -> String {
    "https://api.opensea.io/api/v2".to_string()
}

fn default_trader_url() -> String {
    "https://api.trader.xyz/orderbook".to_string()
}

fn default_seaport_address() -> Address {
    // Seaport 1.5, deployed at the same address on every supported chain
    address!("00000000000000ADc04C56Bf30aC9d3c0aAF14dC")
}

fn default_exchange_proxy() -> Address {
    // 0x exchange proxy, deployed at the same address on every supported chain
    address!("Def1C0ded9bec7F1a1670819833240f027b25EfF")
}

fn default_wrapped_native() -> HashMap<String, Address> {
    HashMap::from([
        // Mainnet WETH
        (
            "1".to_string(),
            address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"),
        ),
        // Polygon WMATIC
        (
            "137".to_string(),
            address!("0d500B1d8E8eF31E21C99d1Db9A6444d3ADf1270"),
        ),
    ])
}
