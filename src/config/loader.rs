//! Configuration Loader - File Loading and Validation
//!
//! Loads an `AggregatorConfig` from TOML and validates it before the
//! façade is constructed, with clear error messages for
//! misconfiguration.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::AggregatorConfig;
use crate::domain::fees::{BPS_DENOMINATOR, Fee};

/// Load and validate configuration from a TOML file.
///
/// # Errors
/// Returns a detailed error if the file cannot be read, the TOML fails
/// to parse, or validation rules are violated.
pub fn load_config(path: impl AsRef<Path>) -> Result<AggregatorConfig> {
    let path = path.as_ref();

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: AggregatorConfig =
        toml::from_str(&content).context("Failed to parse aggregator config")?;

    validate_config(&config)?;

    info!(
        opensea = config.opensea.enabled,
        zeroex = config.zeroex.enabled,
        trader = config.trader.enabled,
        default_expiry_seconds = config.default_expiry_seconds,
        "Configuration loaded"
    );

    Ok(config)
}

/// Validate all configuration parameters.
pub fn validate_config(config: &AggregatorConfig) -> Result<()> {
    anyhow::ensure!(
        config.default_expiry_seconds > 0,
        "default_expiry_seconds must be positive"
    );

    anyhow::ensure!(
        !config.opensea.base_url.is_empty(),
        "OpenSea base URL must not be empty"
    );
    anyhow::ensure!(
        !config.trader.base_url.is_empty(),
        "Trader base URL must not be empty"
    );

    for (name, chains) in [
        ("opensea", &config.opensea.supported_chains),
        ("zeroex", &config.zeroex.supported_chains),
        ("trader", &config.trader.supported_chains),
    ] {
        anyhow::ensure!(
            !chains.is_empty(),
            "{name} supported_chains must not be empty"
        );
    }

    for (name, fees) in [
        ("opensea", &config.opensea.fees),
        ("zeroex", &config.zeroex.fees),
        ("trader", &config.trader.fees),
    ] {
        for fee in fees {
            if let Fee::BasisPoints { basis_points, .. } = fee {
                anyhow::ensure!(
                    *basis_points > 0 && u64::from(*basis_points) < BPS_DENOMINATOR,
                    "{name} default fee basis points must be in [1, 9999], got {basis_points}"
                );
            }
        }
    }

    for (chain, address) in &config.wrapped_native {
        anyhow::ensure!(
            chain.parse::<u64>().is_ok(),
            "wrapped_native key '{chain}' is not a chain id"
        );
        anyhow::ensure!(
            !address.is_zero(),
            "wrapped_native address for chain {chain} must not be zero"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_nonexistent_file() {
        let result = load_config("nonexistent.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_default_config_validates() {
        assert!(validate_config(&AggregatorConfig::default()).is_ok());
    }

    #[test]
    fn test_out_of_range_default_fee_rejected() {
        let mut config = AggregatorConfig::default();
        config.opensea.fees = vec![Fee::BasisPoints {
            recipient: alloy::primitives::Address::ZERO,
            basis_points: 10_000,
        }];
        assert!(validate_config(&config).is_err());
    }
}
