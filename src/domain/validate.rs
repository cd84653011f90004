//! Structural validation of an asset pair.
//!
//! Stateless predicates run in a fixed order before any marketplace
//! interaction, so the caller sees exactly one deterministic error
//! regardless of how many adapters are selected. Every supported
//! marketplace prices exactly one fungible leg against exactly one
//! non-fungible leg; these checks reject anything else up front.

use super::asset::Asset;
use super::order::MakeOrderParams;
use crate::error::ValidationError;

/// Fail if an asset list is empty.
pub fn assert_not_empty(side: &'static str, assets: &[Asset]) -> Result<(), ValidationError> {
    if assets.is_empty() {
        return Err(ValidationError::EmptyAssets { side });
    }
    Ok(())
}

/// Fail if an order side bundles more than one asset.
pub fn assert_not_bundled(assets: &[Asset]) -> Result<(), ValidationError> {
    if assets.len() > 1 {
        return Err(ValidationError::BundledAssets);
    }
    Ok(())
}

/// Fail if both legs are the fungible variant.
pub fn assert_not_fungible_vs_fungible(
    maker: &Asset,
    taker: &Asset,
) -> Result<(), ValidationError> {
    if maker.is_fungible() && taker.is_fungible() {
        return Err(ValidationError::FungibleForFungible);
    }
    Ok(())
}

/// Fail if both legs are non-fungible variants, in any combination.
pub fn assert_not_non_fungible_vs_non_fungible(
    maker: &Asset,
    taker: &Asset,
) -> Result<(), ValidationError> {
    if maker.is_non_fungible() && taker.is_non_fungible() {
        return Err(ValidationError::NonFungibleForNonFungible);
    }
    Ok(())
}

/// Run every structural check in the canonical order.
pub fn validate_make_order(params: &MakeOrderParams) -> Result<(), ValidationError> {
    assert_not_empty("maker", &params.maker_assets)?;
    assert_not_empty("taker", &params.taker_assets)?;
    assert_not_bundled(&params.maker_assets)?;
    assert_not_bundled(&params.taker_assets)?;

    let maker = &params.maker_assets[0];
    let taker = &params.taker_assets[0];
    assert_not_fungible_vs_fungible(maker, taker)?;
    assert_not_non_fungible_vs_non_fungible(maker, taker)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{Address, U256, address};

    const WETH: Address = address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");
    const DAI: Address = address!("6B175474E89094C44Da98b954EedeAC495271d0F");
    const PUNKS: Address = address!("b47e3cd837dDF8e4c57F05d70Ab865de6e193BBB");

    fn weth(amount: u64) -> Asset {
        Asset::erc20(WETH, U256::from(amount))
    }

    fn punk(id: u64) -> Asset {
        Asset::erc721(PUNKS, U256::from(id))
    }

    #[test]
    fn test_empty_maker_side_rejected() {
        let params = MakeOrderParams::new(vec![], vec![weth(1)]);
        assert_eq!(
            validate_make_order(&params),
            Err(ValidationError::EmptyAssets { side: "maker" })
        );
    }

    #[test]
    fn test_empty_taker_side_rejected() {
        let params = MakeOrderParams::new(vec![punk(1)], vec![]);
        assert_eq!(
            validate_make_order(&params),
            Err(ValidationError::EmptyAssets { side: "taker" })
        );
    }

    #[test]
    fn test_bundles_rejected_regardless_of_type() {
        let params = MakeOrderParams::new(vec![punk(1), punk(2)], vec![weth(100)]);
        assert_eq!(
            validate_make_order(&params),
            Err(ValidationError::BundledAssets)
        );

        let params = MakeOrderParams::new(vec![punk(1)], vec![weth(100), weth(200)]);
        assert_eq!(
            validate_make_order(&params),
            Err(ValidationError::BundledAssets)
        );
    }

    #[test]
    fn test_fungible_for_fungible_rejected() {
        let params = MakeOrderParams::new(vec![weth(100)], vec![Asset::erc20(DAI, U256::from(5))]);
        assert_eq!(
            validate_make_order(&params),
            Err(ValidationError::FungibleForFungible)
        );
    }

    #[test]
    fn test_non_fungible_pairs_rejected_in_any_mix() {
        let erc1155 = Asset::erc1155(PUNKS, U256::from(9), U256::from(2));
        for (maker, taker) in [
            (punk(1), punk(2)),
            (punk(1), erc1155.clone()),
            (erc1155.clone(), punk(2)),
            (erc1155.clone(), erc1155.clone()),
        ] {
            let params = MakeOrderParams::new(vec![maker], vec![taker]);
            assert_eq!(
                validate_make_order(&params),
                Err(ValidationError::NonFungibleForNonFungible)
            );
        }
    }

    #[test]
    fn test_one_fungible_one_non_fungible_accepted_both_ways() {
        let sell = MakeOrderParams::new(vec![punk(1)], vec![weth(100)]);
        assert!(validate_make_order(&sell).is_ok());

        let buy = MakeOrderParams::new(vec![weth(100)], vec![punk(1)]);
        assert!(validate_make_order(&buy).is_ok());
    }

    #[test]
    fn test_unknown_asset_passes_structural_checks() {
        // Unknown is neither fungible nor non-fungible; adapters decide
        // later whether they can price it (UnsupportedOperation).
        let unknown = Asset::Unknown {
            contract_address: PUNKS,
            token_id: None,
            amount: None,
        };
        let params = MakeOrderParams::new(vec![unknown], vec![weth(100)]);
        assert!(validate_make_order(&params).is_ok());
    }

    #[test]
    fn test_empty_reported_before_bundling() {
        // Fixed validator order: emptiness first, then bundling.
        let params = MakeOrderParams::new(vec![], vec![weth(1), weth(2)]);
        assert_eq!(
            validate_make_order(&params),
            Err(ValidationError::EmptyAssets { side: "maker" })
        );
    }
}
