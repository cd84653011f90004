//! Fee apportionment.
//!
//! Converts a caller-supplied list of fee entries (flat amounts or basis
//! points) plus a base trade amount into a concrete fee schedule. The
//! supported marketplaces compute the transferred total as trade amount
//! *plus* fees, so the amount embedded in an order must be the base
//! amount minus the schedule's total; `FeeSchedule::net_amount` gives
//! exactly that. Total fees may never consume the entire trade amount.

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use super::native::serde_u256;
use crate::error::ValidationError;

/// Denominator for basis-point fees: 10000 bps = 100%.
pub const BPS_DENOMINATOR: u64 = 10_000;

/// A caller-supplied fee entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Fee {
    /// Flat fee denominated in the fungible asset's base units.
    Flat {
        recipient: Address,
        #[serde(with = "serde_u256")]
        amount: U256,
    },
    /// Proportional fee in units of 1/10000 of the base amount.
    BasisPoints { recipient: Address, basis_points: u32 },
}

/// A fee resolved to a concrete flat amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputedFee {
    pub recipient: Address,
    #[serde(with = "serde_u256")]
    pub amount: U256,
}

/// The concrete fee schedule for one order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeeSchedule {
    pub fees: Vec<ComputedFee>,
    /// Sum of every computed fee, strictly less than the base amount.
    #[serde(with = "serde_u256")]
    pub total: U256,
}

impl FeeSchedule {
    /// Base amount with the fee total apportioned out.
    ///
    /// This is the amount to embed in the marketplace order; the
    /// marketplace adds the fees back on top at fill time.
    pub fn net_amount(&self, base: U256) -> U256 {
        base.saturating_sub(self.total)
    }
}

/// Resolve fee entries against a base trade amount.
///
/// Rules:
/// - a flat fee must be strictly less than `base`;
/// - basis points must be in `[1, 9999]`; the computed amount is
///   `floor(base * bps / 10000)`;
/// - the sum of all computed fees must be strictly less than `base`.
pub fn compute_fee_schedule(fees: &[Fee], base: U256) -> Result<FeeSchedule, ValidationError> {
    let mut computed = Vec::with_capacity(fees.len());
    let mut total = U256::ZERO;

    for fee in fees {
        let resolved = match fee {
            Fee::Flat { recipient, amount } => {
                if *amount >= base {
                    return Err(ValidationError::FeeExceedsAmount {
                        amount: amount.to_string(),
                        base: base.to_string(),
                    });
                }
                ComputedFee {
                    recipient: *recipient,
                    amount: *amount,
                }
            }
            Fee::BasisPoints {
                recipient,
                basis_points,
            } => {
                if *basis_points == 0 || u64::from(*basis_points) >= BPS_DENOMINATOR {
                    return Err(ValidationError::InvalidBasisPoints {
                        basis_points: *basis_points,
                    });
                }
                ComputedFee {
                    recipient: *recipient,
                    amount: bps_amount(base, *basis_points),
                }
            }
        };
        // Saturate on accumulation: a saturated total is always >= base
        // and rejected by the check below.
        total = total.saturating_add(resolved.amount);
        computed.push(resolved);
    }

    if !fees.is_empty() && total >= base {
        return Err(ValidationError::TotalFeesExceedAmount {
            total: total.to_string(),
            base: base.to_string(),
        });
    }

    Ok(FeeSchedule {
        fees: computed,
        total,
    })
}

/// `floor(base * bps / 10000)` without a 256-bit overflow.
///
/// The product `base * bps` can exceed `U256::MAX` for large valid
/// amounts, so the division is split: with `base = q * 10000 + r`,
/// `floor(base * bps / 10000) == q * bps + floor(r * bps / 10000)`.
/// `q * bps` cannot overflow since `bps < 10000`.
fn bps_amount(base: U256, basis_points: u32) -> U256 {
    let denom = U256::from(BPS_DENOMINATOR);
    let bps = U256::from(basis_points);
    (base / denom) * bps + (base % denom) * bps / denom
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    const R1: Address = address!("1111111111111111111111111111111111111111");
    const R2: Address = address!("2222222222222222222222222222222222222222");

    #[test]
    fn test_basis_point_fee_floors() {
        // 250 bps of 1_000_000 = 25_000; net embedded amount 975_000.
        let fees = [Fee::BasisPoints {
            recipient: R1,
            basis_points: 250,
        }];
        let base = U256::from(1_000_000u64);
        let schedule = compute_fee_schedule(&fees, base).unwrap();
        assert_eq!(schedule.fees.len(), 1);
        assert_eq!(schedule.fees[0].amount, U256::from(25_000u64));
        assert_eq!(schedule.total, U256::from(25_000u64));
        assert_eq!(schedule.net_amount(base), U256::from(975_000u64));
    }

    #[test]
    fn test_basis_point_rounding_truncates() {
        // 1 bps of 999 = floor(0.0999) = 0.
        let fees = [Fee::BasisPoints {
            recipient: R1,
            basis_points: 1,
        }];
        let schedule = compute_fee_schedule(&fees, U256::from(999u64)).unwrap();
        assert_eq!(schedule.total, U256::ZERO);
    }

    #[test]
    fn test_basis_point_fee_on_max_amount_does_not_wrap() {
        // base * bps exceeds 256 bits; 5000 bps of U256::MAX must still
        // come out as exactly half.
        let fees = [Fee::BasisPoints {
            recipient: R1,
            basis_points: 5000,
        }];
        let schedule = compute_fee_schedule(&fees, U256::MAX).unwrap();
        assert_eq!(schedule.total, U256::MAX / U256::from(2u64));
        assert!(schedule.total < U256::MAX);
    }

    #[test]
    fn test_overflowing_fee_total_is_rejected() {
        // Each fee is valid alone, but their sum exceeds both 256 bits
        // and the base amount.
        let fees = [
            Fee::BasisPoints {
                recipient: R1,
                basis_points: 9999,
            },
            Fee::BasisPoints {
                recipient: R2,
                basis_points: 9999,
            },
        ];
        let err = compute_fee_schedule(&fees, U256::MAX).unwrap_err();
        assert!(matches!(err, ValidationError::TotalFeesExceedAmount { .. }));
    }

    #[test]
    fn test_flat_fee_passes_through() {
        let fees = [Fee::Flat {
            recipient: R1,
            amount: U256::from(42u64),
        }];
        let schedule = compute_fee_schedule(&fees, U256::from(1000u64)).unwrap();
        assert_eq!(schedule.fees[0].amount, U256::from(42u64));
    }

    #[test]
    fn test_flat_fee_at_or_above_base_rejected() {
        for amount in [1000u64, 1001] {
            let fees = [Fee::Flat {
                recipient: R1,
                amount: U256::from(amount),
            }];
            let err = compute_fee_schedule(&fees, U256::from(1000u64)).unwrap_err();
            assert!(matches!(err, ValidationError::FeeExceedsAmount { .. }));
        }
    }

    #[test]
    fn test_basis_points_bounds() {
        for bps in [0u32, 10_000, 65_000] {
            let fees = [Fee::BasisPoints {
                recipient: R1,
                basis_points: bps,
            }];
            let err = compute_fee_schedule(&fees, U256::from(1000u64)).unwrap_err();
            assert!(matches!(err, ValidationError::InvalidBasisPoints { .. }));
        }

        for bps in [1u32, 9999] {
            let fees = [Fee::BasisPoints {
                recipient: R1,
                basis_points: bps,
            }];
            assert!(compute_fee_schedule(&fees, U256::from(1_000_000u64)).is_ok());
        }
    }

    #[test]
    fn test_total_must_stay_below_base() {
        // Individually fine; 6000 + 4000 bps together consume everything.
        let fees = [
            Fee::BasisPoints {
                recipient: R1,
                basis_points: 6000,
            },
            Fee::BasisPoints {
                recipient: R2,
                basis_points: 4000,
            },
        ];
        let err = compute_fee_schedule(&fees, U256::from(1_000_000u64)).unwrap_err();
        assert!(matches!(err, ValidationError::TotalFeesExceedAmount { .. }));
    }

    #[test]
    fn test_mixed_flat_and_basis_point_fees() {
        let base = U256::from(1_000_000u64);
        let fees = [
            Fee::BasisPoints {
                recipient: R1,
                basis_points: 250,
            },
            Fee::Flat {
                recipient: R2,
                amount: U256::from(10_000u64),
            },
        ];
        let schedule = compute_fee_schedule(&fees, base).unwrap();
        assert_eq!(schedule.total, U256::from(35_000u64));
        assert_eq!(schedule.net_amount(base), U256::from(965_000u64));
    }

    #[test]
    fn test_empty_fee_list_is_zero_schedule() {
        let schedule = compute_fee_schedule(&[], U256::from(1u64)).unwrap();
        assert!(schedule.fees.is_empty());
        assert_eq!(schedule.total, U256::ZERO);
        assert_eq!(schedule.net_amount(U256::from(1u64)), U256::from(1u64));
    }
}
