//! USDS/sUSDS supply calculations
//!
//! ```text
//! unrewarded_usds_farm = farmable_tokens × farm_emission_rate / farm_yield
//! avg_usds_supply      = base_usds + unrewarded_usds_farm
//! avg_unrewarded_usds  = unrewarded_usds_user + unrewarded_usds_farm
//! avg_susds_supply     = avg_usds_supply − avg_unrewarded_usds
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while deriving supply
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SupplyError {
    #[error("Farm yield must be positive to convert farming emissions, got {farm_yield}")]
    NonPositiveFarmYield { farm_yield: Decimal },
}

/// Inputs for supply calculation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SupplyInputs {
    /// Base USDS supply, already including any extension supply boost
    pub base_usds: Decimal,
    pub unrewarded_usds_user: Decimal,
    pub farmable_tokens: Decimal,
    pub farm_emission_rate: Decimal,
    pub farm_yield: Decimal,
}

/// Derived supply values for one month
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SupplySnapshot {
    pub unrewarded_usds_farm: Decimal,
    pub avg_usds_supply: Decimal,
    pub avg_unrewarded_usds: Decimal,
    pub avg_susds_supply: Decimal,
}

/// Supply attracted by farming emissions
///
/// Zero when nothing is farmed; otherwise farm yield must be positive.
pub fn farm_supply(
    farmable_tokens: Decimal,
    farm_emission_rate: Decimal,
    farm_yield: Decimal,
) -> Result<Decimal, SupplyError> {
    if farmable_tokens.is_zero() {
        return Ok(Decimal::ZERO);
    }
    if farm_yield <= Decimal::ZERO {
        return Err(SupplyError::NonPositiveFarmYield { farm_yield });
    }
    Ok(farmable_tokens * farm_emission_rate / farm_yield)
}

/// Derive the month's supply figures
pub fn calculate_supply(inputs: &SupplyInputs) -> Result<SupplySnapshot, SupplyError> {
    let unrewarded_usds_farm = farm_supply(
        inputs.farmable_tokens,
        inputs.farm_emission_rate,
        inputs.farm_yield,
    )?;

    let avg_usds_supply = inputs.base_usds + unrewarded_usds_farm;
    let avg_unrewarded_usds = inputs.unrewarded_usds_user + unrewarded_usds_farm;

    Ok(SupplySnapshot {
        unrewarded_usds_farm,
        avg_usds_supply,
        avg_unrewarded_usds,
        avg_susds_supply: avg_usds_supply - avg_unrewarded_usds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_farming_adds_unrewarded_supply() {
        let supply = calculate_supply(&SupplyInputs {
            base_usds: dec!(1_000_000),
            unrewarded_usds_user: dec!(100_000),
            farmable_tokens: dec!(40_000),
            farm_emission_rate: dec!(0.2),
            farm_yield: dec!(0.04),
        })
        .unwrap();

        assert_eq!(supply.unrewarded_usds_farm, dec!(200_000));
        assert_eq!(supply.avg_usds_supply, dec!(1_200_000));
        assert_eq!(supply.avg_unrewarded_usds, dec!(300_000));
        assert_eq!(supply.avg_susds_supply, dec!(900_000));
    }

    #[test]
    fn test_zero_farm_yield_without_farming_is_fine() {
        let supply = calculate_supply(&SupplyInputs {
            base_usds: dec!(500),
            unrewarded_usds_user: dec!(0),
            farmable_tokens: dec!(0),
            farm_emission_rate: dec!(0.2),
            farm_yield: dec!(0),
        })
        .unwrap();
        assert_eq!(supply.avg_usds_supply, dec!(500));
    }

    #[test]
    fn test_zero_farm_yield_with_farming_fails() {
        let result = calculate_supply(&SupplyInputs {
            base_usds: dec!(500),
            unrewarded_usds_user: dec!(0),
            farmable_tokens: dec!(10),
            farm_emission_rate: dec!(0.2),
            farm_yield: dec!(0),
        });
        assert_eq!(
            result,
            Err(SupplyError::NonPositiveFarmYield { farm_yield: dec!(0) })
        );
    }
}
