//! Rate derivations from the SOFR base
//!
//! All rates are annualized fractions (0.045 = 4.5%).
//!
//! ```text
//! savings_rate       = sofr + savings_rate_spread
//! gross_revenue_rate = savings_rate + gross_revenue_rate_spread
//! farm_yield         = savings_rate + farm_yield_spread
//! ```

use crate::scenario::inputs::{keys, MonthlyInputs};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Input rates for derivation
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RateInputs {
    pub sofr: Decimal,
    pub savings_rate_spread: Decimal,
    pub gross_revenue_rate_spread: Decimal,
    pub farm_yield_spread: Decimal,
}

impl RateInputs {
    /// Read rate inputs from a resolved month; absent keys are zero
    pub fn from_inputs(inputs: &MonthlyInputs) -> Self {
        Self {
            sofr: inputs.get(keys::SOFR),
            savings_rate_spread: inputs.get(keys::SAVINGS_RATE_SPREAD),
            gross_revenue_rate_spread: inputs.get(keys::GROSS_REVENUE_RATE_SPREAD),
            farm_yield_spread: inputs.get(keys::FARM_YIELD_SPREAD),
        }
    }
}

/// Rates derived once per month, consumed by every downstream calculation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateSet {
    pub sofr: Decimal,
    pub savings_rate: Decimal,
    pub gross_revenue_rate: Decimal,
    pub farm_yield: Decimal,
}

impl RateSet {
    /// Derive the month's rates
    ///
    /// # Example
    /// ```
    /// use forecast_core_rs::models::rates::{RateInputs, RateSet};
    /// use rust_decimal_macros::dec;
    ///
    /// let rates = RateSet::derive(&RateInputs {
    ///     sofr: dec!(0.04),
    ///     savings_rate_spread: dec!(0.005),
    ///     gross_revenue_rate_spread: dec!(0.01),
    ///     farm_yield_spread: dec!(0.001),
    /// });
    /// assert_eq!(rates.savings_rate, dec!(0.045));
    /// assert_eq!(rates.gross_revenue_rate, dec!(0.055));
    /// assert_eq!(rates.farm_yield, dec!(0.046));
    /// ```
    pub fn derive(inputs: &RateInputs) -> Self {
        let savings_rate = inputs.sofr + inputs.savings_rate_spread;
        Self {
            sofr: inputs.sofr,
            savings_rate,
            gross_revenue_rate: savings_rate + inputs.gross_revenue_rate_spread,
            farm_yield: savings_rate + inputs.farm_yield_spread,
        }
    }

    /// Whether farm yield can be used as a divisor
    pub fn has_positive_farm_yield(&self) -> bool {
        self.farm_yield > Decimal::ZERO
    }
}
