//! USDT subsidy
//!
//! A USDT position earns `rate_factor × savings_rate` while the same
//! liquidity in the PSM would earn `sofr + psm_spread`. A positive shortfall
//! is a cost; a negative one is booked as extra gross revenue.

use super::{
    DeclaredInput, ExtensionAdjustment, ExtensionContext, ExtensionState, InputFallback, MonthlyExtension,
};
use crate::models::revenue::monthly;
use crate::scenario::inputs::keys;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

pub const NAME: &str = "usdt_subsidy";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsdtSubsidy {
    pub amount: Decimal,
    pub psm_spread: Decimal,
    /// USDT yield as a multiple of the savings rate
    pub rate_factor: Decimal,
}

impl Default for UsdtSubsidy {
    fn default() -> Self {
        Self {
            amount: dec!(150_000_000),
            psm_spread: dec!(-0.0030),
            rate_factor: Decimal::ZERO,
        }
    }
}

impl MonthlyExtension for UsdtSubsidy {
    fn name(&self) -> &'static str {
        NAME
    }

    fn declared_inputs(&self) -> Vec<DeclaredInput> {
        vec![DeclaredInput {
            extension: NAME,
            key: keys::USDT_SUBSIDY_AMOUNT,
            fallback: InputFallback::Configured(self.amount),
        }]
    }

    fn calculate(&self, ctx: &ExtensionContext<'_>, _state: &mut ExtensionState) -> ExtensionAdjustment {
        let amount = ctx.inputs.get_or(keys::USDT_SUBSIDY_AMOUNT, self.amount);
        if amount <= Decimal::ZERO {
            return ExtensionAdjustment::zero();
        }

        let psm_rate = ctx.rates.sofr + self.psm_spread;
        let usdt_rate = self.rate_factor * ctx.rates.savings_rate;
        let shortfall = monthly(amount * (psm_rate - usdt_rate));

        let mut adjustment = ExtensionAdjustment::zero();
        if shortfall > Decimal::ZERO {
            adjustment.cost_adjustment = shortfall;
        } else {
            adjustment.gross_revenue_adjustment = -shortfall;
        }
        adjustment.breakdown.insert("usdt_amount".into(), amount);
        adjustment.breakdown.insert("usdt_rate".into(), usdt_rate);
        adjustment.breakdown.insert("shortfall".into(), shortfall);
        adjustment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::rates::{RateInputs, RateSet};
    use crate::scenario::inputs::MonthlyInputs;

    fn rates() -> RateSet {
        RateSet::derive(&RateInputs {
            sofr: dec!(0.043),
            savings_rate_spread: dec!(0.002),
            ..Default::default()
        })
    }

    #[test]
    fn test_shortfall_is_cost() {
        let ext = UsdtSubsidy {
            amount: dec!(1_200_000),
            ..Default::default()
        };
        let inputs = MonthlyInputs::new();
        let rates = rates();
        let adj = ext.calculate(&ExtensionContext::new(1, &inputs, &rates), &mut ExtensionState::new());

        // psm 0.040, usdt 0
        assert_eq!(adj.cost_adjustment, dec!(4000));
        assert_eq!(adj.gross_revenue_adjustment, Decimal::ZERO);
    }

    #[test]
    fn test_surplus_is_gross_revenue() {
        let ext = UsdtSubsidy {
            amount: dec!(1_200_000),
            rate_factor: dec!(1),
            ..Default::default()
        };
        let inputs = MonthlyInputs::new();
        let rates = rates();
        let adj = ext.calculate(&ExtensionContext::new(1, &inputs, &rates), &mut ExtensionState::new());

        // psm 0.040, usdt 0.045
        assert_eq!(adj.gross_revenue_adjustment, dec!(500));
        assert_eq!(adj.cost_adjustment, Decimal::ZERO);
    }

    #[test]
    fn test_input_amount_overrides() {
        let ext = UsdtSubsidy::default();
        let inputs = MonthlyInputs::from_iter([(keys::USDT_SUBSIDY_AMOUNT, Decimal::ZERO)]);
        let rates = rates();
        let adj = ext.calculate(&ExtensionContext::new(1, &inputs, &rates), &mut ExtensionState::new());
        assert_eq!(adj, ExtensionAdjustment::zero());
    }
}
