//! Subsidized borrowing
//!
//! A fixed amount borrows at a rate that starts at SOFR and decays linearly
//! toward the gross revenue rate over `duration_months`. The gap is a cost.

use super::{
    DeclaredInput, ExtensionAdjustment, ExtensionContext, ExtensionState, InputFallback, MonthlyExtension,
};
use crate::models::revenue::monthly;
use crate::scenario::inputs::keys;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

pub const NAME: &str = "subsidized_borrow";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubsidizedBorrow {
    pub total_amount: Decimal,
    pub start_month: u32,
    pub duration_months: u32,
}

impl Default for SubsidizedBorrow {
    fn default() -> Self {
        Self {
            total_amount: dec!(2_000_000_000),
            start_month: 1,
            duration_months: 24,
        }
    }
}

impl SubsidizedBorrow {
    /// Months since the subsidy started, if it is running in `month`
    fn elapsed(&self, month: u32) -> Option<u32> {
        let elapsed = month.checked_sub(self.start_month)?;
        (elapsed < self.duration_months).then_some(elapsed)
    }
}

impl MonthlyExtension for SubsidizedBorrow {
    fn name(&self) -> &'static str {
        NAME
    }

    fn declared_inputs(&self) -> Vec<DeclaredInput> {
        vec![DeclaredInput {
            extension: NAME,
            key: keys::SOFR,
            fallback: InputFallback::Zero,
        }]
    }

    fn calculate(&self, ctx: &ExtensionContext<'_>, _state: &mut ExtensionState) -> ExtensionAdjustment {
        let Some(elapsed) = self.elapsed(ctx.month) else {
            return ExtensionAdjustment::zero();
        };

        let decay = Decimal::from(elapsed) / Decimal::from(self.duration_months);
        let spread = ctx.rates.gross_revenue_rate - ctx.rates.sofr;
        let subsidized_rate = ctx.rates.sofr + decay * spread;
        let cost = monthly(self.total_amount * (ctx.rates.gross_revenue_rate - subsidized_rate));

        let mut adjustment = ExtensionAdjustment {
            cost_adjustment: cost,
            ..Default::default()
        };
        adjustment.breakdown.insert("subsidy_amount".into(), self.total_amount);
        adjustment.breakdown.insert("decay_factor".into(), decay);
        adjustment.breakdown.insert("subsidized_rate".into(), subsidized_rate);
        adjustment.breakdown.insert("subsidy_cost".into(), cost);
        adjustment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::rates::{RateInputs, RateSet};
    use crate::scenario::inputs::MonthlyInputs;

    fn run(ext: &SubsidizedBorrow, month: u32) -> ExtensionAdjustment {
        let inputs = MonthlyInputs::new();
        let rates = RateSet::derive(&RateInputs {
            sofr: dec!(0.04),
            savings_rate_spread: dec!(0.005),
            gross_revenue_rate_spread: dec!(0.01),
            farm_yield_spread: Decimal::ZERO,
        });
        ext.calculate(&ExtensionContext::new(month, &inputs, &rates), &mut ExtensionState::new())
    }

    #[test]
    fn test_full_subsidy_in_first_month() {
        let ext = SubsidizedBorrow {
            total_amount: dec!(1_200_000),
            start_month: 1,
            duration_months: 4,
        };
        // rate = sofr, gap = 0.015
        assert_eq!(run(&ext, 1).cost_adjustment, dec!(1500));
    }

    #[test]
    fn test_subsidy_decays_linearly() {
        let ext = SubsidizedBorrow {
            total_amount: dec!(1_200_000),
            start_month: 1,
            duration_months: 4,
        };
        // elapsed 2 of 4: subsidized rate halfway, gap 0.0075
        assert_eq!(run(&ext, 3).cost_adjustment, dec!(750));
    }

    #[test]
    fn test_zero_outside_window() {
        let ext = SubsidizedBorrow {
            total_amount: dec!(1_200_000),
            start_month: 3,
            duration_months: 2,
        };
        assert_eq!(run(&ext, 2), ExtensionAdjustment::zero());
        assert_eq!(run(&ext, 5), ExtensionAdjustment::zero());
        assert!(run(&ext, 4).cost_adjustment > Decimal::ZERO);
    }

    #[test]
    fn test_zero_duration_never_runs() {
        let ext = SubsidizedBorrow {
            duration_months: 0,
            ..Default::default()
        };
        assert_eq!(run(&ext, 1), ExtensionAdjustment::zero());
    }
}
