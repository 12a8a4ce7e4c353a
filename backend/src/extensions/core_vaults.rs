//! Core vaults
//!
//! Legacy vault debt pays `rate` instead of the gross revenue rate; the
//! difference is booked as gross revenue (negative when the vault rate is lower).

use super::{
    DeclaredInput, ExtensionAdjustment, ExtensionContext, ExtensionState, InputFallback, MonthlyExtension,
};
use crate::models::revenue::monthly;
use crate::scenario::inputs::keys;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

pub const NAME: &str = "core_vaults";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreVaults {
    pub debt: Decimal,
    pub rate: Decimal,
}

impl Default for CoreVaults {
    fn default() -> Self {
        Self {
            debt: Decimal::ZERO,
            rate: dec!(0.08),
        }
    }
}

impl MonthlyExtension for CoreVaults {
    fn name(&self) -> &'static str {
        NAME
    }

    fn declared_inputs(&self) -> Vec<DeclaredInput> {
        vec![
            DeclaredInput {
                extension: NAME,
                key: keys::CORE_VAULT_DEBT,
                fallback: InputFallback::Configured(self.debt),
            },
            DeclaredInput {
                extension: NAME,
                key: keys::CORE_VAULT_RATE,
                fallback: InputFallback::Configured(self.rate),
            },
        ]
    }

    fn calculate(&self, ctx: &ExtensionContext<'_>, _state: &mut ExtensionState) -> ExtensionAdjustment {
        let debt = ctx.inputs.get_or(keys::CORE_VAULT_DEBT, self.debt);
        if debt <= Decimal::ZERO {
            return ExtensionAdjustment::zero();
        }
        let rate = ctx.inputs.get_or(keys::CORE_VAULT_RATE, self.rate);
        let benefit = monthly(debt * (rate - ctx.rates.gross_revenue_rate));

        let mut adjustment = ExtensionAdjustment {
            gross_revenue_adjustment: benefit,
            ..Default::default()
        };
        adjustment.breakdown.insert("core_vault_debt".into(), debt);
        adjustment.breakdown.insert("core_vault_rate".into(), rate);
        adjustment.breakdown.insert("core_vault_benefit".into(), benefit);
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
            sofr: dec!(0.05),
            ..Default::default()
        })
    }

    #[test]
    fn test_benefit_above_gross_rate() {
        let ext = CoreVaults {
            debt: dec!(1_200_000),
            ..Default::default()
        };
        let inputs = MonthlyInputs::new();
        let rates = rates();
        let adj = ext.calculate(&ExtensionContext::new(1, &inputs, &rates), &mut ExtensionState::new());
        // (0.08 − 0.05) × 1.2M / 12
        assert_eq!(adj.gross_revenue_adjustment, dec!(3000));
    }

    #[test]
    fn test_inputs_override_settings() {
        let ext = CoreVaults::default();
        let inputs = MonthlyInputs::from_iter([
            (keys::CORE_VAULT_DEBT, dec!(1_200_000)),
            (keys::CORE_VAULT_RATE, dec!(0.04)),
        ]);
        let rates = rates();
        let adj = ext.calculate(&ExtensionContext::new(1, &inputs, &rates), &mut ExtensionState::new());
        assert_eq!(adj.gross_revenue_adjustment, dec!(-1000));
    }

    #[test]
    fn test_no_debt_no_adjustment() {
        let ext = CoreVaults::default();
        let inputs = MonthlyInputs::new();
        let rates = rates();
        let adj = ext.calculate(&ExtensionContext::new(1, &inputs, &rates), &mut ExtensionState::new());
        assert_eq!(adj, ExtensionAdjustment::zero());
    }
}
