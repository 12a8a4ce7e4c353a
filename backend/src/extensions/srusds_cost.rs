//! Fixed srUSDS cost, spread evenly over the year

use super::{ExtensionAdjustment, ExtensionContext, ExtensionState, MonthlyExtension};
use crate::models::revenue::monthly;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

pub const NAME: &str = "srusds_cost";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SrUsdsCost {
    pub annual_cost: Decimal,
}

impl Default for SrUsdsCost {
    fn default() -> Self {
        Self {
            annual_cost: dec!(5_000_000),
        }
    }
}

impl MonthlyExtension for SrUsdsCost {
    fn name(&self) -> &'static str {
        NAME
    }

    fn calculate(&self, _ctx: &ExtensionContext<'_>, _state: &mut ExtensionState) -> ExtensionAdjustment {
        let cost = monthly(self.annual_cost);
        let mut adjustment = ExtensionAdjustment {
            cost_adjustment: cost,
            ..Default::default()
        };
        adjustment.breakdown.insert("srusds_annual_cost".into(), self.annual_cost);
        adjustment.breakdown.insert("srusds_monthly_cost".into(), cost);
        adjustment
    }
}
