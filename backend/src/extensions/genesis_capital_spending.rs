//! Genesis capital spending
//!
//! Spends `total_outflow` evenly across `[start_month, end_month]` as a
//! direct backstop outflow. Outflows are not expenses.

use super::{ExtensionAdjustment, ExtensionContext, ExtensionState, MonthlyExtension};
use crate::scenario::ConfigError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const NAME: &str = "genesis_capital_spending";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenesisCapitalSpending {
    pub start_month: u32,
    pub end_month: u32,
    pub total_outflow: Decimal,
}

impl Default for GenesisCapitalSpending {
    fn default() -> Self {
        Self {
            start_month: 2,
            end_month: 12,
            total_outflow: Decimal::ZERO,
        }
    }
}

impl GenesisCapitalSpending {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.end_month < self.start_month {
            return Err(ConfigError::InvalidExtension {
                name: NAME.to_string(),
                reason: format!(
                    "end_month {} is before start_month {}",
                    self.end_month, self.start_month
                ),
            });
        }
        Ok(())
    }

    fn num_months(&self) -> u32 {
        self.end_month - self.start_month + 1
    }

    pub fn monthly_outflow(&self) -> Decimal {
        self.total_outflow / Decimal::from(self.num_months())
    }
}

impl MonthlyExtension for GenesisCapitalSpending {
    fn name(&self) -> &'static str {
        NAME
    }

    fn calculate(&self, ctx: &ExtensionContext<'_>, _state: &mut ExtensionState) -> ExtensionAdjustment {
        let mut adjustment = ExtensionAdjustment::zero();

        let (outflow, cumulative) = if ctx.month < self.start_month || self.end_month < self.start_month {
            (Decimal::ZERO, Decimal::ZERO)
        } else if ctx.month > self.end_month {
            (Decimal::ZERO, self.total_outflow)
        } else {
            let monthly_outflow = self.monthly_outflow();
            let months_spent = ctx.month - self.start_month + 1;
            (monthly_outflow, monthly_outflow * Decimal::from(months_spent))
        };

        adjustment.backstop_outflow = outflow;
        adjustment.breakdown.insert("monthly_outflow".into(), outflow);
        adjustment.breakdown.insert("cumulative_outflow".into(), cumulative);
        adjustment
    }
}
