//! Profit waterfall
//!
//! Net revenue is split in a fixed order: security budget first, then the
//! remainder between backstop contribution and staking rewards. There are no
//! floors; a negative month flows through as negative budgets.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Inputs for the waterfall
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaterfallInputs {
    pub net_revenue: Decimal,
    pub security_rate: Decimal,
    pub backstop_rate: Decimal,
    /// One-time withdrawal (positive number)
    pub backstop_withdrawal: Decimal,
}

/// Waterfall results for one month
///
/// `backstop_contribution + staking_rewards == net_profit` and
/// `net_backstop_change == backstop_contribution − backstop_withdrawal`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WaterfallSnapshot {
    pub security_budget: Decimal,
    pub after_security: Decimal,
    pub backstop_contribution: Decimal,
    pub backstop_withdrawal: Decimal,
    pub net_backstop_change: Decimal,
    pub staking_rewards: Decimal,
    pub net_profit: Decimal,
}

/// Monthly waterfall
pub fn calculate_waterfall(inputs: &WaterfallInputs) -> WaterfallSnapshot {
    let security_budget = inputs.net_revenue * inputs.security_rate;
    let after_security = inputs.net_revenue - security_budget;

    let backstop_contribution = after_security * inputs.backstop_rate;
    let staking_rewards = after_security * (Decimal::ONE - inputs.backstop_rate);

    WaterfallSnapshot {
        security_budget,
        after_security,
        backstop_contribution,
        backstop_withdrawal: inputs.backstop_withdrawal,
        net_backstop_change: backstop_contribution - inputs.backstop_withdrawal,
        staking_rewards,
        net_profit: backstop_contribution + staking_rewards,
    }
}
