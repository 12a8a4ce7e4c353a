//! Monthly revenue calculations
//!
//! Annualized rates are converted to monthly amounts by dividing by 12 as the
//! final step of each product.

use crate::core::MONTHS_PER_YEAR;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Distribution reward rate paid on the tier-2 share of sUSDS (10 bps)
pub const DR_TIER2_RATE: Decimal = dec!(0.0010);
/// Distribution reward rate paid on the tier-3 share of sUSDS (20 bps)
pub const DR_TIER3_RATE: Decimal = dec!(0.0020);
/// Distribution reward rate paid on the tier-4 share of sUSDS (50 bps)
pub const DR_TIER4_RATE: Decimal = dec!(0.0050);

/// Convert an annual amount to a monthly amount
pub fn monthly(annual: Decimal) -> Decimal {
    annual / Decimal::from(MONTHS_PER_YEAR)
}

/// Inputs for revenue calculation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevenueInputs {
    pub usds_supply: Decimal,
    pub susds_supply: Decimal,
    pub gross_revenue_rate: Decimal,
    pub savings_rate: Decimal,
    pub sellable_tokens: Decimal,
    pub sell_token_rate: Decimal,
    /// Legacy monthly subsidy term; zero in the pipeline, modelled by an extension
    pub subsidized_borrow: Decimal,
    /// Legacy monthly srUSDS term; zero in the pipeline, modelled by an extension
    pub srusds_cost: Decimal,
    pub tier2_ratio: Decimal,
    pub tier3_ratio: Decimal,
    pub tier4_ratio: Decimal,
}

/// Derived revenue values for one month
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RevenueSnapshot {
    pub token_sales_income: Decimal,
    pub gross_revenue: Decimal,
    pub savings_expense: Decimal,
    pub distribution_rewards: Decimal,
    pub net_revenue: Decimal,
}

/// Monthly revenue calculation
pub fn calculate_revenue(inputs: &RevenueInputs) -> RevenueSnapshot {
    let token_sales_income = monthly(inputs.sellable_tokens * inputs.sell_token_rate);

    let gross_revenue =
        monthly(inputs.usds_supply * inputs.gross_revenue_rate) + token_sales_income;

    let savings_expense = monthly(inputs.susds_supply * inputs.savings_rate);

    let distribution_rewards = monthly(
        inputs.susds_supply * inputs.tier2_ratio * DR_TIER2_RATE
            + inputs.susds_supply * inputs.tier3_ratio * DR_TIER3_RATE
            + inputs.susds_supply * inputs.tier4_ratio * DR_TIER4_RATE,
    );

    let net_revenue = gross_revenue - savings_expense - distribution_rewards
        + inputs.subsidized_borrow
        + inputs.srusds_cost;

    RevenueSnapshot {
        token_sales_income,
        gross_revenue,
        savings_expense,
        distribution_rewards,
        net_revenue,
    }
}
