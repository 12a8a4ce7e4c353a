//! Token farming supply boost
//!
//! Stars distribute a share of their token holdings as farming rewards for
//! `duration_months` after launch. Farmers are assumed to deposit enough
//! USDS to earn `farm_yield` on those rewards, which boosts USDS supply:
//!
//! ```text
//! distribution = market_cap × ownership × distribution_rate / 12
//! supply_boost = Σ distribution × 12 / farm_yield
//! farm_yield   = savings_rate + farm_yield_spread
//! ```
//!
//! The reference star's market cap comes from the `spark_market_cap` input
//! when present. Other stars are sized as a share of it.

use super::{
    monthly_token_flow, DeclaredInput, ExtensionAdjustment, ExtensionContext, ExtensionState, InputFallback,
    MonthlyExtension,
};
use crate::core::MONTHS_PER_YEAR;
use crate::scenario::inputs::keys;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const NAME: &str = "token_farming";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FarmingStar {
    /// Absolute market cap (reference star only)
    pub market_cap: Option<Decimal>,

    /// Market cap as a share of the reference star's
    pub market_cap_pct: Decimal,

    pub ownership: Decimal,

    pub launch_month: u32,
}

impl Default for FarmingStar {
    fn default() -> Self {
        Self {
            market_cap: None,
            market_cap_pct: Decimal::ZERO,
            ownership: dec!(0.65),
            launch_month: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenFarming {
    /// Annual share of holdings distributed
    pub distribution_rate: Decimal,

    pub farm_yield_spread: Decimal,

    /// Months of farming after each star's launch
    pub duration_months: u32,

    pub reference_star: String,

    pub stars: BTreeMap<String, FarmingStar>,
}

impl Default for TokenFarming {
    fn default() -> Self {
        Self {
            distribution_rate: dec!(0.175),
            farm_yield_spread: dec!(0.0010),
            duration_months: 24,
            reference_star: "spark".to_string(),
            stars: BTreeMap::new(),
        }
    }
}

impl TokenFarming {
    fn configured_reference_cap(&self) -> Decimal {
        self.stars
            .get(&self.reference_star)
            .and_then(|star| star.market_cap)
            .unwrap_or(Decimal::ZERO)
    }

    fn is_farming(&self, star: &FarmingStar, month: u32) -> bool {
        month
            .checked_sub(star.launch_month)
            .is_some_and(|elapsed| elapsed < self.duration_months)
    }
}

impl MonthlyExtension for TokenFarming {
    fn name(&self) -> &'static str {
        NAME
    }

    fn declared_inputs(&self) -> Vec<DeclaredInput> {
        vec![DeclaredInput {
            extension: NAME,
            key: keys::SPARK_MARKET_CAP,
            fallback: InputFallback::Configured(self.configured_reference_cap()),
        }]
    }

    fn calculate(&self, ctx: &ExtensionContext<'_>, _state: &mut ExtensionState) -> ExtensionAdjustment {
        let farm_yield = ctx.rates.savings_rate + self.farm_yield_spread;
        if farm_yield <= Decimal::ZERO {
            return ExtensionAdjustment::zero();
        }

        let reference_cap = ctx
            .inputs
            .get_or(keys::SPARK_MARKET_CAP, self.configured_reference_cap());

        let mut adjustment = ExtensionAdjustment::zero();
        let mut total_distribution = Decimal::ZERO;

        for (name, star) in &self.stars {
            if !self.is_farming(star, ctx.month) {
                continue;
            }
            let market_cap = if *name == self.reference_star {
                reference_cap
            } else {
                reference_cap * star.market_cap_pct
            };
            let distribution = monthly_token_flow(market_cap, star.ownership, self.distribution_rate);
            total_distribution += distribution;
            adjustment.breakdown.insert(format!("{name}_distribution"), distribution);
        }

        if total_distribution > Decimal::ZERO {
            adjustment.supply_boost = total_distribution * Decimal::from(MONTHS_PER_YEAR) / farm_yield;
        }
        adjustment.breakdown.insert("total_distribution".into(), total_distribution);
        adjustment.breakdown.insert("farm_yield".into(), farm_yield);
        adjustment
    }
}
