//! Genesis prime token sales
//!
//! Prime holdings are sized off the reference market cap and sold down at
//! `sell_rate` per year from launch, as gross revenue.

use super::{
    monthly_token_flow, DeclaredInput, ExtensionAdjustment, ExtensionContext, ExtensionState, InputFallback,
    MonthlyExtension,
};
use crate::scenario::inputs::keys;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const NAME: &str = "genesis_prime";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrimeHolding {
    /// Market cap as a share of the reference market cap
    pub market_cap_pct: Decimal,
    pub ownership: Decimal,
    pub launch_month: u32,
}

impl Default for PrimeHolding {
    fn default() -> Self {
        Self {
            market_cap_pct: Decimal::ZERO,
            ownership: dec!(0.70),
            launch_month: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenesisPrime {
    pub sell_rate: Decimal,
    pub primes: BTreeMap<String, PrimeHolding>,
}

impl Default for GenesisPrime {
    fn default() -> Self {
        Self {
            sell_rate: dec!(0.175),
            primes: BTreeMap::new(),
        }
    }
}

impl MonthlyExtension for GenesisPrime {
    fn name(&self) -> &'static str {
        NAME
    }

    fn declared_inputs(&self) -> Vec<DeclaredInput> {
        vec![DeclaredInput {
            extension: NAME,
            key: keys::SPARK_MARKET_CAP,
            fallback: InputFallback::Zero,
        }]
    }

    fn calculate(&self, ctx: &ExtensionContext<'_>, _state: &mut ExtensionState) -> ExtensionAdjustment {
        let reference_cap = ctx.inputs.get(keys::SPARK_MARKET_CAP);
        let mut adjustment = ExtensionAdjustment::zero();

        for (name, prime) in &self.primes {
            if ctx.month < prime.launch_month {
                continue;
            }
            let sales = monthly_token_flow(reference_cap * prime.market_cap_pct, prime.ownership, self.sell_rate);
            adjustment.gross_revenue_adjustment += sales;
            adjustment.breakdown.insert(format!("{name}_sales"), sales);
        }
        adjustment
            .breakdown
            .insert("total_prime_token_sales".into(), adjustment.gross_revenue_adjustment);
        adjustment
    }
}
