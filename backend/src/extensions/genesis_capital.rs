//! Genesis capital phase-out
//!
//! Each star starts with a genesis capital allocation that is phased out
//! while the displayed backstop stays healthy. When the backstop is at or
//! above `min_backstop_threshold`, every eligible star phases out
//!
//! ```text
//! base_phaseout_per_star + floor((backstop − threshold) / 10M) × phaseout_per_10m_above
//! ```
//!
//! capped at what it has left. A star is eligible once its token has
//! launched, while it has trading volume and remaining capital.
//!
//! Cumulative phase-out lives in [`ExtensionState`], so a fresh state gives
//! a fresh run.

use super::{ExtensionAdjustment, ExtensionContext, ExtensionState, MonthlyExtension};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const NAME: &str = "genesis_capital";

const PHASEOUT_STEP: Decimal = dec!(10_000_000);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenesisStar {
    pub genesis_capital: Decimal,

    /// First month the star may phase out
    pub token_launch: u32,

    pub has_volume: bool,
}

impl Default for GenesisStar {
    fn default() -> Self {
        Self {
            genesis_capital: Decimal::ZERO,
            token_launch: 1,
            has_volume: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenesisCapital {
    pub min_backstop_threshold: Decimal,
    pub base_phaseout_per_star: Decimal,
    pub phaseout_per_10m_above: Decimal,
    pub stars: BTreeMap<String, GenesisStar>,
}

impl Default for GenesisCapital {
    fn default() -> Self {
        Self {
            min_backstop_threshold: dec!(50_000_000),
            base_phaseout_per_star: dec!(1_000_000),
            phaseout_per_10m_above: dec!(1_000_000),
            stars: BTreeMap::new(),
        }
    }
}

impl GenesisCapital {
    /// Configured capital across all stars
    pub fn initial_total(&self) -> Decimal {
        self.stars.values().map(|star| star.genesis_capital).sum()
    }

    fn remaining(&self, name: &str, star: &GenesisStar, state: &ExtensionState) -> Decimal {
        let phased = state.genesis_phaseout.get(name).copied().unwrap_or(Decimal::ZERO);
        (star.genesis_capital - phased).max(Decimal::ZERO)
    }

    /// Capital left across all stars
    pub fn total_remaining(&self, state: &ExtensionState) -> Decimal {
        self.stars
            .iter()
            .map(|(name, star)| self.remaining(name, star, state))
            .sum()
    }

    /// Phase-out per eligible star for a given backstop level
    pub fn phaseout_per_star(&self, displayed_backstop: Decimal) -> Decimal {
        if displayed_backstop < self.min_backstop_threshold {
            return Decimal::ZERO;
        }
        let steps = ((displayed_backstop - self.min_backstop_threshold) / PHASEOUT_STEP).floor();
        self.base_phaseout_per_star + steps * self.phaseout_per_10m_above
    }
}

impl MonthlyExtension for GenesisCapital {
    fn name(&self) -> &'static str {
        NAME
    }

    fn calculate(&self, ctx: &ExtensionContext<'_>, state: &mut ExtensionState) -> ExtensionAdjustment {
        let displayed_backstop = ctx
            .displayed_backstop
            .unwrap_or_else(|| self.total_remaining(state));
        let per_star = self.phaseout_per_star(displayed_backstop);

        let mut adjustment = ExtensionAdjustment::zero();
        let mut month_phaseout = Decimal::ZERO;

        if per_star > Decimal::ZERO {
            for (name, star) in &self.stars {
                let remaining = self.remaining(name, star, state);
                if ctx.month < star.token_launch || !star.has_volume || remaining <= Decimal::ZERO {
                    continue;
                }
                let phaseout = per_star.min(remaining);
                *state.genesis_phaseout.entry(name.clone()).or_insert(Decimal::ZERO) += phaseout;
                month_phaseout += phaseout;
                adjustment.breakdown.insert(format!("{name}_phaseout"), phaseout);
            }
        }

        for (name, star) in &self.stars {
            adjustment
                .breakdown
                .insert(format!("{name}_remaining"), self.remaining(name, star, state));
        }

        let total_remaining = self.total_remaining(state);
        adjustment.breakdown.insert("month_phaseout".into(), month_phaseout);
        adjustment.breakdown.insert("genesis_capital_remaining".into(), total_remaining);
        adjustment.aggregate_backstop_capital = Some(displayed_backstop);
        adjustment.genesis_capital_remaining = Some(total_remaining);
        adjustment
    }
}
