//! Flat per-month input set
//!
//! A resolved month is a string-keyed bag of decimals. Scenario authors may
//! introduce ad hoc keys, so the bag stays open; lookups of absent keys
//! yield zero (or an explicit fallback) rather than failing.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Well-known input keys read by the monthly pipeline
pub mod keys {
    pub const SOFR: &str = "sofr";
    pub const SAVINGS_RATE_SPREAD: &str = "savings_rate_spread";
    pub const GROSS_REVENUE_RATE_SPREAD: &str = "gross_revenue_rate_spread";
    pub const FARM_YIELD_SPREAD: &str = "farm_yield_spread";

    pub const SPARK_MARKET_CAP: &str = "spark_market_cap";
    pub const BASE_USDS: &str = "base_usds";
    pub const UNREWARDED_USDS_USER: &str = "unrewarded_usds_user";

    pub const SELL_TOKEN_RATE: &str = "sell_token_rate";
    pub const TIER2_RATIO: &str = "tier2_ratio";
    pub const TIER3_RATIO: &str = "tier3_ratio";
    pub const TIER4_RATIO: &str = "tier4_ratio";

    pub const SECURITY_RATE: &str = "security_rate";
    pub const BACKSTOP_WITHDRAWAL: &str = "backstop_withdrawal";

    pub const PSM_PCT: &str = "psm_pct";
    pub const PSM_AMOUNT: &str = "psm_amount";
    pub const USDT_SUBSIDY_AMOUNT: &str = "usdt_subsidy_amount";
    pub const CORE_VAULT_DEBT: &str = "core_vault_debt";
    pub const CORE_VAULT_RATE: &str = "core_vault_rate";
}

/// Resolved inputs for a single month
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonthlyInputs {
    values: BTreeMap<String, Decimal>,
}

impl MonthlyInputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value for `key`, zero when absent
    pub fn get(&self, key: &str) -> Decimal {
        self.values.get(key).copied().unwrap_or(Decimal::ZERO)
    }

    /// Value for `key`, `fallback` when absent
    pub fn get_or(&self, key: &str, fallback: Decimal) -> Decimal {
        self.values.get(key).copied().unwrap_or(fallback)
    }

    /// Value for `key` only if the scenario supplied it
    pub fn get_opt(&self, key: &str) -> Option<Decimal> {
        self.values.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: Decimal) {
        self.values.insert(key.into(), value);
    }

    /// Overlay every entry of `layer`, later values winning
    pub fn apply(&mut self, layer: &BTreeMap<String, Decimal>) {
        for (key, value) in layer {
            self.values.insert(key.clone(), *value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Decimal)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<BTreeMap<String, Decimal>> for MonthlyInputs {
    fn from(values: BTreeMap<String, Decimal>) -> Self {
        Self { values }
    }
}

impl<K: Into<String>> FromIterator<(K, Decimal)> for MonthlyInputs {
    fn from_iter<I: IntoIterator<Item = (K, Decimal)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
