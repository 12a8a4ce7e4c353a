//! Forecast Engine
//!
//! Runs a resolved scenario month by month, integrating every calculation:
//! - Rate derivation
//! - Extension pipeline (two phases)
//! - Agent aggregation and supply
//! - Revenue and extension adjustments
//! - Profit waterfall
//!
//! # Architecture
//!
//! ```text
//! For each month m:
//! 1. Resolve monthly inputs, derive rates
//! 2. displayed_backstop = surplus_buffer + Σ net_backstop_change
//!                         − Σ backstop_outflow + prior genesis remaining
//! 3. Run SupplyIndependent extensions (sees displayed_backstop)
//! 4. Aggregate active agents
//! 5. Supply from base_usds + extension supply boost
//! 6. Run SupplyDependent extensions (sees total USDS supply)
//! 7. Revenue, then apply extension gross/cost adjustments
//! 8. Waterfall on adjusted net revenue
//! 9. Update the backstop ledger
//! ```
//!
//! Months run strictly in order: the backstop ledger and genesis-capital
//! phase-out carry state from one month into the next. Extension state is
//! created fresh by every `run_scenario` call, so one engine can run any
//! number of scenarios.
//!
//! # Example
//!
//! ```rust
//! use forecast_core_rs::orchestrator::{ForecastEngine, ModelConstants};
//! use forecast_core_rs::scenario::{resolve_scenario, ScenarioConfig, ScenarioLibrary};
//! use forecast_core_rs::extensions::ExtensionSet;
//! use rust_decimal_macros::dec;
//!
//! let mut config = ScenarioConfig::new("flat");
//! config.months = Some(3);
//! config.baseline.insert("sofr".into(), dec!(0.04));
//! config.baseline.insert("base_usds".into(), dec!(1_000_000_000));
//!
//! let scenario = resolve_scenario(&config, &ScenarioLibrary::new()).unwrap();
//! let engine = ForecastEngine::new(Vec::new(), ModelConstants::default(), ExtensionSet::default());
//! let results = engine.run_scenario(&scenario).unwrap();
//!
//! assert_eq!(results.monthly.len(), 3);
//! assert_eq!(results.quarterly.len(), 1);
//! ```

use crate::core::Horizon;
use crate::extensions::{
    DeclaredInput, ExtensionContext, ExtensionPhase, ExtensionSet, ExtensionState, ExtensionTotals,
    InputFallback, MonthlyExtension,
};
use crate::models::{
    aggregate_active_agents, calculate_end_snapshot, calculate_revenue, calculate_supply, calculate_waterfall,
    AgentDefinition, AgentLaunchMap, EndPeriodSnapshot, RateInputs, RateSet, RevenueInputs, RevenueSnapshot, SupplyError,
    SupplyInputs, WaterfallInputs,
};
use crate::orchestrator::results::{MonthResult, ScenarioResults};
use crate::scenario::inputs::{keys, MonthlyInputs};
use crate::scenario::{ConfigError, ResolvedScenario};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, info, warn};

// ============================================================================
// Configuration Types
// ============================================================================

/// Constants shared by every month of every scenario
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelConstants {
    /// Annual emission rate applied to farmable tokens
    pub farm_emission_rate: Decimal,

    /// Share of post-security revenue retained by the backstop
    pub backstop_rate: Decimal,

    /// Constant (negative) surplus buffer in the displayed backstop
    #[serde(default = "default_surplus_buffer")]
    pub surplus_buffer: Decimal,
}

fn default_surplus_buffer() -> Decimal {
    dec!(-65_000_000)
}

impl Default for ModelConstants {
    fn default() -> Self {
        Self {
            farm_emission_rate: Decimal::ZERO,
            backstop_rate: Decimal::ZERO,
            surplus_buffer: default_surplus_buffer(),
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Errors that abort a forecast run
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ForecastError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Month {month}: farm yield must be positive while farmable tokens are active, got {farm_yield}")]
    NonPositiveFarmYield { month: u32, farm_yield: Decimal },
}

impl ForecastError {
    fn from_supply(month: u32, error: SupplyError) -> Self {
        match error {
            SupplyError::NonPositiveFarmYield { farm_yield } => {
                ForecastError::NonPositiveFarmYield { month, farm_yield }
            }
        }
    }
}

// ============================================================================
// Backstop Ledger
// ============================================================================

/// Running totals behind the displayed backstop
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BackstopLedger {
    pub surplus_buffer: Decimal,
    pub cumulative_contributions: Decimal,
    pub cumulative_outflows: Decimal,
    pub genesis_remaining: Decimal,
}

impl BackstopLedger {
    pub fn new(surplus_buffer: Decimal, initial_genesis: Decimal) -> Self {
        Self {
            surplus_buffer,
            cumulative_contributions: Decimal::ZERO,
            cumulative_outflows: Decimal::ZERO,
            genesis_remaining: initial_genesis,
        }
    }

    /// Backstop as displayed before the next month runs
    pub fn displayed(&self) -> Decimal {
        self.surplus_buffer + self.cumulative_contributions - self.cumulative_outflows + self.genesis_remaining
    }

    /// Fold a completed month into the running totals
    pub fn record(&mut self, result: &MonthResult) {
        self.cumulative_contributions += result.waterfall.net_backstop_change;
        self.cumulative_outflows += result.backstop_outflow;
        if let Some(remaining) = result.genesis_capital_remaining {
            self.genesis_remaining = remaining;
        }
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Forecast engine
///
/// Holds the static configuration: agents, constants and extensions. All
/// per-run state lives inside `run_scenario`.
#[derive(Debug, Clone)]
pub struct ForecastEngine {
    agents: Vec<AgentDefinition>,
    constants: ModelConstants,
    extensions: ExtensionSet,
}

impl ForecastEngine {
    pub fn new(agents: Vec<AgentDefinition>, constants: ModelConstants, extensions: ExtensionSet) -> Self {
        Self {
            agents,
            constants,
            extensions,
        }
    }

    /// Build an engine from raw extension settings (`name → settings`)
    pub fn from_settings(
        agents: Vec<AgentDefinition>,
        constants: ModelConstants,
        extension_settings: &BTreeMap<String, serde_json::Value>,
    ) -> Result<Self, ForecastError> {
        let extensions = ExtensionSet::from_settings(extension_settings)?;
        Ok(Self::new(agents, constants, extensions))
    }

    pub fn agents(&self) -> &[AgentDefinition] {
        &self.agents
    }

    pub fn constants(&self) -> &ModelConstants {
        &self.constants
    }

    pub fn extensions(&self) -> &ExtensionSet {
        &self.extensions
    }

    /// Declared extension inputs that `scenario` never sets
    ///
    /// Each one is logged; the extension falls back to zero or its
    /// configured value.
    pub fn unset_declared_inputs(&self, scenario: &ResolvedScenario) -> Vec<DeclaredInput> {
        let mut unset = Vec::new();
        for declared in self.extensions.declared_inputs() {
            if scenario.mentions(declared.key) {
                continue;
            }
            match declared.fallback {
                InputFallback::Zero => warn!(
                    scenario = %scenario.name,
                    extension = declared.extension,
                    key = declared.key,
                    "extension input never set; defaulting to zero"
                ),
                InputFallback::Configured(value) => warn!(
                    scenario = %scenario.name,
                    extension = declared.extension,
                    key = declared.key,
                    fallback = %value,
                    "extension input never set; using configured value"
                ),
            }
            unset.push(declared);
        }
        unset
    }

    /// Run every month of `scenario`
    ///
    /// Any error aborts the whole run; later months depend on earlier ones.
    pub fn run_scenario(&self, scenario: &ResolvedScenario) -> Result<ScenarioResults, ForecastError> {
        info!(
            scenario = %scenario.name,
            months = scenario.months,
            extensions = self.extensions.len(),
            "running scenario"
        );
        self.unset_declared_inputs(scenario);

        let mut state = ExtensionState::new();
        let mut ledger = BackstopLedger::new(
            self.constants.surplus_buffer,
            self.extensions.initial_genesis_capital(),
        );
        let mut monthly = Vec::with_capacity(scenario.months as usize);

        for month in Horizon::new(scenario.months).iter() {
            let inputs = scenario.get_month_inputs(month);
            let result = self.run_month(
                month,
                &inputs,
                &scenario.agent_launches,
                ledger.displayed(),
                &mut state,
            )?;
            ledger.record(&result);
            monthly.push(result);
        }

        let end_snapshot = self.end_snapshot(scenario)?;
        let results = ScenarioResults::from_months(&scenario.name, &scenario.description, monthly, end_snapshot);

        info!(
            scenario = %scenario.name,
            net_revenue = %results.total_net_revenue,
            net_profit = %results.total_net_profit,
            "scenario complete"
        );
        Ok(results)
    }

    /// Run one month
    ///
    /// `displayed_backstop` is the ledger figure carried into this month;
    /// `state` is the run's extension state.
    pub fn run_month(
        &self,
        month: u32,
        inputs: &MonthlyInputs,
        agent_launches: &AgentLaunchMap,
        displayed_backstop: Decimal,
        state: &mut ExtensionState,
    ) -> Result<MonthResult, ForecastError> {
        let rates = RateSet::derive(&RateInputs::from_inputs(inputs));

        // Phase 1: everything that does not need supply
        let mut totals = ExtensionTotals::new();
        let ctx = ExtensionContext::new(month, inputs, &rates).with_displayed_backstop(displayed_backstop);
        for ext in self.extensions.in_phase(ExtensionPhase::SupplyIndependent) {
            let adjustment = ext.calculate(&ctx, state);
            debug!(month, extension = ext.name(), ?adjustment, "extension applied");
            totals.add(ext.name(), adjustment);
        }

        let spark_market_cap = inputs.get(keys::SPARK_MARKET_CAP);
        let agents = aggregate_active_agents(&self.agents, agent_launches, month, spark_market_cap);

        let supply = calculate_supply(&SupplyInputs {
            base_usds: inputs.get(keys::BASE_USDS) + totals.supply_boost,
            unrewarded_usds_user: inputs.get(keys::UNREWARDED_USDS_USER),
            farmable_tokens: agents.farmable_tokens,
            farm_emission_rate: self.constants.farm_emission_rate,
            farm_yield: rates.farm_yield,
        })
        .map_err(|e| ForecastError::from_supply(month, e))?;

        // Phase 2: supply is known
        let ctx = ctx.with_total_usds(supply.avg_usds_supply);
        for ext in self.extensions.in_phase(ExtensionPhase::SupplyDependent) {
            let adjustment = ext.calculate(&ctx, state);
            debug!(month, extension = ext.name(), ?adjustment, "extension applied");
            totals.add(ext.name(), adjustment);
        }

        // Legacy cost fields stay zero; extensions carry those costs
        let base_revenue = calculate_revenue(&RevenueInputs {
            usds_supply: supply.avg_usds_supply,
            susds_supply: supply.avg_susds_supply,
            gross_revenue_rate: rates.gross_revenue_rate,
            savings_rate: rates.savings_rate,
            sellable_tokens: agents.sellable_tokens,
            sell_token_rate: inputs.get(keys::SELL_TOKEN_RATE),
            subsidized_borrow: Decimal::ZERO,
            srusds_cost: Decimal::ZERO,
            tier2_ratio: inputs.get(keys::TIER2_RATIO),
            tier3_ratio: inputs.get(keys::TIER3_RATIO),
            tier4_ratio: inputs.get(keys::TIER4_RATIO),
        });

        let revenue = RevenueSnapshot {
            gross_revenue: base_revenue.gross_revenue + totals.gross_revenue_adjustment,
            net_revenue: base_revenue.net_revenue + totals.gross_revenue_adjustment - totals.cost_adjustment,
            ..base_revenue
        };

        let waterfall = calculate_waterfall(&WaterfallInputs {
            net_revenue: revenue.net_revenue,
            security_rate: inputs.get(keys::SECURITY_RATE),
            backstop_rate: self.constants.backstop_rate,
            backstop_withdrawal: inputs.get(keys::BACKSTOP_WITHDRAWAL),
        });

        debug!(
            month,
            gross_revenue = %revenue.gross_revenue,
            net_revenue = %revenue.net_revenue,
            net_backstop_change = %waterfall.net_backstop_change,
            "month complete"
        );

        Ok(MonthResult {
            month,
            month_name: Horizon::month_name(month),
            rates,
            farmable_tokens: agents.farmable_tokens,
            sellable_tokens: agents.sellable_tokens,
            supply,
            revenue,
            waterfall,
            extension_costs: totals.cost_adjustment,
            extension_supply_boost: totals.supply_boost,
            backstop_outflow: totals.backstop_outflow,
            aggregate_backstop_capital: totals.aggregate_backstop_capital,
            genesis_capital_remaining: totals.genesis_capital_remaining,
            displayed_backstop,
            extension_breakdown: totals.breakdowns,
        })
    }

    /// End-of-period snapshot from the final month's inputs
    fn end_snapshot(&self, scenario: &ResolvedScenario) -> Result<EndPeriodSnapshot, ForecastError> {
        let inputs = scenario.get_month_inputs(scenario.months);
        let rates = RateSet::derive(&RateInputs::from_inputs(&inputs));

        calculate_end_snapshot(
            &self.agents,
            &scenario.agent_launches,
            inputs.get(keys::SPARK_MARKET_CAP),
            inputs.get(keys::BASE_USDS),
            self.constants.farm_emission_rate,
            rates.farm_yield,
        )
        .map_err(|e| ForecastError::from_supply(scenario.months, e))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AgentKind;
    use crate::scenario::{resolve_scenario, MonthRef, ScenarioConfig, ScenarioLibrary};
    use serde_json::json;

    fn scenario(months: u32, baseline: &[(&str, Decimal)]) -> ResolvedScenario {
        let mut config = ScenarioConfig::new("test");
        config.months = Some(months);
        for (key, value) in baseline {
            config.baseline.insert(key.to_string(), *value);
        }
        resolve_scenario(&config, &ScenarioLibrary::new()).unwrap()
    }

    fn settings(value: serde_json::Value) -> BTreeMap<String, serde_json::Value> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_ledger_displayed_backstop() {
        let mut ledger = BackstopLedger::new(dec!(-65_000_000), dec!(120_000_000));
        assert_eq!(ledger.displayed(), dec!(55_000_000));

        ledger.cumulative_contributions = dec!(5_000_000);
        ledger.cumulative_outflows = dec!(1_000_000);
        assert_eq!(ledger.displayed(), dec!(59_000_000));
    }

    #[test]
    fn test_cost_adjustments_reduce_net_revenue() {
        let scenario = scenario(1, &[(keys::SOFR, dec!(0.04)), (keys::BASE_USDS, dec!(1_000_000_000))]);
        let engine = ForecastEngine::from_settings(
            Vec::new(),
            ModelConstants::default(),
            &settings(json!({ "srusds_cost": { "annual_cost": 1_200_000 } })),
        )
        .unwrap();

        let results = engine.run_scenario(&scenario).unwrap();
        let month = &results.monthly[0];
        assert_eq!(month.extension_costs, dec!(100_000));
        assert_eq!(
            month.revenue.net_revenue,
            month.revenue.gross_revenue - month.revenue.savings_expense - month.revenue.distribution_rewards
                - dec!(100_000)
        );
    }

    #[test]
    fn test_psm_sees_boosted_supply() {
        let scenario = scenario(
            1,
            &[
                (keys::SOFR, dec!(0.04)),
                (keys::SAVINGS_RATE_SPREAD, dec!(0.005)),
                (keys::SPARK_MARKET_CAP, dec!(1_000_000_000)),
                (keys::BASE_USDS, dec!(1_000_000_000)),
                (keys::PSM_PCT, dec!(0.1)),
            ],
        );
        let engine = ForecastEngine::from_settings(
            Vec::new(),
            ModelConstants::default(),
            &settings(json!({
                "psm_exposure": {},
                "token_farming": { "stars": { "spark": { "ownership": 0.6 } } }
            })),
        )
        .unwrap();

        let month = engine.run_scenario(&scenario).unwrap().monthly.remove(0);
        assert!(month.extension_supply_boost > Decimal::ZERO);
        assert_eq!(
            month.supply.avg_usds_supply,
            dec!(1_000_000_000) + month.extension_supply_boost
        );
        assert_eq!(
            month.extension_breakdown["psm_exposure"]["psm_amount"],
            month.supply.avg_usds_supply * dec!(0.1)
        );
    }

    #[test]
    fn test_farm_yield_guard() {
        let mut config = ScenarioConfig::new("negative");
        config.months = Some(2);
        config.baseline.insert(keys::SOFR.into(), dec!(-0.01));
        config.baseline.insert(keys::SPARK_MARKET_CAP.into(), dec!(1_000_000));
        config.agent_launches.insert("spark".into(), MonthRef::Number(2));
        let scenario = resolve_scenario(&config, &ScenarioLibrary::new()).unwrap();

        let agents = vec![AgentDefinition {
            name: "spark".into(),
            kind: AgentKind::Farm,
            ownership_ratio: dec!(0.5),
            market_cap_ratio: None,
        }];
        let engine = ForecastEngine::new(agents, ModelConstants::default(), ExtensionSet::default());

        let err = engine.run_scenario(&scenario).unwrap_err();
        assert_eq!(
            err,
            ForecastError::NonPositiveFarmYield {
                month: 2,
                farm_yield: dec!(-0.01)
            }
        );
    }

    #[test]
    fn test_unset_declared_inputs() {
        let scenario = scenario(1, &[(keys::CORE_VAULT_DEBT, dec!(1))]);
        let engine = ForecastEngine::from_settings(
            Vec::new(),
            ModelConstants::default(),
            &settings(json!({ "core_vaults": {}, "srusds_cost": {} })),
        )
        .unwrap();

        let unset: Vec<_> = engine
            .unset_declared_inputs(&scenario)
            .into_iter()
            .map(|d| d.key)
            .collect();
        assert_eq!(unset, vec![keys::CORE_VAULT_RATE]);
    }
}
