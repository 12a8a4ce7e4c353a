//! Extension Pipeline
//!
//! Extensions model temporary or experimental protocol mechanisms as
//! independent monthly adjustments (subsidies, phase-outs, token-sale
//! streams, supply boosts).
//!
//! # Extension Interface
//!
//! Every extension implements the `MonthlyExtension` trait and produces an
//! [`ExtensionAdjustment`]:
//! ```rust
//! use forecast_core_rs::extensions::{
//!     ExtensionAdjustment, ExtensionContext, ExtensionState, MonthlyExtension,
//! };
//! use rust_decimal_macros::dec;
//!
//! struct FlatFee;
//!
//! impl MonthlyExtension for FlatFee {
//!     fn name(&self) -> &'static str {
//!         "flat_fee"
//!     }
//!
//!     fn calculate(&self, _ctx: &ExtensionContext<'_>, _state: &mut ExtensionState) -> ExtensionAdjustment {
//!         ExtensionAdjustment {
//!             cost_adjustment: dec!(1000),
//!             ..Default::default()
//!         }
//!     }
//! }
//! ```
//!
//! # Catalogue
//!
//! The set of extensions is closed; [`ExtensionKind`] has one variant per
//! mechanism and is built from `name → settings` by [`ExtensionSet::from_settings`].
//! Unknown names are ignored.
//!
//! # Phases
//!
//! Within a month extensions run in two phases:
//! 1. **SupplyIndependent**: everything except PSM exposure. Supply boosts,
//!    cost and revenue adjustments are summed; genesis-capital phase-out also
//!    receives the displayed backstop carried by the engine.
//! 2. **SupplyDependent**: PSM exposure, after supply is known, since its
//!    exposure may be a share of total USDS supply.

pub mod agent_creation_fee;
pub mod core_vaults;
pub mod genesis_capital;
pub mod genesis_capital_spending;
pub mod genesis_prime;
pub mod psm_exposure;
pub mod srusds_cost;
pub mod subsidized_borrow;
pub mod token_farming;
pub mod usdt_subsidy;

pub use agent_creation_fee::{AgentCreationFee, AgentSize, CreatedAgent};
pub use core_vaults::CoreVaults;
pub use genesis_capital::{GenesisCapital, GenesisStar};
pub use genesis_capital_spending::GenesisCapitalSpending;
pub use genesis_prime::{GenesisPrime, PrimeHolding};
pub use psm_exposure::PsmExposure;
pub use srusds_cost::SrUsdsCost;
pub use subsidized_borrow::SubsidizedBorrow;
pub use token_farming::{FarmingStar, TokenFarming};
pub use usdt_subsidy::UsdtSubsidy;

use crate::models::rates::RateSet;
use crate::models::revenue::monthly;
use crate::scenario::inputs::MonthlyInputs;
use crate::scenario::ConfigError;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Per-extension breakdown for display
pub type Breakdown = BTreeMap<String, Decimal>;

/// Adjustment produced by one extension for one month
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtensionAdjustment {
    /// Added to gross revenue (and therefore to net revenue)
    pub gross_revenue_adjustment: Decimal,

    /// Subtracted from net revenue; positive = expense, negative = income
    pub cost_adjustment: Decimal,

    /// Added to base USDS supply before supply is derived
    pub supply_boost: Decimal,

    /// Direct backstop outflow; never counted as an expense
    pub backstop_outflow: Decimal,

    pub aggregate_backstop_capital: Option<Decimal>,

    pub genesis_capital_remaining: Option<Decimal>,

    pub breakdown: Breakdown,
}

impl ExtensionAdjustment {
    pub fn zero() -> Self {
        Self::default()
    }
}

/// When in the month an extension is evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtensionPhase {
    /// Before supply is derived
    SupplyIndependent,
    /// After supply is derived; sees total USDS supply
    SupplyDependent,
}

/// Everything an extension may read for one month
#[derive(Debug, Clone, Copy)]
pub struct ExtensionContext<'a> {
    pub month: u32,
    pub inputs: &'a MonthlyInputs,
    pub rates: &'a RateSet,
    /// Backstop figure carried forward by the engine (phase-out eligibility)
    pub displayed_backstop: Option<Decimal>,
    /// Total USDS supply; only set for the supply-dependent phase
    pub total_usds: Option<Decimal>,
}

impl<'a> ExtensionContext<'a> {
    pub fn new(month: u32, inputs: &'a MonthlyInputs, rates: &'a RateSet) -> Self {
        Self {
            month,
            inputs,
            rates,
            displayed_backstop: None,
            total_usds: None,
        }
    }

    pub fn with_displayed_backstop(mut self, displayed_backstop: Decimal) -> Self {
        self.displayed_backstop = Some(displayed_backstop);
        self
    }

    pub fn with_total_usds(mut self, total_usds: Decimal) -> Self {
        self.total_usds = Some(total_usds);
        self
    }
}

/// Mutable state carried across the months of a single run
///
/// Created fresh for every scenario run; never shared between runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtensionState {
    /// Cumulative genesis-capital phase-out per star
    pub genesis_phaseout: BTreeMap<String, Decimal>,
}

impl ExtensionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.genesis_phaseout.clear();
    }
}

/// Fallback used when a monthly input an extension reads is absent
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputFallback {
    Zero,
    Configured(Decimal),
}

/// A monthly input key an extension reads, with its fallback
#[derive(Debug, Clone, PartialEq)]
pub struct DeclaredInput {
    pub extension: &'static str,
    pub key: &'static str,
    pub fallback: InputFallback,
}

/// Capability shared by every extension
pub trait MonthlyExtension {
    /// Catalogue name (also the settings key)
    fn name(&self) -> &'static str;

    fn phase(&self) -> ExtensionPhase {
        ExtensionPhase::SupplyIndependent
    }

    /// Monthly input keys read, with the value used when absent
    fn declared_inputs(&self) -> Vec<DeclaredInput> {
        Vec::new()
    }

    /// Adjustment for `ctx.month`
    fn calculate(&self, ctx: &ExtensionContext<'_>, state: &mut ExtensionState) -> ExtensionAdjustment;
}

/// Monthly income from selling or distributing a share of holdings
///
/// `market_cap × ownership × annual_rate / 12`
pub fn monthly_token_flow(market_cap: Decimal, ownership: Decimal, annual_rate: Decimal) -> Decimal {
    monthly(market_cap * ownership * annual_rate)
}

/// The closed extension catalogue
#[derive(Debug, Clone, PartialEq)]
pub enum ExtensionKind {
    PsmExposure(PsmExposure),
    SubsidizedBorrow(SubsidizedBorrow),
    SrUsdsCost(SrUsdsCost),
    TokenFarming(TokenFarming),
    GenesisCapital(GenesisCapital),
    GenesisCapitalSpending(GenesisCapitalSpending),
    UsdtSubsidy(UsdtSubsidy),
    GenesisPrime(GenesisPrime),
    CoreVaults(CoreVaults),
    AgentCreationFee(AgentCreationFee),
}

/// Every catalogue name, in pipeline order
pub const EXTENSION_NAMES: [&str; 10] = [
    psm_exposure::NAME,
    subsidized_borrow::NAME,
    srusds_cost::NAME,
    token_farming::NAME,
    genesis_capital::NAME,
    genesis_capital_spending::NAME,
    usdt_subsidy::NAME,
    genesis_prime::NAME,
    core_vaults::NAME,
    agent_creation_fee::NAME,
];

fn parse_settings<T: DeserializeOwned>(name: &str, value: &serde_json::Value) -> Result<T, ConfigError> {
    let value = if value.is_null() {
        serde_json::Value::Object(serde_json::Map::new())
    } else {
        value.clone()
    };
    serde_json::from_value(value).map_err(|e| ConfigError::InvalidExtension {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

impl ExtensionKind {
    /// Build the variant registered under `name`
    ///
    /// Returns `Ok(None)` for names outside the catalogue.
    pub fn from_settings(name: &str, settings: &serde_json::Value) -> Result<Option<Self>, ConfigError> {
        let kind = match name {
            psm_exposure::NAME => ExtensionKind::PsmExposure(parse_settings(name, settings)?),
            subsidized_borrow::NAME => ExtensionKind::SubsidizedBorrow(parse_settings(name, settings)?),
            srusds_cost::NAME => ExtensionKind::SrUsdsCost(parse_settings(name, settings)?),
            token_farming::NAME => ExtensionKind::TokenFarming(parse_settings(name, settings)?),
            genesis_capital::NAME => ExtensionKind::GenesisCapital(parse_settings(name, settings)?),
            genesis_capital_spending::NAME => {
                let spending: GenesisCapitalSpending = parse_settings(name, settings)?;
                spending.validate()?;
                ExtensionKind::GenesisCapitalSpending(spending)
            }
            usdt_subsidy::NAME => ExtensionKind::UsdtSubsidy(parse_settings(name, settings)?),
            genesis_prime::NAME => ExtensionKind::GenesisPrime(parse_settings(name, settings)?),
            core_vaults::NAME => ExtensionKind::CoreVaults(parse_settings(name, settings)?),
            agent_creation_fee::NAME => ExtensionKind::AgentCreationFee(parse_settings(name, settings)?),
            _ => return Ok(None),
        };
        Ok(Some(kind))
    }

    fn inner(&self) -> &dyn MonthlyExtension {
        match self {
            ExtensionKind::PsmExposure(ext) => ext,
            ExtensionKind::SubsidizedBorrow(ext) => ext,
            ExtensionKind::SrUsdsCost(ext) => ext,
            ExtensionKind::TokenFarming(ext) => ext,
            ExtensionKind::GenesisCapital(ext) => ext,
            ExtensionKind::GenesisCapitalSpending(ext) => ext,
            ExtensionKind::UsdtSubsidy(ext) => ext,
            ExtensionKind::GenesisPrime(ext) => ext,
            ExtensionKind::CoreVaults(ext) => ext,
            ExtensionKind::AgentCreationFee(ext) => ext,
        }
    }
}

impl MonthlyExtension for ExtensionKind {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn phase(&self) -> ExtensionPhase {
        self.inner().phase()
    }

    fn declared_inputs(&self) -> Vec<DeclaredInput> {
        self.inner().declared_inputs()
    }

    fn calculate(&self, ctx: &ExtensionContext<'_>, state: &mut ExtensionState) -> ExtensionAdjustment {
        self.inner().calculate(ctx, state)
    }
}

#[derive(Deserialize)]
struct Toggle {
    #[serde(default = "enabled_by_default")]
    enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

/// A catalogue entry with its on/off switch
#[derive(Debug, Clone, PartialEq)]
pub struct Extension {
    pub enabled: bool,
    pub kind: ExtensionKind,
}

impl MonthlyExtension for Extension {
    fn name(&self) -> &'static str {
        self.kind.name()
    }

    fn phase(&self) -> ExtensionPhase {
        self.kind.phase()
    }

    fn declared_inputs(&self) -> Vec<DeclaredInput> {
        if self.enabled {
            self.kind.declared_inputs()
        } else {
            Vec::new()
        }
    }

    /// Disabled extensions always return the zero adjustment
    fn calculate(&self, ctx: &ExtensionContext<'_>, state: &mut ExtensionState) -> ExtensionAdjustment {
        if !self.enabled {
            return ExtensionAdjustment::zero();
        }
        self.kind.calculate(ctx, state)
    }
}

/// The extensions configured for a run, in catalogue order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtensionSet {
    extensions: Vec<Extension>,
}

impl ExtensionSet {
    pub fn new(extensions: Vec<Extension>) -> Self {
        Self { extensions }
    }

    /// Build from `name → settings`; unknown names are ignored
    pub fn from_settings(settings: &BTreeMap<String, serde_json::Value>) -> Result<Self, ConfigError> {
        let mut extensions = Vec::new();

        for name in EXTENSION_NAMES {
            let Some(value) = settings.get(name) else {
                continue;
            };
            let toggle: Toggle = parse_settings(name, value)?;
            if let Some(kind) = ExtensionKind::from_settings(name, value)? {
                debug!(extension = name, enabled = toggle.enabled, "extension configured");
                extensions.push(Extension {
                    enabled: toggle.enabled,
                    kind,
                });
            }
        }

        for name in settings.keys() {
            if !EXTENSION_NAMES.contains(&name.as_str()) {
                debug!(extension = %name, "ignoring unknown extension");
            }
        }

        Ok(Self { extensions })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Extension> {
        self.extensions.iter()
    }

    pub fn in_phase(&self, phase: ExtensionPhase) -> impl Iterator<Item = &Extension> {
        self.extensions.iter().filter(move |ext| ext.phase() == phase)
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Total genesis capital configured across stars, before any phase-out
    ///
    /// Counts the genesis-capital settings whether or not the extension is enabled.
    pub fn initial_genesis_capital(&self) -> Decimal {
        self.extensions
            .iter()
            .filter_map(|ext| match &ext.kind {
                ExtensionKind::GenesisCapital(genesis) => Some(genesis.initial_total()),
                _ => None,
            })
            .sum()
    }

    /// Declared inputs of every enabled extension
    pub fn declared_inputs(&self) -> Vec<DeclaredInput> {
        self.extensions.iter().flat_map(|ext| ext.declared_inputs()).collect()
    }
}

/// Sum of extension adjustments for one phase or one month
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtensionTotals {
    pub gross_revenue_adjustment: Decimal,
    pub cost_adjustment: Decimal,
    pub supply_boost: Decimal,
    pub backstop_outflow: Decimal,
    /// Last reported value, if any extension reported one
    pub aggregate_backstop_capital: Option<Decimal>,
    /// Last reported value, if any extension reported one
    pub genesis_capital_remaining: Option<Decimal>,
    /// extension name → breakdown
    pub breakdowns: BTreeMap<String, Breakdown>,
}

impl ExtensionTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one extension's adjustment into the totals
    pub fn add(&mut self, name: &str, adjustment: ExtensionAdjustment) {
        self.gross_revenue_adjustment += adjustment.gross_revenue_adjustment;
        self.cost_adjustment += adjustment.cost_adjustment;
        self.supply_boost += adjustment.supply_boost;
        self.backstop_outflow += adjustment.backstop_outflow;
        if adjustment.aggregate_backstop_capital.is_some() {
            self.aggregate_backstop_capital = adjustment.aggregate_backstop_capital;
        }
        if adjustment.genesis_capital_remaining.is_some() {
            self.genesis_capital_remaining = adjustment.genesis_capital_remaining;
        }
        if !adjustment.breakdown.is_empty() {
            self.breakdowns.insert(name.to_string(), adjustment.breakdown);
        }
    }
}
