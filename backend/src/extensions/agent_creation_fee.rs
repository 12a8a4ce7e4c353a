//! Agent creation fee token sales
//!
//! Newly created agents hand a share of their tokens to the protocol, which
//! sells them down at `sell_rate` per year. An agent's market cap comes from
//! its size class, an explicit figure, or a share of the reference market cap.

use super::{
    monthly_token_flow, DeclaredInput, ExtensionAdjustment, ExtensionContext, ExtensionState, InputFallback,
    MonthlyExtension,
};
use crate::scenario::inputs::keys;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const NAME: &str = "agent_creation_fee";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentSize {
    Small,
    Large,
}

impl AgentSize {
    pub fn market_cap(self) -> Decimal {
        match self {
            AgentSize::Small => dec!(50_000_000),
            AgentSize::Large => dec!(150_000_000),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatedAgent {
    #[serde(rename = "type")]
    pub size: Option<AgentSize>,
    pub market_cap: Option<Decimal>,
    pub market_cap_pct: Option<Decimal>,
    /// Share of the agent's tokens received as the creation fee
    pub ownership: Decimal,
    pub launch_month: u32,
}

impl Default for CreatedAgent {
    fn default() -> Self {
        Self {
            size: None,
            market_cap: None,
            market_cap_pct: None,
            ownership: dec!(0.05),
            launch_month: 1,
        }
    }
}

impl CreatedAgent {
    fn market_cap(&self, reference_cap: Decimal) -> Decimal {
        if let Some(size) = self.size {
            return size.market_cap();
        }
        if let Some(market_cap) = self.market_cap {
            return market_cap;
        }
        self.market_cap_pct
            .map(|pct| reference_cap * pct)
            .unwrap_or(Decimal::ZERO)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentCreationFee {
    /// Annual share of fee holdings sold
    pub sell_rate: Decimal,
    pub agents: BTreeMap<String, CreatedAgent>,
}

impl Default for AgentCreationFee {
    fn default() -> Self {
        Self {
            sell_rate: dec!(0.20),
            agents: BTreeMap::new(),
        }
    }
}

impl MonthlyExtension for AgentCreationFee {
    fn name(&self) -> &'static str {
        NAME
    }

    fn declared_inputs(&self) -> Vec<DeclaredInput> {
        let sized_by_reference = self
            .agents
            .values()
            .any(|agent| agent.size.is_none() && agent.market_cap.is_none() && agent.market_cap_pct.is_some());
        if !sized_by_reference {
            return Vec::new();
        }
        vec![DeclaredInput {
            extension: NAME,
            key: keys::SPARK_MARKET_CAP,
            fallback: InputFallback::Zero,
        }]
    }

    fn calculate(&self, ctx: &ExtensionContext<'_>, _state: &mut ExtensionState) -> ExtensionAdjustment {
        let reference_cap = ctx.inputs.get(keys::SPARK_MARKET_CAP);
        let mut adjustment = ExtensionAdjustment::zero();

        for (name, agent) in &self.agents {
            if ctx.month < agent.launch_month {
                continue;
            }
            let sales = monthly_token_flow(agent.market_cap(reference_cap), agent.ownership, self.sell_rate);
            adjustment.gross_revenue_adjustment += sales;
            adjustment.breakdown.insert(format!("{name}_sales"), sales);
        }
        adjustment
            .breakdown
            .insert("total_agent_fee_sales".into(), adjustment.gross_revenue_adjustment);
        adjustment
    }
}
