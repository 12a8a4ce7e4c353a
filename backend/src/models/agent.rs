//! Token-holding agents with binary active/inactive status
//!
//! An agent contributes its full valuation from its launch month onward and
//! nothing before. FARM agents feed the farming supply term, SELL agents feed
//! token-sale income.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How an agent's tokens are used by the protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentKind {
    #[serde(rename = "FARM")]
    Farm,
    #[serde(rename = "SELL")]
    Sell,
}

/// Static agent definition, loaded once and never mutated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentDefinition {
    pub name: String,

    #[serde(rename = "type")]
    pub kind: AgentKind,

    pub ownership_ratio: Decimal,

    /// Share of the reference market cap; `None` marks the base agent whose
    /// value is the reference market cap itself
    #[serde(default)]
    pub market_cap_ratio: Option<Decimal>,
}

impl AgentDefinition {
    /// Value of the protocol's holdings in this agent
    pub fn value(&self, spark_market_cap: Decimal) -> Decimal {
        match self.market_cap_ratio {
            None => spark_market_cap * self.ownership_ratio,
            Some(ratio) => spark_market_cap * ratio * self.ownership_ratio,
        }
    }
}

/// Launch month per agent name (1-indexed; 0 or absent means never launched)
pub type AgentLaunchMap = BTreeMap<String, u32>;

/// Agent is active from its launch month onward, inclusive
pub fn is_agent_active(launch_month: u32, current_month: u32) -> bool {
    launch_month > 0 && current_month >= launch_month
}

/// Sum of active agent valuations by kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentTotals {
    pub farmable_tokens: Decimal,
    pub sellable_tokens: Decimal,
}

/// Sum values of all active agents by kind
pub fn aggregate_active_agents(
    agents: &[AgentDefinition],
    launches: &AgentLaunchMap,
    current_month: u32,
    spark_market_cap: Decimal,
) -> AgentTotals {
    let mut totals = AgentTotals::default();

    for agent in agents {
        let launch_month = launches.get(&agent.name).copied().unwrap_or(0);
        if !is_agent_active(launch_month, current_month) {
            continue;
        }
        let value = agent.value(spark_market_cap);
        match agent.kind {
            AgentKind::Farm => totals.farmable_tokens += value,
            AgentKind::Sell => totals.sellable_tokens += value,
        }
    }

    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn agent(name: &str, kind: AgentKind, ownership: Decimal, ratio: Option<Decimal>) -> AgentDefinition {
        AgentDefinition {
            name: name.to_string(),
            kind,
            ownership_ratio: ownership,
            market_cap_ratio: ratio,
        }
    }

    #[test]
    fn test_base_agent_uses_market_cap_directly() {
        let spark = agent("spark", AgentKind::Farm, dec!(0.65), None);
        assert_eq!(spark.value(dec!(100_000_000)), dec!(65_000_000));
    }

    #[test]
    fn test_ratio_agent_scales_market_cap() {
        let grove = agent("grove", AgentKind::Sell, dec!(0.5), Some(dec!(0.6)));
        assert_eq!(grove.value(dec!(100_000_000)), dec!(30_000_000));
    }

    #[test]
    fn test_never_launched_agent_is_inactive() {
        assert!(!is_agent_active(0, 12));
        assert!(!is_agent_active(0, 0));
    }

    #[test]
    fn test_aggregate_splits_by_kind() {
        let agents = vec![
            agent("spark", AgentKind::Farm, dec!(0.5), None),
            agent("grove", AgentKind::Sell, dec!(0.5), Some(dec!(0.5))),
            agent("keel", AgentKind::Farm, dec!(1), Some(dec!(0.1))),
        ];
        let mut launches = AgentLaunchMap::new();
        launches.insert("spark".to_string(), 1);
        launches.insert("grove".to_string(), 2);
        // keel absent: never active

        let month1 = aggregate_active_agents(&agents, &launches, 1, dec!(1000));
        assert_eq!(month1.farmable_tokens, dec!(500));
        assert_eq!(month1.sellable_tokens, dec!(0));

        let month2 = aggregate_active_agents(&agents, &launches, 2, dec!(1000));
        assert_eq!(month2.farmable_tokens, dec!(500));
        assert_eq!(month2.sellable_tokens, dec!(250));
    }
}
