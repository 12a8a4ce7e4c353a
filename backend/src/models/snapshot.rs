//! End-of-period snapshot
//!
//! Values the farm at full strength: every agent with a launch month counts,
//! whether or not that month has been reached yet.

use crate::models::agent::{AgentDefinition, AgentKind, AgentLaunchMap};
use crate::models::supply::{farm_supply, SupplyError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EndPeriodSnapshot {
    pub end_farmable_tokens: Decimal,
    pub end_unrewarded_usds_farm: Decimal,
    pub end_usds_supply: Decimal,
}

pub fn calculate_end_snapshot(
    agents: &[AgentDefinition],
    launches: &AgentLaunchMap,
    spark_market_cap: Decimal,
    end_base_usds: Decimal,
    farm_emission_rate: Decimal,
    farm_yield: Decimal,
) -> Result<EndPeriodSnapshot, SupplyError> {
    let end_farmable_tokens: Decimal = agents
        .iter()
        .filter(|agent| agent.kind == AgentKind::Farm)
        .filter(|agent| launches.get(&agent.name).copied().unwrap_or(0) > 0)
        .map(|agent| agent.value(spark_market_cap))
        .sum();

    let end_unrewarded_usds_farm = farm_supply(end_farmable_tokens, farm_emission_rate, farm_yield)?;

    Ok(EndPeriodSnapshot {
        end_farmable_tokens,
        end_unrewarded_usds_farm,
        end_usds_supply: end_base_usds + end_unrewarded_usds_farm,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_late_launch_counts_at_full_value() {
        let agents = vec![
            AgentDefinition {
                name: "spark".to_string(),
                kind: AgentKind::Farm,
                ownership_ratio: dec!(0.5),
                market_cap_ratio: None,
            },
            AgentDefinition {
                name: "grove".to_string(),
                kind: AgentKind::Sell,
                ownership_ratio: dec!(1),
                market_cap_ratio: Some(dec!(1)),
            },
        ];
        let mut launches = AgentLaunchMap::new();
        launches.insert("spark".to_string(), 11);
        launches.insert("grove".to_string(), 1);

        let snapshot =
            calculate_end_snapshot(&agents, &launches, dec!(1_000), dec!(10_000), dec!(0.2), dec!(0.05))
                .unwrap();
        assert_eq!(snapshot.end_farmable_tokens, dec!(500));
        assert_eq!(snapshot.end_unrewarded_usds_farm, dec!(2_000));
        assert_eq!(snapshot.end_usds_supply, dec!(12_000));
    }
}
