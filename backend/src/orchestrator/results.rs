//! Results tree: months → quarters and years → scenario totals

use crate::core::{Horizon, MONTHS_PER_QUARTER, MONTHS_PER_YEAR};
use crate::extensions::Breakdown;
use crate::models::{EndPeriodSnapshot, RateSet, RevenueSnapshot, SupplySnapshot, WaterfallSnapshot};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything computed for one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthResult {
    pub month: u32,
    pub month_name: String,
    pub rates: RateSet,
    pub farmable_tokens: Decimal,
    pub sellable_tokens: Decimal,
    pub supply: SupplySnapshot,

    /// Revenue after extension adjustments
    pub revenue: RevenueSnapshot,

    pub waterfall: WaterfallSnapshot,

    /// Net extension costs (positive = expense)
    pub extension_costs: Decimal,

    pub extension_supply_boost: Decimal,

    /// Direct backstop outflows, not counted as expenses
    pub backstop_outflow: Decimal,

    pub aggregate_backstop_capital: Option<Decimal>,
    pub genesis_capital_remaining: Option<Decimal>,

    /// Backstop figure fed into this month's extensions
    pub displayed_backstop: Decimal,

    /// extension name → breakdown
    pub extension_breakdown: BTreeMap<String, Breakdown>,
}

/// Sums over one complete quarter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarterResult {
    pub quarter: u32,
    pub quarter_name: String,
    pub first_month: u32,
    pub last_month: u32,
    pub gross_revenue: Decimal,
    pub net_revenue: Decimal,
    pub security_budget: Decimal,
    pub backstop_contribution: Decimal,
    pub backstop_withdrawal: Decimal,
    pub net_backstop_change: Decimal,
    pub staking_rewards: Decimal,
    pub net_profit: Decimal,
    /// USDS supply in the quarter's last month
    pub end_usds_supply: Decimal,
}

impl QuarterResult {
    pub fn aggregate(quarter: u32, months: &[MonthResult]) -> Self {
        let sum = |f: fn(&MonthResult) -> Decimal| months.iter().map(f).sum::<Decimal>();

        Self {
            quarter,
            quarter_name: Horizon::quarter_name(quarter),
            first_month: months.first().map(|m| m.month).unwrap_or(0),
            last_month: months.last().map(|m| m.month).unwrap_or(0),
            gross_revenue: sum(|m| m.revenue.gross_revenue),
            net_revenue: sum(|m| m.revenue.net_revenue),
            security_budget: sum(|m| m.waterfall.security_budget),
            backstop_contribution: sum(|m| m.waterfall.backstop_contribution),
            backstop_withdrawal: sum(|m| m.waterfall.backstop_withdrawal),
            net_backstop_change: sum(|m| m.waterfall.net_backstop_change),
            staking_rewards: sum(|m| m.waterfall.staking_rewards),
            net_profit: sum(|m| m.waterfall.net_profit),
            end_usds_supply: months
                .last()
                .map(|m| m.supply.avg_usds_supply)
                .unwrap_or(Decimal::ZERO),
        }
    }
}

/// Roll-up of one complete year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearResult {
    pub year: u32,
    pub year_name: String,
    pub gross_revenue: Decimal,
    pub net_revenue: Decimal,
    pub security_budget: Decimal,
    pub net_backstop_change: Decimal,
    pub staking_rewards: Decimal,
    pub net_profit: Decimal,
    pub end_usds_supply: Decimal,
}

impl YearResult {
    /// Sum the year's quarters
    pub fn aggregate(year: u32, quarters: &[QuarterResult]) -> Self {
        let sum = |f: fn(&QuarterResult) -> Decimal| quarters.iter().map(f).sum::<Decimal>();

        Self {
            year,
            year_name: Horizon::year_name(year),
            gross_revenue: sum(|q| q.gross_revenue),
            net_revenue: sum(|q| q.net_revenue),
            security_budget: sum(|q| q.security_budget),
            net_backstop_change: sum(|q| q.net_backstop_change),
            staking_rewards: sum(|q| q.staking_rewards),
            net_profit: sum(|q| q.net_profit),
            end_usds_supply: quarters.last().map(|q| q.end_usds_supply).unwrap_or(Decimal::ZERO),
        }
    }
}

/// Complete output of one scenario run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResults {
    pub name: String,
    pub description: String,
    pub monthly: Vec<MonthResult>,
    pub quarterly: Vec<QuarterResult>,
    pub annual: Vec<YearResult>,
    pub total_gross_revenue: Decimal,
    pub total_net_revenue: Decimal,
    pub total_staking_rewards: Decimal,
    pub total_net_profit: Decimal,
    pub end_snapshot: EndPeriodSnapshot,
}

impl ScenarioResults {
    /// Roll monthly results up into quarters, years and totals
    pub fn from_months(
        name: impl Into<String>,
        description: impl Into<String>,
        monthly: Vec<MonthResult>,
        end_snapshot: EndPeriodSnapshot,
    ) -> Self {
        let horizon = Horizon::new(monthly.len() as u32);
        let quarterly = (1..=horizon.num_quarters())
            .map(|quarter| {
                let (first, last) = Horizon::quarter_bounds(quarter);
                let months = &monthly[(first - 1) as usize..last as usize];
                QuarterResult::aggregate(quarter, months)
            })
            .collect::<Vec<_>>();
        let quarters_per_year = (MONTHS_PER_YEAR / MONTHS_PER_QUARTER) as usize;
        let annual = (1..=horizon.num_years())
            .map(|year| {
                let last = year as usize * quarters_per_year;
                YearResult::aggregate(year, &quarterly[last - quarters_per_year..last])
            })
            .collect();

        Self {
            name: name.into(),
            description: description.into(),
            total_gross_revenue: monthly.iter().map(|m| m.revenue.gross_revenue).sum(),
            total_net_revenue: monthly.iter().map(|m| m.revenue.net_revenue).sum(),
            total_staking_rewards: monthly.iter().map(|m| m.waterfall.staking_rewards).sum(),
            total_net_profit: monthly.iter().map(|m| m.waterfall.net_profit).sum(),
            monthly,
            quarterly,
            annual,
            end_snapshot,
        }
    }

    pub fn month(&self, month: u32) -> Option<&MonthResult> {
        self.monthly.iter().find(|m| m.month == month)
    }

    pub fn quarter(&self, quarter: u32) -> Option<&QuarterResult> {
        self.quarterly.iter().find(|q| q.quarter == quarter)
    }

    pub fn year(&self, year: u32) -> Option<&YearResult> {
        self.annual.iter().find(|y| y.year == year)
    }
}
