//! Output formatting

use anyhow::Result;
use forecast_core_rs::ScenarioResults;
use rust_decimal::Decimal;
use std::fmt::Write;

/// Output format for `run`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain-text summary tables
    #[default]
    Text,
    /// Full results tree as JSON
    Json,
}

/// Amount in millions, two decimals
fn millions(amount: Decimal) -> String {
    format!("{:.2}", (amount / Decimal::from(1_000_000)).round_dp(2))
}

/// Rate as a percentage, two decimals
fn percent(rate: Decimal) -> String {
    format!("{:.2}%", (rate * Decimal::from(100)).round_dp(2))
}

pub fn render(results: &ScenarioResults, format: OutputFormat, detailed: bool) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(results)?),
        OutputFormat::Text => Ok(render_text(results, detailed)?),
    }
}

fn render_text(results: &ScenarioResults, detailed: bool) -> std::result::Result<String, std::fmt::Error> {
    let mut out = String::new();

    writeln!(out, "Scenario: {}", results.name)?;
    if !results.description.is_empty() {
        writeln!(out, "{}", results.description)?;
    }
    writeln!(out, "(amounts in millions)")?;
    writeln!(out)?;

    if detailed {
        writeln!(
            out,
            "{:<6} {:>8} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
            "Month", "SOFR", "USDS", "sUSDS", "Gross", "Net", "Backstop", "Staking", "Displayed"
        )?;
        for month in &results.monthly {
            writeln!(
                out,
                "{:<6} {:>8} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
                month.month_name,
                percent(month.rates.sofr),
                millions(month.supply.avg_usds_supply),
                millions(month.supply.avg_susds_supply),
                millions(month.revenue.gross_revenue),
                millions(month.revenue.net_revenue),
                millions(month.waterfall.net_backstop_change),
                millions(month.waterfall.staking_rewards),
                millions(month.displayed_backstop),
            )?;
        }
        writeln!(out)?;
    }

    if !results.quarterly.is_empty() {
        writeln!(
            out,
            "{:<8} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
            "Quarter", "Gross", "Net", "Security", "Backstop", "Staking", "Profit", "End USDS"
        )?;
        for quarter in &results.quarterly {
            writeln!(
                out,
                "{:<8} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
                quarter.quarter_name,
                millions(quarter.gross_revenue),
                millions(quarter.net_revenue),
                millions(quarter.security_budget),
                millions(quarter.net_backstop_change),
                millions(quarter.staking_rewards),
                millions(quarter.net_profit),
                millions(quarter.end_usds_supply),
            )?;
        }
        writeln!(out)?;
    }

    for year in &results.annual {
        writeln!(
            out,
            "{}: gross {}, net {}, staking {}, profit {}",
            year.year_name,
            millions(year.gross_revenue),
            millions(year.net_revenue),
            millions(year.staking_rewards),
            millions(year.net_profit),
        )?;
    }
    if !results.annual.is_empty() {
        writeln!(out)?;
    }

    writeln!(out, "Totals over {} months", results.monthly.len())?;
    writeln!(out, "  Gross revenue:   {}", millions(results.total_gross_revenue))?;
    writeln!(out, "  Net revenue:     {}", millions(results.total_net_revenue))?;
    writeln!(out, "  Staking rewards: {}", millions(results.total_staking_rewards))?;
    writeln!(out, "  Net profit:      {}", millions(results.total_net_profit))?;
    writeln!(out)?;

    let snapshot = &results.end_snapshot;
    writeln!(out, "End of period")?;
    writeln!(out, "  Farmable tokens: {}", millions(snapshot.end_farmable_tokens))?;
    writeln!(out, "  Farm USDS:       {}", millions(snapshot.end_unrewarded_usds_farm))?;
    writeln!(out, "  USDS supply:     {}", millions(snapshot.end_usds_supply))?;

    if let Some(remaining) = results.monthly.last().and_then(|m| m.genesis_capital_remaining) {
        writeln!(out, "  Genesis capital: {}", millions(remaining))?;
    }

    Ok(out)
}
