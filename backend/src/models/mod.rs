//! Monthly calculation primitives
//!
//! Each module is a pure function from a small input struct to a snapshot.

pub mod agent;
pub mod rates;
pub mod revenue;
pub mod snapshot;
pub mod supply;
pub mod waterfall;

// Re-exports
pub use agent::{
    aggregate_active_agents, is_agent_active, AgentDefinition, AgentKind, AgentLaunchMap,
    AgentTotals,
};
pub use rates::{RateInputs, RateSet};
pub use revenue::{calculate_revenue, monthly, RevenueInputs, RevenueSnapshot};
pub use snapshot::{calculate_end_snapshot, EndPeriodSnapshot};
pub use supply::{calculate_supply, SupplyError, SupplyInputs, SupplySnapshot};
pub use waterfall::{calculate_waterfall, WaterfallInputs, WaterfallSnapshot};
